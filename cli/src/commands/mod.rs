//! Command implementations

pub mod config;
pub mod init;
pub mod list;
pub mod task;
pub mod version;

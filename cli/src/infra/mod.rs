//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: process execution, ssh and
//! scp, local git, filesystem access, config loading, and template extraction.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.
//! Imports from `crate::commands` or `crate::output` are forbidden.

pub mod command_runner;
pub mod config;
pub mod dry_run;
pub mod fs;
pub mod git;
pub mod ssh;
pub mod templates;

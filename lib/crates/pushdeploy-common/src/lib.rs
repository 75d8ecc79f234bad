pub mod config;
pub mod types;

pub use config::DemoServerConfig;
pub use types::*;

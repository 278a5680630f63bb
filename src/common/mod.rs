//! Common utilities and types shared across leaderkv

pub mod config;
pub mod error;
pub mod utils;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use utils::{parse_duration, validate_address};

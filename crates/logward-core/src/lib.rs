//! Logward Core - Shared configuration, types, formatting, and error handling

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::{Error, Result};
pub use format::Formatter;
pub use types::{Level, LogEntry};

//! Crossover Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by all other Crossover crates:
//! - Bot configuration (command delimiter, storage, pipe bridge, logging)
//! - Global error type covering all error categories
//! - Structured logging with tracing, including the message transcript
//! - Default data and config directories
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{XoError, XoResult};
pub use logging::init_logging;

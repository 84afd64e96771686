//! Logging utilities.
//!
//! Centralizes logger initialization. Everything else logs through the `log`
//! facade only.

mod init;

pub use init::{LoggingConfig, init_logging};

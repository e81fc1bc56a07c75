//! Error types for numspin
//!
//! Widget operations never fail: bad input is clamped or dropped. The only
//! fallible surface is decoding configuration.

use thiserror::Error;

/// Errors that can occur in numspin
#[derive(Error, Debug)]
pub enum NumspinError {
    /// Failed to decode a TOML configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration decoded but holds values the widgets cannot use
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for numspin operations
pub type Result<T> = std::result::Result<T, NumspinError>;

//! Combined configuration for a numeric spinner
//!
//! ```rust
//! use numspin_widgets::config::SpinnerConfig;
//!
//! let config = SpinnerConfig::from_toml_str(
//!     r#"
//!     minimum = -5
//!     maximum = 5
//!
//!     [entry]
//!     step = 2
//!
//!     [button.repeat]
//!     interval_ms = 50
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.entry.step, 2);
//! assert_eq!(config.button.repeat.interval_ms, 50);
//! ```

use numspin_core::error::{NumspinError, Result};
use serde::{Deserialize, Serialize};

use crate::numeric_entry::NumericEntryConfig;
use crate::small_button::SmallButtonConfig;

/// Range, initial value and visuals of a spinner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpinnerConfig {
    pub minimum: i64,
    pub maximum: i64,
    pub initial: i64,
    /// Entry visuals and step
    pub entry: NumericEntryConfig,
    /// Shared by both spin buttons
    pub button: SmallButtonConfig,
    /// Label of the increment button
    pub up_label: String,
    /// Label of the decrement button
    pub down_label: String,
}

impl Default for SpinnerConfig {
    fn default() -> Self {
        Self {
            minimum: 0,
            maximum: 100,
            initial: 0,
            entry: NumericEntryConfig::default(),
            button: SmallButtonConfig::default(),
            up_label: "▲".to_string(),
            down_label: "▼".to_string(),
        }
    }
}

impl SpinnerConfig {
    pub fn new(minimum: i64, maximum: i64, initial: i64) -> Self {
        Self {
            minimum,
            maximum,
            initial,
            ..Default::default()
        }
    }

    /// Decode from TOML and check the range
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject reversed ranges and non-positive steps
    pub fn validate(&self) -> Result<()> {
        if self.minimum > self.maximum {
            return Err(NumspinError::InvalidValue(format!(
                "minimum {} is greater than maximum {}",
                self.minimum, self.maximum
            )));
        }
        if self.entry.step <= 0 {
            return Err(NumspinError::InvalidValue(format!(
                "step must be positive, got {}",
                self.entry.step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = SpinnerConfig::from_toml_str("maximum = 10").unwrap();
        assert_eq!(config.minimum, 0);
        assert_eq!(config.maximum, 10);
        assert_eq!(config.up_label, "▲");
        assert_eq!(config.button, SmallButtonConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            SpinnerConfig::from_toml_str("minimum = 5\nmaximum = 1"),
            Err(NumspinError::InvalidValue(_))
        ));
        assert!(matches!(
            SpinnerConfig::from_toml_str("[entry]\nstep = 0"),
            Err(NumspinError::InvalidValue(_))
        ));
        assert!(matches!(
            SpinnerConfig::from_toml_str("minimum = \"low\""),
            Err(NumspinError::Config(_))
        ));
    }
}

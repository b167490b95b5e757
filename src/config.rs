//! Gesture recognition thresholds and delays
//!
//! Defaults match the web client: 50px swipes, 10px tap slop, 500ms long
//! press and a 300ms double-tap window. A config can be built in code with
//! the `with_*` setters or loaded from a TOML file:
//!
//! ```toml
//! swipe_threshold = 60.0
//! long_press_delay_ms = 650
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Configuration for gesture recognition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Minimum travel (px) for a contact to count as a swipe
    pub swipe_threshold: f64,

    /// Maximum travel (px) still treated as a tap. Per-axis movement beyond
    /// this marks the contact as a drag and cancels the long press.
    pub tap_threshold: f64,

    /// Stationary hold time before a long press fires (ms)
    pub long_press_delay_ms: u64,

    /// Window for a second tap to make a double tap (ms). A lone tap is
    /// reported this long after its contact ends.
    pub double_tap_window_ms: u64,

    /// Ignore all input and never fire timers
    pub disabled: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 50.0,
            tap_threshold: 10.0,
            long_press_delay_ms: 500,
            double_tap_window_ms: 300,
            disabled: false,
        }
    }
}

impl GestureConfig {
    pub fn with_swipe_threshold(mut self, px: f64) -> Self {
        self.swipe_threshold = px;
        self
    }

    pub fn with_tap_threshold(mut self, px: f64) -> Self {
        self.tap_threshold = px;
        self
    }

    pub fn with_long_press_delay_ms(mut self, ms: u64) -> Self {
        self.long_press_delay_ms = ms;
        self
    }

    pub fn with_double_tap_window_ms(mut self, ms: u64) -> Self {
        self.double_tap_window_ms = ms;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Reject thresholds the classifier cannot work with
    pub fn validate(&self) -> Result<()> {
        check_distance("swipe_threshold", self.swipe_threshold)?;
        check_distance("tap_threshold", self.tap_threshold)?;

        if self.double_tap_window_ms == 0 {
            return Err(Error::InvalidConfig {
                field: "double_tap_window_ms",
                reason: "must be greater than zero",
            });
        }

        Ok(())
    }

    /// Parse and validate a TOML config string
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        debug!(path = %path.display(), ?config, "Loaded gesture config");
        Ok(config)
    }
}

fn check_distance(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidConfig {
            field,
            reason: "must be a finite number",
        });
    }
    if value < 0.0 {
        return Err(Error::InvalidConfig {
            field,
            reason: "must not be negative",
        });
    }
    Ok(())
}

//! Per-axis homing parameters.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MAX_N_AXIS;

/// Homing configuration for a single axis.
///
/// Rates are in mm/min, distances in mm. An axis without a `[homing]`
/// table cannot be homed at all; an axis with `cycle = 0` can be homed
/// explicitly but is skipped by the "all cycles" sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HomingConfig {
    /// Automatic homing cycle this axis belongs to (0 = none).
    #[serde(default)]
    pub cycle: u8,
    /// Limit switch sits on the positive end of travel.
    #[serde(default = "default_positive_direction")]
    pub positive_direction: bool,
    /// Machine position assigned to the switch location once homed.
    #[serde(default)]
    pub mpos: f64,
    /// Slow approach and pull-off rate.
    #[serde(default = "default_feed_rate")]
    pub feed_rate: f64,
    /// Fast approach rate.
    #[serde(default = "default_seek_rate")]
    pub seek_rate: f64,
    /// Pause after each phase [ms].
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u32,
    /// Overshoot multiplier applied to the fast approach.
    #[serde(default = "default_scaler")]
    pub seek_scaler: f64,
    /// Overshoot multiplier applied to the slow approach.
    #[serde(default = "default_scaler")]
    pub feed_scaler: f64,
}

fn default_positive_direction() -> bool {
    true
}
fn default_feed_rate() -> f64 {
    50.0
}
fn default_seek_rate() -> f64 {
    200.0
}
fn default_settle_ms() -> u32 {
    250
}
fn default_scaler() -> f64 {
    1.1
}

impl Default for HomingConfig {
    fn default() -> Self {
        Self {
            cycle: 0,
            positive_direction: default_positive_direction(),
            mpos: 0.0,
            feed_rate: default_feed_rate(),
            seek_rate: default_seek_rate(),
            settle_ms: default_settle_ms(),
            seek_scaler: default_scaler(),
            feed_scaler: default_scaler(),
        }
    }
}

impl HomingConfig {
    /// Sign of the approach direction (+1.0 toward a positive-end switch).
    #[inline]
    pub fn direction_sign(&self) -> f64 {
        if self.positive_direction { 1.0 } else { -1.0 }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.feed_rate > 0.0) || !(self.seek_rate > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "homing rates must be positive (feed_rate={}, seek_rate={})",
                self.feed_rate, self.seek_rate
            )));
        }
        for (name, value) in [("seek_scaler", self.seek_scaler), ("feed_scaler", self.feed_scaler)] {
            if !(1.0..=100.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be within [1, 100], got {value}"
                )));
            }
        }
        if self.cycle as usize > MAX_N_AXIS {
            return Err(ConfigError::ValidationError(format!(
                "homing cycle {} exceeds maximum {MAX_N_AXIS}",
                self.cycle
            )));
        }
        Ok(())
    }
}

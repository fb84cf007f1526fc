//! Machine configuration: axes, motors and homing parameters.
//!
//! Loaded once at startup from `machine.toml` and read-only afterwards.
//!
//! ```toml
//! [shared]
//! service_name = "evo-homing"
//!
//! [[axes]]
//! name = "X"
//! max_travel = 300.0
//! [axes.homing]
//! cycle = 2
//! seek_rate = 500.0
//!
//! [[axes]]
//! name = "Y"
//! motors = [{ pulloff = 2.0 }, { pulloff = 3.0 }]
//! [axes.homing]
//! cycle = 2
//! positive_direction = false
//! ```

pub mod axis;
pub mod homing;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, SharedConfig};
use crate::consts::MAX_N_AXIS;
use crate::mask::AxisMask;

pub use axis::{AxisConfig, MotorConfig};
pub use homing::HomingConfig;

/// Complete machine description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MachineConfig {
    #[serde(default)]
    pub shared: SharedConfig,
    /// Axes in index order (X, Y, Z, A, B, C).
    #[serde(default)]
    pub axes: Vec<AxisConfig, MAX_N_AXIS>,
}

impl MachineConfig {
    #[inline]
    pub fn axis_count(&self) -> usize {
        self.axes.len()
    }

    #[inline]
    pub fn axis(&self, axis: usize) -> Option<&AxisConfig> {
        self.axes.get(axis)
    }

    /// Homing parameters of `axis`, if it has any.
    #[inline]
    pub fn homing(&self, axis: usize) -> Option<&HomingConfig> {
        self.axes.get(axis).and_then(|a| a.homing.as_ref())
    }

    /// Axes that can be homed at all.
    pub fn homing_mask(&self) -> AxisMask {
        let mut mask = AxisMask::EMPTY;
        for (i, axis) in self.axes.iter().enumerate() {
            if axis.homing.is_some() {
                mask.set(i);
            }
        }
        mask
    }

    /// Axes that home together in automatic cycle `cycle`.
    pub fn axis_mask_from_cycle(&self, cycle: u8) -> AxisMask {
        let mut mask = AxisMask::EMPTY;
        for (i, axis) in self.axes.iter().enumerate() {
            if axis.homing.as_ref().is_some_and(|h| h.cycle == cycle) {
                mask.set(i);
            }
        }
        mask
    }

    /// Highest automatic cycle number in use (0 if none).
    pub fn max_cycle(&self) -> u8 {
        self.axes
            .iter()
            .filter_map(|a| a.homing.as_ref().map(|h| h.cycle))
            .max()
            .unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        for axis in &self.axes {
            axis.validate()?;
        }
        Ok(())
    }
}

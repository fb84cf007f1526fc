//! Axis and motor configuration.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::consts::MAX_MOTORS_PER_AXIS;
use crate::mask::Motor;

use super::homing::HomingConfig;

/// One motor driving an axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotorConfig {
    /// Distance to back off the limit switch after homing [mm].
    #[serde(default = "default_pulloff")]
    pub pulloff: f64,
}

fn default_pulloff() -> f64 {
    1.0
}

impl Default for MotorConfig {
    fn default() -> Self {
        Self {
            pulloff: default_pulloff(),
        }
    }
}

impl MotorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.pulloff >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "pulloff must not be negative, got {}",
                self.pulloff
            )));
        }
        Ok(())
    }
}

/// Static configuration of one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AxisConfig {
    /// Display name, usually the axis letter.
    #[serde(default)]
    pub name: String,
    /// Motor steps per millimetre.
    #[serde(default = "default_steps_per_mm")]
    pub steps_per_mm: f64,
    /// Length of travel [mm].
    #[serde(default = "default_max_travel")]
    pub max_travel: f64,
    /// One motor, or two for a squared (gantry) axis.
    #[serde(default = "default_motors")]
    pub motors: Vec<MotorConfig, MAX_MOTORS_PER_AXIS>,
    /// Homing parameters. `None` means the axis cannot be homed.
    #[serde(default)]
    pub homing: Option<HomingConfig>,
}

fn default_steps_per_mm() -> f64 {
    80.0
}
fn default_max_travel() -> f64 {
    1000.0
}
fn default_motors() -> Vec<MotorConfig, MAX_MOTORS_PER_AXIS> {
    let mut motors = Vec::new();
    let _ = motors.push(MotorConfig::default());
    motors
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            steps_per_mm: default_steps_per_mm(),
            max_travel: default_max_travel(),
            motors: default_motors(),
            homing: None,
        }
    }
}

impl AxisConfig {
    /// Axis driven by two motors.
    #[inline]
    pub fn is_squared(&self) -> bool {
        self.motors.len() == MAX_MOTORS_PER_AXIS
    }

    /// Whether the given motor slot is populated.
    #[inline]
    pub fn has_motor(&self, motor: Motor) -> bool {
        motor.index() < self.motors.len()
    }

    fn pulloff(&self, motor: Motor) -> f64 {
        self.motors.get(motor.index()).map_or(0.0, |m| m.pulloff)
    }

    /// Pull-off shared by every motor of the axis (the smaller one when squared).
    pub fn common_pulloff(&self) -> f64 {
        if self.is_squared() {
            self.pulloff(Motor::Motor0).min(self.pulloff(Motor::Motor1))
        } else {
            self.pulloff(Motor::Motor0)
        }
    }

    /// Differential pull-off of a squared axis: motor 1 minus motor 0.
    ///
    /// Negative when motor 0 backs off further, positive when motor 1 does,
    /// zero for single-motor axes.
    pub fn extra_pulloff(&self) -> f64 {
        if self.is_squared() {
            self.pulloff(Motor::Motor1) - self.pulloff(Motor::Motor0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn mpos_to_steps(&self, mpos: f64) -> i32 {
        (mpos * self.steps_per_mm).round() as i32
    }

    #[inline]
    pub fn steps_to_mpos(&self, steps: i32) -> f64 {
        steps as f64 / self.steps_per_mm
    }

    /// Soft-limit envelope `(min, max)` in machine coordinates.
    ///
    /// The switch location is `homing.mpos`; travel extends away from it.
    /// Axes without homing are based at 0 and extend negative.
    pub fn travel_bounds(&self) -> (f64, f64) {
        match &self.homing {
            Some(h) if !h.positive_direction => (h.mpos, h.mpos + self.max_travel),
            Some(h) => (h.mpos - self.max_travel, h.mpos),
            None => (-self.max_travel, 0.0),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let label = if self.name.is_empty() { "<unnamed>" } else { self.name.as_str() };
        if !(self.steps_per_mm > 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "axis {label}: steps_per_mm must be positive"
            )));
        }
        if !(self.max_travel >= 0.0) {
            return Err(ConfigError::ValidationError(format!(
                "axis {label}: max_travel must not be negative"
            )));
        }
        if self.motors.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "axis {label}: at least one motor is required"
            )));
        }
        let labelled = |e: ConfigError| match e {
            ConfigError::ValidationError(msg) => {
                ConfigError::ValidationError(format!("axis {label}: {msg}"))
            }
            other => other,
        };
        for motor in &self.motors {
            motor.validate().map_err(labelled)?;
        }
        if let Some(homing) = &self.homing {
            homing.validate().map_err(labelled)?;
        }
        Ok(())
    }
}

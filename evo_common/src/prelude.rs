//! Prelude module for common re-exports.
//!
//! ```rust
//! use evo_common::prelude::*;
//! ```

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, LogLevel, SharedConfig};
pub use crate::machine::{AxisConfig, HomingConfig, MachineConfig, MotorConfig};

// ─── Masks & Alarms ─────────────────────────────────────────────────
pub use crate::alarm::ExecAlarm;
pub use crate::mask::{AxisMask, Motor, MotorMask};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{AXIS_NAMES, MAX_N_AXIS};

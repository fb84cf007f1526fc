//! EVO Common Library
//!
//! Shared constants, typed axis/motor masks, alarm codes and machine
//! configuration used by every EVO motion crate.
//!
//! # Module Structure
//!
//! - [`consts`] - Axis limits and default paths
//! - [`mask`] - `AxisMask` / `MotorMask` bit-sets
//! - [`alarm`] - `ExecAlarm` codes
//! - [`config`] - Configuration loading traits and types
//! - [`machine`] - Axis, motor and homing configuration
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use evo_common::prelude::*;
//!
//! let axes: AxisMask = "XY".parse().unwrap();
//! assert_eq!(axes.count(), 2);
//! ```

pub mod alarm;
pub mod config;
pub mod consts;
pub mod machine;
pub mod mask;
pub mod prelude;

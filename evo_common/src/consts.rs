//! System-wide constants for the EVO workspace.
//!
//! Single source of truth for axis/motor limits and default paths.
//! Imported by all crates. No duplication permitted.

use static_assertions::const_assert;

/// Maximum number of axes a machine may configure.
pub const MAX_N_AXIS: usize = 6;

/// Maximum number of motors driving a single axis (two for squared axes).
pub const MAX_MOTORS_PER_AXIS: usize = 2;

/// Bit offset of the motor-1 half inside a packed motor mask.
pub const MOTOR1_SHIFT: u32 = 16;

/// Axis letters, indexed by axis number.
pub const AXIS_NAMES: [char; MAX_N_AXIS] = ['X', 'Y', 'Z', 'A', 'B', 'C'];

/// Default machine configuration file.
pub const DEFAULT_MACHINE_CONFIG: &str = "/etc/evo/machine.toml";

// Each motor half of a `MotorMask` is 16 bits wide.
const_assert!(MAX_N_AXIS <= MOTOR1_SHIFT as usize);
const_assert!(MAX_MOTORS_PER_AXIS == 2);

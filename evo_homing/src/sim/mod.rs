//! Simulated machine for tests and the demo binary.
//!
//! Stands in for the motors, planner/stepper and protocol layers with a
//! per-motor distance-to-switch model. No timing is simulated; a planned
//! line completes as soon as the stepper is woken.

mod axis;
mod machine;

pub use axis::{SimAxis, SwitchedMotor, Travel};
pub use machine::{Injection, PlannedLine, SimLog, SimMachine};

//! Homing core.
//!
//! A cycle homes a set of axes together through a fixed phase sequence:
//!
//! ```text
//! PrePulloff → FastApproach → Pulloff0 → SlowApproach → Pulloff1 [→ Pulloff2]
//! ```
//!
//! - [`planner`] turns a phase into one coordinated move
//! - [`runner`] executes the move and watches switches and realtime signals
//! - [`cycles`] sequences phases, automatic cycles and alarm handling
//!
//! ```rust,ignore
//! let mut homing = Homing::new(&config, &mut hal, &signals, &mut sys);
//! homing.run_cycles(AxisMask::ALL_CYCLES)?;
//! ```

pub mod cycles;
pub mod phase;
pub mod planner;
pub mod runner;
pub mod session;

pub use cycles::needs_pulloff2;
pub use phase::{CYCLE_PHASES, HomingPhase};
pub use planner::{HomingMove, compute_move};
pub use session::{Homing, MachineState, SystemState};

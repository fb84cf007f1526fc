//! # EVO Homing
//!
//! Establishes the machine coordinate origin of each axis by driving it
//! onto its limit switch, backing off, re-approaching slowly and backing
//! off again. Squared (two-motor) axes finish with a differential
//! pull-off that trims each motor to its own configured distance.
//!
//! ## Module Structure
//!
//! - [`homing`] - Phase planner, cycle runner and orchestrator
//! - [`hal`] - Traits for motors, stepper and protocol collaborators
//! - [`signals`] - Realtime flags and limit-switch state shared with producers
//! - [`sim`] - Simulated machine used by tests and the binary
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use evo_common::prelude::*;
//! use evo_homing::homing::{Homing, SystemState};
//! use evo_homing::signals::RealtimeSignals;
//! use evo_homing::sim::SimMachine;
//!
//! let config = MachineConfig::from_toml(r#"
//! [[axes]]
//! name = "X"
//! [axes.homing]
//! cycle = 1
//! "#).unwrap();
//!
//! let signals = Arc::new(RealtimeSignals::new());
//! let mut sim = SimMachine::new(config.clone(), Arc::clone(&signals));
//! let mut sys = SystemState::new();
//!
//! Homing::new(&config, &mut sim, &signals, &mut sys)
//!     .run_cycles(AxisMask::ALL_CYCLES)
//!     .unwrap();
//! ```

pub mod hal;
pub mod homing;
pub mod signals;
pub mod sim;

pub use homing::{Homing, HomingPhase, MachineState, SystemState};

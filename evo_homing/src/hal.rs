//! Collaborator interfaces used by the homing core.
//!
//! The core never steps motors itself. It talks to three collaborators:
//!
//! | Trait      | Owner                          | Used for                              |
//! |------------|--------------------------------|---------------------------------------|
//! | `Motors`   | axis/motor configuration layer | homing mode, blocking, step counters  |
//! | `Stepper`  | planner + step generator       | planning a line, segment buffer, stop |
//! | `Protocol` | realtime/report layer          | status reports, channel polling       |
//!
//! Anything that implements all three is a [`HomingHal`].

use bitflags::bitflags;
use evo_common::consts::MAX_N_AXIS;
use evo_common::mask::{AxisMask, Motor, MotorMask};

bitflags! {
    /// Motion flags attached to a planned line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct MotionFlags: u8 {
        /// Issued by the system (homing, parking), not by the job.
        const SYSTEM_MOTION    = 0x01;
        /// Ignore the operator feed-rate override.
        const NO_FEED_OVERRIDE = 0x02;
        /// Rapid traverse.
        const RAPID            = 0x04;
    }
}

impl Default for MotionFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// Per-line planner data.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlanLineData {
    /// Vector feed rate [mm/min].
    pub feed_rate: f64,
    pub motion: MotionFlags,
}

impl PlanLineData {
    /// Line data for a system-level move that bypasses the feed override.
    pub fn system_motion(feed_rate: f64) -> Self {
        Self {
            feed_rate,
            motion: MotionFlags::SYSTEM_MOTION | MotionFlags::NO_FEED_OVERRIDE,
        }
    }
}

/// Motor-level control owned by the axis configuration layer.
pub trait Motors {
    /// Enter or leave homing mode for every motor of `axes`.
    ///
    /// Returns the motors that actually take part. Every motor of those
    /// axes is unblocked as a side effect.
    fn set_homing_mode(&mut self, axes: AxisMask, enable: bool) -> MotorMask;

    /// Keep one motor of a squared axis from stepping until homing mode
    /// is next changed.
    fn block(&mut self, axis: usize, motor: Motor);

    /// Overwrite the logical step counter of `axis`.
    fn set_motor_steps(&mut self, axis: usize, steps: i32);
}

/// Planner and step generator.
pub trait Stepper {
    /// Live machine position [mm].
    fn machine_position(&self) -> [f64; MAX_N_AXIS];

    /// Queue one line to the absolute `target`.
    fn plan_line(&mut self, target: &[f64; MAX_N_AXIS], data: &PlanLineData);

    /// Refill the segment buffer from the planner. Must be called often
    /// enough that the step generator never starves.
    fn prep_buffer(&mut self);

    /// Start executing the queued segments.
    fn wake_up(&mut self);

    /// Force-stop stepping and flush pending segments.
    fn reset(&mut self);

    /// Abort all motion after an alarm.
    fn stop_motion(&mut self);
}

/// Realtime reporting and communication host.
pub trait Protocol {
    fn report_realtime_status(&mut self);

    /// Service communication channels without blocking.
    fn poll_channels(&mut self);

    /// Let the realtime layer process any pending signals.
    fn execute_realtime(&mut self);

    /// Uncancellable blocking pause.
    fn delay_ms(&mut self, ms: u32);
}

/// Everything the homing core needs from the machine.
pub trait HomingHal: Motors + Stepper + Protocol {}

impl<T: Motors + Stepper + Protocol> HomingHal for T {}

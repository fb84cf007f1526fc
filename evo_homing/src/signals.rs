//! Realtime signal block shared between the asynchronous producers
//! (operator input, switch interrupts, other control threads) and the
//! single homing consumer.
//!
//! Flags are plain atomics; the homing loop is the only reader while a
//! cycle runs. Status-report and cycle-stop requests are consumed with
//! read-clear semantics. Reset and safety-door stay latched until the
//! outer realtime layer handles them.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use evo_common::mask::{Motor, MotorMask};

/// Realtime flags and live limit-switch state.
#[derive(Debug, Default)]
pub struct RealtimeSignals {
    status_report: AtomicBool,
    reset: AtomicBool,
    safety_door: AtomicBool,
    cycle_stop: AtomicBool,
    pos_limits: AtomicU32,
    neg_limits: AtomicU32,
}

impl RealtimeSignals {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Producers ──

    pub fn request_status_report(&self) {
        self.status_report.store(true, Ordering::Release);
    }

    pub fn request_reset(&self) {
        self.reset.store(true, Ordering::Release);
    }

    pub fn open_safety_door(&self) {
        self.safety_door.store(true, Ordering::Release);
    }

    /// Raised when the planner finishes the current block.
    pub fn request_cycle_stop(&self) {
        self.cycle_stop.store(true, Ordering::Release);
    }

    // ── Consumers ──

    /// Returns and clears a pending status-report request.
    #[inline]
    pub fn take_status_report(&self) -> bool {
        self.status_report.swap(false, Ordering::AcqRel)
    }

    /// Returns and clears a pending cycle-stop.
    #[inline]
    pub fn take_cycle_stop(&self) -> bool {
        self.cycle_stop.swap(false, Ordering::AcqRel)
    }

    #[inline]
    pub fn reset_requested(&self) -> bool {
        self.reset.load(Ordering::Acquire)
    }

    #[inline]
    pub fn safety_door_open(&self) -> bool {
        self.safety_door.load(Ordering::Acquire)
    }

    #[inline]
    pub fn status_report_pending(&self) -> bool {
        self.status_report.load(Ordering::Acquire)
    }

    #[inline]
    pub fn cycle_stop_pending(&self) -> bool {
        self.cycle_stop.load(Ordering::Acquire)
    }

    pub fn clear_reset(&self) {
        self.reset.store(false, Ordering::Release);
    }

    pub fn close_safety_door(&self) {
        self.safety_door.store(false, Ordering::Release);
    }

    // ── Limit switches ──

    #[inline]
    pub fn positive_limits(&self) -> MotorMask {
        MotorMask::from_bits(self.pos_limits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn negative_limits(&self) -> MotorMask {
        MotorMask::from_bits(self.neg_limits.load(Ordering::Acquire))
    }

    /// Every motor with any limit switch active.
    #[inline]
    pub fn limits(&self) -> MotorMask {
        self.positive_limits() | self.negative_limits()
    }

    /// Update one switch. Called by the switch input layer.
    pub fn set_limit(&self, axis: usize, motor: Motor, positive: bool, active: bool) {
        let word = if positive { &self.pos_limits } else { &self.neg_limits };
        let bit = MotorMask::motor_bit(axis, motor).bits();
        if active {
            word.fetch_or(bit, Ordering::AcqRel);
        } else {
            word.fetch_and(!bit, Ordering::AcqRel);
        }
    }

    /// Some motor reports both of its switches at once.
    #[inline]
    pub fn is_ambiguous(&self) -> bool {
        self.positive_limits().intersects(self.negative_limits())
    }
}

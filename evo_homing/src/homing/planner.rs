//! Phase planner: one coordinated multi-axis move per homing phase.
//!
//! Each participating axis has its own rate and travel for the phase. The
//! move is built so that
//!
//! - the commanded feed rate is the magnitude of the per-axis rate vector;
//! - on the fast approach, the axis components are proportional to the
//!   per-axis rates, scaled against the axis that needs the longest time
//!   (the *limiting* axis);
//! - approaches overshoot by the seek/feed scaler so the switch is
//!   reached despite mechanical slop, pull-offs land exactly.

use heapless::Vec;
use tracing::debug;

use evo_common::consts::{AXIS_NAMES, MAX_N_AXIS};
use evo_common::machine::MachineConfig;
use evo_common::mask::{AxisMask, Motor, MotorMask};

use super::phase::HomingPhase;
use super::session::Homing;
use crate::hal::{HomingHal, PlanLineData};

/// Result of planning one homing phase.
#[derive(Debug, Clone, PartialEq)]
pub struct HomingMove {
    /// Absolute target. Axes outside the move keep their current position;
    /// participating axes are relative to a zeroed step counter.
    pub target: [f64; MAX_N_AXIS],
    /// Per-axis rate used for the phase [mm/min].
    pub rates: [f64; MAX_N_AXIS],
    /// Vector feed rate of the move [mm/min].
    pub feed_rate: f64,
    /// Longest settle time among the participating axes [ms].
    pub settle_ms: u32,
    /// Participating axes.
    pub axes: AxisMask,
    /// Axis whose travel takes the longest at its own rate.
    pub limiting_axis: Option<usize>,
    /// Motors held still for this move (`Pulloff2` only).
    pub blocked: Vec<(usize, Motor), MAX_N_AXIS>,
}

/// Compute the move for `phase` over `motors`.
///
/// `position` is the live machine position, used for axes that do not
/// take part. `approach` selects the direction: toward the switches when
/// true, away from them otherwise.
pub fn compute_move(
    config: &MachineConfig,
    position: [f64; MAX_N_AXIS],
    motors: MotorMask,
    phase: HomingPhase,
    approach: bool,
) -> HomingMove {
    let mut target = position;
    let mut rates = [0.0; MAX_N_AXIS];
    let mut axes = AxisMask::EMPTY;
    let mut blocked = Vec::new();
    let mut settle_ms = 0;
    let mut rate_sq_sum = 0.0;
    let mut max_seek_time = 0.0;
    let mut limiting_rate = 0.0;
    let mut limiting_axis = None;

    // First pass: target holds signed travel; find the limiting axis.
    for axis in 0..config.axis_count().min(MAX_N_AXIS) {
        if !motors.has_axis(axis) {
            continue;
        }
        let (Some(axis_cfg), Some(homing)) = (config.axis(axis), config.homing(axis)) else {
            continue;
        };
        axes.set(axis);
        settle_ms = settle_ms.max(homing.settle_ms);

        let (rate, travel) = match phase {
            HomingPhase::FastApproach => (homing.seek_rate, axis_cfg.max_travel),
            HomingPhase::PrePulloff
            | HomingPhase::SlowApproach
            | HomingPhase::Pulloff0
            | HomingPhase::Pulloff1 => (homing.feed_rate, axis_cfg.common_pulloff()),
            HomingPhase::Pulloff2 => {
                let extra = axis_cfg.extra_pulloff();
                if extra < 0.0 {
                    // Motor 0 backs off further, so motor 1 stays put.
                    let _ = blocked.push((axis, Motor::Motor1));
                } else if extra > 0.0 {
                    let _ = blocked.push((axis, Motor::Motor0));
                }
                (homing.feed_rate, extra.abs())
            }
        };

        rate_sq_sum += rate * rate;
        rates[axis] = rate;

        let seek_time = if rate > 0.0 { travel / rate } else { 0.0 };
        if seek_time > max_seek_time {
            max_seek_time = seek_time;
            limiting_rate = rate;
            limiting_axis = Some(axis);
        }

        target[axis] = if homing.positive_direction ^ approach {
            -travel
        } else {
            travel
        };
    }

    // Second pass: apply the overshoot scaler and, on the fast approach,
    // convert the equal-time travel into a rate-proportional vector.
    for axis in axes.iter() {
        let Some(homing) = config.homing(axis) else {
            continue;
        };
        let scaler = if !approach {
            1.0
        } else if phase == HomingPhase::FastApproach {
            homing.seek_scaler
        } else {
            homing.feed_scaler
        };
        target[axis] *= scaler;
        if phase == HomingPhase::FastApproach && limiting_rate > 0.0 {
            target[axis] *= rates[axis] / limiting_rate;
        }
    }

    HomingMove {
        target,
        rates,
        feed_rate: rate_sq_sum.sqrt(),
        settle_ms,
        axes,
        limiting_axis,
        blocked,
    }
}

impl<H: HomingHal> Homing<'_, H> {
    /// Plan and start the move for `phase`. Returns the settle time [ms].
    pub fn plan_move(&mut self, motors: MotorMask, phase: HomingPhase) -> u32 {
        let position = self.hal.machine_position();
        let mv = compute_move(self.config, position, motors, phase, self.approach);

        // Homing establishes a new reference; prior step counts are void.
        for axis in mv.axes.iter() {
            self.hal.set_motor_steps(axis, 0);
        }
        for &(axis, motor) in &mv.blocked {
            debug!("{} blocking motor {}", AXIS_NAMES[axis], motor.index());
            self.hal.block(axis, motor);
        }
        for axis in mv.axes.iter() {
            debug!(
                "{} target {:.3} rate {:.1}",
                AXIS_NAMES[axis], mv.target[axis], mv.rates[axis]
            );
        }

        self.hal
            .plan_line(&mv.target, &PlanLineData::system_motion(mv.feed_rate));
        self.hal.prep_buffer();
        self.hal.wake_up();

        mv.settle_ms
    }
}

//! Cycle runner: execute one phase and watch for its termination.

use tracing::{debug, warn};

use evo_common::alarm::ExecAlarm;
use evo_common::mask::MotorMask;

use super::phase::HomingPhase;
use super::session::Homing;
use crate::hal::HomingHal;

impl<H: HomingHal> Homing<'_, H> {
    /// Run `phase` for `motors` until every motor has finished.
    ///
    /// Approaches finish per motor as its switch trips. Pull-offs finish
    /// when the planner reports the end of the block with every switch
    /// released. Reset takes precedence over the safety door, and both
    /// over the end of the block.
    ///
    /// On success the stepper is reset and the longest settle time of the
    /// participating axes has elapsed. On failure nothing is cleaned up;
    /// that is the orchestrator's job.
    pub fn run(&mut self, mut motors: MotorMask, phase: HomingPhase) -> Result<(), ExecAlarm> {
        if motors.is_empty() {
            return Ok(());
        }
        if phase == HomingPhase::PrePulloff && !self.signals.limits().intersects(motors) {
            debug!("{phase} skipped, no switch active");
            return Ok(());
        }

        debug!("{phase} motors {motors}");
        self.approach = phase.is_approach();
        let settle_ms = self.plan_move(motors, phase);

        loop {
            if self.approach {
                motors.clear(self.signals.limits());
            }

            self.hal.prep_buffer();

            if self.signals.take_status_report() {
                self.hal.report_realtime_status();
            }
            if self.signals.reset_requested() {
                warn!("{phase}: reset");
                return Err(ExecAlarm::HomingFailReset);
            }
            if self.signals.safety_door_open() {
                warn!("{phase}: safety door open");
                return Err(ExecAlarm::HomingFailDoor);
            }
            if self.signals.take_cycle_stop() {
                if self.approach {
                    warn!("{phase}: block ended with switches {motors} not found");
                    return Err(ExecAlarm::HomingFailApproach);
                }
                if self.signals.limits().intersects(motors) {
                    warn!("{phase}: switches still active after pull-off");
                    return Err(ExecAlarm::HomingFailPulloff);
                }
                motors = MotorMask::EMPTY;
            }

            self.hal.poll_channels();

            if motors.is_empty() {
                break;
            }
        }

        self.hal.reset();
        self.hal.delay_ms(settle_ms);
        self.approach = false;
        Ok(())
    }
}

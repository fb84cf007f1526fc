//! Orchestration: phase sequencing per cycle, automatic cycles, alarms.

use tracing::{debug, error, info, warn};

use evo_common::alarm::ExecAlarm;
use evo_common::consts::{AXIS_NAMES, MAX_N_AXIS};
use evo_common::machine::MachineConfig;
use evo_common::mask::{AxisMask, MotorMask};

use super::phase::{CYCLE_PHASES, HomingPhase};
use super::session::{Homing, MachineState};
use crate::hal::HomingHal;

/// Whether any squared axis among `motors` needs the differential pull-off.
pub fn needs_pulloff2(config: &MachineConfig, motors: MotorMask) -> bool {
    let squared = motors.squared_axes();
    if squared.is_empty() {
        return false;
    }
    squared
        .iter()
        .any(|axis| config.axis(axis).is_some_and(|a| a.extra_pulloff() != 0.0))
}

impl<H: HomingHal> Homing<'_, H> {
    /// Home `axes` (or every automatic cycle for [`AxisMask::ALL_CYCLES`]).
    pub fn run_cycles(&mut self, axes: AxisMask) -> Result<(), ExecAlarm> {
        if let Some(alarm) = self.sys.active_alarm() {
            warn!("Homing refused, alarm active: {alarm}");
            return Err(alarm);
        }
        if self.signals.is_ambiguous() {
            let alarm = ExecAlarm::HomingAmbiguousSwitch;
            error!("{alarm}: {}", self.signals.positive_limits() & self.signals.negative_limits());
            self.sys.raise_alarm(alarm);
            return Err(alarm);
        }

        self.sys.state = MachineState::Homing;
        let result = if axes != AxisMask::ALL_CYCLES {
            self.run_one_cycle(axes)
        } else {
            self.run_all_cycles()
        };
        if result.is_ok() {
            self.sys.state = MachineState::Idle;
        }
        result
    }

    fn run_all_cycles(&mut self) -> Result<(), ExecAlarm> {
        let mut any_cycle = false;
        for cycle in 1..=MAX_N_AXIS as u8 {
            if let Some(alarm) = self.sys.active_alarm() {
                return Err(alarm);
            }
            let axes = self.config.axis_mask_from_cycle(cycle);
            if axes.is_empty() {
                continue;
            }
            any_cycle = true;
            debug!("Homing cycle {cycle}: {axes}");
            self.run_one_cycle(axes)?;
        }

        if !any_cycle {
            let alarm = ExecAlarm::HomingNoCycles;
            error!("{alarm}");
            self.sys.raise_alarm(alarm);
            return Err(alarm);
        }
        Ok(())
    }

    /// Run every phase of one cycle for `axes`, together.
    ///
    /// Axes that cannot be homed are dropped from the request. On failure
    /// the alarm is raised, homing mode is left, motion is stopped and the
    /// approach flag is cleared.
    pub fn run_one_cycle(&mut self, axes: AxisMask) -> Result<(), ExecAlarm> {
        let axes = axes & self.config.homing_mask();
        info!("Homing {axes}");

        let motors = self.hal.set_homing_mode(axes, true);

        if let Err(alarm) = self.run_phases(motors) {
            self.approach = false;
            self.sys.raise_alarm(alarm);
            self.hal.set_homing_mode(axes, false);
            error!("Homing fail: {alarm}");
            self.hal.stop_motion();
            self.hal.execute_realtime();
            return Err(alarm);
        }

        self.set_mpos(axes);
        info!("Homed {axes}");
        Ok(())
    }

    fn run_phases(&mut self, motors: MotorMask) -> Result<(), ExecAlarm> {
        for phase in CYCLE_PHASES {
            self.run(motors, phase)?;
        }
        if needs_pulloff2(self.config, motors) {
            self.run(motors, HomingPhase::Pulloff2)?;
        }
        Ok(())
    }

    /// Commit the home position of each axis and leave homing mode.
    fn set_mpos(&mut self, axes: AxisMask) {
        for axis in axes.iter() {
            let (Some(axis_cfg), Some(homing)) = (self.config.axis(axis), self.config.homing(axis))
            else {
                continue;
            };
            let steps = axis_cfg.mpos_to_steps(homing.mpos);
            debug!("{} mpos {:.3} ({steps} steps)", AXIS_NAMES[axis], homing.mpos);
            self.hal.set_motor_steps(axis, steps);
        }
        self.hal.set_homing_mode(axes, false);
    }
}

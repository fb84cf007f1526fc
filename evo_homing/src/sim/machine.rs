//! Simulated machine implementing every homing collaborator.
//!
//! A planned line executes in one step when the stepper is woken: each
//! unblocked motor travels its share, approaching motors stop on their
//! switch. The end-of-block signal follows the planner's rule: it is
//! raised unless every approaching motor stopped on a switch (the homing
//! loop then finishes on its own and flushes the block).

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use evo_common::consts::{AXIS_NAMES, MAX_N_AXIS};
use evo_common::machine::MachineConfig;
use evo_common::mask::{AxisMask, Motor, MotorMask};

use super::axis::{SimAxis, SwitchedMotor};
use crate::hal::{Motors, PlanLineData, Protocol, Stepper};
use crate::signals::RealtimeSignals;

/// Realtime event raised when a given line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Injection {
    Reset,
    SafetyDoor,
    StatusReport,
    CycleStop,
}

/// One line handed to the planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedLine {
    pub target: [f64; MAX_N_AXIS],
    pub data: PlanLineData,
}

/// Everything the simulation observed.
#[derive(Debug, Clone, Default)]
pub struct SimLog {
    pub lines: Vec<PlannedLine>,
    pub delays: Vec<u32>,
    pub blocked: Vec<(usize, Motor)>,
    pub homing_mode: Vec<(AxisMask, bool)>,
    pub resets: u32,
    pub motion_stops: u32,
    pub status_reports: u32,
    pub realtime_calls: u32,
    pub polls: u64,
}

pub struct SimMachine {
    config: MachineConfig,
    signals: Arc<RealtimeSignals>,
    axes: [SimAxis; MAX_N_AXIS],
    motors: [[SwitchedMotor; 2]; MAX_N_AXIS],
    steps: [i32; MAX_N_AXIS],
    homing_motors: MotorMask,
    blocked: MotorMask,
    pending: Option<PlannedLine>,
    injections: Vec<(usize, Injection)>,
    realtime_delays: bool,
    log: SimLog,
}

impl SimMachine {
    pub fn new(config: MachineConfig, signals: Arc<RealtimeSignals>) -> Self {
        let axes = [SimAxis::default(); MAX_N_AXIS];
        let mut sim = Self {
            config,
            signals,
            axes,
            motors: [[SwitchedMotor::new(0.0, false); 2]; MAX_N_AXIS],
            steps: [0; MAX_N_AXIS],
            homing_motors: MotorMask::EMPTY,
            blocked: MotorMask::EMPTY,
            pending: None,
            injections: Vec::new(),
            realtime_delays: false,
            log: SimLog::default(),
        };
        for axis in 0..MAX_N_AXIS {
            sim.place_axis(axis);
        }
        sim
    }

    /// Replace the setup of one axis and re-place its motors.
    pub fn with_axis(mut self, axis: usize, setup: SimAxis) -> Self {
        if axis < MAX_N_AXIS {
            self.axes[axis] = setup;
            self.place_axis(axis);
        }
        self
    }

    /// Raise `event` when line number `line` (0-based) starts.
    pub fn with_injection(mut self, line: usize, event: Injection) -> Self {
        self.injections.push((line, event));
        self
    }

    /// Really sleep in `delay_ms`.
    pub fn with_realtime_delays(mut self, enabled: bool) -> Self {
        self.realtime_delays = enabled;
        self
    }

    #[inline]
    pub fn log(&self) -> &SimLog {
        &self.log
    }

    #[inline]
    pub fn homing_motors(&self) -> MotorMask {
        self.homing_motors
    }

    #[inline]
    pub fn blocked_motors(&self) -> MotorMask {
        self.blocked
    }

    /// Distance from `motor` of `axis` to its switch [mm].
    pub fn switch_distance(&self, axis: usize, motor: Motor) -> f64 {
        self.motors
            .get(axis)
            .map_or(0.0, |m| m[motor.index()].distance())
    }

    /// Machine position formatted like a status report (`X:..,Y:..`).
    pub fn position_report(&self) -> String {
        let position = self.machine_position();
        (0..self.config.axis_count().min(MAX_N_AXIS))
            .map(|axis| format!("{}:{:.3}", AXIS_NAMES[axis], position[axis]))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn place_axis(&mut self, axis: usize) {
        let setup = self.axes[axis];
        self.motors[axis] = [
            SwitchedMotor::new(setup.distance, setup.switch_present),
            SwitchedMotor::new(setup.distance + setup.skew, setup.switch_present),
        ];
        self.sync_limits(axis);
    }

    fn positive_switch(&self, axis: usize) -> bool {
        self.config.homing(axis).is_none_or(|h| h.positive_direction)
    }

    fn sync_limits(&self, axis: usize) {
        let Some(axis_cfg) = self.config.axis(axis) else {
            return;
        };
        let positive = self.positive_switch(axis);
        for motor in Motor::ALL {
            let pressed = axis_cfg.has_motor(motor) && self.motors[axis][motor.index()].is_pressed();
            self.signals.set_limit(axis, motor, positive, pressed);
        }
    }

    fn execute(&mut self, line: PlannedLine) {
        let mut approached = false;
        let mut unfinished = false;

        for axis in 0..self.config.axis_count().min(MAX_N_AXIS) {
            let Some(axis_cfg) = self.config.axis(axis) else {
                continue;
            };
            let current = axis_cfg.steps_to_mpos(self.steps[axis]);
            let delta = line.target[axis] - current;
            if delta == 0.0 {
                continue;
            }
            let sign = if self.positive_switch(axis) { 1.0 } else { -1.0 };
            let toward = delta * sign;
            let setup = self.axes[axis];

            let mut moved = None;
            for motor in Motor::ALL {
                if !axis_cfg.has_motor(motor) || self.blocked.contains(axis, motor) {
                    continue;
                }
                let travel = self.motors[axis][motor.index()].advance(toward, &setup);
                if toward > 0.0 {
                    approached = true;
                    unfinished |= !travel.tripped;
                }
                moved.get_or_insert(travel.moved);
            }

            if let Some(moved) = moved {
                self.steps[axis] = axis_cfg.mpos_to_steps(current + moved * sign);
            }
            self.sync_limits(axis);
        }

        if !approached || unfinished {
            self.signals.request_cycle_stop();
        }
    }

    /// Drop queued motion. A flushed block never reports its end.
    fn flush(&mut self) {
        self.pending = None;
        self.signals.take_cycle_stop();
    }

    fn inject(&self, line: usize) {
        for &(at, event) in &self.injections {
            if at != line {
                continue;
            }
            debug!("sim: line {line} raises {event:?}");
            match event {
                Injection::Reset => self.signals.request_reset(),
                Injection::SafetyDoor => self.signals.open_safety_door(),
                Injection::StatusReport => self.signals.request_status_report(),
                Injection::CycleStop => self.signals.request_cycle_stop(),
            }
        }
    }
}

impl Motors for SimMachine {
    fn set_homing_mode(&mut self, axes: AxisMask, enable: bool) -> MotorMask {
        let mut motors = MotorMask::EMPTY;
        for axis in axes.iter() {
            let Some(axis_cfg) = self.config.axis(axis) else {
                continue;
            };
            self.blocked.clear(MotorMask::axis_motors(axis));
            if axis_cfg.homing.is_none() {
                continue;
            }
            for motor in Motor::ALL {
                if axis_cfg.has_motor(motor) {
                    motors.insert(axis, motor);
                }
            }
        }
        if enable {
            self.homing_motors |= motors;
        } else {
            self.homing_motors.clear(motors);
        }
        self.log.homing_mode.push((axes, enable));
        motors
    }

    fn block(&mut self, axis: usize, motor: Motor) {
        self.blocked.insert(axis, motor);
        self.log.blocked.push((axis, motor));
    }

    fn set_motor_steps(&mut self, axis: usize, steps: i32) {
        if let Some(slot) = self.steps.get_mut(axis) {
            *slot = steps;
        }
    }
}

impl Stepper for SimMachine {
    fn machine_position(&self) -> [f64; MAX_N_AXIS] {
        let mut position = [0.0; MAX_N_AXIS];
        for (axis, axis_cfg) in self.config.axes.iter().enumerate() {
            position[axis] = axis_cfg.steps_to_mpos(self.steps[axis]);
        }
        position
    }

    fn plan_line(&mut self, target: &[f64; MAX_N_AXIS], data: &PlanLineData) {
        let line = PlannedLine {
            target: *target,
            data: *data,
        };
        self.log.lines.push(line);
        self.pending = Some(line);
    }

    fn prep_buffer(&mut self) {}

    fn wake_up(&mut self) {
        if let Some(line) = self.pending.take() {
            self.execute(line);
            self.inject(self.log.lines.len().saturating_sub(1));
        }
    }

    fn reset(&mut self) {
        self.flush();
        self.log.resets += 1;
    }

    fn stop_motion(&mut self) {
        self.flush();
        self.log.motion_stops += 1;
    }
}

impl Protocol for SimMachine {
    fn report_realtime_status(&mut self) {
        self.log.status_reports += 1;
        info!("<Home|MPos:{}>", self.position_report());
    }

    fn poll_channels(&mut self) {
        self.log.polls += 1;
    }

    fn execute_realtime(&mut self) {
        self.log.realtime_calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.delays.push(ms);
        if self.realtime_delays {
            thread::sleep(Duration::from_millis(u64::from(ms)));
        }
    }
}

//! Homing session and machine state.

use evo_common::alarm::ExecAlarm;
use evo_common::machine::MachineConfig;

use crate::hal::HomingHal;
use crate::signals::RealtimeSignals;

/// Coarse machine state as seen by the homing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MachineState {
    #[default]
    Idle,
    Homing,
    Alarm,
}

/// Machine state plus the alarm that put it there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SystemState {
    pub state: MachineState,
    pub alarm: Option<ExecAlarm>,
}

impl SystemState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the alarm state. The first alarm wins until cleared.
    pub fn raise_alarm(&mut self, alarm: ExecAlarm) {
        self.state = MachineState::Alarm;
        self.alarm.get_or_insert(alarm);
    }

    /// Acknowledge the alarm and return to idle.
    pub fn clear_alarm(&mut self) {
        self.state = MachineState::Idle;
        self.alarm = None;
    }

    #[inline]
    pub fn is_alarm(&self) -> bool {
        self.state == MachineState::Alarm
    }

    /// The latched alarm while in the alarm state.
    #[inline]
    pub fn active_alarm(&self) -> Option<ExecAlarm> {
        if self.is_alarm() { self.alarm } else { None }
    }
}

/// One homing invocation.
///
/// Borrows everything it touches for its lifetime. The approach flag lives
/// here rather than in a global: it is set by [`Homing::run`] for approach
/// phases, read by the planner for direction and overshoot, and cleared on
/// completion or failure.
pub struct Homing<'a, H: HomingHal> {
    pub(crate) config: &'a MachineConfig,
    pub(crate) hal: &'a mut H,
    pub(crate) signals: &'a RealtimeSignals,
    pub(crate) sys: &'a mut SystemState,
    pub(crate) approach: bool,
}

impl<'a, H: HomingHal> Homing<'a, H> {
    pub fn new(
        config: &'a MachineConfig,
        hal: &'a mut H,
        signals: &'a RealtimeSignals,
        sys: &'a mut SystemState,
    ) -> Self {
        Self {
            config,
            hal,
            signals,
            sys,
            approach: false,
        }
    }

    /// True while an approach phase is executing.
    #[inline]
    pub fn is_approaching(&self) -> bool {
        self.approach
    }

    #[inline]
    pub fn system(&self) -> &SystemState {
        &*self.sys
    }

    #[inline]
    pub fn hal(&self) -> &H {
        &*self.hal
    }
}

//! Alarm conditions raised by the motion core.
//!
//! An alarm is terminal for the operation that raised it. The numeric
//! codes are the ones reported on the status channel, so they must stay
//! stable.

use thiserror::Error;

/// Executor alarm codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[repr(u8)]
pub enum ExecAlarm {
    /// Hard limit switch tripped outside of homing.
    #[error("hard limit triggered")]
    HardLimit = 1,
    /// Reset issued while a homing cycle was running.
    #[error("homing failed: reset during cycle")]
    HomingFailReset = 6,
    /// Safety door opened while a homing cycle was running.
    #[error("homing failed: safety door opened")]
    HomingFailDoor = 7,
    /// Limit switch still engaged after a pull-off move.
    #[error("homing failed: limit switch did not release after pull-off")]
    HomingFailPulloff = 8,
    /// Limit switch not reached within the approach move.
    #[error("homing failed: limit switch not found during approach")]
    HomingFailApproach = 9,
    /// A motor reports both of its limit switches active.
    #[error("homing refused: ambiguous limit switch state")]
    HomingAmbiguousSwitch = 12,
    /// "All cycles" requested but no axis has a homing cycle.
    #[error("no homing cycles defined")]
    HomingNoCycles = 16,
}

impl ExecAlarm {
    #[inline]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[inline]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::HardLimit),
            6 => Some(Self::HomingFailReset),
            7 => Some(Self::HomingFailDoor),
            8 => Some(Self::HomingFailPulloff),
            9 => Some(Self::HomingFailApproach),
            12 => Some(Self::HomingAmbiguousSwitch),
            16 => Some(Self::HomingNoCycles),
            _ => None,
        }
    }

    /// True for alarms raised by a running homing phase.
    #[inline]
    pub const fn is_homing_failure(self) -> bool {
        matches!(
            self,
            Self::HomingFailReset
                | Self::HomingFailDoor
                | Self::HomingFailPulloff
                | Self::HomingFailApproach
        )
    }
}

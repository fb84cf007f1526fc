//! Homing phases.

use std::fmt;

/// One move of a homing cycle, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HomingPhase {
    /// Clear switches that are already pressed before the fast approach.
    PrePulloff,
    /// Seek the switches at seek rate over the full travel.
    FastApproach,
    /// Back off after the fast approach.
    Pulloff0,
    /// Find the switches again at feed rate.
    SlowApproach,
    /// Back off after the slow approach.
    Pulloff1,
    /// Differential pull-off of squared axes; one motor per axis is blocked.
    Pulloff2,
}

/// The unconditional part of a cycle. `Pulloff2` is appended only when a
/// squared axis needs it.
pub const CYCLE_PHASES: [HomingPhase; 5] = [
    HomingPhase::PrePulloff,
    HomingPhase::FastApproach,
    HomingPhase::Pulloff0,
    HomingPhase::SlowApproach,
    HomingPhase::Pulloff1,
];

impl HomingPhase {
    /// Moves toward the switches.
    #[inline]
    pub const fn is_approach(self) -> bool {
        matches!(self, Self::FastApproach | Self::SlowApproach)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PrePulloff => "PrePulloff",
            Self::FastApproach => "Fast approach",
            Self::Pulloff0 => "Pulloff0",
            Self::SlowApproach => "Slow approach",
            Self::Pulloff1 => "Pulloff1",
            Self::Pulloff2 => "Differential pulloff",
        }
    }
}

impl fmt::Display for HomingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

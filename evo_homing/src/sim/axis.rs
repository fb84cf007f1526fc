//! Switch physics for one simulated axis.
//!
//! Distances are measured from each motor to its homing switch along the
//! homing direction. A motor moving toward the switch stops the instant the
//! switch trips; moving away releases it once clear.

use tracing::trace;

/// Distance below which a motor counts as sitting on its switch [mm].
const ON_SWITCH: f64 = 1e-9;

/// Simulation setup of one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimAxis {
    /// Distance from motor 0 to its switch [mm]. Zero or less starts pressed.
    pub distance: f64,
    /// Extra distance of motor 1 on a squared axis (gantry rack) [mm].
    pub skew: f64,
    /// Axis has a working switch at all.
    pub switch_present: bool,
    /// Switch never releases once pressed.
    pub stuck: bool,
}

impl Default for SimAxis {
    fn default() -> Self {
        Self {
            distance: 50.0,
            skew: 0.0,
            switch_present: true,
            stuck: false,
        }
    }
}

impl SimAxis {
    pub fn at_distance(distance: f64) -> Self {
        Self {
            distance,
            ..Self::default()
        }
    }

    pub fn without_switch() -> Self {
        Self {
            switch_present: false,
            ..Self::default()
        }
    }

    pub fn with_skew(mut self, skew: f64) -> Self {
        self.skew = skew;
        self
    }

    pub fn stuck(mut self) -> Self {
        self.stuck = true;
        self
    }
}

/// Outcome of one commanded motor move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Travel {
    /// Distance actually moved toward the switch (negative = away) [mm].
    pub moved: f64,
    /// Moving toward the switch and stopped on it.
    pub tripped: bool,
}

/// Live state of one motor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchedMotor {
    distance: f64,
    pressed: bool,
}

impl SwitchedMotor {
    pub fn new(distance: f64, switch_present: bool) -> Self {
        let distance = distance.max(0.0);
        Self {
            distance,
            pressed: switch_present && distance <= ON_SWITCH,
        }
    }

    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Move `toward` mm in the homing direction (negative moves away).
    pub fn advance(&mut self, toward: f64, axis: &SimAxis) -> Travel {
        if toward > 0.0 && axis.switch_present {
            if self.pressed {
                return Travel { moved: 0.0, tripped: true };
            }
            if self.distance - toward <= ON_SWITCH {
                let moved = self.distance;
                self.distance = 0.0;
                self.pressed = true;
                trace!("switch tripped after {moved:.3} mm");
                return Travel { moved, tripped: true };
            }
        }

        self.distance -= toward;
        if self.pressed && !axis.stuck && self.distance > ON_SWITCH {
            self.pressed = false;
            trace!("switch released at {:.3} mm", self.distance);
        }
        Travel {
            moved: toward,
            tripped: false,
        }
    }
}

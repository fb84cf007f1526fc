//! Typed bit-sets over axes and motors.
//!
//! The realtime layer packs motor state into a single `u32`: the low 16
//! bits hold motor 0 of every axis and the high 16 bits hold motor 1.
//! `AxisMask` has one bit per axis. Both wrappers keep that narrow
//! encoding and expose named accessors instead of raw shifts.

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};
use std::str::FromStr;

use thiserror::Error;

use crate::consts::{AXIS_NAMES, MAX_N_AXIS, MOTOR1_SHIFT};

/// Motor position on an axis. Squared axes use both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Motor {
    Motor0 = 0,
    Motor1 = 1,
}

impl Motor {
    /// Both motor slots, in index order.
    pub const ALL: [Motor; 2] = [Motor::Motor0, Motor::Motor1];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Motor0),
            1 => Some(Self::Motor1),
            _ => None,
        }
    }

    #[inline]
    const fn shift(self) -> u32 {
        match self {
            Self::Motor0 => 0,
            Self::Motor1 => MOTOR1_SHIFT,
        }
    }
}

/// Error returned when parsing an axis mask from letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MaskParseError {
    #[error("unknown axis letter '{0}'")]
    UnknownAxis(char),
}

// ─── AxisMask ───────────────────────────────────────────────────────

/// One bit per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AxisMask(u32);

impl AxisMask {
    pub const EMPTY: Self = Self(0);

    /// Sentinel passed to the orchestrator meaning "run every configured cycle".
    pub const ALL_CYCLES: Self = Self(0);

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & ((1 << MAX_N_AXIS) - 1))
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn bit(axis: usize) -> Self {
        Self(1 << axis)
    }

    #[inline]
    pub const fn contains(self, axis: usize) -> bool {
        axis < MAX_N_AXIS && self.0 & (1 << axis) != 0
    }

    #[inline]
    pub fn set(&mut self, axis: usize) {
        self.0 |= 1 << axis;
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of axes in the mask.
    #[inline]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Axis indices present in the mask, ascending.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        (0..MAX_N_AXIS).filter(move |&axis| self.contains(axis))
    }
}

impl BitOr for AxisMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for AxisMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for AxisMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for AxisMask {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl fmt::Display for AxisMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for axis in self.iter() {
            write!(f, "{}", AXIS_NAMES[axis])?;
        }
        Ok(())
    }
}

impl FromStr for AxisMask {
    type Err = MaskParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mask = Self::EMPTY;
        for c in s.chars().filter(|c| !c.is_whitespace()) {
            let upper = c.to_ascii_uppercase();
            let axis = AXIS_NAMES
                .iter()
                .position(|&name| name == upper)
                .ok_or(MaskParseError::UnknownAxis(c))?;
            mask.set(axis);
        }
        Ok(mask)
    }
}

// ─── MotorMask ──────────────────────────────────────────────────────

/// Two bits per axis: motor 0 in the low half, motor 1 in the high half.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MotorMask(u32);

impl MotorMask {
    pub const EMPTY: Self = Self(0);

    /// Low half: motor 0 of every axis.
    pub const MOTOR0: u32 = 0x0000_ffff;
    /// High half: motor 1 of every axis.
    pub const MOTOR1: u32 = 0xffff_0000;

    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Mask with only the given motor of the given axis.
    #[inline]
    pub const fn motor_bit(axis: usize, motor: Motor) -> Self {
        Self(1 << (axis as u32 + motor.shift()))
    }

    /// Mask with both motor slots of the given axis.
    #[inline]
    pub const fn axis_motors(axis: usize) -> Self {
        Self(Self::motor_bit(axis, Motor::Motor0).0 | Self::motor_bit(axis, Motor::Motor1).0)
    }

    #[inline]
    pub const fn contains(self, axis: usize, motor: Motor) -> bool {
        self.0 & Self::motor_bit(axis, motor).0 != 0
    }

    /// True if either motor of `axis` is present.
    #[inline]
    pub const fn has_axis(self, axis: usize) -> bool {
        self.0 & Self::axis_motors(axis).0 != 0
    }

    #[inline]
    pub fn insert(&mut self, axis: usize, motor: Motor) {
        self.0 |= Self::motor_bit(axis, motor).0;
    }

    /// Remove every bit that is set in `other`.
    #[inline]
    pub fn clear(&mut self, other: MotorMask) {
        self.0 &= !other.0;
    }

    #[inline]
    pub const fn intersects(self, other: MotorMask) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Axes with at least one motor present.
    #[inline]
    pub const fn axes(self) -> AxisMask {
        AxisMask::from_bits((self.0 | (self.0 >> MOTOR1_SHIFT)) & Self::MOTOR0)
    }

    /// Axes with both motors present.
    #[inline]
    pub const fn squared_axes(self) -> AxisMask {
        AxisMask::from_bits(self.0 & (self.0 >> MOTOR1_SHIFT) & Self::MOTOR0)
    }
}

impl BitOr for MotorMask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for MotorMask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for MotorMask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::Display for MotorMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}

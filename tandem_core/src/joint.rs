// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Actuator state owned by a segment.
//!
//! A [`Joint`] is the actuator capability of a segment. The host drives its
//! live parameters; a following joint additionally has its target angle,
//! velocity, and damping written by the linkage.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed `[min, max]` interval of a joint parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ParamRange {
    /// Lower bound.
    pub min: f64,
    /// Upper bound.
    pub max: f64,
}

impl ParamRange {
    /// A range admitting every finite value.
    pub const UNBOUNDED: Self = Self {
        min: f64::NEG_INFINITY,
        max: f64::INFINITY,
    };

    /// Creates a range from its bounds.
    #[inline]
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `max - min`.
    #[inline]
    #[must_use]
    pub fn width(self) -> f64 {
        self.max - self.min
    }

    /// Returns whether both bounds are finite and `min < max`.
    #[must_use]
    pub fn is_proper(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min < self.max
    }

    /// Clamps `value` into the range.
    ///
    /// Unlike [`f64::clamp`] this never panics: an inverted range resolves to
    /// its upper bound.
    #[inline]
    #[must_use]
    pub fn clamp(self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }

    /// Returns whether `value` lies inside the range.
    #[inline]
    #[must_use]
    pub fn contains(self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl Default for ParamRange {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

/// Mechanical kind of an actuator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum JointKind {
    /// Rotary joint with a bounded angle range.
    #[default]
    Rotary,
    /// Continuously rotating rotor; has no meaningful angle range.
    Continuous,
    /// Linear piston.
    Linear,
}

impl JointKind {
    /// Returns whether the linkage can lead or follow with this kind.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        matches!(self, Self::Rotary)
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rotary => write!(f, "rotary"),
            Self::Continuous => write!(f, "continuous"),
            Self::Linear => write!(f, "linear"),
        }
    }
}

/// Live state of an actuator.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Joint {
    /// Mechanical kind.
    pub kind: JointKind,
    /// Currently commanded angle.
    pub target_angle: f64,
    /// Soft angle limits.
    pub angle_range: ParamRange,
    /// Traverse velocity.
    pub velocity: f64,
    /// Configured bounds for the traverse velocity.
    pub velocity_limits: ParamRange,
    /// Damping.
    pub damping: f64,
    /// Configured bounds for damping.
    pub damping_limits: ParamRange,
    /// Whether the joint is locked in place.
    pub locked: bool,
    /// Whether the joint has a motor at all.
    pub motorized: bool,
    /// Whether the motor is currently engaged.
    pub motor_engaged: bool,
}

impl Default for Joint {
    fn default() -> Self {
        Self::rotary(ParamRange::new(-90.0, 90.0))
    }
}

impl Joint {
    /// Creates an unlocked, motorized, engaged rotary joint centred in
    /// `angle_range`.
    #[must_use]
    pub fn rotary(angle_range: ParamRange) -> Self {
        Self {
            kind: JointKind::Rotary,
            target_angle: (angle_range.min + angle_range.max) * 0.5,
            angle_range,
            velocity: 1.0,
            velocity_limits: ParamRange::new(0.0, f64::INFINITY),
            damping: 1.0,
            damping_limits: ParamRange::new(0.0, f64::INFINITY),
            locked: false,
            motorized: true,
            motor_engaged: true,
        }
    }

    /// Sets the kind.
    #[must_use]
    pub fn with_kind(mut self, kind: JointKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the commanded angle.
    #[must_use]
    pub fn with_angle(mut self, angle: f64) -> Self {
        self.target_angle = angle;
        self
    }

    /// Sets the traverse velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }

    /// Sets the velocity bounds.
    #[must_use]
    pub fn with_velocity_limits(mut self, limits: ParamRange) -> Self {
        self.velocity_limits = limits;
        self
    }

    /// Sets the damping.
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Sets the damping bounds.
    #[must_use]
    pub fn with_damping_limits(mut self, limits: ParamRange) -> Self {
        self.damping_limits = limits;
        self
    }

    /// Sets the locked flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Marks the joint as unpowered (no motor).
    #[must_use]
    pub fn unmotorized(mut self) -> Self {
        self.motorized = false;
        self
    }

    /// Sets whether the motor is engaged.
    #[must_use]
    pub fn with_motor_engaged(mut self, engaged: bool) -> Self {
        self.motor_engaged = engaged;
        self
    }

    /// Returns whether the motor can currently drive the joint.
    #[inline]
    #[must_use]
    pub const fn is_driven(&self) -> bool {
        self.motorized && self.motor_engaged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_handles_inverted_range() {
        let range = ParamRange::new(5.0, 2.0);
        assert_eq!(range.clamp(10.0), 2.0);
        assert_eq!(range.clamp(-10.0), 2.0);
    }

    #[test]
    fn proper_ranges() {
        assert!(ParamRange::new(0.0, 1.0).is_proper());
        assert!(!ParamRange::new(1.0, 1.0).is_proper());
        assert!(!ParamRange::new(2.0, 1.0).is_proper());
        assert!(!ParamRange::UNBOUNDED.is_proper());
    }

    #[test]
    fn rotary_defaults_are_driven_and_centred() {
        let joint = Joint::rotary(ParamRange::new(-10.0, 30.0));
        assert!(joint.is_driven());
        assert!(!joint.locked);
        assert_eq!(joint.target_angle, 10.0);
        assert!(joint.kind.is_supported());
    }

    #[test]
    fn unsupported_kinds() {
        assert!(!JointKind::Continuous.is_supported());
        assert!(!JointKind::Linear.is_supported());
    }
}

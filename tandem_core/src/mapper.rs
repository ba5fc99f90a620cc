// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Range-ratio rescaling between a leader joint and a follower joint.
//!
//! A follower reproduces its leader's motion in its own units:
//!
//! - **Angle** keeps the same fractional position within the range.
//! - **Velocity** keeps the same full-range traversal time, then clamps to
//!   the follower's velocity limits.
//! - **Damping** keeps `damping × velocity` constant, using the follower's
//!   clamped velocity, then clamps to the follower's damping limits.
//!
//! Quantities whose magnitude is below the mapper's epsilon count as zero,
//! and every division by such a quantity yields `0.0`.

use crate::joint::ParamRange;

/// Pure numeric conversions from leader units to follower units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMapper {
    epsilon: f64,
}

impl Default for LinearMapper {
    fn default() -> Self {
        Self::new(1e-6)
    }
}

impl LinearMapper {
    /// Creates a mapper that treats magnitudes below `epsilon` as zero.
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Returns the zero threshold.
    #[must_use]
    pub const fn epsilon(&self) -> f64 {
        self.epsilon
    }

    #[inline]
    fn is_zero(&self, value: f64) -> bool {
        value.abs() < self.epsilon
    }

    /// Fractional position of `value` within `range` (`0.0` at `min`, `1.0`
    /// at `max`). A zero-width range yields `0.0`.
    #[must_use]
    pub fn fraction(&self, value: f64, range: ParamRange) -> f64 {
        let width = range.width();
        if self.is_zero(width) {
            return 0.0;
        }
        (value - range.min) / width
    }

    /// Maps `leader_angle` from `leader_range` onto `follower_range`.
    #[must_use]
    pub fn angle(&self, leader_angle: f64, leader_range: ParamRange, follower_range: ParamRange) -> f64 {
        let f = self.fraction(leader_angle, leader_range);
        follower_range.min + f * follower_range.width()
    }

    /// Time needed to sweep `range` at `velocity`.
    #[must_use]
    pub fn traverse_time(&self, range: ParamRange, velocity: f64) -> f64 {
        if self.is_zero(velocity) {
            return 0.0;
        }
        range.width() / velocity
    }

    /// Follower velocity that sweeps `follower_range` in the same time the
    /// leader sweeps `leader_range`, clamped to `limits`.
    #[must_use]
    pub fn velocity(
        &self,
        leader_range: ParamRange,
        leader_velocity: f64,
        follower_range: ParamRange,
        limits: ParamRange,
    ) -> f64 {
        let time = self.traverse_time(leader_range, leader_velocity);
        let ideal = if self.is_zero(time) {
            0.0
        } else {
            follower_range.width() / time
        };
        limits.clamp(ideal)
    }

    /// Follower damping preserving the leader's damping-velocity product,
    /// clamped to `limits`.
    #[must_use]
    pub fn damping(
        &self,
        leader_damping: f64,
        leader_velocity: f64,
        follower_velocity: f64,
        limits: ParamRange,
    ) -> f64 {
        let ideal = if self.is_zero(follower_velocity) {
            0.0
        } else {
            leader_damping * leader_velocity / follower_velocity
        };
        limits.clamp(ideal)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const MAPPER: LinearMapper = LinearMapper::new(1e-6);

    #[test]
    fn midpoint_maps_to_midpoint() {
        let angle = MAPPER.angle(
            0.0,
            ParamRange::new(-10.0, 10.0),
            ParamRange::new(0.0, 90.0),
        );
        assert_relative_eq!(angle, 45.0, epsilon = 1e-12);
    }

    #[test]
    fn endpoints_map_to_endpoints() {
        let leader = ParamRange::new(-30.0, 60.0);
        let follower = ParamRange::new(10.0, 20.0);
        assert_relative_eq!(MAPPER.angle(-30.0, leader, follower), 10.0, epsilon = 1e-12);
        assert_relative_eq!(MAPPER.angle(60.0, leader, follower), 20.0, epsilon = 1e-12);
    }

    #[test]
    fn angle_is_order_preserving() {
        let leader = ParamRange::new(-45.0, 45.0);
        let follower = ParamRange::new(0.0, 180.0);
        let mut previous = f64::NEG_INFINITY;
        for step in 0..=90 {
            let angle = MAPPER.angle(-45.0 + f64::from(step), leader, follower);
            assert!(angle > previous, "step {step}: {angle} <= {previous}");
            previous = angle;
        }
    }

    #[test]
    fn zero_width_leader_range_maps_to_follower_min() {
        let angle = MAPPER.angle(5.0, ParamRange::new(5.0, 5.0), ParamRange::new(-20.0, 20.0));
        assert_relative_eq!(angle, -20.0, epsilon = 1e-12);
    }

    #[test]
    fn velocity_preserves_traverse_time() {
        // Leader sweeps 100 units at 10/s (10 s); follower sweeps 50 units.
        let v = MAPPER.velocity(
            ParamRange::new(0.0, 100.0),
            10.0,
            ParamRange::new(0.0, 50.0),
            ParamRange::UNBOUNDED,
        );
        assert_relative_eq!(v, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn velocity_is_clamped_to_follower_limits() {
        let v = MAPPER.velocity(
            ParamRange::new(0.0, 100.0),
            10.0,
            ParamRange::new(0.0, 10.0),
            ParamRange::new(2.0, 5.0),
        );
        assert_relative_eq!(v, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn stalled_leader_yields_zero_before_clamp() {
        assert_eq!(MAPPER.traverse_time(ParamRange::new(0.0, 10.0), 0.0), 0.0);
        let v = MAPPER.velocity(
            ParamRange::new(0.0, 10.0),
            0.0,
            ParamRange::new(0.0, 10.0),
            ParamRange::UNBOUNDED,
        );
        assert_eq!(v, 0.0);
        let v = MAPPER.velocity(
            ParamRange::new(0.0, 10.0),
            1e-9,
            ParamRange::new(0.0, 10.0),
            ParamRange::new(0.5, 3.0),
        );
        assert_relative_eq!(v, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn damping_uses_the_clamped_velocity() {
        // Leader damping 4 at velocity 10; follower clamped to velocity 2.
        let d = MAPPER.damping(4.0, 10.0, 2.0, ParamRange::UNBOUNDED);
        assert_relative_eq!(d, 20.0, epsilon = 1e-12);
        let d = MAPPER.damping(4.0, 10.0, 2.0, ParamRange::new(0.0, 8.0));
        assert_relative_eq!(d, 8.0, epsilon = 1e-12);
    }

    #[test]
    fn damping_with_stopped_follower_is_zero() {
        let d = MAPPER.damping(4.0, 10.0, 0.0, ParamRange::new(0.0, 8.0));
        assert_eq!(d, 0.0);
    }
}

// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linkage configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::FollowError;
use crate::mapper::LinearMapper;

/// Tuning knobs for an [`Assembly`](crate::assembly::Assembly).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LinkageConfig {
    /// Minimum change in a follower's target angle worth writing.
    ///
    /// Smaller corrections are dropped so push-back noise from the joint
    /// does not make the follower chatter.
    pub angle_epsilon: f64,
    /// Magnitude below which velocities, range widths, and traversal times
    /// count as zero.
    pub numeric_epsilon: f64,
    /// Maximum number of segments a single upward or downward walk may cross.
    pub max_depth: u32,
    /// Whether toggles requested with symmetry fan out to counterparts.
    pub symmetry_fan_out: bool,
}

impl Default for LinkageConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkageConfig {
    /// Default configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            angle_epsilon: 0.01,
            numeric_epsilon: 1e-6,
            max_depth: 4096,
            symmetry_fan_out: true,
        }
    }

    /// Configuration for fine-grained mechanisms where sub-hundredth angle
    /// corrections matter.
    #[must_use]
    pub const fn precise() -> Self {
        Self {
            angle_epsilon: 1e-4,
            ..Self::new()
        }
    }

    /// Sets the angle write threshold.
    #[must_use]
    pub const fn with_angle_epsilon(mut self, epsilon: f64) -> Self {
        self.angle_epsilon = epsilon;
        self
    }

    /// Sets the numeric zero threshold.
    #[must_use]
    pub const fn with_numeric_epsilon(mut self, epsilon: f64) -> Self {
        self.numeric_epsilon = epsilon;
        self
    }

    /// Sets the walk depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Enables or disables symmetric toggle fan-out.
    #[must_use]
    pub const fn with_symmetry_fan_out(mut self, enabled: bool) -> Self {
        self.symmetry_fan_out = enabled;
        self
    }

    /// Returns the mapper configured with this zero threshold.
    #[must_use]
    pub const fn mapper(&self) -> LinearMapper {
        LinearMapper::new(self.numeric_epsilon)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), FollowError> {
        if !self.angle_epsilon.is_finite() || self.angle_epsilon < 0.0 {
            return Err(FollowError::InvalidConfig {
                reason: "angle_epsilon must be finite and non-negative",
            });
        }
        if !self.numeric_epsilon.is_finite() || self.numeric_epsilon < 0.0 {
            return Err(FollowError::InvalidConfig {
                reason: "numeric_epsilon must be finite and non-negative",
            });
        }
        if self.max_depth == 0 {
            return Err(FollowError::InvalidConfig {
                reason: "max_depth must be at least 1",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn presets_validate() {
        assert!(LinkageConfig::default().validate().is_ok());
        assert!(LinkageConfig::precise().validate().is_ok());
        assert_relative_eq!(LinkageConfig::precise().angle_epsilon, 1e-4);
        assert_eq!(LinkageConfig::precise().max_depth, 4096);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(
            LinkageConfig::new()
                .with_angle_epsilon(f64::NAN)
                .validate()
                .is_err()
        );
        assert!(
            LinkageConfig::new()
                .with_numeric_epsilon(-1.0)
                .validate()
                .is_err()
        );
        let err = LinkageConfig::new().with_max_depth(0).validate();
        assert!(matches!(err, Err(FollowError::InvalidConfig { .. })));
    }

    #[test]
    fn mapper_inherits_epsilon() {
        let config = LinkageConfig::new().with_numeric_epsilon(0.5);
        assert_relative_eq!(config.mapper().epsilon(), 0.5);
    }
}

// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error and diagnostic types.
//!
//! Nothing in the linkage is fatal. Public operations that can be refused
//! return [`FollowError`]; problems discovered while propagating or updating
//! are queued as [`Diagnostic`]s and surfaced through
//! [`FollowChanges::diagnostics`](crate::assembly::FollowChanges::diagnostics).

use thiserror::Error;

use crate::assembly::SegmentId;
use crate::joint::JointKind;

/// Errors reported by linkage operations.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FollowError {
    /// The segment has no follower capability.
    #[error("segment {0:?} has no follower")]
    NoFollower(SegmentId),

    /// A follower is attached to a segment without an actuator.
    #[error("follower on {0:?} has no actuator to drive")]
    MissingActuator(SegmentId),

    /// A follower is attached to an actuator kind the linkage cannot drive.
    #[error("follower on {segment:?} cannot drive a {kind} actuator")]
    UnsupportedActuator {
        /// The follower's segment.
        segment: SegmentId,
        /// The offending kind.
        kind: JointKind,
    },

    /// The follower's own angle range is inverted, empty, or non-finite.
    #[error("follower on {segment:?} has degenerate angle range [{min}, {max}]")]
    DegenerateRange {
        /// The follower's segment.
        segment: SegmentId,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// A topology walk revisited a segment.
    #[error("topology cycle detected at {0:?}")]
    TopologyCycle(SegmentId),

    /// A topology walk went deeper than the configured limit.
    #[error("topology deeper than {limit} segments below {segment:?}")]
    DepthExceeded {
        /// Segment at which the walk stopped.
        segment: SegmentId,
        /// The configured limit.
        limit: u32,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// What is wrong.
        reason: &'static str,
    },
}

impl FollowError {
    /// Returns whether this error permanently disables a follower.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingActuator(_) | Self::UnsupportedActuator { .. } | Self::DegenerateRange { .. }
        )
    }

    /// Returns whether this error reports malformed topology.
    #[must_use]
    pub fn is_topology_error(&self) -> bool {
        matches!(self, Self::TopologyCycle(_) | Self::DepthExceeded { .. })
    }
}

/// A non-fatal problem discovered during propagation or evaluation.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Segment the problem was found at.
    pub segment: SegmentId,
    /// The problem.
    pub error: FollowError,
}

impl Diagnostic {
    pub(crate) fn new(segment: SegmentId, error: FollowError) -> Self {
        Self { segment, error }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn error_display() {
        let seg = SegmentId::new(3, 1);
        let err = FollowError::DegenerateRange {
            segment: seg,
            min: 10.0,
            max: -10.0,
        };
        let text = err.to_string();
        assert!(text.contains("10"), "got: {text}");
        assert!(text.contains("SegmentId(3@gen1)"), "got: {text}");

        let err = FollowError::UnsupportedActuator {
            segment: seg,
            kind: JointKind::Continuous,
        };
        assert!(err.to_string().contains("continuous"));
    }

    #[test]
    fn error_predicates() {
        let seg = SegmentId::new(0, 0);
        assert!(FollowError::MissingActuator(seg).is_config_error());
        assert!(!FollowError::NoFollower(seg).is_config_error());
        assert!(FollowError::TopologyCycle(seg).is_topology_error());
        assert!(
            FollowError::DepthExceeded {
                segment: seg,
                limit: 4
            }
            .is_topology_error()
        );
        assert!(!FollowError::InvalidConfig { reason: "x" }.is_topology_error());
    }
}

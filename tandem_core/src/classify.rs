// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-segment propagation roles.
//!
//! Classification is a pure function of what a segment *can do*, expressed
//! as a [`SegmentCaps`] view. It is recomputed whenever it is needed and
//! never stored.

use crate::assembly::SegmentId;
use crate::follower::FollowerState;
use crate::joint::Joint;

/// How a segment treats the leader handed down by its parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationType {
    /// Passes the incoming leader through unchanged.
    Transparent,
    /// Severs the chain; descendants get no leader.
    Dead,
    /// Substitutes its own joint as the leader for descendants.
    Assertive,
}

impl PropagationType {
    /// Returns the leader handed to the children of `segment`.
    #[inline]
    #[must_use]
    pub const fn outgoing(self, segment: SegmentId, incoming: Option<SegmentId>) -> Option<SegmentId> {
        match self {
            Self::Transparent => incoming,
            Self::Dead => None,
            Self::Assertive => Some(segment),
        }
    }
}

/// Capability view of a single segment.
#[derive(Clone, Copy, Debug, Default)]
pub struct SegmentCaps<'a> {
    /// The segment's actuator, if any.
    pub actuator: Option<&'a Joint>,
    /// The segment's follower state, if any.
    pub follower: Option<&'a FollowerState>,
}

/// Classifies a segment from its capabilities.
///
/// Checks run in order: no actuator or a locked one is transparent; an
/// unpowered or unsupported actuator is dead; a plain actuator asserts
/// itself; a follower relays its leader while it is actually following and
/// asserts itself otherwise.
#[must_use]
pub fn classify(caps: SegmentCaps<'_>) -> PropagationType {
    let Some(joint) = caps.actuator else {
        return PropagationType::Transparent;
    };
    if joint.locked {
        return PropagationType::Transparent;
    }
    if !joint.is_driven() || !joint.kind.is_supported() {
        return PropagationType::Dead;
    }
    match caps.follower {
        Some(follower) if follower.is_following() => PropagationType::Transparent,
        _ => PropagationType::Assertive,
    }
}

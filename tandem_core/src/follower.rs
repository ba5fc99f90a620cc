// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-joint follower state and parameter recomputation.
//!
//! A [`FollowerState`] sits next to a joint that can mirror an upstream
//! leader. It holds the user's `enabled` preference, the leader currently
//! assigned by propagation, one [`ChangeTracker`] per leader parameter, and
//! the read-only display mirrors.
//!
//! Each tick, [`FollowerState::track`] feeds the leader's live values into
//! the trackers. Every parameter that really changed is looked up in the
//! [`ParamKind`] handler table, and the union of requested recomputations
//! runs once in a fixed order: angle, velocity, damping, locked mirror.

use crate::assembly::SegmentId;
use crate::error::FollowError;
use crate::joint::{Joint, ParamRange};
use crate::mapper::LinearMapper;
use crate::tracker::ChangeTracker;

/// A leader parameter observed by a follower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Commanded angle.
    Angle,
    /// Lower angle limit.
    MinLimit,
    /// Upper angle limit.
    MaxLimit,
    /// Traverse velocity.
    Velocity,
    /// Damping.
    Damping,
    /// Locked flag.
    Locked,
}

impl ParamKind {
    /// All kinds, in tracking order.
    pub const ALL: [Self; 6] = [
        Self::Angle,
        Self::MinLimit,
        Self::MaxLimit,
        Self::Velocity,
        Self::Damping,
        Self::Locked,
    ];

    /// Recomputations triggered when this parameter changes.
    #[must_use]
    pub const fn handler(self) -> Recompute {
        match self {
            Self::Angle => Recompute::ANGLE,
            Self::MinLimit | Self::MaxLimit => Recompute::ANGLE.union(Recompute::VELOCITY),
            Self::Velocity => Recompute::VELOCITY,
            Self::Damping => Recompute::DAMPING,
            Self::Locked => Recompute::LOCKED,
        }
    }
}

/// Set of follower outputs to recompute.
///
/// Velocity always implies damping, since the damping ratio depends on it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Recompute(u8);

impl Recompute {
    /// Nothing.
    pub const NONE: Self = Self(0);
    /// Target angle.
    pub const ANGLE: Self = Self(1);
    /// Traverse velocity (and therefore damping).
    pub const VELOCITY: Self = Self(2 | 4);
    /// Damping.
    pub const DAMPING: Self = Self(4);
    /// Locked mirror.
    pub const LOCKED: Self = Self(8);
    /// Everything.
    pub const ALL: Self = Self(1 | 2 | 4 | 8);

    /// Returns the union of two sets.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns whether every member of `other` is in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns whether the set is empty.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Read-only display copies of the values written while following.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Mirrors {
    /// Current slaved angle.
    pub angle: f64,
    /// Current slaved velocity.
    pub velocity: f64,
    /// Current slaved damping.
    pub damping: f64,
    /// Leader's locked flag.
    pub locked: bool,
}

/// Validation state of a follower.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FollowerPhase {
    /// Not yet checked against its actuator.
    #[default]
    Unvalidated,
    /// Usable.
    Ready,
    /// Permanently disabled by a configuration error.
    Disabled(FollowError),
}

/// Values written to a follower by one recomputation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WriteSet {
    /// New target angle.
    pub angle: Option<f64>,
    /// New traverse velocity.
    pub velocity: Option<f64>,
    /// New damping.
    pub damping: Option<f64>,
    /// New locked mirror.
    pub locked: Option<bool>,
}

impl WriteSet {
    /// Returns whether nothing was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Number of values written.
    #[must_use]
    pub fn count(&self) -> u32 {
        u32::from(self.angle.is_some())
            + u32::from(self.velocity.is_some())
            + u32::from(self.damping.is_some())
            + u32::from(self.locked.is_some())
    }

    /// Iterates over the writes as `(kind, value)` pairs; `locked` is
    /// reported as `1.0` or `0.0`.
    pub fn iter(&self) -> impl Iterator<Item = (ParamKind, f64)> {
        [
            self.angle.map(|v| (ParamKind::Angle, v)),
            self.velocity.map(|v| (ParamKind::Velocity, v)),
            self.damping.map(|v| (ParamKind::Damping, v)),
            self.locked
                .map(|v| (ParamKind::Locked, if v { 1.0 } else { 0.0 })),
        ]
        .into_iter()
        .flatten()
    }
}

/// Result of assigning a leader to a follower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderUpdate {
    /// The leader identity changed.
    pub leader_changed: bool,
    /// "Actually following" changed.
    pub following_changed: bool,
}

impl LeaderUpdate {
    /// Returns whether observers should refresh.
    #[must_use]
    pub const fn is_significant(self) -> bool {
        self.leader_changed || self.following_changed
    }
}

/// Numeric context for a recomputation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slaving {
    pub(crate) mapper: LinearMapper,
    pub(crate) angle_epsilon: f64,
}

/// Follow capability of a joint-bearing segment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FollowerState {
    enabled: bool,
    leader: Option<SegmentId>,
    phase: FollowerPhase,
    angle: ChangeTracker<f64>,
    min_limit: ChangeTracker<f64>,
    max_limit: ChangeTracker<f64>,
    velocity: ChangeTracker<f64>,
    damping: ChangeTracker<f64>,
    locked: ChangeTracker<bool>,
    own_range: ChangeTracker<ParamRange>,
    mirrors: Mirrors,
}

impl FollowerState {
    /// Creates a follower with the given persisted preference.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// The user's follow preference.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// The leader this joint follows, or would follow if enabled.
    #[must_use]
    pub const fn leader(&self) -> Option<SegmentId> {
        self.leader
    }

    /// Validation state.
    #[must_use]
    pub const fn phase(&self) -> &FollowerPhase {
        &self.phase
    }

    /// Returns whether a configuration error disabled this follower.
    #[must_use]
    pub const fn is_disabled(&self) -> bool {
        matches!(self.phase, FollowerPhase::Disabled(_))
    }

    /// Returns whether the joint is currently slaved to a leader.
    #[must_use]
    pub const fn is_following(&self) -> bool {
        self.enabled && self.leader.is_some() && !self.is_disabled()
    }

    /// Display mirrors.
    #[must_use]
    pub const fn mirrors(&self) -> Mirrors {
        self.mirrors
    }

    /// Checks the follower against its segment's actuator on first use.
    ///
    /// Returns the error only on the transition into
    /// [`FollowerPhase::Disabled`], so each problem is reported once.
    pub(crate) fn validate(
        &mut self,
        segment: SegmentId,
        joint: Option<&Joint>,
    ) -> Option<FollowError> {
        if !matches!(self.phase, FollowerPhase::Unvalidated) {
            return None;
        }
        let error = match joint {
            None => Some(FollowError::MissingActuator(segment)),
            Some(joint) if !joint.kind.is_supported() => Some(FollowError::UnsupportedActuator {
                segment,
                kind: joint.kind,
            }),
            Some(joint) if !joint.angle_range.is_proper() => Some(FollowError::DegenerateRange {
                segment,
                min: joint.angle_range.min,
                max: joint.angle_range.max,
            }),
            Some(_) => None,
        };
        match error {
            Some(error) => {
                self.leader = None;
                self.phase = FollowerPhase::Disabled(error.clone());
                Some(error)
            }
            None => {
                self.phase = FollowerPhase::Ready;
                None
            }
        }
    }

    /// Re-checks a [`FollowerPhase::Ready`] follower after its own joint
    /// changed. A disabled follower stays disabled.
    pub(crate) fn revalidate(
        &mut self,
        segment: SegmentId,
        joint: Option<&Joint>,
    ) -> Option<FollowError> {
        if !matches!(self.phase, FollowerPhase::Ready) {
            return None;
        }
        self.phase = FollowerPhase::Unvalidated;
        self.validate(segment, joint)
    }

    /// Assigns the leader computed by propagation.
    pub(crate) fn set_leader(&mut self, leader: Option<SegmentId>) -> LeaderUpdate {
        let was_following = self.is_following();
        let leader_changed = self.leader != leader;
        if leader_changed {
            self.leader = leader;
            self.reset_trackers();
        }
        LeaderUpdate {
            leader_changed,
            following_changed: was_following != self.is_following(),
        }
    }

    /// Sets the user's preference, returning whether "actually following"
    /// changed.
    pub(crate) fn set_enabled(&mut self, enabled: bool) -> bool {
        let was_following = self.is_following();
        self.enabled = enabled;
        was_following != self.is_following()
    }

    /// Forces every parameter to re-fire on the next [`track`](Self::track).
    pub(crate) fn reset_trackers(&mut self) {
        self.angle.reset();
        self.min_limit.reset();
        self.max_limit.reset();
        self.velocity.reset();
        self.damping.reset();
        self.locked.reset();
        self.own_range.reset();
    }

    /// Feeds the leader's live values into the trackers and recomputes
    /// whatever changed.
    pub(crate) fn track(&mut self, leader: &Joint, follower: &mut Joint, slaving: Slaving) -> WriteSet {
        let mut pending = Recompute::NONE;
        let mut note = |changed: bool, kind: ParamKind| {
            if changed {
                pending = pending.union(kind.handler());
            }
        };
        note(self.angle.observe(leader.target_angle), ParamKind::Angle);
        note(self.min_limit.observe(leader.angle_range.min), ParamKind::MinLimit);
        note(self.max_limit.observe(leader.angle_range.max), ParamKind::MaxLimit);
        note(self.velocity.observe(leader.velocity), ParamKind::Velocity);
        note(self.damping.observe(leader.damping), ParamKind::Damping);
        note(self.locked.observe(leader.locked), ParamKind::Locked);
        // The follower's own limits scale every output exactly like the
        // leader's do.
        note(self.own_range.observe(follower.angle_range), ParamKind::MinLimit);

        self.recompute(pending, leader, follower, slaving)
    }

    /// Runs the requested recomputations against `leader`.
    pub(crate) fn recompute(
        &mut self,
        what: Recompute,
        leader: &Joint,
        follower: &mut Joint,
        slaving: Slaving,
    ) -> WriteSet {
        let mut writes = WriteSet::default();
        if what.contains(Recompute::ANGLE) {
            let angle = slaving
                .mapper
                .angle(leader.target_angle, leader.angle_range, follower.angle_range);
            if (angle - follower.target_angle).abs() >= slaving.angle_epsilon {
                follower.target_angle = angle;
                writes.angle = Some(angle);
            }
            self.mirrors.angle = follower.target_angle;
        }
        if what.contains(Recompute::VELOCITY) {
            let velocity = slaving.mapper.velocity(
                leader.angle_range,
                leader.velocity,
                follower.angle_range,
                follower.velocity_limits,
            );
            if velocity != follower.velocity {
                follower.velocity = velocity;
                writes.velocity = Some(velocity);
            }
            self.mirrors.velocity = velocity;
        }
        if what.contains(Recompute::DAMPING) {
            let damping = slaving.mapper.damping(
                leader.damping,
                leader.velocity,
                follower.velocity,
                follower.damping_limits,
            );
            if damping != follower.damping {
                follower.damping = damping;
                writes.damping = Some(damping);
            }
            self.mirrors.damping = damping;
        }
        if what.contains(Recompute::LOCKED) && self.mirrors.locked != leader.locked {
            self.mirrors.locked = leader.locked;
            writes.locked = Some(leader.locked);
        }
        writes
    }
}

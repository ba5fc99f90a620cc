// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Downward leader propagation and the follow toggle.
//!
//! A propagation run starts at one segment with an incoming leader and walks
//! its subtree with an explicit stack. At each segment it:
//!
//! 1. records the incoming leader as the segment's [`LinkState`];
//! 2. hands the incoming leader to the segment's follower, if any, marking
//!    [`LEADER`](crate::dirty::LEADER) when the identity or the "actually
//!    following" status changed;
//! 3. classifies the segment and pushes its children with the outgoing
//!    leader.
//!
//! Each run stamps visited slots with a fresh epoch, so a segment reached
//! twice (only possible with a cyclic topology) is reported instead of
//! walked again. Runs that would descend below
//! [`LinkageConfig::max_depth`](crate::config::LinkageConfig::max_depth)
//! stop on that branch.

use super::evaluate::ToggleRecord;
use super::id::{INVALID, SegmentId};
use super::store::Assembly;
use crate::classify::{SegmentCaps, classify};
use crate::dirty;
use crate::error::{Diagnostic, FollowError};
use crate::follower::FollowerPhase;
use crate::resolve::resolve_leader;
use crate::topology::Topology;

/// Leader handed down to a segment by its parent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LinkState {
    /// Not reached by propagation since it was created or detached.
    #[default]
    Unresolved,
    /// Reached by propagation with the given incoming leader.
    Resolved(Option<SegmentId>),
}

impl LinkState {
    /// Returns the incoming leader, or `None` while unresolved.
    #[must_use]
    pub const fn incoming(self) -> Option<SegmentId> {
        match self {
            Self::Unresolved => None,
            Self::Resolved(leader) => leader,
        }
    }

    /// Returns whether propagation has reached the segment.
    #[must_use]
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// What triggered a propagation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropagationCause {
    /// A whole tree became active.
    Activate,
    /// A subtree was attached.
    Attach,
    /// A subtree was detached.
    Detach,
    /// Lock, motorization, or motor engagement changed.
    Actuator,
    /// A joint or follower was added or removed.
    Capability,
    /// A follower was toggled.
    Toggle,
}

/// Record of one propagation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagationSummary {
    /// Segment the run started at.
    pub root: SegmentId,
    /// Trigger.
    pub cause: PropagationCause,
    /// Leader handed to `root`.
    pub incoming: Option<SegmentId>,
    /// Segments visited.
    pub visited: u32,
    /// Followers whose leader identity changed.
    pub leader_changes: u32,
}

/// Whether a toggle applies to symmetric counterparts too.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Symmetry {
    /// Only the named segment.
    #[default]
    Single,
    /// The named segment and every member of its symmetry group.
    Counterparts,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    idx: u32,
    incoming: Option<SegmentId>,
    depth: u32,
}

impl Topology for Assembly {
    fn parent_of(&self, segment: SegmentId) -> Option<SegmentId> {
        self.parent(segment)
    }

    fn children_of(&self, segment: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
        self.children(segment)
    }

    fn caps(&self, segment: SegmentId) -> SegmentCaps<'_> {
        self.validate(segment);
        self.caps_at(segment.idx)
    }
}

impl Assembly {
    // -- Lifecycle triggers --

    /// Propagates through a whole tree that just became active.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `root` has a parent.
    pub fn activate(&mut self, root: SegmentId) {
        self.validate(root);
        assert!(
            self.parent[root.idx as usize] == INVALID,
            "segment is not a root"
        );
        self.propagate(root.idx, None, PropagationCause::Activate);
    }

    /// Activates every tree in the assembly.
    pub fn activate_all(&mut self) {
        for root in self.roots() {
            self.propagate(root.idx, None, PropagationCause::Activate);
        }
    }

    // -- Follow API --

    /// Sets a follower's enabled preference.
    ///
    /// Re-propagates below the segment and immediately recomputes its slaved
    /// values. With [`Symmetry::Counterparts`] (and
    /// [`symmetry_fan_out`](crate::config::LinkageConfig::symmetry_fan_out)
    /// on) the same toggle is applied to each counterpart; their own
    /// counterparts are not visited again. Counterparts without a usable
    /// follower are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::NoFollower`] if the segment cannot follow, or
    /// the configuration error that disabled its follower.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_follow_enabled(
        &mut self,
        id: SegmentId,
        enabled: bool,
        symmetry: Symmetry,
    ) -> Result<(), FollowError> {
        self.validate(id);
        self.toggle_at(id.idx, enabled, false)?;
        if symmetry == Symmetry::Counterparts && self.config.symmetry_fan_out {
            for other in self.counterparts(id) {
                // Counterparts that cannot follow are skipped.
                let _ = self.toggle_at(other.idx, enabled, true);
            }
        }
        Ok(())
    }

    /// Returns the leader handed to a segment by the last propagation.
    ///
    /// For a follower this is the leader it follows, or would follow if
    /// enabled.
    #[must_use]
    pub fn leader_of(&self, id: SegmentId) -> Option<SegmentId> {
        self.validate(id);
        self.links[id.idx as usize].incoming()
    }

    /// Returns the segment's link state.
    #[must_use]
    pub fn link_state(&self, id: SegmentId) -> LinkState {
        self.validate(id);
        self.links[id.idx as usize]
    }

    /// Walks up from `id` to find its effective leader in the current tree.
    ///
    /// # Errors
    ///
    /// Returns a topology error if the ancestry is cyclic or deeper than
    /// the configured limit.
    pub fn resolve_leader(&self, id: SegmentId) -> Result<Option<SegmentId>, FollowError> {
        self.validate(id);
        resolve_leader(self, id, self.config.max_depth)
    }

    // -- Internals --

    fn toggle_at(&mut self, idx: u32, enabled: bool, counterpart: bool) -> Result<(), FollowError> {
        let id = self.id_at(idx);
        let Some(follower) = self.followers[idx as usize].as_mut() else {
            return Err(FollowError::NoFollower(id));
        };
        if let Some(error) = follower.validate(id, self.joints[idx as usize].as_ref()) {
            self.pending_diagnostics.push(Diagnostic::new(id, error));
        }
        if let FollowerPhase::Disabled(error) = follower.phase() {
            return Err(error.clone());
        }
        if follower.set_enabled(enabled) {
            self.dirty.mark(idx, dirty::LEADER);
        }
        let following = follower.is_following();
        self.pending_toggles.push(ToggleRecord {
            segment: id,
            enabled,
            following,
            counterpart,
        });

        let incoming = match self.links[idx as usize] {
            LinkState::Resolved(incoming) => incoming,
            LinkState::Unresolved => self.resolve_at(idx),
        };
        self.propagate(idx, incoming, PropagationCause::Toggle);

        if let Some(follower) = self.followers[idx as usize].as_mut() {
            follower.reset_trackers();
        }
        self.update_at(idx);
        Ok(())
    }

    /// Resolves the leader above `idx`, queueing a diagnostic on failure.
    pub(crate) fn resolve_at(&mut self, idx: u32) -> Option<SegmentId> {
        let id = self.id_at(idx);
        match resolve_leader(&*self, id, self.config.max_depth) {
            Ok(leader) => leader,
            Err(error) => {
                self.pending_diagnostics.push(Diagnostic::new(id, error));
                None
            }
        }
    }

    /// Re-propagates below `idx` with its current incoming leader.
    ///
    /// A segment propagation has not reached yet is skipped, unless one of
    /// its children was resolved by an attach; its leader is then resolved
    /// on demand.
    pub(crate) fn repropagate_resolved(&mut self, idx: u32, cause: PropagationCause) {
        let incoming = match self.links[idx as usize] {
            LinkState::Resolved(incoming) => incoming,
            LinkState::Unresolved if self.has_resolved_child(idx) => self.resolve_at(idx),
            LinkState::Unresolved => return,
        };
        self.propagate(idx, incoming, cause);
    }

    fn has_resolved_child(&self, idx: u32) -> bool {
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            if self.links[child as usize].is_resolved() {
                return true;
            }
            child = self.next_sibling[child as usize];
        }
        false
    }

    pub(crate) fn propagate(&mut self, root: u32, incoming: Option<SegmentId>, cause: PropagationCause) {
        self.walk(root, incoming, cause, false);
    }

    /// Clears leaders throughout the subtree at `root`.
    pub(crate) fn sever(&mut self, root: u32) {
        self.walk(root, None, PropagationCause::Detach, true);
    }

    fn walk(&mut self, root: u32, incoming: Option<SegmentId>, cause: PropagationCause, sever: bool) {
        let epoch = self.next_epoch();
        let max_depth = self.config.max_depth;
        let mut summary = PropagationSummary {
            root: self.id_at(root),
            cause,
            incoming,
            visited: 0,
            leader_changes: 0,
        };

        let mut stack = core::mem::take(&mut self.stack);
        stack.clear();
        stack.push(Frame {
            idx: root,
            incoming,
            depth: 0,
        });

        while let Some(frame) = stack.pop() {
            let idx = frame.idx;
            let id = self.id_at(idx);
            if self.visited[idx as usize] == epoch {
                self.pending_diagnostics
                    .push(Diagnostic::new(id, FollowError::TopologyCycle(id)));
                continue;
            }
            self.visited[idx as usize] = epoch;
            summary.visited += 1;

            self.links[idx as usize] = if sever {
                LinkState::Unresolved
            } else {
                LinkState::Resolved(frame.incoming)
            };
            if self.assign_leader(idx, frame.incoming) {
                summary.leader_changes += 1;
            }

            let mut child = self.first_child[idx as usize];
            if child == INVALID {
                continue;
            }
            if frame.depth >= max_depth {
                self.pending_diagnostics.push(Diagnostic::new(
                    id,
                    FollowError::DepthExceeded {
                        segment: id,
                        limit: max_depth,
                    },
                ));
                continue;
            }

            let outgoing = if sever {
                None
            } else {
                classify(self.caps_at(idx)).outgoing(id, frame.incoming)
            };
            // Push in reverse so siblings pop in order.
            let mark = stack.len();
            while child != INVALID {
                stack.push(Frame {
                    idx: child,
                    incoming: outgoing,
                    depth: frame.depth + 1,
                });
                child = self.next_sibling[child as usize];
            }
            stack[mark..].reverse();
        }

        self.stack = stack;
        self.pending_propagations.push(summary);
    }

    /// Hands `incoming` to the follower at `idx`, returning whether its
    /// leader identity changed.
    fn assign_leader(&mut self, idx: u32, incoming: Option<SegmentId>) -> bool {
        let id = self.id_at(idx);
        let Some(follower) = self.followers[idx as usize].as_mut() else {
            return false;
        };
        if let Some(error) = follower.validate(id, self.joints[idx as usize].as_ref()) {
            self.pending_diagnostics.push(Diagnostic::new(id, error));
        }
        if follower.is_disabled() {
            return false;
        }
        let update = follower.set_leader(incoming);
        if update.is_significant() {
            self.dirty.mark(idx, dirty::LEADER);
        }
        update.leader_changed
    }

    fn next_epoch(&mut self) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        if self.epoch == 0 {
            self.visited.fill(0);
            self.epoch = 1;
        }
        self.epoch
    }
}

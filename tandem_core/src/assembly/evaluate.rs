// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tick follower updates and change reporting.
//!
//! A host tick has two halves:
//!
//! 1. **Update**: [`Assembly::update`] (or [`Assembly::update_all`], in
//!    traversal order) feeds each following joint its leader's live
//!    parameters. Only parameters that really changed are recomputed, and
//!    every real write marks the [`MIRROR`](crate::dirty::MIRROR) channel.
//! 2. **Evaluate**: [`Assembly::evaluate`] drains the dirty channels and the
//!    pending queues into a [`FollowChanges`] report.
//!
//! [`FollowChanges`] uses raw slot indices (`u32`) for the per-segment lists
//! so that observers can index the assembly through the `*_at()` accessors
//! (e.g. [`follower_at`](super::Assembly::follower_at)) without generation
//! checks.

use alloc::vec::Vec;

use super::id::SegmentId;
use super::propagate::PropagationSummary;
use super::store::Assembly;
use crate::dirty;
use crate::error::Diagnostic;
use crate::follower::{Slaving, WriteSet};
#[cfg(feature = "trace-rich")]
use crate::trace::ParamWrite;

/// A follow toggle applied since the last evaluate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleRecord {
    /// The toggled segment.
    pub segment: SegmentId,
    /// Requested preference.
    pub enabled: bool,
    /// Whether the segment is actually following afterwards.
    pub following: bool,
    /// Whether this toggle was fanned out from a symmetric counterpart.
    pub counterpart: bool,
}

/// The set of changes produced by a single [`Assembly::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FollowChanges {
    /// Followers whose leader identity or following status changed.
    pub leaders: Vec<u32>,
    /// Followers that wrote at least one slaved value.
    pub mirrors: Vec<u32>,
    /// Segments added since the last evaluate.
    pub added: Vec<u32>,
    /// Segments removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
    /// Propagation runs since the last evaluate, in order.
    pub propagations: Vec<PropagationSummary>,
    /// Toggles since the last evaluate, in order.
    pub toggles: Vec<ToggleRecord>,
    /// Problems found since the last evaluate.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of slaved values written.
    pub writes: u32,
    /// Each slaved value written, in order.
    #[cfg(feature = "trace-rich")]
    pub param_writes: Vec<ParamWrite>,
}

impl FollowChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.leaders.clear();
        self.mirrors.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
        self.propagations.clear();
        self.toggles.clear();
        self.diagnostics.clear();
        self.writes = 0;
        #[cfg(feature = "trace-rich")]
        self.param_writes.clear();
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaders.is_empty()
            && self.mirrors.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
            && self.propagations.is_empty()
            && self.toggles.is_empty()
            && self.diagnostics.is_empty()
            && self.writes == 0
    }
}

impl Assembly {
    /// Runs one tick of parameter tracking for a single segment.
    ///
    /// Does nothing unless the segment carries a follower that is actually
    /// following.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn update(&mut self, id: SegmentId) {
        self.validate(id);
        self.update_at(id.idx);
    }

    /// Runs one tick of parameter tracking for every segment, parents before
    /// children.
    pub fn update_all(&mut self) {
        self.refresh_traversal_order();
        let order = core::mem::take(&mut self.traversal_order);
        for &idx in &order {
            self.update_at(idx);
        }
        self.traversal_order = order;
    }

    /// Drains pending changes into a fresh report.
    ///
    /// Rebuilds the traversal order if topology changed.
    pub fn evaluate(&mut self) -> FollowChanges {
        let mut changes = FollowChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FollowChanges) {
        changes.clear();

        self.refresh_traversal_order();

        changes.leaders = self
            .dirty
            .drain(dirty::LEADER)
            .deterministic()
            .run()
            .collect();
        changes.mirrors = self
            .dirty
            .drain(dirty::MIRROR)
            .deterministic()
            .run()
            .collect();
        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
        core::mem::swap(&mut self.pending_propagations, &mut changes.propagations);
        core::mem::swap(&mut self.pending_toggles, &mut changes.toggles);
        core::mem::swap(&mut self.pending_diagnostics, &mut changes.diagnostics);
        changes.writes = core::mem::take(&mut self.pending_writes);
        #[cfg(feature = "trace-rich")]
        core::mem::swap(&mut self.pending_param_writes, &mut changes.param_writes);
    }

    pub(crate) fn update_at(&mut self, idx: u32) {
        let id = self.id_at(idx);
        let slaving = Slaving {
            mapper: self.config.mapper(),
            angle_epsilon: self.config.angle_epsilon,
        };
        let Some(follower) = self.followers[idx as usize].as_mut() else {
            return;
        };
        if let Some(error) = follower.validate(id, self.joints[idx as usize].as_ref()) {
            self.pending_diagnostics.push(Diagnostic::new(id, error));
        }
        if !follower.is_following() {
            return;
        }
        let Some(leader) = follower.leader() else {
            return;
        };
        let live =
            leader.idx < self.len && self.generation[leader.idx as usize] == leader.generation;
        if !live {
            return;
        }
        let Some(leader_joint) = self.joints[leader.idx as usize] else {
            return;
        };
        let Some(joint) = self.joints[idx as usize].as_mut() else {
            return;
        };
        let writes = follower.track(&leader_joint, joint, slaving);
        self.record_writes(idx, writes);
    }

    fn record_writes(&mut self, idx: u32, writes: WriteSet) {
        if writes.is_empty() {
            return;
        }
        self.dirty.mark(idx, dirty::MIRROR);
        self.pending_writes += writes.count();
        #[cfg(feature = "trace-rich")]
        {
            let segment = self.id_at(idx);
            self.pending_param_writes
                .extend(writes.iter().map(|(kind, value)| ParamWrite {
                    segment,
                    kind,
                    value,
                }));
        }
    }
}

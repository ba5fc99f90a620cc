// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays segment storage with allocation, topology, and capability management.

use alloc::vec::Vec;

use understory_dirty::{CycleHandling, DirtyTracker};

use super::evaluate::ToggleRecord;
use super::id::{INVALID, SegmentId, SymmetryGroup};
use super::propagate::{Frame, LinkState, PropagationCause, PropagationSummary};
use super::traverse::Children;
use crate::classify::{PropagationType, SegmentCaps, classify};
use crate::config::LinkageConfig;
use crate::dirty;
use crate::error::{Diagnostic, FollowError};
use crate::follower::{FollowerState, Mirrors};
use crate::joint::{Joint, ParamRange};
#[cfg(feature = "trace-rich")]
use crate::trace::ParamWrite;

/// Struct-of-arrays storage for a tree of segments and their actuators.
///
/// Segments are addressed by [`SegmentId`] handles. Internally, each segment
/// occupies a slot in parallel arrays. Destroyed segments are recycled via a
/// free list, and generation counters prevent stale handle access.
///
/// Besides topology, each slot carries an optional [`Joint`], an optional
/// [`FollowerState`], an optional [`SymmetryGroup`], and the [`LinkState`]
/// written by propagation.
#[derive(Debug)]
pub struct Assembly {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Capabilities (set by callers) --
    pub(crate) joints: Vec<Option<Joint>>,
    pub(crate) followers: Vec<Option<FollowerState>>,
    pub(crate) symmetry: Vec<Option<SymmetryGroup>>,

    // -- Link state (written by propagation) --
    pub(crate) links: Vec<LinkState>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    pub(crate) config: LinkageConfig,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Propagation scratch --
    pub(crate) visited: Vec<u32>,
    pub(crate) epoch: u32,
    pub(crate) stack: Vec<Frame>,

    // -- Pending report (moved out by evaluate) --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
    pub(crate) pending_propagations: Vec<PropagationSummary>,
    pub(crate) pending_toggles: Vec<ToggleRecord>,
    pub(crate) pending_diagnostics: Vec<Diagnostic>,
    pub(crate) pending_writes: u32,
    #[cfg(feature = "trace-rich")]
    pub(crate) pending_param_writes: Vec<ParamWrite>,
}

impl Default for Assembly {
    fn default() -> Self {
        Self::new()
    }
}

impl Assembly {
    /// Creates an empty assembly with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config_unchecked(LinkageConfig::new())
    }

    /// Creates an empty assembly with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FollowError::InvalidConfig`] if `config` does not
    /// [validate](LinkageConfig::validate).
    pub fn try_with_config(config: LinkageConfig) -> Result<Self, FollowError> {
        config.validate()?;
        Ok(Self::with_config_unchecked(config))
    }

    fn with_config_unchecked(config: LinkageConfig) -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            joints: Vec::new(),
            followers: Vec::new(),
            symmetry: Vec::new(),
            links: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            config,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            visited: Vec::new(),
            epoch: 0,
            stack: Vec::new(),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            pending_propagations: Vec::new(),
            pending_toggles: Vec::new(),
            pending_diagnostics: Vec::new(),
            pending_writes: 0,
            #[cfg(feature = "trace-rich")]
            pending_param_writes: Vec::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LinkageConfig {
        &self.config
    }

    // -- Allocation API --

    /// Creates a new segment and returns its handle.
    ///
    /// The segment starts detached, with no joint, no follower, no symmetry
    /// group, and an unresolved link.
    pub fn create_segment(&mut self) -> SegmentId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; destroy already cleared its contents.
            self.generation[idx as usize] += 1;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.joints.push(None);
            self.followers.push(None);
            self.symmetry.push(None);
            self.links.push(LinkState::Unresolved);
            self.visited.push(0);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        SegmentId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys a segment, freeing its slot for reuse.
    ///
    /// A segment that is still attached is detached first.
    ///
    /// # Panics
    ///
    /// Panics if the segment has children (destroy or detach them first) or
    /// if the handle is stale.
    pub fn destroy_segment(&mut self, id: SegmentId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy segment with children"
        );

        if self.parent[idx as usize] != INVALID {
            let p = self.parent[idx as usize];
            self.unlink_from_parent(idx);
            self.dirty.mark(p, dirty::TOPOLOGY);
        }

        self.dirty.remove_key(idx);

        self.joints[idx as usize] = None;
        self.followers[idx as usize] = None;
        self.symmetry[idx as usize] = None;
        self.links[idx as usize] = LinkState::Unresolved;

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Returns whether the given handle refers to a live segment.
    #[must_use]
    pub fn is_alive(&self, id: SegmentId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    /// Returns the number of live segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Topology API --

    /// Attaches `child` as the last child of `parent`.
    ///
    /// The attached subtree is re-propagated, starting from the leader the
    /// resolver finds above `child` in its new position.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn attach(&mut self, parent: SegmentId, child: SegmentId) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );

        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            // Walk to last child.
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);

        let incoming = self.resolve_at(c);
        self.propagate(c, incoming, PropagationCause::Attach);
    }

    /// Detaches `child` from its parent.
    ///
    /// Every segment in the detached subtree loses its leader and returns to
    /// [`LinkState::Unresolved`] until it is attached or activated again.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the segment has no parent.
    pub fn detach(&mut self, child: SegmentId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "segment has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);

        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);

        self.sever(c);
    }

    /// Returns the parent of a segment, if any.
    #[must_use]
    pub fn parent(&self, id: SegmentId) -> Option<SegmentId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        if p == INVALID {
            None
        } else {
            Some(self.id_at(p))
        }
    }

    /// Returns an iterator over the direct children of a segment.
    #[must_use]
    pub fn children(&self, id: SegmentId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns the live segments that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<SegmentId> {
        let mut roots = Vec::new();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                roots.push(self.id_at(idx));
            }
        }
        roots
    }

    // -- Symmetry API --

    /// Places a segment in a symmetry group, or removes it from one.
    pub fn set_symmetry_group(&mut self, id: SegmentId, group: Option<SymmetryGroup>) {
        self.validate(id);
        self.symmetry[id.idx as usize] = group;
    }

    /// Returns the segment's symmetry group.
    #[must_use]
    pub fn symmetry_group(&self, id: SegmentId) -> Option<SymmetryGroup> {
        self.validate(id);
        self.symmetry[id.idx as usize]
    }

    /// Returns the other live members of the segment's symmetry group.
    #[must_use]
    pub fn counterparts(&self, id: SegmentId) -> Vec<SegmentId> {
        self.validate(id);
        let Some(group) = self.symmetry[id.idx as usize] else {
            return Vec::new();
        };
        (0..self.len)
            .filter(|&idx| idx != id.idx && self.symmetry[idx as usize] == Some(group))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Capability API --

    /// Installs or removes a segment's joint.
    ///
    /// Re-propagates below the segment if it has been resolved. A follower
    /// already validated against the old joint is checked again.
    pub fn set_joint(&mut self, id: SegmentId, joint: Option<Joint>) {
        self.validate(id);
        self.joints[id.idx as usize] = joint;
        self.revalidate_follower(id.idx);
        self.repropagate_resolved(id.idx, PropagationCause::Capability);
    }

    /// Returns the segment's joint.
    #[must_use]
    pub fn joint(&self, id: SegmentId) -> Option<&Joint> {
        self.validate(id);
        self.joints[id.idx as usize].as_ref()
    }

    /// Gives a segment follow capability with the persisted preference
    /// `enabled`, replacing any existing follower.
    ///
    /// The follower is validated against the segment's joint the first time
    /// propagation, an update, or a toggle touches it.
    pub fn add_follower(&mut self, id: SegmentId, enabled: bool) {
        self.validate(id);
        self.followers[id.idx as usize] = Some(FollowerState::new(enabled));
        self.repropagate_resolved(id.idx, PropagationCause::Capability);
    }

    /// Removes a segment's follow capability, returning the old state.
    pub fn remove_follower(&mut self, id: SegmentId) -> Option<FollowerState> {
        self.validate(id);
        let removed = self.followers[id.idx as usize].take();
        if removed.as_ref().is_some_and(FollowerState::is_following) {
            self.dirty.mark(id.idx, dirty::LEADER);
        }
        self.repropagate_resolved(id.idx, PropagationCause::Capability);
        removed
    }

    /// Returns the segment's follower state.
    #[must_use]
    pub fn follower(&self, id: SegmentId) -> Option<&FollowerState> {
        self.validate(id);
        self.followers[id.idx as usize].as_ref()
    }

    // -- Actuator state API (re-propagates) --

    /// Locks or unlocks a segment's joint.
    ///
    /// Does nothing if the segment has no joint or the flag is unchanged.
    pub fn set_locked(&mut self, id: SegmentId, locked: bool) {
        self.set_actuator_flag(id, |joint| &mut joint.locked, locked);
    }

    /// Sets whether a segment's joint has a motor.
    ///
    /// Does nothing if the segment has no joint or the flag is unchanged.
    pub fn set_motorized(&mut self, id: SegmentId, motorized: bool) {
        self.set_actuator_flag(id, |joint| &mut joint.motorized, motorized);
    }

    /// Engages or disengages a segment's motor.
    ///
    /// Does nothing if the segment has no joint or the flag is unchanged.
    pub fn set_motor_engaged(&mut self, id: SegmentId, engaged: bool) {
        self.set_actuator_flag(id, |joint| &mut joint.motor_engaged, engaged);
    }

    // -- Live parameter API (picked up by the next update) --

    /// Sets a joint's commanded angle.
    pub fn set_target_angle(&mut self, id: SegmentId, angle: f64) {
        self.with_joint_mut(id, |joint| joint.target_angle = angle);
    }

    /// Sets a joint's soft angle limits.
    ///
    /// A follower on this joint is checked again; if the new range disables
    /// it, segments below are re-propagated.
    pub fn set_angle_range(&mut self, id: SegmentId, range: ParamRange) {
        self.with_joint_mut(id, |joint| joint.angle_range = range);
        if self.revalidate_follower(id.idx) {
            self.repropagate_resolved(id.idx, PropagationCause::Capability);
        }
    }

    /// Sets a joint's traverse velocity.
    pub fn set_velocity(&mut self, id: SegmentId, velocity: f64) {
        self.with_joint_mut(id, |joint| joint.velocity = velocity);
    }

    /// Sets a joint's damping.
    pub fn set_damping(&mut self, id: SegmentId, damping: f64) {
        self.with_joint_mut(id, |joint| joint.damping = damping);
    }

    // -- Queries --

    /// Returns whether the segment's joint is currently slaved to a leader.
    #[must_use]
    pub fn is_following(&self, id: SegmentId) -> bool {
        self.follower(id).is_some_and(FollowerState::is_following)
    }

    /// Returns the display mirrors of a follower.
    #[must_use]
    pub fn mirrors(&self, id: SegmentId) -> Option<Mirrors> {
        self.follower(id).map(FollowerState::mirrors)
    }

    /// Classifies a segment as it stands now.
    #[must_use]
    pub fn classify(&self, id: SegmentId) -> PropagationType {
        self.validate(id);
        classify(self.caps_at(id.idx))
    }

    /// Returns the number of followers currently slaved to a leader.
    #[must_use]
    pub fn following_count(&self) -> usize {
        self.followers
            .iter()
            .flatten()
            .filter(|follower| follower.is_following())
            .count()
    }

    // -- Raw-index accessors --
    //
    // These accept raw slot indices (as found in `FollowChanges`) rather than
    // `SegmentId` handles, skipping generation validation.

    /// Returns the current handle for raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn segment_at(&self, idx: u32) -> SegmentId {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.id_at(idx)
    }

    /// Returns the follower state at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn follower_at(&self, idx: u32) -> Option<&FollowerState> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.followers[idx as usize].as_ref()
    }

    /// Returns the joint at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn joint_at(&self, idx: u32) -> Option<&Joint> {
        assert!(
            idx < self.len,
            "slot index {idx} out of range (len {})",
            self.len
        );
        self.joints[idx as usize].as_ref()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: SegmentId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale SegmentId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> SegmentId {
        SegmentId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    #[inline]
    pub(crate) fn caps_at(&self, idx: u32) -> SegmentCaps<'_> {
        SegmentCaps {
            actuator: self.joints[idx as usize].as_ref(),
            follower: self.followers[idx as usize].as_ref(),
        }
    }

    fn set_actuator_flag(&mut self, id: SegmentId, field: fn(&mut Joint) -> &mut bool, value: bool) {
        self.validate(id);
        let Some(joint) = self.joints[id.idx as usize].as_mut() else {
            return;
        };
        let flag = field(joint);
        if *flag == value {
            return;
        }
        *flag = value;
        self.repropagate_resolved(id.idx, PropagationCause::Actuator);
    }

    /// Re-checks a ready follower against its segment's current joint.
    ///
    /// Returns `true` if this disabled the follower.
    fn revalidate_follower(&mut self, idx: u32) -> bool {
        let id = self.id_at(idx);
        let Some(follower) = self.followers[idx as usize].as_mut() else {
            return false;
        };
        let was_following = follower.is_following();
        let Some(error) = follower.revalidate(id, self.joints[idx as usize].as_ref()) else {
            return false;
        };
        self.pending_diagnostics.push(Diagnostic::new(id, error));
        if was_following {
            self.dirty.mark(idx, dirty::LEADER);
        }
        true
    }

    fn with_joint_mut(&mut self, id: SegmentId, f: impl FnOnce(&mut Joint)) {
        self.validate(id);
        if let Some(joint) = self.joints[id.idx as usize].as_mut() {
            f(joint);
        }
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            // Was first child.
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        assert!(asm.is_alive(id));
        assert_eq!(asm.segment_count(), 1);
        asm.destroy_segment(id);
        assert!(!asm.is_alive(id));
        assert_eq!(asm.segment_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut asm = Assembly::new();
        let id1 = asm.create_segment();
        asm.set_joint(id1, Some(Joint::default()));
        asm.destroy_segment(id1);
        let id2 = asm.create_segment();
        assert!(!asm.is_alive(id1));
        assert!(asm.is_alive(id2));
        assert_eq!(id1.idx, id2.idx);
        assert_ne!(id1.generation, id2.generation);
        // The reused slot starts empty.
        assert!(asm.joint(id2).is_none());
    }

    #[test]
    fn attach_and_query() {
        let mut asm = Assembly::new();
        let parent = asm.create_segment();
        let child1 = asm.create_segment();
        let child2 = asm.create_segment();

        asm.attach(parent, child1);
        asm.attach(parent, child2);

        assert_eq!(asm.parent(child1), Some(parent));
        assert_eq!(asm.parent(child2), Some(parent));
        let kids: Vec<_> = asm.children(parent).collect();
        assert_eq!(kids, vec![child1, child2]);
    }

    #[test]
    fn detach_middle_child_keeps_siblings() {
        let mut asm = Assembly::new();
        let parent = asm.create_segment();
        let a = asm.create_segment();
        let b = asm.create_segment();
        let c = asm.create_segment();
        asm.attach(parent, a);
        asm.attach(parent, b);
        asm.attach(parent, c);

        asm.detach(b);
        assert_eq!(asm.parent(b), None);
        let kids: Vec<_> = asm.children(parent).collect();
        assert_eq!(kids, vec![a, c]);
    }

    #[test]
    fn roots_returns_parentless_segments() {
        let mut asm = Assembly::new();
        let a = asm.create_segment();
        let b = asm.create_segment();
        let c = asm.create_segment();
        asm.attach(a, c);

        let roots = asm.roots();
        assert!(roots.contains(&a));
        assert!(roots.contains(&b));
        assert!(!roots.contains(&c));
    }

    #[test]
    fn counterparts_share_a_group() {
        let mut asm = Assembly::new();
        let left = asm.create_segment();
        let right = asm.create_segment();
        let other = asm.create_segment();
        asm.set_symmetry_group(left, Some(SymmetryGroup(1)));
        asm.set_symmetry_group(right, Some(SymmetryGroup(1)));
        asm.set_symmetry_group(other, Some(SymmetryGroup(2)));

        assert_eq!(asm.counterparts(left), vec![right]);
        assert_eq!(asm.counterparts(right), vec![left]);
        assert!(asm.counterparts(other).is_empty());

        asm.destroy_segment(right);
        assert!(asm.counterparts(left).is_empty());
    }

    #[test]
    fn actuator_flags_without_joint_are_ignored() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        asm.set_locked(id, true);
        asm.set_target_angle(id, 10.0);
        assert!(asm.joint(id).is_none());
        assert_eq!(asm.classify(id), PropagationType::Transparent);
    }

    #[test]
    fn live_parameters_update_joint() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        asm.set_joint(id, Some(Joint::rotary(ParamRange::new(0.0, 10.0))));
        asm.set_target_angle(id, 7.0);
        asm.set_velocity(id, 3.0);
        asm.set_damping(id, 0.5);
        asm.set_angle_range(id, ParamRange::new(-10.0, 10.0));
        let joint = asm.joint(id).copied().unwrap_or_default();
        assert_eq!(joint.target_angle, 7.0);
        assert_eq!(joint.velocity, 3.0);
        assert_eq!(joint.damping, 0.5);
        assert_eq!(joint.angle_range, ParamRange::new(-10.0, 10.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = LinkageConfig::new().with_max_depth(0);
        assert!(Assembly::try_with_config(config).is_err());
        assert!(Assembly::try_with_config(LinkageConfig::precise()).is_ok());
    }

    #[test]
    #[should_panic(expected = "cannot destroy segment with children")]
    fn destroy_with_children_panics() {
        let mut asm = Assembly::new();
        let parent = asm.create_segment();
        let child = asm.create_segment();
        asm.attach(parent, child);
        asm.destroy_segment(parent);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_attach_panics() {
        let mut asm = Assembly::new();
        let a = asm.create_segment();
        let b = asm.create_segment();
        let c = asm.create_segment();
        asm.attach(a, c);
        asm.attach(b, c);
    }

    #[test]
    #[should_panic(expected = "stale SegmentId")]
    fn destroyed_handle_panics_on_set_joint() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        asm.destroy_segment(id);
        asm.set_joint(id, None);
    }

    #[test]
    #[should_panic(expected = "stale SegmentId")]
    fn destroyed_handle_panics_on_parent() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        asm.destroy_segment(id);
        let _ = asm.parent(id);
    }

    #[test]
    #[should_panic(expected = "segment has no parent")]
    fn detach_root_panics() {
        let mut asm = Assembly::new();
        let id = asm.create_segment();
        asm.detach(id);
    }
}

// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Read-only view of a segment tree.
//!
//! The [`Topology`] trait is the contract between the leader-discovery
//! algorithms and whatever owns the tree. It exposes only what those
//! algorithms read: ancestry, ordered children, and the capability view used
//! by [`classify`](crate::classify::classify).
//!
//! # Contract
//!
//! - `parent_of` and `children_of` must agree: `c` is yielded by
//!   `children_of(p)` exactly when `parent_of(c) == Some(p)`.
//! - The view must not change while a walk is in progress. Implementations
//!   backed by interior mutability must not be mutated from inside `caps`.
//! - Implementations are not required to be acyclic. Walkers detect cycles
//!   and runaway depth themselves and report them as
//!   [`FollowError::TopologyCycle`](crate::error::FollowError::TopologyCycle)
//!   or [`FollowError::DepthExceeded`](crate::error::FollowError::DepthExceeded).

use alloc::vec::Vec;

use crate::assembly::SegmentId;
use crate::classify::SegmentCaps;

/// A read-only segment tree.
pub trait Topology {
    /// Returns the parent of `segment`, or `None` for a root.
    fn parent_of(&self, segment: SegmentId) -> Option<SegmentId>;

    /// Returns the ordered children of `segment`.
    fn children_of(&self, segment: SegmentId) -> impl Iterator<Item = SegmentId> + '_;

    /// Returns what `segment` can do.
    fn caps(&self, segment: SegmentId) -> SegmentCaps<'_>;
}

/// Collects `root` and its descendants in depth-first pre-order.
///
/// Stops descending after `max_depth` levels and never yields a segment
/// twice, so a malformed view still terminates.
#[must_use]
pub fn descendants<T: Topology + ?Sized>(topology: &T, root: SegmentId, max_depth: u32) -> Vec<SegmentId> {
    let mut out = Vec::new();
    let mut stack = alloc::vec![(root, 0_u32)];
    let mut scratch = Vec::new();
    while let Some((segment, depth)) = stack.pop() {
        if out.contains(&segment) {
            continue;
        }
        out.push(segment);
        if depth >= max_depth {
            continue;
        }
        scratch.clear();
        scratch.extend(topology.children_of(segment));
        stack.extend(scratch.iter().rev().map(|&child| (child, depth + 1)));
    }
    out
}

#[cfg(test)]
pub(crate) mod mock {
    //! A tiny topology for exercising walkers without an assembly.

    use alloc::vec::Vec;

    use super::Topology;
    use crate::assembly::SegmentId;
    use crate::classify::SegmentCaps;
    use crate::follower::FollowerState;
    use crate::joint::Joint;

    #[derive(Debug, Default)]
    pub(crate) struct MockTree {
        pub(crate) parent: Vec<Option<u32>>,
        pub(crate) joints: Vec<Option<Joint>>,
        pub(crate) followers: Vec<Option<FollowerState>>,
    }

    impl MockTree {
        pub(crate) fn push(&mut self, parent: Option<u32>, joint: Option<Joint>) -> SegmentId {
            let idx = u32::try_from(self.parent.len()).unwrap();
            self.parent.push(parent);
            self.joints.push(joint);
            self.followers.push(None);
            SegmentId::new(idx, 0)
        }
    }

    impl Topology for MockTree {
        fn parent_of(&self, segment: SegmentId) -> Option<SegmentId> {
            self.parent[segment.index() as usize].map(|p| SegmentId::new(p, 0))
        }

        fn children_of(&self, segment: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
            let me = segment.index();
            self.parent
                .iter()
                .enumerate()
                .filter(move |(_, p)| **p == Some(me))
                .map(|(idx, _)| SegmentId::new(u32::try_from(idx).unwrap(), 0))
        }

        fn caps(&self, segment: SegmentId) -> SegmentCaps<'_> {
            let idx = segment.index() as usize;
            SegmentCaps {
                actuator: self.joints[idx].as_ref(),
                follower: self.followers[idx].as_ref(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::MockTree;
    use super::*;

    #[test]
    fn descendants_are_preorder() {
        let mut tree = MockTree::default();
        let a = tree.push(None, None);
        let b = tree.push(Some(0), None);
        let c = tree.push(Some(0), None);
        let d = tree.push(Some(1), None);
        assert_eq!(descendants(&tree, a, 16), [a, b, d, c]);
        assert_eq!(descendants(&tree, b, 16), [b, d]);
    }

    #[test]
    fn descendants_respect_depth() {
        let mut tree = MockTree::default();
        let a = tree.push(None, None);
        let b = tree.push(Some(0), None);
        let _c = tree.push(Some(1), None);
        assert_eq!(descendants(&tree, a, 1), [a, b]);
    }

    #[test]
    fn descendants_terminate_on_cycles() {
        let mut tree = MockTree::default();
        let a = tree.push(Some(1), None);
        let b = tree.push(Some(0), None);
        assert_eq!(descendants(&tree, a, 64), [a, b]);
    }
}

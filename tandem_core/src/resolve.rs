// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Upward leader discovery.

use crate::assembly::SegmentId;
use crate::classify::{PropagationType, classify};
use crate::error::FollowError;
use crate::topology::Topology;

/// Finds the nearest effective leader above `segment`.
///
/// Walks strict ancestors only; `segment` itself is never classified. The
/// walk stops at the first [`Assertive`](PropagationType::Assertive)
/// ancestor (its joint is the leader), at the first
/// [`Dead`](PropagationType::Dead) one, or at the root.
///
/// # Errors
///
/// Returns [`FollowError::TopologyCycle`] if the ancestry loops back on
/// itself, or [`FollowError::DepthExceeded`] after examining more than
/// `max_depth` ancestors.
pub fn resolve_leader<T: Topology + ?Sized>(
    topology: &T,
    segment: SegmentId,
    max_depth: u32,
) -> Result<Option<SegmentId>, FollowError> {
    // Floyd's tortoise and hare: `hare` climbs two levels per step and can
    // only meet the walker inside a loop.
    let mut hare = Some(segment);
    let mut current = segment;
    let mut depth = 0_u32;
    loop {
        let Some(ancestor) = topology.parent_of(current) else {
            return Ok(None);
        };
        depth += 1;
        if depth > max_depth {
            return Err(FollowError::DepthExceeded {
                segment: ancestor,
                limit: max_depth,
            });
        }
        match classify(topology.caps(ancestor)) {
            PropagationType::Assertive => return Ok(Some(ancestor)),
            PropagationType::Dead => return Ok(None),
            PropagationType::Transparent => {}
        }
        hare = hare
            .and_then(|h| topology.parent_of(h))
            .and_then(|h| topology.parent_of(h));
        if hare == Some(ancestor) {
            return Err(FollowError::TopologyCycle(ancestor));
        }
        current = ancestor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::follower::FollowerState;
    use crate::joint::{Joint, ParamRange};
    use crate::topology::mock::MockTree;

    fn motor() -> Option<Joint> {
        Some(Joint::rotary(ParamRange::new(-90.0, 90.0)))
    }

    #[test]
    fn root_has_no_leader() {
        let mut tree = MockTree::default();
        let root = tree.push(None, motor());
        assert_eq!(resolve_leader(&tree, root, 64), Ok(None));
    }

    #[test]
    fn start_segment_is_not_classified() {
        let mut tree = MockTree::default();
        let root = tree.push(None, motor());
        let child = tree.push(Some(0), motor());
        assert_eq!(resolve_leader(&tree, child, 64), Ok(Some(root)));
    }

    #[test]
    fn skips_transparent_links() {
        let mut tree = MockTree::default();
        let root = tree.push(None, motor());
        let _link = tree.push(Some(0), None);
        let _locked = tree.push(
            Some(1),
            Some(Joint::rotary(ParamRange::new(0.0, 1.0)).with_locked(true)),
        );
        let leaf = tree.push(Some(2), None);
        assert_eq!(resolve_leader(&tree, leaf, 64), Ok(Some(root)));
    }

    #[test]
    fn dead_ancestor_severs() {
        let mut tree = MockTree::default();
        let _root = tree.push(None, motor());
        let _dead = tree.push(
            Some(0),
            Some(Joint::rotary(ParamRange::new(0.0, 1.0)).with_motor_engaged(false)),
        );
        let leaf = tree.push(Some(1), None);
        assert_eq!(resolve_leader(&tree, leaf, 64), Ok(None));
    }

    #[test]
    fn following_ancestor_relays() {
        let mut tree = MockTree::default();
        let root = tree.push(None, motor());
        let mid = tree.push(Some(0), motor());
        let leaf = tree.push(Some(1), None);
        let mut follower = FollowerState::new(true);
        let _ = follower.set_leader(Some(root));
        tree.followers[mid.index() as usize] = Some(follower);
        assert_eq!(resolve_leader(&tree, leaf, 64), Ok(Some(root)));

        // Disabled by the user: the follower asserts itself instead.
        if let Some(f) = tree.followers[mid.index() as usize].as_mut() {
            let _ = f.set_enabled(false);
        }
        assert_eq!(resolve_leader(&tree, leaf, 64), Ok(Some(mid)));
    }

    #[test]
    fn cycle_is_reported() {
        let mut tree = MockTree::default();
        let a = tree.push(Some(2), None);
        let _b = tree.push(Some(0), None);
        let _c = tree.push(Some(1), None);
        let err = resolve_leader(&tree, a, 64);
        assert!(matches!(err, Err(FollowError::TopologyCycle(_))), "{err:?}");
    }

    #[test]
    fn self_parent_is_a_cycle() {
        let mut tree = MockTree::default();
        let a = tree.push(Some(0), None);
        assert_eq!(resolve_leader(&tree, a, 64), Err(FollowError::TopologyCycle(a)));
    }

    #[test]
    fn depth_cap() {
        let mut tree = MockTree::default();
        let _ = tree.push(None, None);
        for i in 0..10 {
            let _ = tree.push(Some(i), None);
        }
        let leaf = SegmentId::new(10, 0);
        assert_eq!(resolve_leader(&tree, leaf, 64), Ok(None));
        assert!(matches!(
            resolve_leader(&tree, leaf, 3),
            Err(FollowError::DepthExceeded { limit: 3, .. })
        ));
    }
}

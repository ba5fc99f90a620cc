// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use alloc::vec::Vec;

use super::id::{INVALID, SegmentId};
use super::store::Assembly;

/// An iterator over the direct children of a segment.
///
/// Created by [`Assembly::children`].
#[derive(Debug)]
pub struct Children<'a> {
    assembly: &'a Assembly,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(assembly: &'a Assembly, first: u32) -> Self {
        Self {
            assembly,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = SegmentId;

    fn next(&mut self) -> Option<SegmentId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.assembly.next_sibling[idx as usize];
        Some(self.assembly.id_at(idx))
    }
}

impl Assembly {
    /// Returns the current traversal order (depth-first pre-order over all
    /// rooted trees).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) or
    /// [`update_all`](Self::update_all) has run since the last topology
    /// change.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    /// Rebuilds the traversal order if topology changed.
    pub(crate) fn refresh_traversal_order(&mut self) {
        if !self.traversal_dirty {
            return;
        }
        self.traversal_dirty = false;
        self.traversal_order.clear();
        let mut stack = Vec::new();
        for root in 0..self.len {
            if self.parent[root as usize] != INVALID || self.free_list.contains(&root) {
                continue;
            }
            stack.push(root);
            while let Some(idx) = stack.pop() {
                self.traversal_order.push(idx);
                let mark = stack.len();
                let mut child = self.first_child[idx as usize];
                while child != INVALID {
                    stack.push(child);
                    child = self.next_sibling[child as usize];
                }
                stack[mark..].reverse();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn traversal_order_is_depth_first() {
        let mut asm = Assembly::new();
        let a = asm.create_segment();
        let b = asm.create_segment();
        let c = asm.create_segment();
        let d = asm.create_segment();

        // Tree: a -> [b -> [d], c]
        asm.attach(a, b);
        asm.attach(a, c);
        asm.attach(b, d);

        asm.refresh_traversal_order();
        assert_eq!(asm.traversal_order(), &[a.idx, b.idx, d.idx, c.idx]);
    }

    #[test]
    fn children_iterates_in_sibling_order() {
        let mut asm = Assembly::new();
        let root = asm.create_segment();
        let kids: Vec<_> = (0..4).map(|_| asm.create_segment()).collect();
        for &kid in &kids {
            asm.attach(root, kid);
        }
        let seen: Vec<_> = asm.children(root).collect();
        assert_eq!(seen, kids);
    }
}

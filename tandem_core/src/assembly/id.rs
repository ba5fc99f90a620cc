// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment and symmetry identity types.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sentinel value indicating "no segment" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to a segment in an [`Assembly`](super::Assembly).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after a segment is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentId {
    /// Slot index into the assembly's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the assembly's generation for this slot.
    pub(crate) generation: u32,
}

impl SegmentId {
    /// Rebuilds a handle from its raw parts.
    ///
    /// Meant for decoding recorded traces; a fabricated handle is only
    /// usable if it matches a live slot.
    #[inline]
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self {
            idx: index,
            generation,
        }
    }

    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SegmentId({}@gen{})", self.idx, self.generation)
    }
}

/// Tag shared by symmetric counterparts.
///
/// Segments carrying the same group are mirror images of each other; a
/// symmetric toggle on one is applied to all the others.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SymmetryGroup(pub u32);

impl fmt::Debug for SymmetryGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SymmetryGroup({})", self.0)
    }
}

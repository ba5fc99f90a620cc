// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The assembly records what changed between evaluations on independent
//! [`understory_dirty`] channels, keyed by raw segment slot index.
//!
//! - [`LEADER`] is marked on a follower whose leader identity or
//!   "actually following" status changed during propagation or a toggle.
//! - [`MIRROR`] is marked on a follower that wrote at least one slaved
//!   value during an update.
//! - [`TOPOLOGY`] is marked on structural mutations (create, destroy,
//!   attach, detach) and triggers a traversal-order rebuild.
//!
//! No channel carries dependency edges; leader changes are discovered by
//! propagation itself, so each mark is local to the segment it names.
//!
//! # Consumption
//!
//! Callers never query dirty state directly. Each
//! [`Assembly::evaluate`](crate::assembly::Assembly::evaluate) call drains
//! all channels and surfaces the results as
//! [`FollowChanges`](crate::assembly::FollowChanges).

use understory_dirty::Channel;

/// Leader identity or following status changed.
pub const LEADER: Channel = Channel::new(0);

/// Slaved values were written.
pub const MIRROR: Channel = Channel::new(1);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(2);

// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Segment tree data model.
//!
//! A *segment* is a node in the physical hierarchy of a mechanism. Each
//! segment has:
//!
//! - An identity ([`SegmentId`]), a generational handle that becomes stale
//!   when the segment is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered tree.
//! - **Capabilities** set by the host: an optional [`Joint`](crate::joint::Joint)
//!   ([`set_joint`](Assembly::set_joint)), an optional
//!   [`FollowerState`](crate::follower::FollowerState)
//!   ([`add_follower`](Assembly::add_follower)), and an optional
//!   [`SymmetryGroup`] ([`set_symmetry_group`](Assembly::set_symmetry_group)).
//! - A **link state** written by propagation: the leader handed down by its
//!   parent ([`leader_of`](Assembly::leader_of)).
//!
//! Segments are stored in struct-of-arrays layout with index-based handles.
//!
//! # Triggers
//!
//! Leader assignments are recomputed eagerly, inside the mutation that made
//! them stale:
//!
//! | Mutation | Propagation root | Incoming leader |
//! |---|---|---|
//! | [`activate`](Assembly::activate) | the tree root | none |
//! | [`attach`](Assembly::attach) | the attached segment | resolved from the new parent |
//! | [`detach`](Assembly::detach) | the detached segment | none, forced throughout |
//! | [`set_locked`](Assembly::set_locked) and the other actuator flags | the segment | its current incoming leader |
//! | [`set_follow_enabled`](Assembly::set_follow_enabled) | the segment | its current incoming leader |
//!
//! Live parameter changes ([`set_target_angle`](Assembly::set_target_angle)
//! and friends) never propagate; followers pick them up on the next
//! [`update`](Assembly::update).
//!
//! # Dirty tracking
//!
//! Mutations mark the channels in [`dirty`](crate::dirty); each
//! [`evaluate`](Assembly::evaluate) drains them into a [`FollowChanges`].

mod evaluate;
mod id;
mod propagate;
mod store;
mod traverse;

pub use evaluate::{FollowChanges, ToggleRecord};
pub use id::{INVALID, SegmentId, SymmetryGroup};
pub use propagate::{LinkState, PropagationCause, PropagationSummary, Symmetry};
pub use store::Assembly;
pub use traverse::Children;

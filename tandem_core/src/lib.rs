// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Leader/follower linkage for trees of rotary joints.
//!
//! `tandem_core` decides, for every joint in a tree of physical segments,
//! which upstream joint (if any) it mirrors, and keeps following joints
//! slaved to their leaders with their ranges rescaled. It is `no_std`
//! compatible (with `alloc`) and stores the tree in struct-of-arrays form
//! with generational handles.
//!
//! # Architecture
//!
//! ```text
//!   host event (attach, lock, toggle, ...)
//!       │
//!       ▼
//!   Assembly ──► propagate ──► classify(SegmentCaps) ──► FollowerState::set_leader
//!                                                              │
//!                 ┌────────────────────────────────────────────┘
//!                 ▼
//!   Assembly::update_all() ──► ChangeTracker ──► LinearMapper ──► Joint
//!                                                                  │
//!                 ┌────────────────────────────────────────────────┘
//!                 ▼
//!   Assembly::evaluate() ──► FollowChanges ──► Tracer::follow_changes()
//! ```
//!
//! **[`assembly`]**: The segment tree, with generational handles, capability
//! side tables, link states, propagation, and per-tick updates.
//!
//! **[`classify`]**: The three-way propagation role of a single segment,
//! computed from a capability view.
//!
//! **[`resolve`]**: Upward leader discovery over any [`Topology`](topology::Topology).
//!
//! **[`follower`]**: Per-joint follower state, parameter trackers, and the
//! [`ParamKind`](follower::ParamKind) handler table.
//!
//! **[`mapper`]**: Range-ratio rescaling of angle, velocity, and damping.
//!
//! **[`tracker`]**: Value debouncing.
//!
//! **[`dirty`]**: Change-reporting channels via `understory_dirty`.
//!
//! **[`config`]**, **[`error`]**, **[`joint`]**: Tuning, errors and
//! diagnostics, and actuator state.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! a zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `serde` (disabled by default): Serialization for joints, ranges,
//!   symmetry groups, and configuration.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-write
//!   [`ParamWrite`](trace::ParamWrite) records.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod assembly;
pub mod classify;
pub mod config;
pub mod dirty;
pub mod error;
pub mod follower;
pub mod joint;
pub mod mapper;
pub mod resolve;
pub mod topology;
pub mod trace;
pub mod tracker;

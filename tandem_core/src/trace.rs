// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the linkage.
//!
//! This module provides a [`TraceSink`] trait with one method per event the
//! linkage can report. All method bodies default to no-ops, so implementing
//! only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing (zero overhead). When
//! **on**, each method performs a single `Option` branch before dispatching.
//!
//! The assembly itself holds no sink. Hosts evaluate once per tick and hand
//! the resulting [`FollowChanges`] to [`Tracer::follow_changes`], which fans
//! it out into events and closes with a [`TickSummary`] built by
//! [`TickSummaryBuilder`].
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`): gates [`ParamWrite`] records plus the
//!   corresponding `TraceSink` method.

use crate::assembly::{Assembly, FollowChanges, PropagationCause, PropagationSummary, SegmentId, ToggleRecord};
use crate::error::{Diagnostic, FollowError};
#[cfg(feature = "trace-rich")]
use crate::follower::ParamKind;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted for each propagation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropagationEvent {
    /// Host tick counter.
    pub tick: u64,
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

impl PropagationEvent {
    /// Creates an event from a propagation summary.
    #[must_use]
    pub fn new(tick: u64, summary: &PropagationSummary) -> Self {
        Self {
            tick,
            root: summary.root,
            cause: summary.cause,
            incoming: summary.incoming,
            visited: summary.visited,
            leader_changes: summary.leader_changes,
        }
    }
}

/// Emitted when a follower's leader identity or following status changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeaderChangeEvent {
    /// Host tick counter.
    pub tick: u64,
    /// The follower's segment.
    pub segment: SegmentId,
    /// The leader it follows, or would follow if enabled.
    pub leader: Option<SegmentId>,
    /// Whether it is actually following.
    pub following: bool,
}

/// Emitted for each follow toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleEvent {
    /// Host tick counter.
    pub tick: u64,
    /// The toggled segment.
    pub segment: SegmentId,
    /// Requested preference.
    pub enabled: bool,
    /// Whether the segment is actually following afterwards.
    pub following: bool,
    /// Whether the toggle was fanned out from a counterpart.
    pub counterpart: bool,
}

impl ToggleEvent {
    /// Creates an event from a toggle record.
    #[must_use]
    pub fn new(tick: u64, record: &ToggleRecord) -> Self {
        Self {
            tick,
            segment: record.segment,
            enabled: record.enabled,
            following: record.following,
            counterpart: record.counterpart,
        }
    }
}

/// Emitted for each queued diagnostic.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagnosticEvent {
    /// Host tick counter.
    pub tick: u64,
    /// Segment the problem was found at.
    pub segment: SegmentId,
    /// The problem.
    pub error: FollowError,
}

impl DiagnosticEvent {
    /// Creates an event from a diagnostic.
    #[must_use]
    pub fn new(tick: u64, diagnostic: &Diagnostic) -> Self {
        Self {
            tick,
            segment: diagnostic.segment,
            error: diagnostic.error.clone(),
        }
    }
}

/// Per-tick counts produced by [`TickSummaryBuilder`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickSummary {
    /// Host tick counter.
    pub tick: u64,
    /// Propagation runs.
    pub propagations: u32,
    /// Segments visited across all runs.
    pub segments_visited: u32,
    /// Follower leader changes across all runs.
    pub leader_changes: u32,
    /// Toggles applied.
    pub toggles: u32,
    /// Slaved values written.
    pub writes: u32,
    /// Diagnostics queued.
    pub diagnostics: u32,
    /// Whether topology changed.
    pub topology_changed: bool,
    /// Followers actually following at the end of the tick.
    pub following: u32,
}

/// A single slaved value written to a follower.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamWrite {
    /// The follower's segment.
    pub segment: SegmentId,
    /// Which value.
    pub kind: ParamKind,
    /// The value written; `locked` is `1.0` or `0.0`.
    pub value: f64,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the linkage.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called for each propagation run.
    fn on_propagation(&mut self, e: &PropagationEvent) {
        _ = e;
    }

    /// Called when a follower's leader or following status changed.
    fn on_leader_change(&mut self, e: &LeaderChangeEvent) {
        _ = e;
    }

    /// Called for each follow toggle.
    fn on_toggle(&mut self, e: &ToggleEvent) {
        _ = e;
    }

    /// Called for each diagnostic.
    fn on_diagnostic(&mut self, e: &DiagnosticEvent) {
        _ = e;
    }

    /// Called with a per-tick summary.
    fn on_tick_summary(&mut self, s: &TickSummary) {
        _ = s;
    }

    /// Called with the tick's slaved writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_param_writes(&mut self, tick: u64, writes: &[ParamWrite]) {
        _ = (tick, writes);
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`PropagationEvent`].
    #[inline]
    pub fn propagation(&mut self, e: &PropagationEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_propagation(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LeaderChangeEvent`].
    #[inline]
    pub fn leader_change(&mut self, e: &LeaderChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_leader_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ToggleEvent`].
    #[inline]
    pub fn toggle(&mut self, e: &ToggleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_toggle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DiagnosticEvent`].
    #[inline]
    pub fn diagnostic(&mut self, e: &DiagnosticEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_diagnostic(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`TickSummary`].
    #[inline]
    pub fn tick_summary(&mut self, s: &TickSummary) {
        #[cfg(feature = "trace")]
        if let Some(sink) = &mut self.sink {
            sink.on_tick_summary(s);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = s;
        }
    }

    /// Emits slaved writes (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn param_writes(&mut self, tick: u64, writes: &[ParamWrite]) {
        if let Some(s) = &mut self.sink {
            s.on_param_writes(tick, writes);
        }
    }

    /// Fans one evaluation's changes out into events, closing with a
    /// [`TickSummary`].
    ///
    /// Events arrive in a fixed order: propagations, toggles, leader
    /// changes, diagnostics, writes, then the summary.
    pub fn follow_changes(&mut self, tick: u64, assembly: &Assembly, changes: &FollowChanges) {
        #[cfg(feature = "trace")]
        {
            if self.sink.is_none() {
                return;
            }
            for summary in &changes.propagations {
                self.propagation(&PropagationEvent::new(tick, summary));
            }
            for record in &changes.toggles {
                self.toggle(&ToggleEvent::new(tick, record));
            }
            for &idx in &changes.leaders {
                // Destroyed slots have no follower left to report.
                let Some(follower) = assembly.follower_at(idx) else {
                    continue;
                };
                self.leader_change(&LeaderChangeEvent {
                    tick,
                    segment: assembly.segment_at(idx),
                    leader: follower.leader(),
                    following: follower.is_following(),
                });
            }
            for diagnostic in &changes.diagnostics {
                self.diagnostic(&DiagnosticEvent::new(tick, diagnostic));
            }
            #[cfg(feature = "trace-rich")]
            if !changes.param_writes.is_empty() {
                self.param_writes(tick, &changes.param_writes);
            }

            let mut builder = TickSummaryBuilder::new(tick);
            builder.record(changes);
            builder.set_following(assembly.following_count());
            self.tick_summary(&builder.finish());
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = (tick, assembly, changes);
        }
    }
}

// ---------------------------------------------------------------------------
// TickSummaryBuilder
// ---------------------------------------------------------------------------

/// Accumulates counts over one tick and produces a [`TickSummary`].
///
/// A host that evaluates several times per tick can [`record`](Self::record)
/// each report into the same builder.
#[derive(Debug)]
pub struct TickSummaryBuilder {
    summary: TickSummary,
}

impl TickSummaryBuilder {
    /// Starts a summary for the given tick.
    #[must_use]
    pub fn new(tick: u64) -> Self {
        Self {
            summary: TickSummary {
                tick,
                ..TickSummary::default()
            },
        }
    }

    /// Adds one evaluation's changes.
    pub fn record(&mut self, changes: &FollowChanges) {
        let s = &mut self.summary;
        s.propagations = s.propagations.saturating_add(saturating_len(changes.propagations.len()));
        for run in &changes.propagations {
            s.segments_visited = s.segments_visited.saturating_add(run.visited);
            s.leader_changes = s.leader_changes.saturating_add(run.leader_changes);
        }
        s.toggles = s.toggles.saturating_add(saturating_len(changes.toggles.len()));
        s.writes = s.writes.saturating_add(changes.writes);
        s.diagnostics = s.diagnostics.saturating_add(saturating_len(changes.diagnostics.len()));
        s.topology_changed |= changes.topology_changed;
    }

    /// Sets the number of followers actually following.
    pub fn set_following(&mut self, following: usize) {
        self.summary.following = saturating_len(following);
    }

    /// Consumes the builder and produces the final [`TickSummary`].
    #[must_use]
    pub fn finish(self) -> TickSummary {
        self.summary
    }
}

fn saturating_len(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

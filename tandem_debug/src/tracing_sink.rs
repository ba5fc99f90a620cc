// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Forwarding trace events to [`tracing`].
//!
//! [`TracingSink`] turns each event into a structured `tracing` event under
//! the `tandem` target. Diagnostics are emitted at `WARN`, everything else at
//! `DEBUG`, and slaved writes at `TRACE`.

use tandem_core::trace::{
    DiagnosticEvent, LeaderChangeEvent, ParamWrite, PropagationEvent, TickSummary, ToggleEvent,
    TraceSink,
};
use tracing::{debug, trace, warn};

/// A [`TraceSink`] that forwards events to the active `tracing` subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    /// Creates a forwarding sink.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TraceSink for TracingSink {
    fn on_propagation(&mut self, e: &PropagationEvent) {
        debug!(
            target: "tandem",
            tick = e.tick,
            root = ?e.root,
            cause = ?e.cause,
            incoming = ?e.incoming,
            visited = e.visited,
            leader_changes = e.leader_changes,
            "propagation"
        );
    }

    fn on_leader_change(&mut self, e: &LeaderChangeEvent) {
        debug!(
            target: "tandem",
            tick = e.tick,
            segment = ?e.segment,
            leader = ?e.leader,
            following = e.following,
            "leader changed"
        );
    }

    fn on_toggle(&mut self, e: &ToggleEvent) {
        debug!(
            target: "tandem",
            tick = e.tick,
            segment = ?e.segment,
            enabled = e.enabled,
            following = e.following,
            counterpart = e.counterpart,
            "follow toggled"
        );
    }

    fn on_diagnostic(&mut self, e: &DiagnosticEvent) {
        warn!(
            target: "tandem",
            tick = e.tick,
            segment = ?e.segment,
            error = %e.error,
            "linkage diagnostic"
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        debug!(
            target: "tandem",
            tick = s.tick,
            propagations = s.propagations,
            segments_visited = s.segments_visited,
            leader_changes = s.leader_changes,
            toggles = s.toggles,
            writes = s.writes,
            diagnostics = s.diagnostics,
            topology_changed = s.topology_changed,
            following = s.following,
            "tick summary"
        );
    }

    fn on_param_writes(&mut self, tick: u64, writes: &[ParamWrite]) {
        for w in writes {
            trace!(
                target: "tandem",
                tick,
                segment = ?w.segment,
                kind = ?w.kind,
                value = w.value,
                "slaved write"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tandem_core::assembly::SegmentId;
    use tandem_core::error::FollowError;
    use tracing::span::{Attributes, Id, Record};
    use tracing::{Event, Level, Metadata, Subscriber};

    use super::*;

    /// Collects the level and target of every event.
    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<(Level, String)>>>);

    impl Subscriber for Capture {
        fn enabled(&self, _: &Metadata<'_>) -> bool {
            true
        }

        fn new_span(&self, _: &Attributes<'_>) -> Id {
            Id::from_u64(1)
        }

        fn record(&self, _: &Id, _: &Record<'_>) {}

        fn record_follows_from(&self, _: &Id, _: &Id) {}

        fn event(&self, event: &Event<'_>) {
            let meta = event.metadata();
            self.0
                .lock()
                .unwrap()
                .push((*meta.level(), meta.target().to_owned()));
        }

        fn enter(&self, _: &Id) {}

        fn exit(&self, _: &Id) {}
    }

    #[test]
    fn diagnostics_warn_and_the_rest_debug() {
        let capture = Capture::default();
        let seen = Arc::clone(&capture.0);
        let segment = SegmentId::new(0, 0);

        tracing::subscriber::with_default(capture, || {
            let mut sink = TracingSink::new();
            sink.on_toggle(&ToggleEvent {
                tick: 1,
                segment,
                enabled: true,
                following: true,
                counterpart: false,
            });
            sink.on_diagnostic(&DiagnosticEvent {
                tick: 1,
                segment,
                error: FollowError::MissingActuator(segment),
            });
            sink.on_tick_summary(&TickSummary::default());
        });

        let seen = seen.lock().unwrap();
        let levels: Vec<Level> = seen.iter().map(|(level, _)| *level).collect();
        assert_eq!(levels, [Level::DEBUG, Level::WARN, Level::DEBUG]);
        assert!(seen.iter().all(|(_, target)| target == "tandem"));
    }
}

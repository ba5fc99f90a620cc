// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use tandem_core::assembly::SegmentId;
use tandem_core::trace::{
    DiagnosticEvent, LeaderChangeEvent, ParamWrite, PropagationEvent, TickSummary, ToggleEvent,
    TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }
}

/// Formats an optional handle as `i@g`, or `-` for none.
struct Seg(Option<SegmentId>);

impl std::fmt::Display for Seg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(id) => write!(f, "{}@{}", id.index(), id.generation()),
            None => f.write_str("-"),
        }
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_propagation(&mut self, e: &PropagationEvent) {
        let _ = writeln!(
            self.writer,
            "[propagate] tick={} root={} cause={:?} incoming={} visited={} changed={}",
            e.tick,
            Seg(Some(e.root)),
            e.cause,
            Seg(e.incoming),
            e.visited,
            e.leader_changes,
        );
    }

    fn on_leader_change(&mut self, e: &LeaderChangeEvent) {
        let status = if e.following { "following" } else { "idle" };
        let _ = writeln!(
            self.writer,
            "[leader] tick={} segment={} leader={} {status}",
            e.tick,
            Seg(Some(e.segment)),
            Seg(e.leader),
        );
    }

    fn on_toggle(&mut self, e: &ToggleEvent) {
        let via = if e.counterpart { " (counterpart)" } else { "" };
        let _ = writeln!(
            self.writer,
            "[toggle] tick={} segment={} enabled={} following={}{via}",
            e.tick,
            Seg(Some(e.segment)),
            e.enabled,
            e.following,
        );
    }

    fn on_diagnostic(&mut self, e: &DiagnosticEvent) {
        let _ = writeln!(
            self.writer,
            "[diagnostic] tick={} segment={} {}",
            e.tick,
            Seg(Some(e.segment)),
            e.error,
        );
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        let topology = if s.topology_changed { "changed" } else { "stable" };
        let _ = writeln!(
            self.writer,
            "[summary] tick={} runs={} visited={} leaders={} toggles={} \
             writes={} diagnostics={} following={} topology={topology}",
            s.tick,
            s.propagations,
            s.segments_visited,
            s.leader_changes,
            s.toggles,
            s.writes,
            s.diagnostics,
            s.following,
        );
    }

    fn on_param_writes(&mut self, tick: u64, writes: &[ParamWrite]) {
        let _ = writeln!(self.writer, "[writes] tick={tick} count={}", writes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::assembly::PropagationCause;
    use tandem_core::error::FollowError;

    fn output(sink: PrettyPrintSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_writer()).unwrap()
    }

    #[test]
    fn pretty_print_propagation() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_propagation(&PropagationEvent {
            tick: 3,
            root: SegmentId::new(2, 0),
            cause: PropagationCause::Attach,
            incoming: None,
            visited: 4,
            leader_changes: 1,
        });
        let output = output(sink);
        assert!(output.starts_with("[propagate]"), "got: {output}");
        assert!(output.contains("tick=3"), "got: {output}");
        assert!(output.contains("root=2@0"), "got: {output}");
        assert!(output.contains("cause=Attach"), "got: {output}");
        assert!(output.contains("incoming=-"), "got: {output}");
    }

    #[test]
    fn pretty_print_diagnostic_uses_error_display() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        let segment = SegmentId::new(5, 1);
        sink.on_diagnostic(&DiagnosticEvent {
            tick: 9,
            segment,
            error: FollowError::MissingActuator(segment),
        });
        let output = output(sink);
        assert!(output.contains("[diagnostic]"), "got: {output}");
        assert!(output.contains("has no actuator"), "got: {output}");
    }

    #[test]
    fn pretty_print_marks_counterpart_toggles() {
        let mut sink = PrettyPrintSink::with_writer(Vec::<u8>::new());
        sink.on_toggle(&ToggleEvent {
            tick: 1,
            segment: SegmentId::new(0, 0),
            enabled: false,
            following: false,
            counterpart: true,
        });
        let output = output(sink);
        assert!(output.contains("enabled=false"), "got: {output}");
        assert!(output.ends_with("(counterpart)\n"), "got: {output}");
    }
}

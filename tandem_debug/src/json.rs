// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON exporter for recorded traces.
//!
//! [`export`] reads recorded bytes from a
//! [`RecorderSink`](super::recorder::RecorderSink) and writes a JSON array with
//! one object per event. Every object carries an `"event"` name and the host
//! `"tick"`; segments are written as `{"index": i, "generation": g}` or
//! `null`.

use std::io::{self, Write};

use serde_json::{Value, json};

use tandem_core::assembly::SegmentId;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as a JSON array.
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(event_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn event_json(recorded: RecordedEvent) -> Value {
    match recorded {
        RecordedEvent::Propagation(e) => json!({
            "event": "Propagation",
            "tick": e.tick,
            "root": segment(Some(e.root)),
            "cause": format!("{:?}", e.cause),
            "incoming": segment(e.incoming),
            "visited": e.visited,
            "leader_changes": e.leader_changes,
        }),
        RecordedEvent::LeaderChange(e) => json!({
            "event": "LeaderChange",
            "tick": e.tick,
            "segment": segment(Some(e.segment)),
            "leader": segment(e.leader),
            "following": e.following,
        }),
        RecordedEvent::Toggle(e) => json!({
            "event": "Toggle",
            "tick": e.tick,
            "segment": segment(Some(e.segment)),
            "enabled": e.enabled,
            "following": e.following,
            "counterpart": e.counterpart,
        }),
        RecordedEvent::Diagnostic(e) => json!({
            "event": "Diagnostic",
            "tick": e.tick,
            "segment": segment(Some(e.segment)),
            "config_error": e.error.is_config_error(),
            "topology_error": e.error.is_topology_error(),
            "message": e.error.to_string(),
        }),
        RecordedEvent::TickSummary(s) => json!({
            "event": "TickSummary",
            "tick": s.tick,
            "propagations": s.propagations,
            "segments_visited": s.segments_visited,
            "leader_changes": s.leader_changes,
            "toggles": s.toggles,
            "writes": s.writes,
            "diagnostics": s.diagnostics,
            "topology_changed": s.topology_changed,
            "following": s.following,
        }),
        RecordedEvent::ParamWritesCount { tick, count } => json!({
            "event": "ParamWrites",
            "tick": tick,
            "count": count,
        }),
    }
}

fn segment(id: Option<SegmentId>) -> Value {
    match id {
        Some(id) => json!({ "index": id.index(), "generation": id.generation() }),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recorder::RecorderSink;
    use tandem_core::assembly::PropagationCause;
    use tandem_core::error::FollowError;
    use tandem_core::trace::{DiagnosticEvent, PropagationEvent, TickSummary, TraceSink};

    #[test]
    fn export_produces_valid_json() {
        let root = SegmentId::new(1, 0);
        let mut rec = RecorderSink::new();
        rec.on_propagation(&PropagationEvent {
            tick: 2,
            root,
            cause: PropagationCause::Activate,
            incoming: None,
            visited: 3,
            leader_changes: 1,
        });
        rec.on_diagnostic(&DiagnosticEvent {
            tick: 2,
            segment: root,
            error: FollowError::TopologyCycle(root),
        });
        rec.on_tick_summary(&TickSummary {
            tick: 2,
            propagations: 1,
            ..TickSummary::default()
        });

        let mut out = Vec::new();
        export(rec.as_bytes(), &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();

        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert_eq!(parsed.len(), 3);

        assert_eq!(parsed[0]["event"], "Propagation");
        assert_eq!(parsed[0]["cause"], "Activate");
        assert_eq!(parsed[0]["root"]["index"], 1);
        assert!(parsed[0]["incoming"].is_null());

        assert_eq!(parsed[1]["event"], "Diagnostic");
        assert_eq!(parsed[1]["topology_error"], true);
        assert_eq!(parsed[1]["config_error"], false);

        assert_eq!(parsed[2]["event"], "TickSummary");
        assert_eq!(parsed[2]["propagations"], 1);
    }

    #[test]
    fn export_empty_recording() {
        let mut out = Vec::new();
        export(&[], &mut out).unwrap();
        let json_str = String::from_utf8(out).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&json_str).unwrap();
        assert!(parsed.is_empty());
    }
}

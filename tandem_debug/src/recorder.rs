// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as tagged little-endian records. [`decode`] reads them back as
//! an iterator of [`RecordedEvent`].
//!
//! [`on_param_writes`](TraceSink::on_param_writes) stores only the count.
//! Diagnostics keep their full error payload except the reason text of
//! [`FollowError::InvalidConfig`], which decodes as
//! [`UNRECORDED_REASON`].

use tandem_core::assembly::{PropagationCause, SegmentId};
use tandem_core::error::FollowError;
use tandem_core::joint::JointKind;
use tandem_core::trace::{
    DiagnosticEvent, LeaderChangeEvent, ParamWrite, PropagationEvent, TickSummary, ToggleEvent,
    TraceSink,
};

/// Reason reported for decoded configuration errors.
pub const UNRECORDED_REASON: &str = "reason not recorded";

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_PROPAGATION: u8 = 1;
const TAG_LEADER_CHANGE: u8 = 2;
const TAG_TOGGLE: u8 = 3;
const TAG_DIAGNOSTIC: u8 = 4;
const TAG_TICK_SUMMARY: u8 = 5;
const TAG_PARAM_WRITES_COUNT: u8 = 6;

// Error discriminants inside a diagnostic record.
const ERR_NO_FOLLOWER: u8 = 0;
const ERR_MISSING_ACTUATOR: u8 = 1;
const ERR_UNSUPPORTED_ACTUATOR: u8 = 2;
const ERR_DEGENERATE_RANGE: u8 = 3;
const ERR_TOPOLOGY_CYCLE: u8 = 4;
const ERR_DEPTH_EXCEEDED: u8 = 5;
const ERR_INVALID_CONFIG: u8 = 6;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Vec<u8>,
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_segment(&mut self, id: SegmentId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_segment(&mut self, id: Option<SegmentId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_segment(id);
            }
            None => {
                self.write_u8(0);
                self.write_u32(0);
                self.write_u32(0);
            }
        }
    }

    fn write_cause(&mut self, cause: PropagationCause) {
        self.write_u8(match cause {
            PropagationCause::Activate => 0,
            PropagationCause::Attach => 1,
            PropagationCause::Detach => 2,
            PropagationCause::Actuator => 3,
            PropagationCause::Capability => 4,
            PropagationCause::Toggle => 5,
        });
    }

    fn write_kind(&mut self, kind: JointKind) {
        self.write_u8(match kind {
            JointKind::Rotary => 0,
            JointKind::Continuous => 1,
            JointKind::Linear => 2,
        });
    }

    fn write_error(&mut self, error: &FollowError) {
        match *error {
            FollowError::NoFollower(segment) => {
                self.write_u8(ERR_NO_FOLLOWER);
                self.write_segment(segment);
            }
            FollowError::MissingActuator(segment) => {
                self.write_u8(ERR_MISSING_ACTUATOR);
                self.write_segment(segment);
            }
            FollowError::UnsupportedActuator { segment, kind } => {
                self.write_u8(ERR_UNSUPPORTED_ACTUATOR);
                self.write_segment(segment);
                self.write_kind(kind);
            }
            FollowError::DegenerateRange { segment, min, max } => {
                self.write_u8(ERR_DEGENERATE_RANGE);
                self.write_segment(segment);
                self.write_f64(min);
                self.write_f64(max);
            }
            FollowError::TopologyCycle(segment) => {
                self.write_u8(ERR_TOPOLOGY_CYCLE);
                self.write_segment(segment);
            }
            FollowError::DepthExceeded { segment, limit } => {
                self.write_u8(ERR_DEPTH_EXCEEDED);
                self.write_segment(segment);
                self.write_u32(limit);
            }
            FollowError::InvalidConfig { .. } => self.write_u8(ERR_INVALID_CONFIG),
        }
    }
}

impl TraceSink for RecorderSink {
    fn on_propagation(&mut self, e: &PropagationEvent) {
        self.write_u8(TAG_PROPAGATION);
        self.write_u64(e.tick);
        self.write_segment(e.root);
        self.write_cause(e.cause);
        self.write_option_segment(e.incoming);
        self.write_u32(e.visited);
        self.write_u32(e.leader_changes);
    }

    fn on_leader_change(&mut self, e: &LeaderChangeEvent) {
        self.write_u8(TAG_LEADER_CHANGE);
        self.write_u64(e.tick);
        self.write_segment(e.segment);
        self.write_option_segment(e.leader);
        self.write_bool(e.following);
    }

    fn on_toggle(&mut self, e: &ToggleEvent) {
        self.write_u8(TAG_TOGGLE);
        self.write_u64(e.tick);
        self.write_segment(e.segment);
        self.write_bool(e.enabled);
        self.write_bool(e.following);
        self.write_bool(e.counterpart);
    }

    fn on_diagnostic(&mut self, e: &DiagnosticEvent) {
        self.write_u8(TAG_DIAGNOSTIC);
        self.write_u64(e.tick);
        self.write_segment(e.segment);
        self.write_error(&e.error);
    }

    fn on_tick_summary(&mut self, s: &TickSummary) {
        self.write_u8(TAG_TICK_SUMMARY);
        self.write_u64(s.tick);
        self.write_u32(s.propagations);
        self.write_u32(s.segments_visited);
        self.write_u32(s.leader_changes);
        self.write_u32(s.toggles);
        self.write_u32(s.writes);
        self.write_u32(s.diagnostics);
        self.write_bool(s.topology_changed);
        self.write_u32(s.following);
    }

    fn on_param_writes(&mut self, tick: u64, writes: &[ParamWrite]) {
        self.write_u8(TAG_PARAM_WRITES_COUNT);
        self.write_u64(tick);
        self.write_u32(u32::try_from(writes.len()).unwrap_or(u32::MAX));
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`PropagationEvent`].
    Propagation(PropagationEvent),
    /// A [`LeaderChangeEvent`].
    LeaderChange(LeaderChangeEvent),
    /// A [`ToggleEvent`].
    Toggle(ToggleEvent),
    /// A [`DiagnosticEvent`].
    Diagnostic(DiagnosticEvent),
    /// A [`TickSummary`].
    TickSummary(TickSummary),
    /// Slaved-write count for a tick.
    ParamWritesCount {
        /// Host tick counter.
        tick: u64,
        /// Number of writes.
        count: u32,
    },
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take<const N: usize>(&mut self) -> Option<[u8; N]> {
        let bytes = self.data.get(self.pos..self.pos + N)?.try_into().ok()?;
        self.pos += N;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        self.take::<1>().map(|[v]| v)
    }

    fn read_bool(&mut self) -> Option<bool> {
        Some(self.read_u8()? != 0)
    }

    fn read_u32(&mut self) -> Option<u32> {
        self.take().map(u32::from_le_bytes)
    }

    fn read_u64(&mut self) -> Option<u64> {
        self.take().map(u64::from_le_bytes)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.take().map(f64::from_le_bytes)
    }

    fn read_segment(&mut self) -> Option<SegmentId> {
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(SegmentId::new(index, generation))
    }

    fn read_option_segment(&mut self) -> Option<Option<SegmentId>> {
        let present = self.read_u8()?;
        let id = self.read_segment()?;
        Some(if present != 0 { Some(id) } else { None })
    }

    fn read_cause(&mut self) -> Option<PropagationCause> {
        Some(match self.read_u8()? {
            0 => PropagationCause::Activate,
            1 => PropagationCause::Attach,
            2 => PropagationCause::Detach,
            3 => PropagationCause::Actuator,
            4 => PropagationCause::Capability,
            5 => PropagationCause::Toggle,
            _ => return None,
        })
    }

    fn read_kind(&mut self) -> Option<JointKind> {
        Some(match self.read_u8()? {
            0 => JointKind::Rotary,
            1 => JointKind::Continuous,
            2 => JointKind::Linear,
            _ => return None,
        })
    }

    fn read_error(&mut self) -> Option<FollowError> {
        Some(match self.read_u8()? {
            ERR_NO_FOLLOWER => FollowError::NoFollower(self.read_segment()?),
            ERR_MISSING_ACTUATOR => FollowError::MissingActuator(self.read_segment()?),
            ERR_UNSUPPORTED_ACTUATOR => FollowError::UnsupportedActuator {
                segment: self.read_segment()?,
                kind: self.read_kind()?,
            },
            ERR_DEGENERATE_RANGE => FollowError::DegenerateRange {
                segment: self.read_segment()?,
                min: self.read_f64()?,
                max: self.read_f64()?,
            },
            ERR_TOPOLOGY_CYCLE => FollowError::TopologyCycle(self.read_segment()?),
            ERR_DEPTH_EXCEEDED => FollowError::DepthExceeded {
                segment: self.read_segment()?,
                limit: self.read_u32()?,
            },
            ERR_INVALID_CONFIG => FollowError::InvalidConfig {
                reason: UNRECORDED_REASON,
            },
            _ => return None,
        })
    }

    fn decode_propagation(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Propagation(PropagationEvent {
            tick: self.read_u64()?,
            root: self.read_segment()?,
            cause: self.read_cause()?,
            incoming: self.read_option_segment()?,
            visited: self.read_u32()?,
            leader_changes: self.read_u32()?,
        }))
    }

    fn decode_leader_change(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::LeaderChange(LeaderChangeEvent {
            tick: self.read_u64()?,
            segment: self.read_segment()?,
            leader: self.read_option_segment()?,
            following: self.read_bool()?,
        }))
    }

    fn decode_toggle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Toggle(ToggleEvent {
            tick: self.read_u64()?,
            segment: self.read_segment()?,
            enabled: self.read_bool()?,
            following: self.read_bool()?,
            counterpart: self.read_bool()?,
        }))
    }

    fn decode_diagnostic(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Diagnostic(DiagnosticEvent {
            tick: self.read_u64()?,
            segment: self.read_segment()?,
            error: self.read_error()?,
        }))
    }

    fn decode_tick_summary(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::TickSummary(TickSummary {
            tick: self.read_u64()?,
            propagations: self.read_u32()?,
            segments_visited: self.read_u32()?,
            leader_changes: self.read_u32()?,
            toggles: self.read_u32()?,
            writes: self.read_u32()?,
            diagnostics: self.read_u32()?,
            topology_changed: self.read_bool()?,
            following: self.read_u32()?,
        }))
    }

    fn decode_param_writes_count(&mut self) -> Option<RecordedEvent> {
        let tick = self.read_u64()?;
        let count = self.read_u32()?;
        Some(RecordedEvent::ParamWritesCount { tick, count })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_PROPAGATION => self.decode_propagation(),
            TAG_LEADER_CHANGE => self.decode_leader_change(),
            TAG_TOGGLE => self.decode_toggle(),
            TAG_DIAGNOSTIC => self.decode_diagnostic(),
            TAG_TICK_SUMMARY => self.decode_tick_summary(),
            TAG_PARAM_WRITES_COUNT => self.decode_param_writes_count(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_core::follower::ParamKind;

    fn seg(index: u32) -> SegmentId {
        SegmentId::new(index, 2)
    }

    fn sample_summary() -> TickSummary {
        TickSummary {
            tick: 12,
            propagations: 2,
            segments_visited: 9,
            leader_changes: 3,
            toggles: 1,
            writes: 7,
            diagnostics: 1,
            topology_changed: true,
            following: 4,
        }
    }

    #[test]
    fn records_propagation_with_and_without_incoming() {
        let mut rec = RecorderSink::new();
        let with = PropagationEvent {
            tick: 4,
            root: seg(3),
            cause: PropagationCause::Toggle,
            incoming: Some(seg(1)),
            visited: 5,
            leader_changes: 2,
        };
        let without = PropagationEvent {
            incoming: None,
            cause: PropagationCause::Detach,
            ..with
        };
        rec.on_propagation(&with);
        rec.on_propagation(&without);

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(
            events,
            [RecordedEvent::Propagation(with), RecordedEvent::Propagation(without)]
        );
    }

    #[test]
    fn records_every_diagnostic_kind() {
        let errors = [
            FollowError::NoFollower(seg(0)),
            FollowError::MissingActuator(seg(1)),
            FollowError::UnsupportedActuator {
                segment: seg(2),
                kind: JointKind::Linear,
            },
            FollowError::DegenerateRange {
                segment: seg(3),
                min: 10.0,
                max: -10.0,
            },
            FollowError::TopologyCycle(seg(4)),
            FollowError::DepthExceeded {
                segment: seg(5),
                limit: 64,
            },
        ];
        let mut rec = RecorderSink::new();
        for (tick, error) in (0_u64..).zip(&errors) {
            rec.on_diagnostic(&DiagnosticEvent {
                tick,
                segment: seg(9),
                error: error.clone(),
            });
        }

        let decoded: Vec<_> = decode(rec.as_bytes())
            .map(|event| match event {
                RecordedEvent::Diagnostic(e) => e.error,
                other => panic!("expected Diagnostic, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, errors);
    }

    #[test]
    fn config_errors_lose_their_reason() {
        let mut rec = RecorderSink::new();
        rec.on_diagnostic(&DiagnosticEvent {
            tick: 0,
            segment: seg(0),
            error: FollowError::InvalidConfig {
                reason: "max_depth must be non-zero",
            },
        });
        let events: Vec<_> = decode(rec.as_bytes()).collect();
        match &events[..] {
            [RecordedEvent::Diagnostic(e)] => assert_eq!(
                e.error,
                FollowError::InvalidConfig {
                    reason: UNRECORDED_REASON
                }
            ),
            other => panic!("expected one Diagnostic, got {other:?}"),
        }
    }

    #[test]
    fn mixed_stream_keeps_order() {
        let mut rec = RecorderSink::new();
        rec.on_toggle(&ToggleEvent {
            tick: 12,
            segment: seg(1),
            enabled: true,
            following: true,
            counterpart: false,
        });
        rec.on_leader_change(&LeaderChangeEvent {
            tick: 12,
            segment: seg(1),
            leader: Some(seg(0)),
            following: true,
        });
        rec.on_param_writes(
            12,
            &[
                ParamWrite {
                    segment: seg(1),
                    kind: ParamKind::Angle,
                    value: 45.0,
                },
                ParamWrite {
                    segment: seg(1),
                    kind: ParamKind::Velocity,
                    value: 9.0,
                },
            ],
        );
        rec.on_tick_summary(&sample_summary());

        let events: Vec<_> = decode(rec.as_bytes()).collect();
        assert_eq!(events.len(), 4);
        assert!(matches!(events[0], RecordedEvent::Toggle(_)));
        assert!(matches!(events[1], RecordedEvent::LeaderChange(_)));
        assert_eq!(
            events[2],
            RecordedEvent::ParamWritesCount { tick: 12, count: 2 }
        );
        assert_eq!(events[3], RecordedEvent::TickSummary(sample_summary()));
    }

    #[test]
    fn truncated_record_stops_decoding() {
        let mut rec = RecorderSink::new();
        rec.on_tick_summary(&sample_summary());
        rec.on_tick_summary(&sample_summary());
        let bytes = rec.into_bytes();
        let cut = &bytes[..bytes.len() - 3];
        assert_eq!(decode(cut).count(), 1);
    }

    #[test]
    fn empty_buffer_decodes_to_nothing() {
        let events: Vec<_> = decode(&[]).collect();
        assert!(events.is_empty());
    }
}

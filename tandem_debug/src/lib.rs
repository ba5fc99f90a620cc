// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, JSON export, and tracing forwarding for
//! tandem diagnostics.
//!
//! This crate provides [`TraceSink`](tandem_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output.
//! - [`recorder::RecorderSink`]: compact binary recording with
//!   [`recorder::decode`] for playback.
//! - [`json::export`]: writes recorded bytes as a JSON array.
//! - [`tracing_sink::TracingSink`]: forwards events to [`tracing`].

pub mod json;
pub mod pretty;
pub mod recorder;
pub mod tracing_sink;

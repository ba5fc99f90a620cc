// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated tick loop that exercises leader propagation and the tracing
//! pipeline.
//!
//! Builds a small two-armed rig, sweeps the shoulder joint back and forth for
//! 60 ticks, and along the way toggles the symmetric elbows off and on,
//! locks the shoulder, and detaches and reattaches one arm. Events go to both
//! a [`PrettyPrintSink`](tandem_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](tandem_debug::recorder::RecorderSink); the recording is
//! exported as JSON at the end.

use std::fs::File;
use std::io::BufWriter;

use tandem_core::assembly::{Assembly, SegmentId, Symmetry, SymmetryGroup};
use tandem_core::joint::{Joint, ParamRange};
use tandem_core::trace::Tracer;
use tandem_debug::pretty::PrettyPrintSink;
use tandem_debug::recorder::RecorderSink;
use tandem_harness::{TrackingSample, TrackingTracker};

const TICK_COUNT: u64 = 60;
/// Ticks for one full sweep from one shoulder limit to the other.
const HALF_PERIOD: u64 = 15;

struct Rig {
    asm: Assembly,
    shoulder: SegmentId,
    left_elbow: SegmentId,
    right_elbow: SegmentId,
}

fn build_rig() -> Rig {
    let mut asm = Assembly::new();
    let base = asm.create_segment();
    let shoulder = asm.create_segment();
    let left_elbow = asm.create_segment();
    let left_wrist = asm.create_segment();
    let right_elbow = asm.create_segment();

    asm.set_joint(
        shoulder,
        Some(
            Joint::rotary(ParamRange::new(-45.0, 45.0))
                .with_angle(-45.0)
                .with_velocity(6.0),
        ),
    );
    for elbow in [left_elbow, right_elbow] {
        asm.set_joint(
            elbow,
            Some(
                Joint::rotary(ParamRange::new(0.0, 120.0))
                    .with_velocity_limits(ParamRange::new(0.5, 12.0)),
            ),
        );
        asm.add_follower(elbow, true);
        asm.set_symmetry_group(elbow, Some(SymmetryGroup(1)));
    }
    asm.set_joint(left_wrist, Some(Joint::rotary(ParamRange::new(-30.0, 30.0))));
    asm.add_follower(left_wrist, true);

    asm.attach(base, shoulder);
    asm.attach(shoulder, left_elbow);
    asm.attach(left_elbow, left_wrist);
    asm.attach(shoulder, right_elbow);
    asm.activate_all();

    Rig {
        asm,
        shoulder,
        left_elbow,
        right_elbow,
    }
}

/// Triangle wave across the shoulder's range.
fn sweep_angle(tick: u64) -> f64 {
    let phase = tick % (2 * HALF_PERIOD);
    let t = if phase < HALF_PERIOD {
        phase as f64 / HALF_PERIOD as f64
    } else {
        (2 * HALF_PERIOD - phase) as f64 / HALF_PERIOD as f64
    };
    -45.0 + 90.0 * t
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let mut pretty = PrettyPrintSink::new(Box::new(std::io::stdout()));
    let mut recorder = RecorderSink::new();

    // -- rig ---------------------------------------------------------------
    let Rig {
        mut asm,
        shoulder,
        left_elbow,
        right_elbow,
    } = build_rig();
    let mapper = asm.config().mapper();
    let mut tracking = TrackingTracker::<16>::new();

    // -- simulated loop ----------------------------------------------------
    for tick in 0..TICK_COUNT {
        match tick {
            20 => {
                // Both elbows stop following; the wrist now reports to the
                // left elbow's own motor.
                asm.set_follow_enabled(left_elbow, false, Symmetry::Counterparts)
                    .expect("left elbow has a follower");
            }
            28 => {
                asm.set_follow_enabled(right_elbow, true, Symmetry::Counterparts)
                    .expect("right elbow has a follower");
            }
            36 => asm.set_locked(shoulder, true),
            40 => asm.set_locked(shoulder, false),
            46 => asm.detach(right_elbow),
            50 => asm.attach(shoulder, right_elbow),
            _ => {}
        }

        asm.set_target_angle(shoulder, sweep_angle(tick));
        asm.update_all();
        let changes = asm.evaluate();

        Tracer::new(&mut pretty).follow_changes(tick, &asm, &changes);
        Tracer::new(&mut recorder).follow_changes(tick, &asm, &changes);

        if asm.is_following(right_elbow) {
            if let (Some(leader), Some(follower)) = (asm.joint(shoulder), asm.joint(right_elbow)) {
                let report = tracking.observe(TrackingSample::observe(&mapper, leader, follower));
                if tick % 10 == 9 {
                    println!(
                        "[tracking] tick={tick} grade={} mean={:.4} max={:.4} clamp={:.2} {}",
                        report.grade.as_str(),
                        report.mean_error,
                        report.max_error,
                        report.clamp_rate,
                        tracking.sparkline_ascii(0.05),
                    );
                }
            }
        }
    }

    println!(
        "roots={} following={}",
        asm.roots().len(),
        asm.following_count(),
    );

    // -- export JSON ---------------------------------------------------------
    let path = "sweep_trace.json";
    let file = File::create(path).expect("failed to create sweep_trace.json");
    let mut writer = BufWriter::new(file);
    tandem_debug::json::export(recorder.as_bytes(), &mut writer).expect("failed to write trace");

    println!("Wrote {path} ({TICK_COUNT} ticks)");
}

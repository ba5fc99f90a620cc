// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable tracking-quality metrics and grading for demo harnesses.
//!
//! A follower tracks well when its position inside its own range matches the
//! leader's position inside the leader's range. [`TrackingSample::observe`]
//! measures both fractions from live joints; [`TrackingTracker`] keeps a
//! rolling window of the resulting errors and grades it.

#![no_std]

extern crate alloc;

use alloc::string::String;
use tandem_core::joint::Joint;
use tandem_core::mapper::LinearMapper;

/// Per-tick tracking sample fed into [`TrackingTracker::observe`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackingSample {
    /// Leader angle as a fraction of the leader's range.
    pub leader_fraction: f64,
    /// Follower angle as a fraction of the follower's range.
    pub follower_fraction: f64,
    /// The follower's slaved velocity hit its velocity limits.
    pub velocity_clamped: bool,
}

impl TrackingSample {
    /// Measures a leader/follower pair.
    #[must_use]
    pub fn observe(mapper: &LinearMapper, leader: &Joint, follower: &Joint) -> Self {
        let limits = follower.velocity_limits;
        Self {
            leader_fraction: mapper.fraction(leader.target_angle, leader.angle_range),
            follower_fraction: mapper.fraction(follower.target_angle, follower.angle_range),
            velocity_clamped: follower.velocity <= limits.min || follower.velocity >= limits.max,
        }
    }

    /// Absolute fractional tracking error.
    #[must_use]
    pub fn error(&self) -> f64 {
        (self.leader_fraction - self.follower_fraction).abs()
    }
}

/// Letter grade for tracking quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackingGrade {
    /// Tight tracking and rare clamping.
    A,
    /// Good tracking with moderate clamping.
    B,
    /// Degraded but usable.
    C,
    /// Poor tracking.
    D,
}

impl TrackingGrade {
    /// Returns a short label for HUD rendering.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

/// Aggregated report returned by [`TrackingTracker::observe`].
#[derive(Clone, Copy, Debug)]
pub struct TrackingReport {
    /// Current grade.
    pub grade: TrackingGrade,
    /// Mean absolute error over the window.
    pub mean_error: f64,
    /// Largest absolute error over the window.
    pub max_error: f64,
    /// Fraction of all observed samples whose velocity was clamped.
    pub clamp_rate: f64,
    /// Total samples observed.
    pub total_samples: u64,
    /// Total clamped samples observed.
    pub clamped_samples: u64,
}

/// Rolling tracking-error tracker with a fixed-size window.
#[derive(Debug)]
pub struct TrackingTracker<const N: usize> {
    errors: [f64; N],
    cursor: usize,
    filled: usize,
    total_samples: u64,
    clamped_samples: u64,
}

impl<const N: usize> Default for TrackingTracker<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TrackingTracker<N> {
    /// Creates an empty tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            errors: [0.0; N],
            cursor: 0,
            filled: 0,
            total_samples: 0,
            clamped_samples: 0,
        }
    }

    /// Observes one sample and returns an updated report.
    #[must_use]
    pub fn observe(&mut self, sample: TrackingSample) -> TrackingReport {
        self.total_samples = self.total_samples.saturating_add(1);
        if sample.velocity_clamped {
            self.clamped_samples = self.clamped_samples.saturating_add(1);
        }
        if N > 0 {
            self.errors[self.cursor] = sample.error();
            self.cursor = (self.cursor + 1) % N;
            self.filled = (self.filled + 1).min(N);
        }

        let window = &self.errors[..self.filled];
        let (sum, max_error) = window
            .iter()
            .fold((0.0, 0.0_f64), |(sum, max), &e| (sum + e, max.max(e)));
        let mean_error = if window.is_empty() {
            0.0
        } else {
            sum / window.len() as f64
        };
        let clamp_rate = self.clamped_samples as f64 / self.total_samples as f64;

        TrackingReport {
            grade: grade_for(max_error, clamp_rate),
            mean_error,
            max_error,
            clamp_rate,
            total_samples: self.total_samples,
            clamped_samples: self.clamped_samples,
        }
    }

    /// Returns windowed errors oldest→newest.
    #[must_use]
    pub fn errors(&self) -> [f64; N] {
        let mut out = [0.0; N];
        let start = (self.cursor + N - self.filled) % N.max(1);
        let mut i = 0;
        while i < self.filled {
            out[i] = self.errors[(start + i) % N];
            i += 1;
        }
        out
    }

    /// Returns an ASCII sparkline over [`errors`](Self::errors), scaled to
    /// `max_error`.
    #[must_use]
    pub fn sparkline_ascii(&self, max_error: f64) -> String {
        const LEVELS: &[u8] = b" .:-=+*#%@";
        let errors = self.errors();
        let mut out = String::with_capacity(self.filled);
        for &e in &errors[..self.filled] {
            let t = if max_error > 0.0 {
                (e / max_error).clamp(0.0, 1.0)
            } else {
                0.0
            };
            #[expect(
                clippy::cast_possible_truncation,
                reason = "index is clamped to ASCII level count"
            )]
            let level = (t * (LEVELS.len() as f64 - 1.0) + 0.5) as usize;
            out.push(LEVELS[level] as char);
        }
        out
    }
}

fn grade_for(max_error: f64, clamp_rate: f64) -> TrackingGrade {
    if max_error < 0.01 && clamp_rate < 0.05 {
        TrackingGrade::A
    } else if max_error < 0.05 && clamp_rate < 0.2 {
        TrackingGrade::B
    } else if max_error < 0.15 && clamp_rate < 0.5 {
        TrackingGrade::C
    } else {
        TrackingGrade::D
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tandem_core::joint::ParamRange;

    fn sample(leader: f64, follower: f64, clamped: bool) -> TrackingSample {
        TrackingSample {
            leader_fraction: leader,
            follower_fraction: follower,
            velocity_clamped: clamped,
        }
    }

    #[test]
    fn perfect_tracking_grades_a() {
        let mut t = TrackingTracker::<4>::new();
        let mut report = t.observe(sample(0.5, 0.5, false));
        for _ in 0..10 {
            report = t.observe(sample(0.25, 0.25, false));
        }
        assert_eq!(report.grade, TrackingGrade::A);
        assert_relative_eq!(report.max_error, 0.0);
        assert_eq!(report.total_samples, 11);
    }

    #[test]
    fn window_forgets_old_errors() {
        let mut t = TrackingTracker::<3>::new();
        let mut report = t.observe(sample(0.0, 0.3, false));
        assert_eq!(report.grade, TrackingGrade::D);
        for _ in 0..3 {
            report = t.observe(sample(0.5, 0.52, false));
        }
        assert_relative_eq!(report.max_error, 0.02, epsilon = 1e-12);
        assert_relative_eq!(report.mean_error, 0.02, epsilon = 1e-12);
        assert_eq!(report.grade, TrackingGrade::B);
    }

    #[test]
    fn clamp_rate_accumulates_over_all_samples() {
        let mut t = TrackingTracker::<2>::new();
        let mut report = t.observe(sample(0.0, 0.0, true));
        for i in 0..9 {
            report = t.observe(sample(0.0, 0.0, i < 1));
        }
        assert_eq!(report.clamped_samples, 2);
        assert_relative_eq!(report.clamp_rate, 0.2);
        assert_eq!(report.grade, TrackingGrade::C);
    }

    #[test]
    fn errors_are_oldest_first() {
        let mut t = TrackingTracker::<3>::new();
        for e in [0.1, 0.2, 0.3, 0.4] {
            let _ = t.observe(sample(0.0, e, false));
        }
        let errors = t.errors();
        assert_relative_eq!(errors[0], 0.2);
        assert_relative_eq!(errors[1], 0.3);
        assert_relative_eq!(errors[2], 0.4);
        assert_eq!(t.sparkline_ascii(0.4), "+#@");
    }

    #[test]
    fn observe_measures_live_joints() {
        let mapper = LinearMapper::default();
        let leader = Joint::rotary(ParamRange::new(-10.0, 10.0)).with_angle(5.0);
        let follower = Joint::rotary(ParamRange::new(0.0, 90.0)).with_angle(67.5);
        let s = TrackingSample::observe(&mapper, &leader, &follower);
        assert_relative_eq!(s.leader_fraction, 0.75);
        assert_relative_eq!(s.follower_fraction, 0.75);
        assert_relative_eq!(s.error(), 0.0);
    }
}

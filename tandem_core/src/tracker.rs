// Copyright 2026 the Tandem Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value debouncing.

/// Remembers the last observed value and reports only real changes.
///
/// The first observation after construction or [`reset`](Self::reset) always
/// counts as a change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChangeTracker<T> {
    last: Option<T>,
}

impl<T: Copy + PartialEq> ChangeTracker<T> {
    /// Creates a tracker that has observed nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Records `value`, returning whether it differs from the previous one.
    pub fn observe(&mut self, value: T) -> bool {
        if self.last == Some(value) {
            return false;
        }
        self.last = Some(value);
        true
    }

    /// Records `value` and invokes `on_change` if it differs from the
    /// previous one.
    pub fn update(&mut self, value: T, on_change: impl FnOnce(T)) {
        if self.observe(value) {
            on_change(value);
        }
    }

    /// Forgets the last observed value.
    pub fn reset(&mut self) {
        self.last = None;
    }

    /// Returns the last observed value.
    #[must_use]
    pub const fn last(&self) -> Option<T> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_value_always_fires() {
        let mut tracker = ChangeTracker::new();
        let mut fired = 0;
        tracker.update(0.0_f64, |_| fired += 1);
        assert_eq!(fired, 1);
    }

    #[test]
    fn repeated_value_does_not_fire() {
        let mut tracker = ChangeTracker::new();
        let mut fired = 0;
        tracker.update(3_i32, |_| fired += 1);
        tracker.update(3, |_| fired += 1);
        tracker.update(3, |_| fired += 1);
        assert_eq!(fired, 1);
    }

    #[test]
    fn different_value_fires_with_new_value() {
        let mut tracker = ChangeTracker::new();
        let mut seen = alloc::vec::Vec::new();
        tracker.update(true, |v| seen.push(v));
        tracker.update(false, |v| seen.push(v));
        tracker.update(false, |v| seen.push(v));
        tracker.update(true, |v| seen.push(v));
        assert_eq!(seen, [true, false, true]);
    }

    #[test]
    fn reset_forces_refire() {
        let mut tracker = ChangeTracker::new();
        assert!(tracker.observe(1.5_f64));
        assert!(!tracker.observe(1.5));
        tracker.reset();
        assert_eq!(tracker.last(), None);
        assert!(tracker.observe(1.5));
    }
}

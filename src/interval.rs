// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A closed interval of real numbers.

use core::ops::Range;

use crate::common::lerp;

/// A closed interval `[min, max]`.
///
/// The ends are kept ordered; constructors swap them if needed.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interval {
    min: f64,
    max: f64,
}

impl Interval {
    /// The unit interval `[0, 1]`.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Create an interval from two ends in any order.
    #[inline]
    pub fn new(a: f64, b: f64) -> Interval {
        if a <= b {
            Interval { min: a, max: b }
        } else {
            Interval { min: b, max: a }
        }
    }

    /// An interval containing the single value `v`.
    #[inline]
    pub const fn from_value(v: f64) -> Interval {
        Interval { min: v, max: v }
    }

    /// The lower end.
    #[inline]
    pub fn min(self) -> f64 {
        self.min
    }

    /// The upper end.
    #[inline]
    pub fn max(self) -> f64 {
        self.max
    }

    /// Length of the interval.
    #[inline]
    pub fn extent(self) -> f64 {
        self.max - self.min
    }

    /// The midpoint.
    #[inline]
    pub fn middle(self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Whether the interval contains a single value.
    #[inline]
    pub fn is_singular(self) -> bool {
        self.min == self.max
    }

    /// The value at parameter `t`, with `min` at 0 and `max` at 1.
    #[inline]
    pub fn value_at(self, t: f64) -> f64 {
        lerp(t, self.min, self.max)
    }

    /// Whether `v` lies in `[min, max]`.
    #[inline]
    pub fn contains(self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }

    /// Whether `v` lies in the half-open range `[min, max)`.
    #[inline]
    pub fn lower_contains(self, v: f64) -> bool {
        self.min <= v && v < self.max
    }

    /// Whether the two closed intervals share at least one value.
    #[inline]
    pub fn intersects(self, other: Interval) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    /// Grow the interval so that it contains `v`.
    #[inline]
    pub fn expand_to(&mut self, v: f64) {
        if v < self.min {
            self.min = v;
        }
        if v > self.max {
            self.max = v;
        }
    }

    /// The smallest interval containing both.
    #[inline]
    pub fn union(self, other: Interval) -> Interval {
        Interval {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Replace the ends, reordering them if needed.
    #[inline]
    pub fn set_ends(&mut self, a: f64, b: f64) {
        *self = Interval::new(a, b);
    }

    /// Narrow this interval to the sub-range `inner`, expressed in this
    /// interval's own `[0, 1]` parameter space.
    #[inline]
    pub fn map_to(&mut self, inner: Interval) {
        let (a, b) = (self.value_at(inner.min), self.value_at(inner.max));
        self.set_ends(a, b);
    }

    /// The interval as a range.
    #[inline]
    pub fn to_range(self) -> Range<f64> {
        self.min..self.max
    }
}

impl From<Range<f64>> for Interval {
    #[inline]
    fn from(r: Range<f64>) -> Interval {
        Interval::new(r.start, r.end)
    }
}

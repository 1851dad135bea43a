// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Positions and ranges on a path, and intersection records.

use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use kurbo::Point;

use crate::common::{lerp, EPSILON};

/// A position on a path: a curve index and a time on that curve.
///
/// Times are ordered by curve index first, then by `t`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathTime {
    /// Index of the curve within the path.
    pub curve_index: usize,
    /// Time on the curve, in `[0, 1]`.
    pub t: f64,
}

impl PathTime {
    /// Create a new path time.
    #[inline]
    pub const fn new(curve_index: usize, t: f64) -> PathTime {
        PathTime { curve_index, t }
    }

    /// The time as a single number, `curve_index + t`.
    #[inline]
    pub fn as_flat_time(self) -> f64 {
        self.curve_index as f64 + self.t
    }

    /// Move an end-of-curve time to the start of the following curve.
    pub fn normalize_forward(&mut self, path_size: usize) {
        if self.t >= 1.0 {
            self.curve_index = (self.curve_index + 1) % path_size;
            self.t = 0.0;
        }
    }

    /// Move a start-of-curve time to the end of the preceding curve.
    pub fn normalize_backward(&mut self, path_size: usize) {
        if self.t <= 0.0 {
            self.curve_index = (self.curve_index + path_size - 1) % path_size;
            self.t = 1.0;
        }
    }
}

impl PartialOrd for PathTime {
    fn partial_cmp(&self, other: &PathTime) -> Option<Ordering> {
        match self.curve_index.cmp(&other.curve_index) {
            Ordering::Equal => self.t.partial_cmp(&other.t),
            ord => Some(ord),
        }
    }
}

impl fmt::Display for PathTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.curve_index)?;
        fmt::Display::fmt(&self.t, f)
    }
}

/// A contiguous range of a path between two [`PathTime`]s.
///
/// The range may run backwards, and on closed paths it may wrap around
/// through the start of the path. The ends are normalized on construction
/// so that the range never starts at the end of a curve or ends at the
/// start of one.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathInterval {
    from: PathTime,
    to: PathTime,
    path_size: usize,
    cross_start: bool,
    reverse: bool,
}

impl Default for PathInterval {
    /// An empty interval at the start of a path of size 1.
    fn default() -> PathInterval {
        PathInterval {
            from: PathTime::new(0, 0.0),
            to: PathTime::new(0, 0.0),
            path_size: 1,
            cross_start: false,
            reverse: false,
        }
    }
}

impl PathInterval {
    /// Create an interval from `from` to `to` on a path with `path_size` curves.
    ///
    /// `cross_start` selects the range that passes through the start of the
    /// path. The direction follows from the order of the ends: without
    /// crossing the start, `to < from` runs backwards; when crossing it,
    /// `to >= from` does.
    pub fn new(from: PathTime, to: PathTime, cross_start: bool, path_size: usize) -> PathInterval {
        debug_assert!(path_size > 0);
        let reverse = if cross_start { to >= from } else { to < from };
        let mut ival = PathInterval {
            from,
            to,
            path_size,
            cross_start,
            reverse,
        };
        ival.normalize_ends(reverse);
        if ival.from == ival.to {
            ival.reverse = false;
            ival.cross_start = false;
        }
        ival
    }

    /// Create an interval with an explicit direction.
    ///
    /// Whether the range crosses the start follows from the ends and the
    /// direction.
    pub fn from_direction(
        from: PathTime,
        to: PathTime,
        reversed: bool,
        path_size: usize,
    ) -> PathInterval {
        debug_assert!(path_size > 0);
        let mut ival = PathInterval {
            from,
            to,
            path_size,
            cross_start: false,
            reverse: false,
        };
        ival.normalize_ends(reversed);
        if ival.from != ival.to {
            ival.reverse = reversed;
            ival.cross_start = if reversed { from < to } else { to < from };
        }
        ival
    }

    fn normalize_ends(&mut self, reverse: bool) {
        if reverse {
            self.to.normalize_forward(self.path_size);
            if self.from != self.to {
                self.from.normalize_backward(self.path_size);
            }
        } else {
            self.from.normalize_forward(self.path_size);
            if self.from != self.to {
                self.to.normalize_backward(self.path_size);
            }
        }
    }

    /// The start of the range.
    #[inline]
    pub fn from(&self) -> PathTime {
        self.from
    }

    /// The end of the range.
    #[inline]
    pub fn to(&self) -> PathTime {
        self.to
    }

    /// Number of curves of the path this interval was built for.
    #[inline]
    pub fn path_size(&self) -> usize {
        self.path_size
    }

    /// Whether the range runs towards decreasing times.
    #[inline]
    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    /// Whether the range passes through the start of the path.
    #[inline]
    pub fn crosses_start(&self) -> bool {
        self.cross_start
    }

    /// Whether the range is a single point.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.from == self.to
    }

    /// The time at the start of the range.
    #[inline]
    pub fn initial_time(&self) -> PathTime {
        self.from
    }

    /// The time at the end of the range.
    #[inline]
    pub fn final_time(&self) -> PathTime {
        self.to
    }

    /// Whether `pos` lies in the range, ends included.
    pub fn contains(&self, pos: PathTime) -> bool {
        match (self.cross_start, self.reverse) {
            (true, true) => pos >= self.to || self.from >= pos,
            (true, false) => pos >= self.from || self.to >= pos,
            (false, true) => self.to <= pos && pos <= self.from,
            (false, false) => self.from <= pos && pos <= self.to,
        }
    }

    /// Number of curves touched by the range.
    pub fn curve_count(&self) -> usize {
        if self.is_degenerate() {
            return 0;
        }
        let (from, to) = (self.from.curve_index, self.to.curve_index);
        match (self.cross_start, self.reverse) {
            (true, true) => self.path_size - to + from + 1,
            (true, false) => self.path_size - from + to + 1,
            (false, true) => from - to + 1,
            (false, false) => to - from + 1,
        }
    }

    /// A time strictly inside the range.
    ///
    /// A node further than `min_dist` from both ends is preferred. Otherwise
    /// the middle of the single spanned curve boundary is returned.
    pub fn inside(&self, min_dist: f64) -> PathTime {
        let (from, to, size) = (self.from, self.to, self.path_size);
        if !self.cross_start && from.curve_index == to.curve_index {
            return PathTime::new(from.curve_index, lerp(0.5, from.t, to.t));
        }

        let mut result = PathTime::new(0, 0.0);
        if self.reverse {
            let mut dcurve = (size + from.curve_index - to.curve_index) % size;
            let from_close = from.t < min_dist;
            let to_close = to.t > 1.0 - min_dist;
            if dcurve == 0 {
                dcurve = size;
            }
            if dcurve == 1 {
                result.curve_index = from.curve_index;
                if from_close || to_close {
                    let mut tmid = from.t - ((1.0 - to.t) + from.t) * 0.5;
                    if tmid < 0.0 {
                        result.curve_index = (size + result.curve_index - 1) % size;
                        tmid += 1.0;
                    }
                    result.t = tmid;
                }
                return result;
            }
            result.curve_index = (to.curve_index + 1) % size;
            if to_close {
                if dcurve == 2 {
                    result.t = 0.5;
                } else {
                    result.curve_index = (result.curve_index + 1) % size;
                }
            }
        } else {
            let mut dcurve = (size + to.curve_index - from.curve_index) % size;
            let from_close = from.t > 1.0 - min_dist;
            let to_close = to.t < min_dist;
            if dcurve == 0 {
                dcurve = size;
            }
            if dcurve == 1 {
                if from_close || to_close {
                    result.curve_index = from.curve_index;
                    let mut tmid = ((1.0 - from.t) + to.t) * 0.5 + from.t;
                    if tmid >= 1.0 {
                        result.curve_index = (result.curve_index + 1) % size;
                        tmid -= 1.0;
                    }
                    result.t = tmid;
                } else {
                    result.curve_index = to.curve_index;
                }
                return result;
            }
            result.curve_index = (from.curve_index + 1) % size;
            if from_close {
                if dcurve == 2 {
                    result.t = 0.5;
                } else {
                    result.curve_index = (result.curve_index + 1) % size;
                }
            }
        }
        result
    }

    /// [`inside`](Self::inside) with the default minimum distance.
    pub fn inside_default(&self) -> PathTime {
        self.inside(EPSILON)
    }
}

/// An intersection between two parametric objects.
///
/// `first` and `second` are the times on the two objects, and `point` is a
/// representative point of the intersection. Intersections compare and sort
/// by `first`, then `second`; the point does not take part.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intersection<T> {
    /// Time on the first object.
    pub first: T,
    /// Time on the second object.
    pub second: T,
    /// The intersection point.
    pub point: Point,
}

/// An intersection between two curves, in curve-local times.
pub type CurveIntersection = Intersection<f64>;

/// An intersection between two paths.
pub type PathIntersection = Intersection<PathTime>;

impl<T> Intersection<T> {
    /// Create a new intersection record.
    #[inline]
    pub fn new(first: T, second: T, point: Point) -> Intersection<T> {
        Intersection {
            first,
            second,
            point,
        }
    }

    /// The same intersection seen from the other object.
    #[inline]
    pub fn swapped(self) -> Intersection<T> {
        Intersection {
            first: self.second,
            second: self.first,
            point: self.point,
        }
    }
}

impl<T: PartialEq> PartialEq for Intersection<T> {
    fn eq(&self, other: &Intersection<T>) -> bool {
        self.first == other.first && self.second == other.second
    }
}

impl<T: PartialOrd> PartialOrd for Intersection<T> {
    fn partial_cmp(&self, other: &Intersection<T>) -> Option<Ordering> {
        match self.first.partial_cmp(&other.first)? {
            Ordering::Equal => self.second.partial_cmp(&other.second),
            ord => Some(ord),
        }
    }
}

/// Sort intersections and remove exact duplicates.
pub(crate) fn sort_and_dedup<T: PartialOrd>(xs: &mut Vec<Intersection<T>>) {
    xs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    xs.dedup();
}

// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by path operations.

use core::fmt;

use kurbo::Point;

/// An error which can be returned by a [`Path`](crate::Path) operation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum PathError {
    /// An edit would leave two consecutive curves disconnected.
    ///
    /// Raised only when stitching is disabled, which is the default.
    Continuity {
        /// Final point of the earlier curve.
        at: Point,
        /// Initial point of the curve that should follow it.
        next: Point,
    },
    /// A flat path time lies outside of `[0, max]`.
    TimeOutOfRange {
        /// The offending time.
        time: f64,
        /// The largest valid time.
        max: f64,
    },
    /// A `[from, to]` range reaches outside of `[0, max]`.
    IntervalOutOfRange {
        /// Start of the requested range.
        from: f64,
        /// End of the requested range.
        to: f64,
        /// The largest valid time.
        max: f64,
    },
    /// A curve index or index range does not address curves of the path.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of addressable positions.
        len: usize,
    },
    /// A [`PathInterval`](crate::PathInterval) was built for a path of another size.
    PathSizeMismatch {
        /// Path size recorded in the interval.
        interval: usize,
        /// Closed size of the path it was applied to.
        path: usize,
    },
    /// The operation needs at least one curve besides the closing segment.
    EmptyPath,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Continuity { at, next } => write!(
                f,
                "path continuity broken: segment ends at ({}, {}) but the next starts at ({}, {})",
                at.x, at.y, next.x, next.y
            ),
            PathError::TimeOutOfRange { time, max } => {
                write!(f, "path time {time} out of bounds [0, {max}]")
            }
            PathError::IntervalOutOfRange { from, to, max } => {
                write!(f, "interval [{from}, {to}] out of bounds [0, {max}]")
            }
            PathError::IndexOutOfRange { index, len } => {
                write!(f, "curve index {index} out of range for {len} positions")
            }
            PathError::PathSizeMismatch { interval, path } => write!(
                f,
                "interval built for a path of size {interval}, applied to a path of size {path}"
            ),
            PathError::EmptyPath => write!(f, "path contains not enough segments"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PathError {}

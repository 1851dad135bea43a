// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Rect};

use crate::Interval;

/// An axis in the plane.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// The x axis.
    Horizontal,
    /// The y axis.
    Vertical,
}

impl Axis {
    /// The coordinate of `p` along this axis.
    #[inline]
    pub fn coord(self, p: Point) -> f64 {
        match self {
            Self::Horizontal => p.x,
            Self::Vertical => p.y,
        }
    }

    /// The projection of `rect` onto this axis.
    #[inline]
    pub fn interval(self, rect: Rect) -> Interval {
        match self {
            Self::Horizontal => Interval::new(rect.x0, rect.x1),
            Self::Vertical => Interval::new(rect.y0, rect.y1),
        }
    }
}

// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Convex hulls of point sets.

use alloc::vec::Vec;
use core::ops::Index;

use kurbo::{Point, Rect};

/// The convex hull of a set of points.
///
/// The boundary is stored as a polygon without repeated vertices: first the
/// upper chain from the leftmost to the rightmost point, then the lower chain
/// back towards the start. Every turn along the boundary has a positive cross
/// product. Collinear and duplicate points are dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvexHull {
    boundary: Vec<Point>,
    // Index one past the rightmost vertex, where the lower chain begins.
    lower: usize,
}

impl ConvexHull {
    /// Compute the convex hull of the given points.
    pub fn new(points: impl IntoIterator<Item = Point>) -> ConvexHull {
        let mut boundary: Vec<Point> = points.into_iter().collect();
        boundary.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        let mut hull = ConvexHull { boundary, lower: 0 };
        hull.construct();
        hull
    }

    // Monotone chain over lexicographically sorted points.
    fn construct(&mut self) {
        let b = &mut self.boundary;
        if b.is_empty() {
            self.lower = 0;
            return;
        }
        if b.len() == 1 || (b.len() == 2 && b[0] == b[1]) {
            b.truncate(1);
            self.lower = 1;
            return;
        }
        if b.len() == 2 {
            self.lower = 2;
            return;
        }

        let mut k = 2;
        for i in 2..b.len() {
            while k >= 2 && !is_clockwise_turn(b[k - 2], b[k - 1], b[i]) {
                k -= 1;
            }
            b.swap(k, i);
            k += 1;
        }

        self.lower = k;
        b[k..].sort_by(|p, q| q.x.total_cmp(&p.x).then(q.y.total_cmp(&p.y)));
        b.push(b[0]);
        for i in self.lower..b.len() {
            while k > self.lower && !is_clockwise_turn(b[k - 2], b[k - 1], b[i]) {
                k -= 1;
            }
            b.swap(k, i);
            k += 1;
        }
        b.truncate(k - 1);
    }

    /// The hull vertices.
    #[inline]
    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    /// Number of hull vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.boundary.len()
    }

    /// Whether the hull has no vertices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boundary.is_empty()
    }

    /// The first vertex, which is the leftmost point.
    #[inline]
    pub fn front(&self) -> Option<Point> {
        self.boundary.first().copied()
    }

    /// The last vertex.
    #[inline]
    pub fn back(&self) -> Option<Point> {
        self.boundary.last().copied()
    }

    /// Vertices of the upper chain, from left to right.
    pub fn upper_hull(&self) -> &[Point] {
        &self.boundary[..self.lower]
    }

    /// Vertices of the lower chain, from right to left, ending at the leftmost point.
    pub fn lower_hull(&self) -> impl Iterator<Item = Point> + '_ {
        let start = self.lower.saturating_sub(1);
        self.boundary[start..]
            .iter()
            .copied()
            .chain(self.boundary.first().copied())
    }

    /// The axis-aligned bounding box of the hull.
    pub fn bounds(&self) -> Option<Rect> {
        let first = *self.boundary.first()?;
        Some(
            self.boundary
                .iter()
                .fold(Rect::from_points(first, first), |r, p| r.union_pt(*p)),
        )
    }

    /// The enclosed area.
    pub fn area(&self) -> f64 {
        if self.len() <= 2 {
            return 0.0;
        }
        let n = self.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let (a, b) = (self.boundary[i], self.boundary[(i + 1) % n]);
                a.to_vec2().cross(b.to_vec2())
            })
            .sum();
        twice.abs() * 0.5
    }

    /// Whether `p` lies inside the hull or on its boundary.
    pub fn contains(&self, p: Point) -> bool {
        match self.boundary.len() {
            0 => false,
            1 => self.boundary[0] == p,
            n => (0..n).all(|i| {
                let a = self.boundary[i];
                let b = self.boundary[(i + 1) % n];
                let c = (b - a).cross(p - a);
                if n == 2 {
                    c == 0.0 && (p - a).dot(p - b) <= 0.0
                } else {
                    c >= 0.0
                }
            }),
        }
    }
}

impl Index<usize> for ConvexHull {
    type Output = Point;

    fn index(&self, index: usize) -> &Point {
        &self.boundary[index]
    }
}

#[inline]
fn is_clockwise_turn(a: Point, b: Point, c: Point) -> bool {
    if b == c {
        return false;
    }
    (b - a).cross(c - a) > 0.0
}

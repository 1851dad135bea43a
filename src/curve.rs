// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The curve segments a path is made of.

use alloc::vec::Vec;

use arrayvec::ArrayVec;
use kurbo::common::{solve_cubic, solve_quadratic};
use kurbo::{
    Affine, CubicBez, Line, Nearest, ParamCurve, ParamCurveDeriv, ParamCurveExtrema,
    ParamCurveNearest, Point, QuadBez, Rect, Vec2,
};
use smallvec::SmallVec;

use crate::bezier_clipping::find_intersections_bezier_clipping;
use crate::common::are_near_points;
use crate::{Axis, CurveIntersection, EllipticalArc};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Accuracy used for nearest point searches on Bézier curves.
const NEAREST_ACCURACY: f64 = 1e-9;

// Slack when accepting parameters just outside of `[0, 1]`.
const T_EPSILON: f64 = 1e-12;

// Intersections closer than this in both parameters are merged.
const DEDUP_EPSILON: f64 = 1e-6;

/// A single segment of a [`Path`](crate::Path).
///
/// The `Closing` and `Stitch` variants are straight segments with a role in
/// the path: the closing segment always sits in the last slot and joins the
/// end of the path to its start, and stitch segments are inserted to repair
/// gaps when a path is edited with stitching enabled.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Curve {
    /// A straight line.
    Line(Line),
    /// A quadratic Bézier.
    Quad(QuadBez),
    /// A cubic Bézier.
    Cubic(CubicBez),
    /// An elliptical arc.
    Arc(EllipticalArc),
    /// The segment closing a path.
    Closing(Line),
    /// A segment repairing a discontinuity.
    Stitch(Line),
}

impl Curve {
    /// The start point.
    pub fn initial_point(&self) -> Point {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p0,
            Curve::Quad(q) => q.p0,
            Curve::Cubic(c) => c.p0,
            Curve::Arc(a) => a.initial_point(),
        }
    }

    /// The end point.
    pub fn final_point(&self) -> Point {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p1,
            Curve::Quad(q) => q.p2,
            Curve::Cubic(c) => c.p3,
            Curve::Arc(a) => a.final_point(),
        }
    }

    /// Evaluate the curve at parameter `t`.
    ///
    /// The end points are returned exactly at `t == 0` and `t == 1`.
    pub fn point_at(&self, t: f64) -> Point {
        if t == 0.0 {
            return self.initial_point();
        }
        if t == 1.0 {
            return self.final_point();
        }
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.eval(t),
            Curve::Quad(q) => q.eval(t),
            Curve::Cubic(c) => c.eval(t),
            Curve::Arc(a) => a.eval(t),
        }
    }

    /// The derivative with respect to `t`.
    pub fn deriv_at(&self, t: f64) -> Vec2 {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p1 - l.p0,
            Curve::Quad(q) => q.deriv().eval(t).to_vec2(),
            Curve::Cubic(c) => c.deriv().eval(t).to_vec2(),
            Curve::Arc(a) => a.deriv_at(t),
        }
    }

    /// A single coordinate of [`point_at`](Self::point_at).
    #[inline]
    pub fn value_at(&self, t: f64, axis: Axis) -> f64 {
        axis.coord(self.point_at(t))
    }

    /// A cheap bounding box that contains the curve.
    ///
    /// For Béziers this is the box of the control points.
    pub fn bounds_fast(&self) -> Rect {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => Rect::from_points(l.p0, l.p1),
            Curve::Quad(q) => Rect::from_points(q.p0, q.p2).union_pt(q.p1),
            Curve::Cubic(c) => Rect::from_points(c.p0, c.p3)
                .union_pt(c.p1)
                .union_pt(c.p2),
            Curve::Arc(a) => a.bounding_box(),
        }
    }

    /// The tight bounding box.
    pub fn bounds_exact(&self) -> Rect {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => Rect::from_points(l.p0, l.p1),
            Curve::Quad(q) => q.bounding_box(),
            Curve::Cubic(c) => c.bounding_box(),
            Curve::Arc(a) => a.bounding_box(),
        }
    }

    /// Whether the curve collapses to a single point.
    pub fn is_degenerate(&self) -> bool {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p0 == l.p1,
            Curve::Quad(q) => q.p0 == q.p1 && q.p1 == q.p2,
            Curve::Cubic(c) => c.p0 == c.p1 && c.p1 == c.p2 && c.p2 == c.p3,
            Curve::Arc(a) => a.is_degenerate(),
        }
    }

    /// Whether the curve is a straight segment by construction.
    #[inline]
    pub fn is_line_segment(&self) -> bool {
        matches!(self, Curve::Line(_) | Curve::Closing(_) | Curve::Stitch(_))
    }

    /// Whether this is a closing segment.
    #[inline]
    pub fn is_closing(&self) -> bool {
        matches!(self, Curve::Closing(_))
    }

    /// Whether this is a stitch segment.
    #[inline]
    pub fn is_stitch(&self) -> bool {
        matches!(self, Curve::Stitch(_))
    }

    /// A closing segment leaving its slot becomes a plain line.
    pub(crate) fn into_segment(self) -> Curve {
        match self {
            Curve::Closing(l) => Curve::Line(l),
            c => c,
        }
    }

    /// The part of the curve between `from` and `to`.
    ///
    /// The result is reversed when `from > to`. Its end points are exactly
    /// `point_at(from)` and `point_at(to)`. Closing and stitch segments yield
    /// plain lines.
    pub fn portion(&self, from: f64, to: f64) -> Curve {
        if from == 0.0 && to == 1.0 {
            return self.without_role();
        }
        if from == 1.0 && to == 0.0 {
            return self.reverse().without_role();
        }
        let p0 = self.point_at(from);
        let p1 = self.point_at(to);
        match self {
            Curve::Line(_) | Curve::Closing(_) | Curve::Stitch(_) => Curve::Line(Line::new(p0, p1)),
            Curve::Quad(q) => {
                let mut sub = q.subsegment(from..to);
                sub.p0 = p0;
                sub.p2 = p1;
                Curve::Quad(sub)
            }
            Curve::Cubic(c) => {
                let mut sub = c.subsegment(from..to);
                sub.p0 = p0;
                sub.p3 = p1;
                Curve::Cubic(sub)
            }
            Curve::Arc(a) => Curve::Arc(a.portion(from, to)),
        }
    }

    fn without_role(self) -> Curve {
        match self {
            Curve::Closing(l) | Curve::Stitch(l) => Curve::Line(l),
            c => c,
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reverse(&self) -> Curve {
        match self {
            Curve::Line(l) => Curve::Line(Line::new(l.p1, l.p0)),
            Curve::Closing(l) => Curve::Closing(Line::new(l.p1, l.p0)),
            Curve::Stitch(l) => Curve::Stitch(Line::new(l.p1, l.p0)),
            Curve::Quad(q) => Curve::Quad(QuadBez::new(q.p2, q.p1, q.p0)),
            Curve::Cubic(c) => Curve::Cubic(CubicBez::new(c.p3, c.p2, c.p1, c.p0)),
            Curve::Arc(a) => Curve::Arc(a.reverse()),
        }
    }

    /// The image of the curve under an affine map.
    pub fn transform(&self, affine: Affine) -> Curve {
        let line = |l: &Line| Line::new(affine * l.p0, affine * l.p1);
        match self {
            Curve::Line(l) => Curve::Line(line(l)),
            Curve::Closing(l) => Curve::Closing(line(l)),
            Curve::Stitch(l) => Curve::Stitch(line(l)),
            Curve::Quad(q) => {
                Curve::Quad(QuadBez::new(affine * q.p0, affine * q.p1, affine * q.p2))
            }
            Curve::Cubic(c) => Curve::Cubic(CubicBez::new(
                affine * c.p0,
                affine * c.p1,
                affine * c.p2,
                affine * c.p3,
            )),
            Curve::Arc(a) => Curve::Arc(a.transform(affine)),
        }
    }

    /// Move the start point, keeping the rest of the curve.
    pub fn set_initial(&mut self, p: Point) {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p0 = p,
            Curve::Quad(q) => q.p0 = p,
            Curve::Cubic(c) => c.p0 = p,
            Curve::Arc(a) => {
                *a = EllipticalArc::from_svg(
                    p,
                    a.radii(),
                    a.x_rotation(),
                    a.large_arc(),
                    a.sweep_angle() > 0.0,
                    a.final_point(),
                );
            }
        }
    }

    /// Move the end point, keeping the rest of the curve.
    pub fn set_final(&mut self, p: Point) {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.p1 = p,
            Curve::Quad(q) => q.p2 = p,
            Curve::Cubic(c) => c.p3 = p,
            Curve::Arc(a) => {
                *a = EllipticalArc::from_svg(
                    a.initial_point(),
                    a.radii(),
                    a.x_rotation(),
                    a.large_arc(),
                    a.sweep_angle() > 0.0,
                    p,
                );
            }
        }
    }

    /// The Bézier control points of the curve.
    ///
    /// Arcs that are not straight chords have no exact Bézier form and
    /// return `None`; see [`to_cubics`](Self::to_cubics).
    pub fn control_points(&self) -> Option<SmallVec<[Point; 4]>> {
        let pts = match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => {
                SmallVec::from_slice(&[l.p0, l.p1])
            }
            Curve::Quad(q) => SmallVec::from_slice(&[q.p0, q.p1, q.p2]),
            Curve::Cubic(c) => SmallVec::from_slice(&[c.p0, c.p1, c.p2, c.p3]),
            Curve::Arc(a) if a.is_chord() => {
                SmallVec::from_slice(&[a.initial_point(), a.final_point()])
            }
            Curve::Arc(_) => return None,
        };
        Some(pts)
    }

    /// Cubic Béziers following the curve.
    ///
    /// Exact for lines and Béziers; arcs are approximated by pieces of at
    /// most a quarter turn.
    pub fn to_cubics(&self) -> SmallVec<[CubicBez; 4]> {
        let mut result = SmallVec::new();
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => result.push(CubicBez::new(
                l.p0,
                l.p0.lerp(l.p1, 1.0 / 3.0),
                l.p0.lerp(l.p1, 2.0 / 3.0),
                l.p1,
            )),
            Curve::Quad(q) => result.push(q.raise()),
            Curve::Cubic(c) => result.push(*c),
            Curve::Arc(a) => return a.to_cubics(),
        }
        result
    }

    // Control point sets handed to Bézier clipping.
    fn clip_pieces(&self) -> SmallVec<[SmallVec<[Point; 4]>; 4]> {
        match self.control_points() {
            Some(pts) => core::iter::once(pts).collect(),
            None => self
                .to_cubics()
                .iter()
                .map(|c| SmallVec::from_slice(&[c.p0, c.p1, c.p2, c.p3]))
                .collect(),
        }
    }

    // Convert a time found on a clipping piece back to a time on the curve.
    fn piece_time(&self, t: f64, point: Point) -> f64 {
        match self {
            Curve::Arc(a) if !a.is_chord() => a.time_of_point(point),
            _ => t,
        }
    }

    /// Intersections with another curve.
    ///
    /// `first` holds times on `self` and `second` times on `other`. Results
    /// are sorted by `first`.
    pub fn intersect(&self, other: &Curve, precision: f64) -> Vec<CurveIntersection> {
        let mut result = Vec::new();
        if self.is_degenerate() || other.is_degenerate() {
            if self.is_degenerate() {
                let p = self.initial_point();
                let t = other.nearest_time(p);
                let q = other.point_at(t);
                if are_near_points(p, q, precision) {
                    result.push(CurveIntersection::new(0.0, t, p.midpoint(q)));
                }
            } else {
                let p = other.initial_point();
                let t = self.nearest_time(p);
                let q = self.point_at(t);
                if are_near_points(p, q, precision) {
                    result.push(CurveIntersection::new(t, 0.0, p.midpoint(q)));
                }
            }
            return result;
        }

        if let (Some(a), Some(b)) = (self.straight_line(), other.straight_line()) {
            intersect_lines(a, b, &mut result);
            return result;
        }

        let pieces_a = self.clip_pieces();
        let pieces_b = other.clip_pieces();
        let approximated = pieces_a.len() > 1
            || pieces_b.len() > 1
            || self.control_points().is_none()
            || other.control_points().is_none();
        for pa in &pieces_a {
            for pb in &pieces_b {
                for (s, t) in find_intersections_bezier_clipping(pa, pb, precision) {
                    let mut s = self.piece_time(s, bezier_eval(pa, s));
                    let mut t = other.piece_time(t, bezier_eval(pb, t));
                    if approximated {
                        (s, t) = self.refine_intersection(other, s, t);
                    }
                    let point = self.point_at(s).midpoint(other.point_at(t));
                    result.push(CurveIntersection::new(s, t, point));
                }
            }
        }
        dedup_near(&mut result, precision.max(DEDUP_EPSILON));
        result
    }

    // Newton iteration on `self(s) - other(t) = 0`, polishing times found on
    // approximating pieces.
    fn refine_intersection(&self, other: &Curve, mut s: f64, mut t: f64) -> (f64, f64) {
        let mut err = self.point_at(s).distance_squared(other.point_at(t));
        for _ in 0..8 {
            if err == 0.0 {
                break;
            }
            let f = self.point_at(s) - other.point_at(t);
            let da = self.deriv_at(s);
            let db = -other.deriv_at(t);
            let det = da.cross(db);
            if det == 0.0 {
                break;
            }
            let ns = (s + (-f).cross(db) / det).clamp(0.0, 1.0);
            let nt = (t + da.cross(-f) / det).clamp(0.0, 1.0);
            let next = self.point_at(ns).distance_squared(other.point_at(nt));
            if next >= err {
                break;
            }
            (s, t, err) = (ns, nt, next);
        }
        (s, t)
    }

    fn straight_line(&self) -> Option<Line> {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => Some(*l),
            Curve::Arc(a) if a.is_chord() => Some(Line::new(a.initial_point(), a.final_point())),
            _ => None,
        }
    }

    /// Parameters in `(0, 1)` splitting the curve into pieces monotonic in
    /// both coordinates.
    fn extrema(&self) -> SmallVec<[f64; 4]> {
        match self {
            Curve::Line(_) | Curve::Closing(_) | Curve::Stitch(_) => SmallVec::new(),
            Curve::Quad(q) => q.extrema().into_iter().collect(),
            Curve::Cubic(c) => c.extrema().into_iter().collect(),
            Curve::Arc(a) => a.extrema(),
        }
    }

    /// Winding number of the curve around `p`.
    ///
    /// Counts crossings of the ray from `p` towards positive x: +1 where the
    /// curve moves towards increasing y, -1 where it moves towards decreasing
    /// y. The upper end of each crossing's y range is excluded, so that a
    /// horizontal ray through a shared vertex is counted once.
    pub fn winding(&self, p: Point) -> i32 {
        let mut breaks: SmallVec<[f64; 8]> = SmallVec::new();
        breaks.push(0.0);
        breaks.extend(self.extrema());
        breaks.push(1.0);

        let mut wind = 0;
        for w in breaks.windows(2) {
            let (t0, t1) = (w[0], w[1]);
            let y0 = self.value_at(t0, Axis::Vertical);
            let y1 = self.value_at(t1, Axis::Vertical);
            if y0 == y1 {
                continue;
            }
            let increasing = y1 > y0;
            let (lo, hi) = if increasing { (y0, y1) } else { (y1, y0) };
            if !(lo <= p.y && p.y < hi) {
                continue;
            }
            let t = self.monotonic_crossing(t0, t1, p.y, increasing);
            if self.value_at(t, Axis::Horizontal) > p.x {
                wind += if increasing { 1 } else { -1 };
            }
        }
        wind
    }

    // Bisect for the parameter where a y-monotonic piece reaches `y`.
    fn monotonic_crossing(&self, t0: f64, t1: f64, y: f64, increasing: bool) -> f64 {
        if self.value_at(t0, Axis::Vertical) == y {
            return t0;
        }
        if let Some(l) = self.straight_line() {
            return t0 + (t1 - t0) * (y - l.p0.y) / (l.p1.y - l.p0.y);
        }
        let (mut a, mut b) = (t0, t1);
        for _ in 0..64 {
            let m = 0.5 * (a + b);
            if m <= a || m >= b {
                break;
            }
            if (self.value_at(m, Axis::Vertical) < y) == increasing {
                a = m;
            } else {
                b = m;
            }
        }
        0.5 * (a + b)
    }

    /// The point on the curve nearest to `p`.
    pub fn nearest(&self, p: Point) -> Nearest {
        match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => l.nearest(p, NEAREST_ACCURACY),
            Curve::Quad(q) => q.nearest(p, NEAREST_ACCURACY),
            Curve::Cubic(c) => c.nearest(p, NEAREST_ACCURACY),
            Curve::Arc(a) => {
                let (t, distance_sq) = a.nearest(p);
                Nearest { distance_sq, t }
            }
        }
    }

    /// The parameter of the point nearest to `p`.
    #[inline]
    pub fn nearest_time(&self, p: Point) -> f64 {
        self.nearest(p).t
    }

    /// The parameter of the point nearest to `p`, searching only `[from, to]`.
    pub fn nearest_time_in(&self, p: Point, from: f64, to: f64) -> f64 {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        if from == 0.0 && to == 1.0 {
            return self.nearest_time(p);
        }
        if from == to {
            return from;
        }
        let t = self.portion(from, to).nearest_time(p);
        from + t * (to - from)
    }

    /// Every parameter in `[from, to]` at which the distance to `p` is minimal.
    ///
    /// Ties are detected between the interior minimum and the ends of the
    /// range.
    pub fn all_nearest_times(&self, p: Point, from: f64, to: f64) -> SmallVec<[f64; 2]> {
        let (from, to) = if from <= to { (from, to) } else { (to, from) };
        let t = self.nearest_time_in(p, from, to);
        let best = self.point_at(t).distance_squared(p);
        let mut result: SmallVec<[f64; 2]> = SmallVec::new();
        for candidate in [from, t, to] {
            let d = self.point_at(candidate).distance_squared(p);
            if d <= best && !result.contains(&candidate) {
                result.push(candidate);
            }
        }
        result
    }

    /// Parameters at which the coordinate along `axis` equals `v`.
    ///
    /// A curve lying entirely on the line has infinitely many and reports none.
    pub fn roots(&self, v: f64, axis: Axis) -> SmallVec<[f64; 4]> {
        let mut result: SmallVec<[f64; 4]> = SmallVec::new();
        let candidates: ArrayVec<f64, 3> = match self {
            Curve::Line(l) | Curve::Closing(l) | Curve::Stitch(l) => {
                let (a, b) = (axis.coord(l.p0), axis.coord(l.p1));
                if a == b {
                    ArrayVec::new()
                } else {
                    core::iter::once((v - a) / (b - a)).collect()
                }
            }
            Curve::Quad(q) => {
                let (p0, p1, p2) = (axis.coord(q.p0), axis.coord(q.p1), axis.coord(q.p2));
                solve_quadratic(p0 - v, 2.0 * (p1 - p0), p0 - 2.0 * p1 + p2)
                    .into_iter()
                    .collect()
            }
            Curve::Cubic(c) => {
                let (p0, p1) = (axis.coord(c.p0), axis.coord(c.p1));
                let (p2, p3) = (axis.coord(c.p2), axis.coord(c.p3));
                solve_cubic(
                    p0 - v,
                    3.0 * (p1 - p0),
                    3.0 * (p0 - 2.0 * p1 + p2),
                    p3 - 3.0 * p2 + 3.0 * p1 - p0,
                )
            }
            Curve::Arc(a) => return a.roots(v, axis).into_iter().collect(),
        };
        for t in candidates {
            if (-T_EPSILON..=1.0 + T_EPSILON).contains(&t) {
                let t = t.clamp(0.0, 1.0);
                if !result.iter().any(|&u| (u - t).abs() <= T_EPSILON) {
                    result.push(t);
                }
            }
        }
        result.sort_by(f64::total_cmp);
        result
    }

    /// Whether two curves have the same shape within `precision`.
    pub fn is_near(&self, other: &Curve, precision: f64) -> bool {
        match (self, other) {
            (Curve::Arc(a), Curve::Arc(b)) if !a.is_chord() || !b.is_chord() => {
                are_near_points(a.initial_point(), b.initial_point(), precision)
                    && are_near_points(a.final_point(), b.final_point(), precision)
                    && are_near_points(a.center(), b.center(), precision)
                    && are_near_points(a.eval(0.5), b.eval(0.5), precision)
            }
            _ => match (self.control_points(), other.control_points()) {
                (Some(a), Some(b)) => {
                    a.len() == b.len()
                        && a.iter().zip(&b).all(|(p, q)| are_near_points(*p, *q, precision))
                }
                _ => false,
            },
        }
    }
}

impl From<Line> for Curve {
    fn from(l: Line) -> Curve {
        Curve::Line(l)
    }
}

impl From<QuadBez> for Curve {
    fn from(q: QuadBez) -> Curve {
        Curve::Quad(q)
    }
}

impl From<CubicBez> for Curve {
    fn from(c: CubicBez) -> Curve {
        Curve::Cubic(c)
    }
}

impl From<EllipticalArc> for Curve {
    fn from(a: EllipticalArc) -> Curve {
        Curve::Arc(a)
    }
}

fn bezier_eval(c: &[Point], t: f64) -> Point {
    match *c {
        [p0, p1] => Line::new(p0, p1).eval(t),
        [p0, p1, p2] => QuadBez::new(p0, p1, p2).eval(t),
        [p0, p1, p2, p3] => CubicBez::new(p0, p1, p2, p3).eval(t),
        _ => c.first().copied().unwrap_or_default(),
    }
}

fn intersect_lines(a: Line, b: Line, out: &mut Vec<CurveIntersection>) {
    let d1 = a.p1 - a.p0;
    let d2 = b.p1 - b.p0;
    let w = b.p0 - a.p0;
    let denom = d1.cross(d2);
    let scale = d1.hypot() * d2.hypot();

    if denom.abs() <= 1e-12 * scale {
        // Parallel; only collinear segments can meet.
        if w.cross(d1).abs() > 1e-12 * d1.hypot() * w.hypot().max(1.0) {
            return;
        }
        let len1 = d1.hypot2();
        let len2 = d2.hypot2();
        let tb0 = w.dot(d1) / len1;
        let tb1 = (b.p1 - a.p0).dot(d1) / len1;
        let lo = tb0.min(tb1).max(0.0);
        let hi = tb0.max(tb1).min(1.0);
        if lo > hi {
            return;
        }
        let pair = [lo, hi];
        let ends = if lo == hi { &pair[..1] } else { &pair[..] };
        for s in ends {
            let p = a.eval(*s);
            let t = ((p - b.p0).dot(d2) / len2).clamp(0.0, 1.0);
            out.push(CurveIntersection::new(*s, t, p.midpoint(b.eval(t))));
        }
        return;
    }

    let s = w.cross(d2) / denom;
    let t = w.cross(d1) / denom;
    let range = -T_EPSILON..=1.0 + T_EPSILON;
    if range.contains(&s) && range.contains(&t) {
        let (s, t) = (s.clamp(0.0, 1.0), t.clamp(0.0, 1.0));
        let point = a.eval(s).midpoint(b.eval(t));
        out.push(CurveIntersection::new(s, t, point));
    }
}

// Sort by first time and drop entries within `eps` of a kept one.
fn dedup_near(xs: &mut Vec<CurveIntersection>, eps: f64) {
    xs.sort_by(|a, b| a.first.total_cmp(&b.first).then(a.second.total_cmp(&b.second)));
    let mut kept: Vec<CurveIntersection> = Vec::with_capacity(xs.len());
    for x in xs.drain(..) {
        let dup = kept
            .iter()
            .any(|k| (k.first - x.first).abs() <= eps && (k.second - x.second).abs() <= eps);
        if !dup {
            kept.push(x);
        }
    }
    *xs = kept;
}

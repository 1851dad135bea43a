// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intersection of Bézier curves by Bézier clipping.
//!
//! Both curves are given by their control points, of any degree. Each step
//! bounds one curve by a "fat line" and clips the parameter domain of the
//! other against it, alternating between the two until both domains are
//! narrower than the requested precision. When a clip fails to shrink a
//! domain enough, the larger curve is split in two and both halves are
//! processed recursively.
//!
//! See Sederberg and Nishita, "Curve intersection using Bézier clipping"
//! (1990).

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Point, Vec2};
use log::{debug, trace};
use smallvec::SmallVec;

use crate::common::{are_near_points, binomial, next_after, EPSILON};
use crate::{ConvexHull, Interval};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

/// Domains narrower than this are not clipped any further.
pub const MAX_PRECISION: f64 = 1e-8;

/// When a clip keeps more than this fraction of a domain, the curve with the
/// larger domain is subdivided instead.
pub const MIN_CLIPPED_SIZE_THRESHOLD: f64 = 0.8;

/// The default number of [`iterate`] calls per top-level search.
pub const DEFAULT_CALL_LIMIT: usize = 100;

type ControlPoints = SmallVec<[Point; 4]>;

/// Bounds the recursion of a Bézier clipping search.
///
/// Each call to [`iterate`] spends one unit. The count starts over whenever
/// a search begins on two full unit domains, and calls made after the limit
/// is exceeded return without results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClipBudget {
    calls: usize,
    limit: usize,
}

impl ClipBudget {
    /// Create a budget allowing `limit` calls.
    pub const fn new(limit: usize) -> ClipBudget {
        ClipBudget { calls: 0, limit }
    }

    /// The number of calls made since the last reset.
    #[inline]
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// The maximum number of calls.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether the limit has been exceeded.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.calls > self.limit
    }

    fn enter(&mut self, dom_a: Interval, dom_b: Interval) -> bool {
        if dom_a.extent() == 1.0 && dom_b.extent() == 1.0 {
            self.calls = 0;
        }
        self.calls += 1;
        if self.is_exhausted() {
            debug!("bezier clipping gave up after {} calls", self.limit);
            return false;
        }
        true
    }
}

impl Default for ClipBudget {
    fn default() -> ClipBudget {
        ClipBudget::new(DEFAULT_CALL_LIMIT)
    }
}

/// A flavor of Bézier clipping.
///
/// Implemented by [`IntersectionPoint`], which finds where two curves cross,
/// and [`CollinearNormal`], which finds pairs of points whose normals lie on
/// a common line.
pub trait ClipKind {
    /// Clip the domain of `b` against `a`.
    ///
    /// Returns the sub-interval of `[0, 1]` where `b` may still contain a
    /// solution, or `None` when it cannot.
    fn clip(a: &[Point], b: &[Point], precision: f64) -> Option<Interval>;

    /// Narrow the domains `dom_a` and `dom_b` of the curves `a` and `b`,
    /// appending converged domain pairs to `doms_a` and `doms_b`.
    #[allow(clippy::too_many_arguments)]
    fn iterate(
        doms_a: &mut Vec<Interval>,
        doms_b: &mut Vec<Interval>,
        a: &[Point],
        b: &[Point],
        dom_a: Interval,
        dom_b: Interval,
        precision: f64,
        budget: &mut ClipBudget,
    );
}

/// Finds crossing points of two curves.
#[derive(Clone, Copy, Debug, Default)]
pub struct IntersectionPoint;

/// Finds pairs of points with collinear normals.
#[derive(Clone, Copy, Debug, Default)]
pub struct CollinearNormal;

/// Clip the domain of `b` against `a`. See [`ClipKind::clip`].
#[inline]
pub fn clip<K: ClipKind>(a: &[Point], b: &[Point], precision: f64) -> Option<Interval> {
    K::clip(a, b, precision)
}

/// Narrow two curve domains. See [`ClipKind::iterate`].
#[allow(clippy::too_many_arguments)]
#[inline]
pub fn iterate<K: ClipKind>(
    doms_a: &mut Vec<Interval>,
    doms_b: &mut Vec<Interval>,
    a: &[Point],
    b: &[Point],
    dom_a: Interval,
    dom_b: Interval,
    precision: f64,
    budget: &mut ClipBudget,
) {
    K::iterate(doms_a, doms_b, a, b, dom_a, dom_b, precision, budget);
}

/// Run a full search and return the midpoints of the converged domains.
pub fn get_solutions<K: ClipKind>(
    a: &[Point],
    b: &[Point],
    precision: f64,
    budget: &mut ClipBudget,
) -> Vec<(f64, f64)> {
    let mut doms_a = Vec::new();
    let mut doms_b = Vec::new();
    K::iterate(
        &mut doms_a,
        &mut doms_b,
        a,
        b,
        Interval::UNIT,
        Interval::UNIT,
        precision,
        budget,
    );
    debug_assert_eq!(doms_a.len(), doms_b.len());
    doms_a
        .iter()
        .zip(&doms_b)
        .map(|(da, db)| (da.middle(), db.middle()))
        .collect()
}

/// Parameter pairs at which the Bézier curves `a` and `b` cross.
///
/// The curves are given by their control points and may have any degree of
/// at least one.
pub fn find_intersections_bezier_clipping(
    a: &[Point],
    b: &[Point],
    precision: f64,
) -> Vec<(f64, f64)> {
    find_intersections_with_budget(a, b, precision, &mut ClipBudget::default())
}

/// [`find_intersections_bezier_clipping`] with an explicit recursion budget.
pub fn find_intersections_with_budget(
    a: &[Point],
    b: &[Point],
    precision: f64,
    budget: &mut ClipBudget,
) -> Vec<(f64, f64)> {
    if a.len() < 2 || b.len() < 2 {
        return Vec::new();
    }
    get_solutions::<IntersectionPoint>(a, b, precision, budget)
}

/// Parameter pairs at which the normals of `a` and `b` lie on a common line.
///
/// Both curves must be at least quadratic; otherwise the result is empty.
pub fn find_collinear_normal(a: &[Point], b: &[Point], precision: f64) -> Vec<(f64, f64)> {
    find_collinear_normal_with_budget(a, b, precision, &mut ClipBudget::default())
}

/// [`find_collinear_normal`] with an explicit recursion budget.
pub fn find_collinear_normal_with_budget(
    a: &[Point],
    b: &[Point],
    precision: f64,
    budget: &mut ClipBudget,
) -> Vec<(f64, f64)> {
    if a.len() < 3 || b.len() < 3 {
        return Vec::new();
    }
    get_solutions::<CollinearNormal>(a, b, precision, budget)
}

impl ClipKind for IntersectionPoint {
    fn clip(a: &[Point], b: &[Point], precision: f64) -> Option<Interval> {
        let line = if is_constant(a, precision) {
            let m = a[0].midpoint(a[a.len() - 1]);
            FatLine::orthogonal(b, m, precision)
        } else {
            FatLine::orientation(a, precision)
        };
        let bound = line.bounds(a);
        clip_to_fat_line(b, &line, bound)
    }

    fn iterate(
        doms_a: &mut Vec<Interval>,
        doms_b: &mut Vec<Interval>,
        a: &[Point],
        b: &[Point],
        dom_a: Interval,
        dom_b: Interval,
        precision: f64,
        budget: &mut ClipBudget,
    ) {
        if !budget.enter(dom_a, dom_b) {
            return;
        }
        trace!("clipping intersection domains {dom_a:?} x {dom_b:?}");
        let precision = precision.max(MAX_PRECISION);

        if is_constant(a, precision) && is_constant(b, precision) {
            if are_near_points(middle(a), middle(b), EPSILON) {
                doms_a.push(dom_a);
                doms_b.push(dom_b);
            }
            return;
        }

        let mut curves: [ControlPoints; 2] = [a.into(), b.into()];
        let mut doms = [dom_a, dom_b];
        let (mut c1, mut c2) = (0, 1);

        for _ in 1..100 {
            if doms[0].extent() < precision && doms[1].extent() < precision {
                break;
            }
            let Some(dom) = Self::clip(&curves[c1], &curves[c2], precision) else {
                trace!("empty clip");
                return;
            };
            debug_assert!(dom.min() <= dom.max());

            doms[c2].map_to(dom);
            portion(&mut curves[c2], dom);
            if is_constant(&curves[c2], precision) && is_constant(&curves[c1], precision) {
                if are_near_points(middle(&curves[c1]), middle(&curves[c2]), EPSILON) {
                    break;
                }
                return;
            }

            if dom.extent() > MIN_CLIPPED_SIZE_THRESHOLD {
                trace!("clipped only {:.3} of the domain, subdividing", 1.0 - dom.extent());
                let [pa, pb] = &curves;
                if doms[0].extent() > doms[1].extent() {
                    let (h1, h2, d1, d2) = split(pa, doms[0]);
                    Self::iterate(doms_a, doms_b, &h1, pb, d1, doms[1], precision, budget);
                    Self::iterate(doms_a, doms_b, &h2, pb, d2, doms[1], precision, budget);
                } else {
                    let (h1, h2, d1, d2) = split(pb, doms[1]);
                    Self::iterate(doms_b, doms_a, &h1, pa, d1, doms[0], precision, budget);
                    Self::iterate(doms_b, doms_a, &h2, pa, d2, doms[0], precision, budget);
                }
                return;
            }

            core::mem::swap(&mut c1, &mut c2);
        }
        doms_a.push(doms[0]);
        doms_b.push(doms[1]);
    }
}

impl ClipKind for CollinearNormal {
    fn clip(a: &[Point], b: &[Point], _precision: f64) -> Option<Interval> {
        let focus = make_focus(a);
        clip_to_axis(&distance_control_points(b, &focus))
    }

    fn iterate(
        doms_a: &mut Vec<Interval>,
        doms_b: &mut Vec<Interval>,
        a: &[Point],
        b: &[Point],
        dom_a: Interval,
        dom_b: Interval,
        precision: f64,
        budget: &mut ClipBudget,
    ) {
        if !budget.enter(dom_a, dom_b) {
            return;
        }
        trace!("clipping normal domains {dom_a:?} x {dom_b:?}");
        let precision = precision.max(MAX_PRECISION);

        let mut curves: [ControlPoints; 2] = [a.into(), b.into()];
        let mut doms = [dom_a, dom_b];
        let (mut c1, mut c2) = (0, 1);

        for iter in 1..100 {
            if doms[0].extent() < precision && doms[1].extent() < precision {
                break;
            }
            let Some(dom) = Self::clip(&curves[c1], &curves[c2], precision) else {
                trace!("empty clip");
                return;
            };
            debug_assert!(dom.min() <= dom.max());

            doms[c2].map_to(dom);
            // Stop before the domain loses all significance.
            if iter > 1 && doms[c2].extent() <= MAX_PRECISION {
                break;
            }

            portion(&mut curves[c2], dom);
            if iter > 1 && is_constant(&curves[c2], precision) {
                break;
            }

            if dom.extent() > MIN_CLIPPED_SIZE_THRESHOLD {
                let [pa, pb] = &curves;
                if doms[0].extent() > doms[1].extent() {
                    if doms[0].extent() / 2.0 < MAX_PRECISION {
                        break;
                    }
                    let (h1, h2, d1, d2) = split(pa, doms[0]);
                    if is_constant(&h2, precision) {
                        break;
                    }
                    Self::iterate(doms_a, doms_b, &h1, pb, d1, doms[1], precision, budget);
                    Self::iterate(doms_a, doms_b, &h2, pb, d2, doms[1], precision, budget);
                } else {
                    if doms[1].extent() / 2.0 < MAX_PRECISION {
                        break;
                    }
                    let (h1, h2, d1, d2) = split(pb, doms[1]);
                    if is_constant(&h1, precision) || is_constant(&h2, precision) {
                        break;
                    }
                    Self::iterate(doms_b, doms_a, &h1, pa, d1, doms[0], precision, budget);
                    Self::iterate(doms_b, doms_a, &h2, pa, d2, doms[0], precision, budget);
                }
                return;
            }

            core::mem::swap(&mut c1, &mut c2);
        }
        doms_a.push(doms[0]);
        doms_b.push(doms[1]);
    }
}

/// An implicit line `a x + b y + c = 0` with `(a, b)` of unit length.
#[derive(Clone, Copy, Debug)]
struct FatLine {
    a: f64,
    b: f64,
    c: f64,
}

impl FatLine {
    fn through(p0: Point, p1: Point) -> FatLine {
        let a = p1.y - p0.y;
        let b = p0.x - p1.x;
        let c = p1.x * p0.y - p1.y * p0.x;
        let len = a.hypot(b);
        debug_assert!(len != 0.0);
        FatLine {
            a: a / len,
            b: b / len,
            c: c / len,
        }
    }

    // The chord from the first control point to the last one not near it.
    fn orientation(c: &[Point], precision: f64) -> FatLine {
        let i = (1..c.len())
            .rev()
            .find(|&i| !are_near_points(c[0], c[i], precision))
            .unwrap_or(c.len() - 1);
        FatLine::through(c[0], c[i])
    }

    // The line through `p`, perpendicular to the chord of `c`.
    fn orthogonal(c: &[Point], p: Point, precision: f64) -> FatLine {
        let mut dir = c[c.len() - 1] - c[0];
        if dir == Vec2::ZERO {
            let i = (1..c.len())
                .rev()
                .find(|&i| !are_near_points(c[0], c[i], precision))
                .unwrap_or(c.len() - 1);
            dir = c[i] - c[0];
        }
        FatLine::through(p, p + Vec2::new(dir.y, -dir.x))
    }

    #[inline]
    fn signed_distance(&self, p: Point) -> f64 {
        self.a * p.x + self.b * p.y + self.c
    }

    fn bounds(&self, c: &[Point]) -> Interval {
        let mut bound = Interval::from_value(0.0);
        for &p in c {
            bound.expand_to(self.signed_distance(p));
        }
        bound
    }
}

// Where the segment `p1 p2` reaches height `y`.
fn intersect_at(p1: Point, p2: Point, y: f64) -> f64 {
    let s = (y - p1.y) / (p2.y - p1.y);
    (p2.x - p1.x) * s + p1.x
}

// Track the smallest range of `t` values touched while scanning a hull.
struct Range {
    tmin: f64,
    tmax: f64,
}

impl Range {
    fn new() -> Range {
        Range {
            tmin: 1.0,
            tmax: 0.0,
        }
    }

    fn add(&mut self, t: f64) {
        if self.tmin > t {
            self.tmin = t;
        }
        if self.tmax < t {
            self.tmax = t;
        }
    }

    fn finish(self) -> Option<Interval> {
        if self.tmin == 1.0 && self.tmax == 0.0 {
            None
        } else {
            Some(Interval::new(self.tmin, self.tmax))
        }
    }
}

fn clip_to_fat_line(b: &[Point], line: &FatLine, bound: Interval) -> Option<Interval> {
    let n = (b.len() - 1) as f64;
    let hull = ConvexHull::new(
        b.iter()
            .enumerate()
            .map(|(i, &p)| Point::new(i as f64 / n, line.signed_distance(p))),
    );
    let p = hull.boundary();
    let mut range = Range::new();

    let mut plower = p[0].y < bound.min();
    let mut phigher = p[0].y > bound.max();
    if !(plower || phigher) {
        range.add(p[0].x);
    }
    for i in 1..p.len() {
        let clower = p[i].y < bound.min();
        let chigher = p[i].y > bound.max();
        if !(clower || chigher) {
            range.add(p[i].x);
        }
        if clower != plower {
            range.add(intersect_at(p[i - 1], p[i], bound.min()));
            plower = clower;
        }
        if chigher != phigher {
            range.add(intersect_at(p[i - 1], p[i], bound.max()));
            phigher = chigher;
        }
    }

    // The closing edge of the hull.
    let last = p.len() - 1;
    if (p[0].y < bound.min()) != plower {
        range.add(intersect_at(p[last], p[0], bound.min()));
    }
    if (p[0].y > bound.max()) != phigher {
        range.add(intersect_at(p[last], p[0], bound.max()));
    }
    range.finish()
}

fn clip_to_axis(d: &[Point]) -> Option<Interval> {
    let hull = ConvexHull::new(d.iter().copied());
    let p = hull.boundary();
    let mut range = Range::new();

    let mut plower = p[0].y < 0.0;
    if p[0].y == 0.0 {
        range.add(p[0].x);
    }
    for i in 1..p.len() {
        let clower = p[i].y < 0.0;
        if p[i].y == 0.0 {
            range.add(p[i].x);
        } else if clower != plower {
            range.add(intersect_at(p[i - 1], p[i], 0.0));
            plower = clower;
        }
    }

    let last = p.len() - 1;
    if (p[0].y < 0.0) != plower {
        range.add(intersect_at(p[last], p[0], 0.0));
    }
    range.finish()
}

/// A closed focus of `b`: a curve through which every normal line of `b` passes.
fn make_focus(b: &[Point]) -> SmallVec<[Vec2; 4]> {
    debug_assert!(b.len() > 2);
    let n = b.len() - 1;
    let nf = n as f64;
    let mut f: SmallVec<[Vec2; 4]> = (0..n)
        .map(|i| {
            let d = nf * (b[i + 1] - b[i]);
            Vec2::new(-d.y, d.x)
        })
        .collect();

    let mut c = Vec2::new(1.0, 1.0);
    if let Some(sol) = solve(f[0], -f[n - 1], b[n] - b[0]) {
        c = sol;
    }

    // B(t) + c(t) * N(t)
    let last = c.y * f[n - 1] + b[n].to_vec2();
    f.push(last);
    for i in (1..n).rev() {
        let scaled = f[i] * -c.x;
        let mut fi = scaled + c.y * f[i - 1];
        fi = fi * (i as f64 / nf) - scaled;
        f[i] = fi + b[i].to_vec2();
    }
    f[0] = f[0] * c.x + b[0].to_vec2();
    f
}

// Solve `p1 * x + p2 * y = q` for `(x, y)`.
fn solve(p1: Vec2, p2: Vec2, q: Vec2) -> Option<Vec2> {
    let d = p1.cross(p2);
    if d == 0.0 {
        return None;
    }
    let d = 1.0 / d;
    Some(Vec2::new(q.cross(p2) * d, p1.cross(q) * d))
}

/// Control points of `D(t, u) = <B(t) - F(u), B'(t)>`, projected onto the
/// `(t, d)` plane as a lower and upper value per `t` sample.
fn distance_control_points(b: &[Point], f: &[Vec2]) -> Vec<Point> {
    debug_assert!(b.len() > 1 && !f.is_empty());
    let n = b.len() - 1;
    let m = f.len() - 1;
    let r = 2 * n - 1;
    let r_inv = 1.0 / r as f64;

    let db: SmallVec<[Vec2; 4]> = (0..n).map(|k| b[k + 1] - b[k]).collect();
    let dbb: Vec<f64> = db
        .iter()
        .flat_map(|dk| b.iter().map(move |bj| dk.dot(bj.to_vec2())))
        .collect();
    let dbf: Vec<f64> = db
        .iter()
        .flat_map(|dk| f.iter().map(move |fj| dk.dot(*fj)))
        .collect();

    let mut out = Vec::with_capacity(2 * (r + 1));
    let mut d = vec![0.0; m + 1];
    for i in 0..=r {
        d.iter_mut().for_each(|x| *x = 0.0);
        let k0 = i.max(n) - n;
        let kn = i.min(n - 1);
        let bri = n as f64 / binomial(r, i);
        for k in k0..=kn {
            let l = i - k;
            let bc = bri * binomial(n, l) * binomial(n - 1, k);
            for (j, dj) in d.iter_mut().enumerate() {
                *dj += bc * (dbb[k * (n + 1) + l] - dbf[k * (m + 1) + j]);
            }
        }
        let (dmin, dmax) = d
            .iter()
            .fold((d[m], d[m]), |(lo, hi), &x| (lo.min(x), hi.max(x)));
        let t = i as f64 * r_inv;
        out.push(Point::new(t, dmin));
        out.push(Point::new(t, dmax));
    }
    out
}

fn is_constant(c: &[Point], precision: f64) -> bool {
    c.iter().all(|&p| are_near_points(p, c[0], precision))
}

#[inline]
fn middle(c: &[Point]) -> Point {
    c[0].midpoint(c[c.len() - 1])
}

// Split a curve at the midpoint of its domain. The second half starts just
// past the midpoint so the halves do not share a parameter value.
fn split(c: &[Point], dom: Interval) -> (ControlPoints, ControlPoints, Interval, Interval) {
    let h1 = Interval::new(0.0, 0.5);
    let h2 = Interval::new(next_after(0.5, 1.0), 1.0);
    let mut c1 = ControlPoints::from_slice(c);
    let mut c2 = c1.clone();
    portion(&mut c1, h1);
    portion(&mut c2, h2);
    let (mut d1, mut d2) = (dom, dom);
    d1.map_to(h1);
    d2.map_to(h2);
    (c1, c2, d1, d2)
}

/// Restrict control points to the sub-domain `dom` of `[0, 1]`, in place.
fn portion(c: &mut [Point], dom: Interval) {
    if dom.min() == 0.0 {
        if dom.max() == 1.0 {
            return;
        }
        left_portion(dom.max(), c);
        return;
    }
    right_portion(dom.min(), c);
    if dom.max() == 1.0 {
        return;
    }
    left_portion(dom.extent() / (1.0 - dom.min()), c);
}

// de Casteljau for `[0, t]`.
fn left_portion(t: f64, c: &mut [Point]) {
    let n = c.len();
    for i in 1..n {
        for j in (i..n).rev() {
            c[j] = c[j - 1].lerp(c[j], t);
        }
    }
}

// de Casteljau for `[t, 1]`.
fn right_portion(t: f64, c: &mut [Point]) {
    let n = c.len();
    for i in 1..n {
        for j in 0..n - i {
            c[j] = c[j].lerp(c[j + 1], t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{CubicBez, ParamCurve, QuadBez};

    fn eval(c: &[Point], t: f64) -> Point {
        match c.len() {
            2 => c[0].lerp(c[1], t),
            3 => QuadBez::new(c[0], c[1], c[2]).eval(t),
            _ => CubicBez::new(c[0], c[1], c[2], c[3]).eval(t),
        }
    }

    fn check_solutions(a: &[Point], b: &[Point], xs: &[(f64, f64)], precision: f64) {
        for &(s, t) in xs {
            assert!((0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t));
            let d = eval(a, s).distance(eval(b, t));
            assert!(d < 100.0 * precision, "A({s}) and B({t}) are {d} apart");
        }
    }

    fn distinct(xs: &[(f64, f64)]) -> usize {
        let mut seen: Vec<f64> = Vec::new();
        for &(s, _) in xs {
            if !seen.iter().any(|&u| (u - s).abs() < 1e-6) {
                seen.push(s);
            }
        }
        seen.len()
    }

    #[test]
    fn straight_cubics_cross_once() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
        ];
        let b = [
            Point::new(0.0, 3.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 1.0),
            Point::new(3.0, 0.0),
        ];
        let precision = 1e-8;
        let xs = find_intersections_bezier_clipping(&a, &b, precision);
        assert_eq!(xs.len(), 1);
        assert!((xs[0].0 - 0.5).abs() < 1e-6);
        assert!((xs[0].1 - 0.5).abs() < 1e-6);
        let (s, t) = xs[0];
        assert!(eval(&a, s).distance(eval(&b, t)) < 10.0 * precision);
    }

    #[test]
    fn wave_crosses_line_twice() {
        let wave = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, -2.0),
            Point::new(3.0, 0.0),
        ];
        let line = [Point::new(-1.0, 0.1), Point::new(4.0, 0.1)];
        let precision = 1e-8;
        let xs = find_intersections_bezier_clipping(&wave, &line, precision);
        check_solutions(&wave, &line, &xs, precision);
        assert_eq!(distinct(&xs), 2);

        let ys = find_intersections_bezier_clipping(&line, &wave, precision);
        check_solutions(&line, &wave, &ys, precision);
        assert_eq!(distinct(&ys.iter().map(|&(s, t)| (t, s)).collect::<Vec<_>>()), 2);
    }

    #[test]
    fn quadratic_and_cubic() {
        let quad = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 4.0),
            Point::new(4.0, 0.0),
        ];
        let cubic = [
            Point::new(0.0, 3.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(4.0, 3.0),
        ];
        let precision = 1e-6;
        let xs = find_intersections_bezier_clipping(&quad, &cubic, precision);
        check_solutions(&quad, &cubic, &xs, precision);
        assert_eq!(distinct(&xs), 2);
    }

    #[test]
    fn disjoint_curves() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ];
        let b = [
            Point::new(0.0, 5.0),
            Point::new(1.0, 4.0),
            Point::new(2.0, 5.0),
        ];
        assert!(find_intersections_bezier_clipping(&a, &b, 1e-8).is_empty());
    }

    #[test]
    fn budget_limits_calls() {
        let a = [Point::new(0.0, 0.0), Point::new(3.0, 3.0)];
        let b = [Point::new(0.0, 3.0), Point::new(3.0, 0.0)];
        let mut budget = ClipBudget::new(0);
        assert!(find_intersections_with_budget(&a, &b, 1e-8, &mut budget).is_empty());
        assert!(budget.is_exhausted());

        let mut budget = ClipBudget::default();
        let xs = find_intersections_with_budget(&a, &b, 1e-8, &mut budget);
        assert_eq!(xs.len(), 1);
        assert!(budget.calls() >= 1 && !budget.is_exhausted());
    }

    #[test]
    fn symmetric_collinear_normals() {
        let a = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        ];
        let b = [
            Point::new(0.0, 3.0),
            Point::new(1.0, 2.0),
            Point::new(2.0, 3.0),
        ];
        let xs = find_collinear_normal(&a, &b, 1e-8);
        assert!(xs
            .iter()
            .any(|&(s, t)| (s - 0.5).abs() < 1e-3 && (t - 0.5).abs() < 1e-3));
        // Lines have no usable focus.
        assert!(find_collinear_normal(&a[..2], &b, 1e-8).is_empty());
    }

    #[test]
    fn domain_portions() {
        let mut c = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 2.0),
            Point::new(4.0, 0.0),
        ];
        let orig = CubicBez::new(c[0], c[1], c[2], c[3]);
        portion(&mut c, Interval::new(0.25, 0.75));
        let sub = orig.subsegment(0.25..0.75);
        for (p, q) in c.iter().zip([sub.p0, sub.p1, sub.p2, sub.p3]) {
            assert!(p.distance(q) < 1e-12);
        }
        let mut single = [Point::new(1.0, 1.0), Point::new(3.0, 1.0)];
        portion(&mut single, Interval::from_value(0.5));
        assert!(is_constant(&single, 1e-12));
    }
}

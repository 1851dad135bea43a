// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Elliptical arcs in center parameterization.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use kurbo::{Affine, CubicBez, Point, Rect, Vec2};
use smallvec::SmallVec;

use crate::common::lerp;
use crate::Axis;

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

// Angular slack when snapping a time onto the ends of the arc.
const ANGLE_EPSILON: f64 = 1e-9;

/// A segment of an ellipse, traversed from `from` to `to`.
///
/// The arc is stored in center form. Both the start and end angles are
/// kept, so that [`reverse`](EllipticalArc::reverse) is exact, and the
/// end points are stored verbatim so that evaluation at `0` and `1`
/// returns them without rounding.
///
/// An arc with a zero radius is a straight chord between its end points.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EllipticalArc {
    from: Point,
    to: Point,
    center: Point,
    radii: Vec2,
    x_rotation: f64,
    start_angle: f64,
    end_angle: f64,
}

impl EllipticalArc {
    /// Create an arc of the ellipse with the given center, radii and rotation,
    /// running from `start_angle` to `end_angle`.
    ///
    /// Angles are measured in the ellipse's own frame, before the rotation.
    pub fn new(
        center: impl Into<Point>,
        radii: impl Into<Vec2>,
        x_rotation: f64,
        start_angle: f64,
        end_angle: f64,
    ) -> EllipticalArc {
        let center = center.into();
        let radii = radii.into();
        let radii = Vec2::new(radii.x.abs(), radii.y.abs());
        let mut arc = EllipticalArc {
            from: center,
            to: center,
            center,
            radii,
            x_rotation,
            start_angle,
            end_angle,
        };
        arc.from = arc.point_at_angle(start_angle);
        arc.to = arc.point_at_angle(end_angle);
        arc
    }

    /// Create an arc from SVG endpoint parameters.
    ///
    /// Radii that are too small to connect the end points are scaled up.
    /// If a radius is zero, or the end points coincide, the result is a
    /// straight chord.
    pub fn from_svg(
        from: Point,
        radii: Vec2,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    ) -> EllipticalArc {
        let mut rx = radii.x.abs();
        let mut ry = radii.y.abs();
        if rx == 0.0 || ry == 0.0 || from == to {
            return EllipticalArc::chord(from, to, x_rotation);
        }

        let (sin_phi, cos_phi) = (x_rotation % TAU).sin_cos();
        let half_diff = (from - to) * 0.5;
        let half_sum = from.midpoint(to);

        // F6.5.1
        let p = Vec2::new(
            cos_phi * half_diff.x + sin_phi * half_diff.y,
            -sin_phi * half_diff.x + cos_phi * half_diff.y,
        );

        // F6.6.2
        let rf = p.x * p.x / (rx * rx) + p.y * p.y / (ry * ry);
        if rf > 1.0 {
            let scale = rf.sqrt();
            rx *= scale;
            ry *= scale;
        }

        let rxry = rx * ry;
        let rxpy = rx * p.y;
        let rypx = ry * p.x;
        let sum_of_sq = rxpy * rxpy + rypx * rypx;

        // F6.5.2
        let sign = if large_arc == sweep { -1.0 } else { 1.0 };
        let coe = sign * ((rxry * rxry - sum_of_sq) / sum_of_sq).abs().sqrt();
        let cx = coe * rxpy / ry;
        let cy = -coe * rypx / rx;

        // F6.5.3
        let center = Point::new(
            cos_phi * cx - sin_phi * cy + half_sum.x,
            sin_phi * cx + cos_phi * cy + half_sum.y,
        );

        let start_angle = Vec2::new((p.x - cx) / rx, (p.y - cy) / ry).atan2();
        let end_v = Vec2::new((-p.x - cx) / rx, (-p.y - cy) / ry);
        let mut sweep_angle = (end_v.atan2() - start_angle) % TAU;
        if sweep && sweep_angle < 0.0 {
            sweep_angle += TAU;
        } else if !sweep && sweep_angle > 0.0 {
            sweep_angle -= TAU;
        }

        EllipticalArc {
            from,
            to,
            center,
            radii: Vec2::new(rx, ry),
            x_rotation,
            start_angle,
            end_angle: start_angle + sweep_angle,
        }
    }

    fn chord(from: Point, to: Point, x_rotation: f64) -> EllipticalArc {
        EllipticalArc {
            from,
            to,
            center: from.midpoint(to),
            radii: Vec2::ZERO,
            x_rotation,
            start_angle: 0.0,
            end_angle: 0.0,
        }
    }

    /// The start point.
    #[inline]
    pub fn initial_point(&self) -> Point {
        self.from
    }

    /// The end point.
    #[inline]
    pub fn final_point(&self) -> Point {
        self.to
    }

    /// The center of the ellipse.
    #[inline]
    pub fn center(&self) -> Point {
        self.center
    }

    /// The radii of the ellipse, before rotation.
    #[inline]
    pub fn radii(&self) -> Vec2 {
        self.radii
    }

    /// Rotation of the ellipse's x axis, in radians.
    #[inline]
    pub fn x_rotation(&self) -> f64 {
        self.x_rotation
    }

    /// Angle at the start point.
    #[inline]
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// Angle at the end point.
    #[inline]
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    /// Signed angular extent; positive for increasing angles.
    #[inline]
    pub fn sweep_angle(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Whether the arc spans more than half of the ellipse.
    pub fn large_arc(&self) -> bool {
        self.sweep_angle().abs() > PI
    }

    /// Whether the arc is a straight chord between its end points.
    #[inline]
    pub fn is_chord(&self) -> bool {
        self.radii.x == 0.0 || self.radii.y == 0.0
    }

    /// Whether the arc collapses to a single point.
    pub fn is_degenerate(&self) -> bool {
        if self.is_chord() {
            self.from == self.to
        } else {
            self.sweep_angle() == 0.0
        }
    }

    /// The angle at parameter `t`.
    #[inline]
    pub fn angle_at(&self, t: f64) -> f64 {
        lerp(t, self.start_angle, self.end_angle)
    }

    /// The point of the full ellipse at `angle`.
    pub fn point_at_angle(&self, angle: f64) -> Point {
        self.center + self.frame_vector(angle)
    }

    // Offset from the center at `angle`, rotated into place.
    fn frame_vector(&self, angle: f64) -> Vec2 {
        let (s, c) = angle.sin_cos();
        rotate(Vec2::new(self.radii.x * c, self.radii.y * s), self.x_rotation)
    }

    /// Derivative with respect to the angle.
    fn angle_derivative(&self, angle: f64) -> Vec2 {
        let (s, c) = angle.sin_cos();
        rotate(
            Vec2::new(-self.radii.x * s, self.radii.y * c),
            self.x_rotation,
        )
    }

    /// The derivative with respect to `t`.
    pub fn deriv_at(&self, t: f64) -> Vec2 {
        if self.is_chord() {
            return self.to - self.from;
        }
        self.sweep_angle() * self.angle_derivative(self.angle_at(t))
    }

    /// Evaluate the arc at parameter `t`.
    pub fn eval(&self, t: f64) -> Point {
        if t == 0.0 {
            self.from
        } else if t == 1.0 {
            self.to
        } else if self.is_chord() {
            Point::new(lerp(t, self.from.x, self.to.x), lerp(t, self.from.y, self.to.y))
        } else {
            self.point_at_angle(self.angle_at(t))
        }
    }

    /// The parameter at which the arc reaches `angle`.
    ///
    /// The result lies in `[0, 1]` for angles on the arc and above `1` for
    /// angles on the complementary part of the ellipse.
    pub fn time_at_angle(&self, angle: f64) -> f64 {
        let sweep = self.sweep_angle();
        if sweep == 0.0 {
            return 0.0;
        }
        let d = if sweep > 0.0 {
            wrap_angle(angle - self.start_angle)
        } else {
            -wrap_angle(self.start_angle - angle)
        };
        d / sweep
    }

    // Snap times within angular slack of the ends. `None` when off the arc.
    fn snap_time(&self, t: f64) -> Option<f64> {
        let sweep = self.sweep_angle().abs();
        if t <= 1.0 {
            return Some(t.max(0.0));
        }
        if (t - 1.0) * sweep < ANGLE_EPSILON {
            return Some(1.0);
        }
        if (TAU / sweep - t) * sweep < ANGLE_EPSILON {
            return Some(0.0);
        }
        None
    }

    /// The angle of `p` as seen from the center, in the ellipse's frame.
    pub fn angle_of_point(&self, p: Point) -> f64 {
        let v = rotate(p - self.center, -self.x_rotation);
        Vec2::new(v.x / self.radii.x, v.y / self.radii.y).atan2()
    }

    /// The parameter of the point on the arc that best matches `p`.
    ///
    /// Points off the ellipse are projected through its unit-circle frame;
    /// angles outside the arc snap to the closer end.
    pub fn time_of_point(&self, p: Point) -> f64 {
        if self.is_chord() {
            let d = self.to - self.from;
            let len2 = d.hypot2();
            if len2 == 0.0 {
                return 0.0;
            }
            return ((p - self.from).dot(d) / len2).clamp(0.0, 1.0);
        }
        if self.is_degenerate() {
            return 0.0;
        }
        let t = self.time_at_angle(self.angle_of_point(p));
        if let Some(t) = self.snap_time(t) {
            return t;
        }
        let span = TAU / self.sweep_angle().abs();
        if t - 1.0 < span - t {
            1.0
        } else {
            0.0
        }
    }

    /// The sub-arc between parameters `t0` and `t1`.
    ///
    /// The result is reversed when `t0 > t1`.
    pub fn portion(&self, t0: f64, t1: f64) -> EllipticalArc {
        let from = self.eval(t0);
        let to = self.eval(t1);
        if self.is_chord() {
            return EllipticalArc::chord(from, to, self.x_rotation);
        }
        EllipticalArc {
            from,
            to,
            center: self.center,
            radii: self.radii,
            x_rotation: self.x_rotation,
            start_angle: self.angle_at(t0),
            end_angle: self.angle_at(t1),
        }
    }

    /// The same arc traversed in the opposite direction.
    pub fn reverse(&self) -> EllipticalArc {
        EllipticalArc {
            from: self.to,
            to: self.from,
            start_angle: self.end_angle,
            end_angle: self.start_angle,
            ..*self
        }
    }

    /// The image of the arc under an affine map.
    ///
    /// The end points are mapped directly. The ellipse's linear part is
    /// refactored into a rotation and radii; a reflecting map reverses the
    /// angular direction so that the arc keeps running from `from` to `to`.
    pub fn transform(&self, affine: Affine) -> EllipticalArc {
        let from = affine * self.from;
        let to = affine * self.to;
        if self.is_chord() {
            return EllipticalArc::chord(from, to, self.x_rotation);
        }
        let [a, b, c, d, _, _] = affine.as_coeffs();
        let linear = |v: Vec2| Vec2::new(a * v.x + c * v.y, b * v.x + d * v.y);
        // Columns of the map taking the unit circle onto the new ellipse.
        let u = linear(rotate(Vec2::new(self.radii.x, 0.0), self.x_rotation));
        let v = linear(rotate(Vec2::new(0.0, self.radii.y), self.x_rotation));

        // Closed-form 2x2 SVD: [u v] = R(phi) diag(sx, sy) R(theta).
        let e = (u.x + v.y) * 0.5;
        let f = (u.x - v.y) * 0.5;
        let g = (u.y + v.x) * 0.5;
        let h = (u.y - v.x) * 0.5;
        let q = e.hypot(h);
        let r = f.hypot(g);
        let (sx, sy) = (q + r, q - r);
        let a1 = g.atan2(f);
        let a2 = h.atan2(e);
        let theta = (a2 - a1) * 0.5;
        let phi = (a2 + a1) * 0.5;
        let sign = if sy < 0.0 { -1.0 } else { 1.0 };

        EllipticalArc {
            from,
            to,
            center: affine * self.center,
            radii: Vec2::new(sx, sy.abs()),
            x_rotation: phi,
            start_angle: sign * (self.start_angle + theta),
            end_angle: sign * (self.end_angle + theta),
        }
    }

    /// Parameters in `(0, 1)` where the arc reaches an extreme x or y value.
    pub fn extrema(&self) -> SmallVec<[f64; 4]> {
        let mut result = SmallVec::new();
        if self.is_chord() || self.is_degenerate() {
            return result;
        }
        let (s, c) = self.x_rotation.sin_cos();
        let (rx, ry) = (self.radii.x, self.radii.y);
        let ax = (-ry * s).atan2(rx * c);
        let ay = (ry * c).atan2(rx * s);
        for angle in [ax, ax + PI, ay, ay + PI] {
            let t = self.time_at_angle(angle);
            if t > 0.0 && t < 1.0 {
                result.push(t);
            }
        }
        result.sort_by(f64::total_cmp);
        result
    }

    /// The tight bounding box.
    pub fn bounding_box(&self) -> Rect {
        self.extrema()
            .iter()
            .fold(Rect::from_points(self.from, self.to), |r, &t| {
                r.union_pt(self.eval(t))
            })
    }

    /// Approximate the arc with cubic Béziers spanning at most a quarter turn each.
    ///
    /// The first and last pieces start and end exactly on the arc's end points.
    pub fn to_cubics(&self) -> SmallVec<[CubicBez; 4]> {
        let mut result = SmallVec::new();
        if self.is_chord() || self.is_degenerate() {
            let (p0, p3) = (self.from, self.to);
            result.push(CubicBez::new(p0, p0.lerp(p3, 1.0 / 3.0), p0.lerp(p3, 2.0 / 3.0), p3));
            return result;
        }
        let sweep = self.sweep_angle();
        let n = (sweep.abs() / FRAC_PI_2).ceil().max(1.0);
        let step = sweep / n;
        let n = n as usize;
        let arm = 4.0 / 3.0 * (0.25 * step).tan();
        let mut angle0 = self.start_angle;
        let mut p0 = self.from;
        for i in 0..n {
            let angle1 = if i + 1 == n {
                self.end_angle
            } else {
                self.start_angle + (i + 1) as f64 * step
            };
            let p3 = if i + 1 == n {
                self.to
            } else {
                self.point_at_angle(angle1)
            };
            let p1 = p0 + arm * self.angle_derivative(angle0);
            let p2 = p3 - arm * self.angle_derivative(angle1);
            result.push(CubicBez::new(p0, p1, p2, p3));
            angle0 = angle1;
            p0 = p3;
        }
        result
    }

    /// Parameters at which the coordinate along `axis` equals `v`.
    pub fn roots(&self, v: f64, axis: Axis) -> SmallVec<[f64; 2]> {
        let mut result = SmallVec::new();
        let a0 = axis.coord(self.from);
        let a1 = axis.coord(self.to);
        if self.is_chord() {
            if a0 != a1 {
                let t = (v - a0) / (a1 - a0);
                if (0.0..=1.0).contains(&t) {
                    result.push(t);
                }
            }
            return result;
        }
        if self.is_degenerate() {
            return result;
        }
        // A cos(θ) + B sin(θ) = k
        let (s, c) = self.x_rotation.sin_cos();
        let (rx, ry) = (self.radii.x, self.radii.y);
        let (a, b) = match axis {
            Axis::Horizontal => (rx * c, -ry * s),
            Axis::Vertical => (rx * s, ry * c),
        };
        let k = v - axis.coord(self.center);
        let r = a.hypot(b);
        if r == 0.0 || k.abs() > r {
            return result;
        }
        let alpha = b.atan2(a);
        let delta = (k / r).clamp(-1.0, 1.0).acos();
        for angle in [alpha - delta, alpha + delta] {
            if let Some(t) = self.snap_time(self.time_at_angle(angle)) {
                if !result.iter().any(|&u: &f64| (u - t).abs() < ANGLE_EPSILON) {
                    result.push(t);
                }
            }
        }
        if a0 == v && !result.contains(&0.0) {
            result.push(0.0);
        }
        if a1 == v && !result.contains(&1.0) {
            result.push(1.0);
        }
        result.sort_by(f64::total_cmp);
        result
    }

    /// The parameter of the point on the arc nearest to `p`, together with
    /// the squared distance.
    pub fn nearest(&self, p: Point) -> (f64, f64) {
        if self.is_chord() || self.is_degenerate() {
            let t = self.time_of_point(p);
            return (t, self.eval(t).distance_squared(p));
        }
        let mut best = (0.0, self.from.distance_squared(p));
        let d_end = self.to.distance_squared(p);
        if d_end < best.1 {
            best = (1.0, d_end);
        }
        let (lo, hi) = if self.start_angle <= self.end_angle {
            (self.start_angle, self.end_angle)
        } else {
            (self.end_angle, self.start_angle)
        };
        // Seed Newton's method from each quarter-turn piece.
        for piece in 0..4 {
            let mut angle = lerp((piece as f64 + 0.5) / 4.0, lo, hi);
            for _ in 0..16 {
                let d = self.frame_vector(angle) + (self.center - p);
                let d1 = self.angle_derivative(angle);
                let d2 = -self.frame_vector(angle);
                let g = d.dot(d1);
                let dg = d1.hypot2() + d.dot(d2);
                if dg == 0.0 {
                    break;
                }
                let next = (angle - g / dg).clamp(lo, hi);
                if (next - angle).abs() < 1e-15 {
                    angle = next;
                    break;
                }
                angle = next;
            }
            let t = self.time_at_angle(angle).clamp(0.0, 1.0);
            let dist = self.eval(t).distance_squared(p);
            if dist < best.1 {
                best = (t, dist);
            }
        }
        best
    }
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (s, c) = angle.sin_cos();
    Vec2::new(v.x * c - v.y * s, v.x * s + v.y * c)
}

// Wrap into `[0, TAU)`.
fn wrap_angle(a: f64) -> f64 {
    let r = a % TAU;
    let r = if r < 0.0 { r + TAU } else { r };
    if r >= TAU {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::ParamCurve;

    fn assert_near(p0: Point, p1: Point, epsilon: f64) {
        assert!((p1 - p0).hypot() < epsilon, "{p0:?} != {p1:?}");
    }

    #[test]
    fn svg_half_circle() {
        let arc = EllipticalArc::from_svg(
            Point::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            0.0,
            false,
            true,
            Point::new(2.0, 0.0),
        );
        assert_near(arc.center(), Point::new(1.0, 0.0), 1e-12);
        assert!((arc.sweep_angle().abs() - PI).abs() < 1e-12);
        assert_eq!(arc.eval(0.0), Point::new(0.0, 0.0));
        assert_eq!(arc.eval(1.0), Point::new(2.0, 0.0));
        let mid = arc.eval(0.5);
        assert!((mid.distance(arc.center()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn radii_are_scaled_up() {
        let arc = EllipticalArc::from_svg(
            Point::new(0.0, 0.0),
            Vec2::new(0.5, 0.5),
            0.0,
            false,
            false,
            Point::new(4.0, 0.0),
        );
        assert!((arc.radii().x - 2.0).abs() < 1e-12);
        assert_near(arc.center(), Point::new(2.0, 0.0), 1e-9);
    }

    #[test]
    fn zero_radius_is_chord() {
        let arc = EllipticalArc::from_svg(
            Point::new(0.0, 0.0),
            Vec2::new(0.0, 3.0),
            0.0,
            false,
            true,
            Point::new(2.0, 2.0),
        );
        assert!(arc.is_chord());
        assert_eq!(arc.eval(0.5), Point::new(1.0, 1.0));
        assert_eq!(arc.roots(0.5, Axis::Horizontal).as_slice(), &[0.25]);
        assert_eq!(arc.time_of_point(Point::new(2.0, 0.0)), 0.5);
    }

    #[test]
    fn reverse_is_exact() {
        let arc = EllipticalArc::new(Point::new(3.0, -1.0), Vec2::new(2.0, 1.0), 0.3, 0.1, 2.9);
        assert_eq!(arc.reverse().reverse(), arc);
        let rev = arc.reverse();
        assert_near(rev.eval(0.25), arc.eval(0.75), 1e-12);
    }

    #[test]
    fn point_inversion() {
        let arc = EllipticalArc::new(Point::ORIGIN, Vec2::new(3.0, 1.5), 0.7, -1.0, 2.5);
        for i in 0..=8 {
            let t = i as f64 / 8.0;
            assert!((arc.time_of_point(arc.eval(t)) - t).abs() < 1e-9);
        }
        // Points beyond the ends snap to the closer one.
        assert_eq!(arc.time_of_point(arc.point_at_angle(2.7)), 1.0);
        assert_eq!(arc.time_of_point(arc.point_at_angle(-1.3)), 0.0);
    }

    #[test]
    fn exact_bounds() {
        let arc = EllipticalArc::new(Point::new(1.0, 1.0), Vec2::new(2.0, 1.0), 0.0, 0.0, PI);
        let bb = arc.bounding_box();
        assert!((bb.x0 + 1.0).abs() < 1e-12);
        assert!((bb.x1 - 3.0).abs() < 1e-12);
        assert!((bb.y0 - 1.0).abs() < 1e-12);
        assert!((bb.y1 - 2.0).abs() < 1e-12);
    }

    #[test]
    fn cubic_pieces() {
        let arc = EllipticalArc::new(Point::ORIGIN, Vec2::new(1.0, 1.0), 0.0, 0.0, -3.0 * FRAC_PI_2);
        let cubics = arc.to_cubics();
        assert_eq!(cubics.len(), 3);
        assert_eq!(cubics[0].p0, arc.initial_point());
        assert_eq!(cubics[2].p3, arc.final_point());
        for c in &cubics {
            let mid = c.eval(0.5);
            assert!((mid.to_vec2().hypot() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn coordinate_roots() {
        let arc = EllipticalArc::new(Point::ORIGIN, Vec2::new(1.0, 1.0), 0.0, 0.0, PI);
        let roots = arc.roots(0.5, Axis::Vertical);
        assert_eq!(roots.len(), 2);
        for &t in &roots {
            assert!((arc.eval(t).y - 0.5).abs() < 1e-12);
        }
        assert!(arc.roots(1.5, Axis::Vertical).is_empty());
        assert_eq!(arc.roots(1.0, Axis::Horizontal).as_slice(), &[0.0]);
    }

    #[test]
    fn nearest_on_circle() {
        let arc = EllipticalArc::new(Point::ORIGIN, Vec2::new(2.0, 2.0), 0.0, 0.0, PI);
        let (t, d2) = arc.nearest(Point::new(0.0, 5.0));
        assert!((t - 0.5).abs() < 1e-9);
        assert!((d2 - 9.0).abs() < 1e-9);
        let (t, _) = arc.nearest(Point::new(3.0, -1.0));
        assert_eq!(t, 0.0);
    }

    #[test]
    fn affine_images() {
        let arc = EllipticalArc::new((1.0, 2.0), (3.0, 1.0), 0.4, 0.3, 2.5);
        let maps = [
            Affine::translate((2.0, -1.0)) * Affine::rotate(0.7),
            Affine::scale_non_uniform(2.0, 0.5) * Affine::rotate(-1.1),
            Affine::new([1.0, 0.3, -0.2, 1.4, 5.0, 6.0]),
            Affine::FLIP_X * Affine::skew(0.4, 0.0),
        ];
        for affine in maps {
            let image = arc.transform(affine);
            assert_eq!(image.initial_point(), affine * arc.initial_point());
            assert_eq!(image.final_point(), affine * arc.final_point());
            for i in 0..=16 {
                let t = i as f64 / 16.0;
                assert_near(image.eval(t), affine * arc.eval(t), 1e-9);
            }
        }
    }
}

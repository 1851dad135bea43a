// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contiguous sequences of curves.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, Mul};
use core::slice;

use kurbo::{Affine, Circle, CubicBez, Ellipse, Line, Point, QuadBez, Rect, Vec2};

use crate::common::{are_near_points, split_time};
use crate::path_time::sort_and_dedup;
use crate::{
    Axis, ConvexHull, Curve, CurveIntersectionSweepSet, EllipticalArc, Interval, PathError,
    PathInterval, PathIntersection, PathTime, Sweeper,
};

#[cfg(not(feature = "std"))]
use crate::common::FloatFuncs;

#[derive(Clone, Debug, PartialEq)]
struct PathData {
    curves: Vec<Curve>,
    fast_bounds: Option<Rect>,
}

impl PathData {
    fn new(curves: Vec<Curve>) -> PathData {
        let mut data = PathData {
            curves,
            fast_bounds: None,
        };
        data.refresh_bounds();
        data
    }

    // The closing segment always lies within the box of the other curves.
    fn refresh_bounds(&mut self) {
        let real = &self.curves[..self.curves.len() - 1];
        self.fast_bounds = real
            .iter()
            .map(Curve::bounds_fast)
            .reduce(|a, b| a.union(b));
    }
}

/// A contiguous sequence of curves.
///
/// Consecutive curves share their end points exactly. The last slot always
/// holds a closing segment joining the end of the path back to its start;
/// it is part of the path only when the path is closed and the segment has
/// non-zero length. A path with no other curves is a bare start point.
///
/// Cloning a path is cheap: clones share their curves until one of them is
/// modified.
///
/// By default edits that would leave a gap fail with
/// [`PathError::Continuity`]. With [stitching](Path::set_stitching) enabled,
/// gaps are bridged by [`Curve::Stitch`] segments instead.
#[derive(Clone, Debug)]
pub struct Path {
    data: Arc<PathData>,
    closed: bool,
    stitching: bool,
}

impl Default for Path {
    fn default() -> Path {
        Path::new(Point::ORIGIN)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Path) -> bool {
        self.closed == other.closed
            && (Arc::ptr_eq(&self.data, &other.data) || self.data.curves == other.data.curves)
    }
}

impl Path {
    /// Create an empty path starting at `p`.
    pub fn new(p: impl Into<Point>) -> Path {
        let p = p.into();
        Path::from_curves(vec![Curve::Closing(Line::new(p, p))], false)
    }

    fn from_curves(curves: Vec<Curve>, closed: bool) -> Path {
        debug_assert!(
            curves.last().map_or(false, Curve::is_closing),
            "the last slot must hold the closing segment"
        );
        Path {
            data: Arc::new(PathData::new(curves)),
            closed,
            stitching: false,
        }
    }

    /// The closed outline of a rectangle.
    ///
    /// The edges run from `(x0, y0)` through `(x1, y0)`, `(x1, y1)` and
    /// `(x0, y1)`; the last edge is the closing segment.
    pub fn from_rect(rect: Rect) -> Path {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x1, rect.y1),
            Point::new(rect.x0, rect.y1),
        ];
        let mut curves: Vec<Curve> = corners
            .windows(2)
            .map(|w| Curve::Line(Line::new(w[0], w[1])))
            .collect();
        curves.push(Curve::Closing(Line::new(corners[3], corners[0])));
        Path::from_curves(curves, true)
    }

    /// The closed polygon of a convex hull.
    pub fn from_convex_hull(hull: &ConvexHull) -> Path {
        let (Some(front), Some(back)) = (hull.front(), hull.back()) else {
            let origin = Point::ORIGIN;
            return Path::from_curves(vec![Curve::Closing(Line::new(origin, origin))], true);
        };
        let mut curves: Vec<Curve> = hull
            .boundary()
            .windows(2)
            .map(|w| Curve::Line(Line::new(w[0], w[1])))
            .collect();
        curves.push(Curve::Closing(Line::new(back, front)));
        Path::from_curves(curves, true)
    }

    /// A closed path made of two half-circle arcs.
    ///
    /// The path starts at the point of the circle with the largest x.
    pub fn from_circle(circle: Circle) -> Path {
        let Circle { center, radius } = circle;
        let p1 = Point::new(center.x + radius, center.y);
        let p2 = Point::new(center.x - radius, center.y);
        Path::from_halves(p1, p2, Vec2::new(radius, radius), 0.0)
    }

    /// A closed path made of two half-ellipse arcs.
    pub fn from_ellipse(ellipse: Ellipse) -> Path {
        let center = ellipse.center();
        let radii = ellipse.radii();
        let rotation = ellipse.rotation();
        let (sin, cos) = rotation.sin_cos();
        let axis = Vec2::new(radii.x * cos, radii.x * sin);
        Path::from_halves(center + axis, center - axis, radii, rotation)
    }

    fn from_halves(p1: Point, p2: Point, radii: Vec2, rotation: f64) -> Path {
        let first = EllipticalArc::from_svg(p1, radii, rotation, false, true, p2);
        let second = EllipticalArc::from_svg(p2, radii, rotation, false, true, p1);
        Path::from_curves(
            vec![
                Curve::Arc(first),
                Curve::Arc(second),
                Curve::Closing(Line::new(p1, p1)),
            ],
            true,
        )
    }

    /// Whether gaps left by edits are bridged with stitch segments.
    #[inline]
    pub fn stitching(&self) -> bool {
        self.stitching
    }

    /// Choose between bridging gaps with stitch segments and rejecting the edit.
    pub fn set_stitching(&mut self, stitching: bool) {
        self.stitching = stitching;
    }

    /// Make the curve storage private to this path.
    ///
    /// Every modifying method does this on its own; calling it explicitly
    /// is only useful to control when the copy happens.
    pub fn unshare(&mut self) {
        Arc::make_mut(&mut self.data);
    }

    /// Whether the curve storage is shared with a clone.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.data) > 1
    }

    fn data_mut(&mut self) -> &mut PathData {
        Arc::make_mut(&mut self.data)
    }

    fn commit(&mut self, curves: Vec<Curve>) {
        let data = self.data_mut();
        data.curves = curves;
        data.refresh_bounds();
    }

    #[inline]
    fn closing(&self) -> &Curve {
        &self.data.curves[self.data.curves.len() - 1]
    }

    // Where the last real curve ends.
    #[inline]
    fn open_end(&self) -> Point {
        self.closing().initial_point()
    }

    #[inline]
    fn includes_closing(&self) -> bool {
        self.closed && !self.closing().is_degenerate()
    }

    /// Whether the path is closed.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Whether the path has no curves besides the closing segment.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.curves.len() == 1
    }

    /// The number of curves, not counting the closing segment.
    #[inline]
    pub fn size_open(&self) -> usize {
        self.data.curves.len() - 1
    }

    /// The number of curves, counting the closing segment unless it is degenerate.
    #[inline]
    pub fn size_closed(&self) -> usize {
        if self.closing().is_degenerate() {
            self.size_open()
        } else {
            self.data.curves.len()
        }
    }

    /// The number of curves the path is made of.
    ///
    /// The closing segment counts when the path is closed and the segment is
    /// not degenerate.
    #[inline]
    pub fn size_default(&self) -> usize {
        if self.includes_closing() {
            self.size_closed()
        } else {
            self.size_open()
        }
    }

    /// Same as [`size_default`](Self::size_default).
    #[inline]
    pub fn size(&self) -> usize {
        self.size_default()
    }

    /// The curve at `index`, including the closing segment in the last slot.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Curve> {
        self.data.curves.get(index)
    }

    /// Iterate over the curves the path is made of.
    pub fn iter(&self) -> slice::Iter<'_, Curve> {
        self.data.curves[..self.size_default()].iter()
    }

    /// The closing segment.
    #[inline]
    pub fn closing_segment(&self) -> &Curve {
        self.closing()
    }

    /// The first curve, which is the closing segment of an empty path.
    #[inline]
    pub fn front(&self) -> &Curve {
        &self.data.curves[0]
    }

    /// The last curve that is not the closing segment.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if the path has no such curve.
    pub fn back_open(&self) -> Result<&Curve, PathError> {
        if self.is_empty() {
            return Err(PathError::EmptyPath);
        }
        Ok(&self.data.curves[self.data.curves.len() - 2])
    }

    /// The last curve, counting the closing segment unless it is degenerate.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if the path has no such curve.
    pub fn back_closed(&self) -> Result<&Curve, PathError> {
        if self.closing().is_degenerate() {
            self.back_open()
        } else {
            Ok(self.closing())
        }
    }

    /// The last curve the path is made of.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if the path has no such curve.
    pub fn back_default(&self) -> Result<&Curve, PathError> {
        if self.includes_closing() {
            self.back_closed()
        } else {
            self.back_open()
        }
    }

    /// The start point.
    #[inline]
    pub fn initial_point(&self) -> Point {
        self.front().initial_point()
    }

    /// The end point; for a closed path this is the start point.
    #[inline]
    pub fn final_point(&self) -> Point {
        if self.closed {
            self.closing().final_point()
        } else {
            self.open_end()
        }
    }

    /// Bounding box from the curves' control points, cached.
    #[inline]
    pub fn bounds_fast(&self) -> Option<Rect> {
        self.data.fast_bounds
    }

    /// Tight bounding box.
    pub fn bounds_exact(&self) -> Option<Rect> {
        self.data.curves[..self.size_open()]
            .iter()
            .map(Curve::bounds_exact)
            .reduce(|a, b| a.union(b))
    }

    /// The domain of flat times, `[0, size]`.
    pub fn time_range(&self) -> Interval {
        Interval::new(0.0, self.size_default() as f64)
    }

    /// Check that every curve starts where the previous one ends.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Continuity`] at the first gap.
    pub fn check_continuity(&self) -> Result<(), PathError> {
        check_continuity_of(&self.data.curves)
    }

    // --- Editing -------------------------------------------------------

    fn make_stitch(&self, at: Point, next: Point) -> Result<Curve, PathError> {
        if !self.stitching {
            return Err(PathError::Continuity { at, next });
        }
        log::debug!(
            "stitching gap from ({}, {}) to ({}, {})",
            at.x,
            at.y,
            next.x,
            next.y
        );
        Ok(Curve::Stitch(Line::new(at, next)))
    }

    // Turn incoming curves into a contiguous run of path segments.
    fn prepare(&self, source: impl IntoIterator<Item = Curve>) -> Result<Vec<Curve>, PathError> {
        let mut out: Vec<Curve> = Vec::new();
        for curve in source {
            let curve = curve.into_segment();
            if let Some(prev) = out.last() {
                let (at, next) = (prev.final_point(), curve.initial_point());
                if at != next {
                    let stitch = self.make_stitch(at, next)?;
                    out.push(stitch);
                }
            }
            out.push(curve);
        }
        Ok(out)
    }

    fn check_slots(&self, first: usize, last: usize) -> Result<(), PathError> {
        let len = self.data.curves.len();
        if first > last || last > len || first >= len {
            return Err(PathError::IndexOutOfRange {
                index: if first >= len || first > last { first } else { last },
                len,
            });
        }
        Ok(())
    }

    // Replace the curves in slots `first..last` with `source`. `last` may
    // reach past the closing segment, which is then resynchronized rather
    // than removed.
    fn do_update(&mut self, first: usize, last: usize, source: Vec<Curve>) -> Result<(), PathError> {
        self.check_slots(first, last)?;
        let mut source = self.prepare(source)?;
        let curves = &self.data.curves;
        let len = curves.len();
        let last_beyond_closing = last == len;

        if source.is_empty() {
            if first == last {
                return Ok(());
            }
            let at_boundary =
                (!self.closed && (first == 0 || last == len - 1)) || last_beyond_closing;
            if !at_boundary {
                let (at, next) = (curves[first].initial_point(), curves[last].initial_point());
                if at != next {
                    source.push(self.make_stitch(at, next)?);
                }
            }
        } else {
            let start = source[0].initial_point();
            let end = source[source.len() - 1].final_point();
            if first == 0 && last_beyond_closing {
                source.push(Curve::Closing(Line::new(end, start)));
                self.commit(source);
                return Ok(());
            }
            if self.closed || first != 0 {
                let at = curves[first].initial_point();
                if at != start {
                    source.insert(0, self.make_stitch(at, start)?);
                }
            }
            if !((!self.closed && last == len - 1) || last_beyond_closing) {
                let next = curves[last].initial_point();
                if end != next {
                    source.push(self.make_stitch(end, next)?);
                }
            }
        }

        let last = if last_beyond_closing { last - 1 } else { last };
        let mut curves = curves.clone();
        curves.splice(first..last, source);
        resync_closing(&mut curves);
        check_continuity_of(&curves)?;
        self.commit(curves);
        Ok(())
    }

    /// Insert a curve before the curve at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] if `pos > size_open()`, and
    /// [`PathError::Continuity`] if the curve does not fit and stitching is
    /// disabled.
    pub fn insert(&mut self, pos: usize, curve: impl Into<Curve>) -> Result<(), PathError> {
        self.do_update(pos, pos, vec![curve.into()])
    }

    /// Insert the curves of another path before the curve at `pos`.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn insert_path(&mut self, pos: usize, other: &Path) -> Result<(), PathError> {
        self.do_update(pos, pos, other.iter().copied().collect())
    }

    /// Remove the curve at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IndexOutOfRange`] for a bad index, and
    /// [`PathError::Continuity`] if removing the curve leaves a gap and
    /// stitching is disabled.
    pub fn erase(&mut self, pos: usize) -> Result<(), PathError> {
        self.erase_range(pos, pos + 1)
    }

    /// Remove the curves in `first..last`.
    ///
    /// # Errors
    ///
    /// See [`erase`](Self::erase).
    pub fn erase_range(&mut self, first: usize, last: usize) -> Result<(), PathError> {
        self.do_update(first, last, Vec::new())
    }

    /// Remove the last curve before the closing segment.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::EmptyPath`] if there is no such curve.
    pub fn erase_last(&mut self) -> Result<(), PathError> {
        if self.is_empty() {
            return Err(PathError::EmptyPath);
        }
        self.erase(self.size_open() - 1)
    }

    /// Replace the curve at `pos`.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn replace(&mut self, pos: usize, curve: impl Into<Curve>) -> Result<(), PathError> {
        self.replace_range(pos, pos + 1, curve)
    }

    /// Replace the curves in `first..last` with a single curve.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn replace_range(
        &mut self,
        first: usize,
        last: usize,
        curve: impl Into<Curve>,
    ) -> Result<(), PathError> {
        self.do_update(first, last, vec![curve.into()])
    }

    /// Replace the curves in `first..last` with the curves of another path.
    ///
    /// # Errors
    ///
    /// See [`insert`](Self::insert).
    pub fn replace_with_path(
        &mut self,
        first: usize,
        last: usize,
        other: &Path,
    ) -> Result<(), PathError> {
        self.do_update(first, last, other.iter().copied().collect())
    }

    /// Append a curve.
    ///
    /// On an empty path the start point moves to the start of the curve.
    /// Appending to a closed path a line or stitch that coincides with the
    /// closing segment does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Continuity`] if the curve does not start at the
    /// end of the path and stitching is disabled.
    pub fn append(&mut self, curve: impl Into<Curve>) -> Result<(), PathError> {
        let curve = curve.into().into_segment();
        self.stitch_to(curve.initial_point())?;
        let end = self.open_end();
        if !self.is_empty() && curve.initial_point() != end {
            return Err(PathError::Continuity {
                at: end,
                next: curve.initial_point(),
            });
        }
        self.push_curve(curve);
        Ok(())
    }

    // Put a curve before the closing segment, trusting it to fit.
    fn push_curve(&mut self, curve: Curve) {
        if !self.is_empty()
            && self.closed
            && curve.is_line_segment()
            && curve.final_point() == self.closing().final_point()
        {
            return;
        }
        let empty = self.is_empty();
        let data = self.data_mut();
        let n = data.curves.len();
        if empty {
            data.curves[0].set_final(curve.initial_point());
        }
        data.curves.insert(n - 1, curve);
        data.curves[n].set_initial(curve.final_point());
        data.refresh_bounds();
    }

    /// Append the curves of another path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Continuity`] if `other` does not start at the
    /// end of this path and stitching is disabled.
    pub fn append_path(&mut self, other: &Path) -> Result<(), PathError> {
        let closing = self.size_open();
        self.do_update(closing, closing + 1, other.iter().copied().collect())
    }

    /// Append a line to `p`.
    pub fn line_to(&mut self, p: impl Into<Point>) {
        let line = Line::new(self.open_end(), p.into());
        self.push_curve(Curve::Line(line));
    }

    /// Append a quadratic Bézier.
    pub fn quad_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>) {
        let quad = QuadBez::new(self.open_end(), p1.into(), p2.into());
        self.push_curve(Curve::Quad(quad));
    }

    /// Append a cubic Bézier.
    pub fn curve_to(&mut self, p1: impl Into<Point>, p2: impl Into<Point>, p3: impl Into<Point>) {
        let cubic = CubicBez::new(self.open_end(), p1.into(), p2.into(), p3.into());
        self.push_curve(Curve::Cubic(cubic));
    }

    /// Append an elliptical arc given by SVG endpoint parameters.
    pub fn arc_to(
        &mut self,
        radii: impl Into<Vec2>,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        p: impl Into<Point>,
    ) {
        let arc = EllipticalArc::from_svg(
            self.open_end(),
            radii.into(),
            x_rotation,
            large_arc,
            sweep,
            p.into(),
        );
        self.push_curve(Curve::Arc(arc));
    }

    /// Make the path continue from `p`.
    ///
    /// Nothing happens if the path is empty or already ends at `p`.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Continuity`] if a stitch segment would be needed
    /// and stitching is disabled.
    pub fn stitch_to(&mut self, p: Point) -> Result<(), PathError> {
        let end = self.open_end();
        if !self.is_empty() && end != p {
            let stitch = self.make_stitch(end, p)?;
            self.push_curve(stitch);
        }
        Ok(())
    }

    /// Open or close the path.
    ///
    /// When closing, a final line that ends at the start point is merged
    /// into the closing segment.
    pub fn close(&mut self, closed: bool) {
        if closed == self.closed {
            return;
        }
        if closed && self.data.curves.len() >= 2 {
            let n = self.data.curves.len();
            let last = self.data.curves[n - 2];
            if last.is_line_segment() && last.final_point() == self.initial_point() {
                let data = self.data_mut();
                data.curves[n - 1].set_initial(last.initial_point());
                data.curves.remove(n - 2);
                data.refresh_bounds();
            }
        }
        self.closed = closed;
    }

    /// Remove every curve, leaving an open empty path at the origin.
    pub fn clear(&mut self) {
        self.commit(vec![Curve::Closing(Line::new(Point::ORIGIN, Point::ORIGIN))]);
        self.closed = false;
    }

    /// Remove every curve and move the start point to `p`.
    pub fn start(&mut self, p: Point) {
        if !self.is_empty() {
            self.clear();
        }
        let data = self.data_mut();
        data.curves[0] = Curve::Closing(Line::new(p, p));
    }

    /// Move the start point of the first curve.
    ///
    /// # Errors
    ///
    /// On a closed path the move opens a gap at the closing segment, which
    /// is an error unless stitching is enabled.
    pub fn set_initial(&mut self, p: Point) -> Result<(), PathError> {
        if self.is_empty() {
            return Ok(());
        }
        let mut head = self.data.curves[0];
        head.set_initial(p);
        self.do_update(0, 1, vec![head])
    }

    /// Move the end point of the last curve before the closing segment.
    ///
    /// # Errors
    ///
    /// See [`set_initial`](Self::set_initial).
    pub fn set_final(&mut self, p: Point) -> Result<(), PathError> {
        if self.is_empty() {
            return Ok(());
        }
        let n = self.data.curves.len();
        let mut tail = self.data.curves[n - 2];
        tail.set_final(p);
        self.do_update(n - 2, n - 1, vec![tail])
    }

    /// On a closed path, remove a closing segment shorter than `precision`
    /// by moving the end of the last curve onto the start point.
    pub fn snap_ends(&mut self, precision: f64) {
        if !self.closed || self.is_empty() {
            return;
        }
        let closing = *self.closing();
        if !are_near_points(closing.initial_point(), closing.final_point(), precision) {
            return;
        }
        let start = closing.final_point();
        let data = self.data_mut();
        let n = data.curves.len();
        data.curves[n - 1].set_initial(start);
        data.curves[n - 2].set_final(start);
        data.refresh_bounds();
    }

    /// Map every curve through `affine`, in place.
    ///
    /// Shared storage is copied first; clones of this path keep the old
    /// geometry. A reflecting map reverses the sign of [`winding`](Path::winding).
    pub fn apply_affine(&mut self, affine: Affine) {
        let data = self.data_mut();
        for curve in &mut data.curves {
            *curve = curve.transform(affine);
        }
        data.refresh_bounds();
    }

    /// The same path traversed in the opposite direction.
    ///
    /// Reversing twice gives back an equal path.
    #[must_use]
    pub fn reversed(&self) -> Path {
        let fp = self.final_point();
        let mut ret = Path::new(fp);
        ret.closed = self.closed;
        ret.stitching = self.stitching;
        if self.is_empty() {
            return ret;
        }

        let curves = &self.data.curves;
        let n = curves.len();
        let end = if self.includes_closing() { n } else { n - 1 };
        let (stop, closing) = if self.closed {
            let front = &curves[0];
            if front.is_line_segment() {
                // The first line becomes the new closing segment.
                (1, Curve::Closing(Line::new(front.final_point(), front.initial_point())))
            } else {
                (0, Curve::Closing(Line::new(fp, fp)))
            }
        } else {
            (0, curves[n - 1].reverse())
        };

        let mut reversed: Vec<Curve> = curves[stop..end]
            .iter()
            .rev()
            .map(|c| c.reverse().into_segment())
            .collect();
        reversed.push(closing);
        ret.commit(reversed);
        ret
    }

    // --- Portions ------------------------------------------------------

    /// Append to `target` the part of this path between two flat times.
    ///
    /// A `to` of zero means the end of the path. When `from > to` the
    /// portion runs forward through the start of the path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TimeOutOfRange`] for a time outside
    /// `[0, size]`, and any error from appending to `target`.
    pub fn append_portion_to(&self, target: &mut Path, from: f64, to: f64) -> Result<(), PathError> {
        let size = self.size_default();
        let max = size as f64;
        for time in [from, to] {
            if !(0.0..=max).contains(&time) {
                return Err(PathError::TimeOutOfRange { time, max });
            }
        }
        let to = if to == 0.0 { max } else { to };
        if from == to || size == 0 {
            return Ok(());
        }

        let (fi, mut ff) = split_time(from);
        let (ti, mut tf) = split_time(to);
        let mut fi = fi as usize;
        let mut ti = ti as usize;
        if fi == size {
            fi -= 1;
            ff = 1.0;
        }
        if tf == 0.0 {
            ti -= 1;
            tf = 1.0;
        }

        let curves = &self.data.curves;
        if fi == ti && from < to {
            return target.append(curves[fi].portion(ff, tf));
        }
        if ff != 1.0 {
            target.append(curves[fi].portion(ff, 1.0))?;
        }
        if from >= to {
            for curve in &curves[fi + 1..size] {
                target.append(*curve)?;
            }
            for curve in &curves[..ti] {
                target.append(*curve)?;
            }
        } else {
            for curve in &curves[fi + 1..ti] {
                target.append(*curve)?;
            }
        }
        target.append(curves[ti].portion(0.0, tf))
    }

    /// Append to `target` the part of this path covered by `ival`.
    ///
    /// `p_from` and `p_to` replace the exact end points of the portion.
    /// A degenerate interval only makes `target` continue from its start.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::PathSizeMismatch`] if the interval was built for
    /// a path of a different [`size_closed`](Self::size_closed), and any error
    /// from appending to `target`.
    pub fn append_portion_interval_to(
        &self,
        target: &mut Path,
        ival: &PathInterval,
        p_from: Option<Point>,
        p_to: Option<Point>,
    ) -> Result<(), PathError> {
        let s = self.size_closed();
        if ival.path_size() != s {
            return Err(PathError::PathSizeMismatch {
                interval: ival.path_size(),
                path: s,
            });
        }
        let (from, to) = (ival.from(), ival.to());
        if from.curve_index >= s || to.curve_index >= s {
            return Err(PathError::IndexOutOfRange {
                index: from.curve_index.max(to.curve_index),
                len: s,
            });
        }
        if ival.is_degenerate() {
            let p = p_from.unwrap_or_else(|| self.point_at_time(from));
            return target.stitch_to(p);
        }

        let curves = &self.data.curves;
        let reverse = ival.is_reversed();
        if !ival.crosses_start() && from.curve_index == to.curve_index {
            let mut c = curves[from.curve_index].portion(from.t, to.t);
            if let Some(p) = p_from {
                c.set_initial(p);
            }
            if let Some(p) = p_to {
                c.set_final(p);
            }
            return target.append(c);
        }

        let step = |i: usize| if reverse { (i + s - 1) % s } else { (i + 1) % s };
        let mut first = curves[from.curve_index].portion(from.t, if reverse { 0.0 } else { 1.0 });
        if let Some(p) = p_from {
            first.set_initial(p);
        }
        target.append(first)?;
        let mut i = step(from.curve_index);
        while i != to.curve_index {
            let c = if reverse { curves[i].reverse() } else { curves[i] };
            target.append(c)?;
            i = step(i);
        }
        let mut last = curves[to.curve_index].portion(if reverse { 1.0 } else { 0.0 }, to.t);
        if let Some(p) = p_to {
            last.set_final(p);
        }
        target.append(last)
    }

    /// The part of the path between two flat times, as a new open path.
    ///
    /// # Errors
    ///
    /// See [`append_portion_to`](Self::append_portion_to).
    pub fn portion(&self, from: f64, to: f64) -> Result<Path, PathError> {
        let mut ret = self.portion_target();
        self.append_portion_to(&mut ret, from, to)?;
        Ok(ret)
    }

    /// The part of the path covered by `ival`, as a new open path.
    ///
    /// # Errors
    ///
    /// See [`append_portion_interval_to`](Self::append_portion_interval_to).
    pub fn portion_interval(&self, ival: &PathInterval) -> Result<Path, PathError> {
        let mut ret = self.portion_target();
        self.append_portion_interval_to(&mut ret, ival, None, None)?;
        Ok(ret)
    }

    fn portion_target(&self) -> Path {
        let mut ret = Path::new(self.initial_point());
        ret.stitching = self.stitching;
        ret
    }

    // --- Evaluation ----------------------------------------------------

    /// Split a flat time into a curve index and a time on that curve.
    ///
    /// The end of the path maps to the end of its last curve.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::TimeOutOfRange`] outside of `[0, size]`.
    pub fn factor_time(&self, t: f64) -> Result<PathTime, PathError> {
        let size = self.size_default();
        let max = size as f64;
        if !(0.0..=max).contains(&t) {
            return Err(PathError::TimeOutOfRange { time: t, max });
        }
        if size == 0 {
            return Ok(PathTime::new(0, 0.0));
        }
        let (k, frac) = split_time(t);
        let index = k as usize;
        if index == size {
            return Ok(PathTime::new(size - 1, 1.0));
        }
        Ok(PathTime::new(index, frac))
    }

    /// The curve containing flat time `t`, and the time on that curve.
    ///
    /// # Errors
    ///
    /// See [`factor_time`](Self::factor_time).
    pub fn curve_at(&self, t: f64) -> Result<(&Curve, f64), PathError> {
        let pos = self.factor_time(t)?;
        Ok((&self.data.curves[pos.curve_index], pos.t))
    }

    /// The point at flat time `t`.
    ///
    /// # Errors
    ///
    /// See [`factor_time`](Self::factor_time).
    pub fn point_at(&self, t: f64) -> Result<Point, PathError> {
        Ok(self.point_at_time(self.factor_time(t)?))
    }

    /// One coordinate of the point at flat time `t`.
    ///
    /// # Errors
    ///
    /// See [`factor_time`](Self::factor_time).
    pub fn value_at(&self, t: f64, axis: Axis) -> Result<f64, PathError> {
        Ok(self.value_at_time(self.factor_time(t)?, axis))
    }

    /// The point at a path time.
    ///
    /// # Panics
    ///
    /// Panics if the curve index is out of range.
    pub fn point_at_time(&self, pos: PathTime) -> Point {
        self.data.curves[pos.curve_index].point_at(pos.t)
    }

    /// One coordinate of the point at a path time.
    ///
    /// # Panics
    ///
    /// Panics if the curve index is out of range.
    pub fn value_at_time(&self, pos: PathTime, axis: Axis) -> f64 {
        self.data.curves[pos.curve_index].value_at(pos.t, axis)
    }

    /// Times at which the coordinate along `axis` equals `v`.
    ///
    /// The closing segment is searched whether or not the path is closed.
    pub fn roots(&self, v: f64, axis: Axis) -> Vec<PathTime> {
        self.data
            .curves
            .iter()
            .enumerate()
            .flat_map(|(i, c)| c.roots(v, axis).into_iter().map(move |t| PathTime::new(i, t)))
            .collect()
    }

    /// The start point of every curve, the closing segment included unless
    /// it is degenerate.
    pub fn nodes(&self) -> Vec<Point> {
        self.data.curves[..self.size_closed()]
            .iter()
            .map(Curve::initial_point)
            .collect()
    }

    /// The path as a piecewise curve with integer cuts.
    ///
    /// Degenerate curves are skipped; a path made only of degenerate curves
    /// becomes a single constant piece.
    pub fn to_piecewise(&self) -> Piecewise {
        let mut ret = Piecewise::default();
        for curve in self.iter().filter(|c| !c.is_degenerate()) {
            ret.push(curve.into_segment());
        }
        if ret.is_empty() {
            ret = Piecewise::constant(self.initial_point());
        }
        ret
    }

    // --- Queries -------------------------------------------------------

    /// All intersections with another path.
    ///
    /// Times are normalized forward, so an intersection at the joint of two
    /// curves is reported once, at the start of the later curve. Results are
    /// sorted by the time on this path.
    pub fn intersect(&self, other: &Path, precision: f64) -> Vec<PathIntersection> {
        let mut sweeper = Sweeper::new(CurveIntersectionSweepSet::new(self, other, precision));
        sweeper.process();
        let mut result = sweeper.into_inner().into_results();

        let (asz, bsz) = (self.size(), other.size());
        for x in &mut result {
            x.first.normalize_forward(asz);
            x.second.normalize_forward(bsz);
        }
        sort_and_dedup(&mut result);
        result
    }

    /// The winding number of the path around `p`.
    ///
    /// The closing segment always takes part, so an open path is treated as
    /// if it were closed. Points on the bottom edge of a curve's box (the one
    /// with the largest y) count as outside of it.
    pub fn winding(&self, p: Point) -> i32 {
        let mut wind = 0;
        for curve in &self.data.curves[..self.size_closed()] {
            let bounds = curve.bounds_fast();
            if bounds.height() == 0.0 {
                continue;
            }
            if p.x > bounds.x1 || !Axis::Vertical.interval(bounds).lower_contains(p.y) {
                continue;
            }
            if p.x < bounds.x0 {
                // Left of the box: the chord crosses the ray just like the curve.
                let (ip, fp) = (curve.initial_point(), curve.final_point());
                if Interval::new(ip.y, fp.y).lower_contains(p.y) {
                    if ip.y < fp.y {
                        wind += 1;
                    } else if ip.y > fp.y {
                        wind -= 1;
                    }
                }
            } else {
                wind += curve.winding(p);
            }
        }
        wind
    }

    /// The nearest point of the path to `p`, and its distance.
    ///
    /// Curves whose bounding box is farther away than the best candidate so
    /// far are skipped.
    pub fn nearest_time(&self, p: Point) -> (PathTime, f64) {
        if self.is_empty() {
            return (PathTime::new(0, 0.0), self.initial_point().distance(p));
        }
        let mut best = (PathTime::new(0, 0.0), f64::MAX);
        for (i, curve) in self.iter().enumerate() {
            if rect_distance(p, curve.bounds_fast()) >= best.1 {
                continue;
            }
            let t = curve.nearest_time(p);
            let d = curve.point_at(t).distance(p);
            if d < best.1 {
                best = (PathTime::new(i, t), d);
            }
        }
        best
    }

    /// Every flat time in `[from, to]` at which the distance to `p` is minimal.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::IntervalOutOfRange`] if the range reaches outside
    /// of the path.
    pub fn all_nearest_times(&self, p: Point, from: f64, to: f64) -> Result<Vec<f64>, PathError> {
        let (from, to) = if from > to { (to, from) } else { (from, to) };
        let sz = self.size_open() + usize::from(self.closed);
        let max = sz as f64;
        if from < 0.0 || to > max {
            return Err(PathError::IntervalOutOfRange { from, to, max });
        }
        if sz == 0 {
            return Ok(vec![0.0]);
        }

        let curves = &self.data.curves;
        let (sif, mut st) = split_time(from);
        let (eif, mut et) = split_time(to);
        let (mut si, mut ei) = (sif as usize, eif as usize);
        if si == sz {
            si -= 1;
            st = 1.0;
        }
        if ei == sz {
            ei -= 1;
            et = 1.0;
        }
        let offset = |i: usize, ts: &[f64]| -> Vec<f64> { ts.iter().map(|t| i as f64 + t).collect() };
        if si == ei {
            return Ok(offset(si, &curves[si].all_nearest_times(p, st, et)));
        }

        let first = curves[si].all_nearest_times(p, st, 1.0);
        let mut min_dsq = curves[si].point_at(first[0]).distance_squared(p);
        let mut candidates = vec![(si, first)];
        for i in si + 1..=ei {
            let bound = rect_distance(p, curves[i].bounds_fast());
            if min_dsq < bound * bound {
                continue;
            }
            let end = if i == ei { et } else { 1.0 };
            let ts = curves[i].all_nearest_times(p, 0.0, end);
            let dsq = curves[i].point_at(ts[0]).distance_squared(p);
            if dsq < min_dsq {
                candidates.clear();
                candidates.push((i, ts));
                min_dsq = dsq;
            } else if dsq == min_dsq {
                candidates.push((i, ts));
            }
        }

        let mut result: Vec<f64> = candidates
            .iter()
            .flat_map(|(i, ts)| offset(*i, ts))
            .collect();
        result.dedup();
        Ok(result)
    }

    /// The nearest time on each curve of the path.
    pub fn nearest_time_per_curve(&self, p: Point) -> Vec<f64> {
        self.iter().map(|c| c.nearest_time(p)).collect()
    }
}

impl Index<usize> for Path {
    type Output = Curve;

    /// The curve at `index`; the closing segment sits at `size_open()`.
    fn index(&self, index: usize) -> &Curve {
        &self.data.curves[index]
    }
}

impl Mul<Path> for Affine {
    type Output = Path;

    fn mul(self, mut path: Path) -> Path {
        path.apply_affine(self);
        path
    }
}

impl Mul<&Path> for Affine {
    type Output = Path;

    fn mul(self, path: &Path) -> Path {
        self * path.clone()
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Curve;
    type IntoIter = slice::Iter<'a, Curve>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Whether two paths have the same number of curves and each pair of
/// curves is near within `precision`.
pub fn are_near(a: &Path, b: &Path, precision: f64) -> bool {
    a.size() == b.size() && a.iter().zip(b.iter()).all(|(x, y)| x.is_near(y, precision))
}

fn check_continuity_of(curves: &[Curve]) -> Result<(), PathError> {
    for (i, curve) in curves.iter().enumerate() {
        let next = &curves[(i + 1) % curves.len()];
        if curve.final_point() != next.initial_point() {
            return Err(PathError::Continuity {
                at: curve.final_point(),
                next: next.initial_point(),
            });
        }
    }
    Ok(())
}

fn resync_closing(curves: &mut [Curve]) {
    let n = curves.len();
    if n == 1 {
        let p = curves[0].initial_point();
        curves[0].set_final(p);
    } else {
        let end = curves[n - 2].final_point();
        let start = curves[0].initial_point();
        curves[n - 1] = Curve::Closing(Line::new(end, start));
    }
}

fn rect_distance(p: Point, r: Rect) -> f64 {
    let dx = (r.x0 - p.x).max(p.x - r.x1).max(0.0);
    let dy = (r.y0 - p.y).max(p.y - r.y1).max(0.0);
    dx.hypot(dy)
}

/// A sequence of curves over consecutive parameter ranges.
///
/// Piece `i` covers `[cuts[i], cuts[i + 1]]`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Piecewise {
    cuts: Vec<f64>,
    segments: Vec<Curve>,
}

impl Piecewise {
    /// A single piece that stays at `p`.
    pub fn constant(p: Point) -> Piecewise {
        Piecewise {
            cuts: vec![0.0, 1.0],
            segments: vec![Curve::Line(Line::new(p, p))],
        }
    }

    /// Add a piece covering the next unit of the domain.
    pub fn push(&mut self, segment: Curve) {
        if self.cuts.is_empty() {
            self.cuts.push(0.0);
        }
        let next = self.cuts[self.cuts.len() - 1] + 1.0;
        self.cuts.push(next);
        self.segments.push(segment);
    }

    /// The parameter values at which pieces meet, ends included.
    pub fn cuts(&self) -> &[f64] {
        &self.cuts
    }

    /// The pieces.
    pub fn segments(&self) -> &[Curve] {
        &self.segments
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether there are no pieces.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The parameter domain.
    pub fn domain(&self) -> Option<Interval> {
        Some(Interval::new(*self.cuts.first()?, *self.cuts.last()?))
    }

    /// The index of the piece containing `t`, clamped to the domain.
    pub fn segment_index(&self, t: f64) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let i = self.cuts.partition_point(|&c| c <= t);
        Some(i.saturating_sub(1).min(self.len() - 1))
    }

    /// The point at parameter `t`, clamped to the domain.
    pub fn point_at(&self, t: f64) -> Option<Point> {
        let i = self.segment_index(t)?;
        let (a, b) = (self.cuts[i], self.cuts[i + 1]);
        let local = ((t - a) / (b - a)).clamp(0.0, 1.0);
        Some(self.segments[i].point_at(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    fn three_cubics() -> Path {
        let mut path = Path::new(pt(0.0, 0.0));
        path.curve_to(pt(1.0, 2.0), pt(2.0, 2.0), pt(3.0, 0.0));
        path.curve_to(pt(4.0, -2.0), pt(5.0, -2.0), pt(6.0, 0.0));
        path.curve_to(pt(7.0, 2.0), pt(8.0, 2.0), pt(9.0, 0.0));
        path
    }

    fn random_path(rng: &mut StdRng) -> Path {
        let mut path = Path::new(pt(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0)));
        for _ in 0..rng.random_range(1..8) {
            let kind = rng.random_range(0..4);
            let mut q = || pt(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
            match kind {
                0 => path.line_to(q()),
                1 => path.quad_to(q(), q()),
                2 => path.curve_to(q(), q(), q()),
                _ => path.arc_to(Vec2::new(3.0, 2.0), 0.3, false, true, q()),
            }
        }
        path.close(rng.random_bool(0.5));
        path
    }

    #[test]
    fn rectangle_path() {
        let r = Rect::new(0.0, 0.0, 2.0, 2.0);
        let path = Path::from_rect(r);
        assert_eq!(path.size(), 4);
        assert_eq!(path.size_open(), 3);
        assert_eq!(path.size_closed(), 4);
        assert!(path.is_closed());
        assert_eq!(path.bounds_exact(), Some(r));
        assert_eq!(path.bounds_fast(), Some(r));
        assert_eq!(path.nodes().len(), 4);
        assert_eq!(path.final_point(), path.initial_point());
        assert!(path.check_continuity().is_ok());
        assert!(path.closing_segment().is_closing());
    }

    #[test]
    fn empty_path() {
        let path = Path::new(pt(1.0, 2.0));
        assert!(path.is_empty());
        assert_eq!(path.size(), 0);
        assert_eq!(path.back_open(), Err(PathError::EmptyPath));
        assert_eq!(path.bounds_fast(), None);
        assert_eq!(path.nearest_time(pt(4.0, 6.0)), (PathTime::new(0, 0.0), 5.0));
        assert_eq!(path.point_at(0.0), Ok(pt(1.0, 2.0)));
        assert_eq!(Path::default().initial_point(), Point::ORIGIN);
    }

    #[test]
    fn rectangle_winding() {
        let path = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(path.winding(pt(2.0, 2.0)), 1);
        assert_eq!(path.winding(pt(5.0, 5.0)), 0);
        assert_eq!(path.winding(pt(-1.0, 2.0)), 0);
        // The edge with the largest y is outside.
        assert_eq!(path.winding(pt(2.0, 4.0)), 0);
        assert_eq!(path.reversed().winding(pt(2.0, 2.0)), -1);
    }

    #[test]
    fn circle_winding() {
        let path = Path::from_circle(Circle::new((0.0, 0.0), 1.0));
        assert_eq!(path.size(), 2);
        assert!(path.is_closed());
        assert_eq!(path.winding(pt(0.0, 0.0)), 1);
        assert_eq!(path.winding(pt(0.5, -0.3)), 1);
        assert_eq!(path.winding(pt(2.0, 0.0)), 0);
        let b = path.bounds_exact().unwrap();
        assert!((b.x0 + 1.0).abs() < 1e-9 && (b.y1 - 1.0).abs() < 1e-9);

        let ellipse = Path::from_ellipse(Ellipse::new((1.0, 1.0), (3.0, 1.0), 0.0));
        assert_eq!(ellipse.winding(pt(3.5, 1.2)), 1);
        assert_eq!(ellipse.winding(pt(1.0, 2.5)), 0);
    }

    #[test]
    fn overlapping_rectangles_cross_twice() {
        let a = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let b = Path::from_rect(Rect::new(2.0, 2.0, 6.0, 6.0));
        let xs = a.intersect(&b, 1e-6);
        let expected = [
            (1, 0, pt(4.0, 2.0)),
            (2, 3, pt(2.0, 4.0)),
        ];
        assert_eq!(xs.len(), 2);
        for (x, (ci, cj, p)) in xs.iter().zip(expected) {
            assert_eq!(x.first.curve_index, ci);
            assert_eq!(x.second.curve_index, cj);
            assert!((x.first.t - 0.5).abs() < 1e-9);
            assert!((x.second.t - 0.5).abs() < 1e-9);
            assert!(x.point.distance(p) < 1e-9);
        }

        // Same intersections seen from the other path.
        let mut ys: Vec<_> = b.intersect(&a, 1e-6).into_iter().map(|x| x.swapped()).collect();
        sort_and_dedup(&mut ys);
        assert_eq!(ys.len(), 2);
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(x.first.curve_index, y.first.curve_index);
            assert!((x.first.t - y.first.t).abs() < 1e-9);
            assert!((x.second.t - y.second.t).abs() < 1e-9);
        }
    }

    #[test]
    fn joint_intersections_collapse() {
        let a = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let mut b = Path::new(pt(4.0, -1.0));
        b.line_to(pt(4.0, 0.0));
        b.line_to(pt(5.0, 1.0));
        // Every hit is at the shared corner, found on several curve pairs.
        let xs = a.intersect(&b, 1e-6);
        assert_eq!(xs.len(), 1);
        assert_eq!(xs[0].first, PathTime::new(1, 0.0));
        assert_eq!(xs[0].second, PathTime::new(1, 0.0));
        assert!(xs[0].point.distance(pt(4.0, 0.0)) < 1e-12);
    }

    #[test]
    fn strict_append_rejects_gap() {
        let mut path = Path::new(pt(0.0, 0.0));
        path.line_to(pt(1.0, 0.0));
        let err = path.append(Line::new(pt(2.0, 0.0), pt(3.0, 0.0)));
        assert_eq!(
            err,
            Err(PathError::Continuity {
                at: pt(1.0, 0.0),
                next: pt(2.0, 0.0)
            })
        );
        assert_eq!(path.size(), 1);

        path.set_stitching(true);
        path.append(Line::new(pt(2.0, 0.0), pt(3.0, 0.0))).unwrap();
        assert_eq!(path.size(), 3);
        assert!(path[1].is_stitch());
        assert!(path.check_continuity().is_ok());
    }

    #[test]
    fn append_on_empty_moves_start() {
        let mut path = Path::new(pt(5.0, 5.0));
        path.append(QuadBez::new((0.0, 0.0), (1.0, 1.0), (2.0, 0.0))).unwrap();
        assert_eq!(path.initial_point(), pt(0.0, 0.0));
        assert_eq!(path.final_point(), pt(2.0, 0.0));
        assert!(path.check_continuity().is_ok());
    }

    #[test]
    fn closing_absorbs_last_line() {
        let mut path = Path::new(pt(0.0, 0.0));
        path.line_to(pt(1.0, 0.0));
        path.line_to(pt(1.0, 1.0));
        path.line_to(pt(0.0, 0.0));
        assert_eq!(path.size(), 3);
        path.close(true);
        assert_eq!(path.size_open(), 2);
        assert_eq!(path.size(), 3);
        assert_eq!(path.closing_segment().initial_point(), pt(1.0, 1.0));

        // A line along the closing segment is dropped.
        path.append(Line::new(pt(1.0, 1.0), pt(0.0, 0.0))).unwrap();
        assert_eq!(path.size_open(), 2);
    }

    #[test]
    fn erase_requires_continuity() {
        let mut path = three_cubics();
        let before = path.clone();
        assert!(matches!(path.erase(1), Err(PathError::Continuity { .. })));
        assert_eq!(path, before);

        path.set_stitching(true);
        path.erase(1).unwrap();
        assert_eq!(path.size(), 3);
        assert!(path[1].is_stitch());
        assert!(path.check_continuity().is_ok());

        // Removing the first curve of an open path needs no stitch.
        let mut path = three_cubics();
        path.erase(0).unwrap();
        assert_eq!(path.size(), 2);
        assert_eq!(path.initial_point(), pt(3.0, 0.0));
        assert!(path.check_continuity().is_ok());

        assert!(matches!(
            path.erase(7),
            Err(PathError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn replace_and_insert() {
        let mut path = three_cubics();
        path.replace(1, Line::new(pt(3.0, 0.0), pt(6.0, 0.0))).unwrap();
        assert!(path[1].is_line_segment());
        assert_eq!(path.size(), 3);

        assert!(path.insert(1, Line::new(pt(3.0, 0.0), pt(4.0, 4.0))).is_err());
        let mut detour = Path::new(pt(3.0, 0.0));
        detour.line_to(pt(3.0, 3.0));
        detour.line_to(pt(3.0, 0.0));
        path.insert_path(1, &detour).unwrap();
        assert_eq!(path.size(), 5);
        assert!(path.check_continuity().is_ok());

        let mut replacement = Path::new(pt(-1.0, -1.0));
        replacement.line_to(pt(1.0, 1.0));
        path.replace_with_path(0, path.size_open() + 1, &replacement).unwrap();
        assert_eq!(path.size(), 1);
        assert_eq!(path.initial_point(), pt(-1.0, -1.0));
        assert_eq!(path.closing_segment().final_point(), pt(-1.0, -1.0));
    }

    #[test]
    fn append_paths() {
        let mut a = Path::new(pt(0.0, 0.0));
        a.line_to(pt(1.0, 0.0));
        let mut b = Path::new(pt(1.0, 0.0));
        b.line_to(pt(1.0, 1.0));
        b.line_to(pt(0.0, 1.0));
        a.append_path(&b).unwrap();
        assert_eq!(a.size(), 3);
        assert_eq!(a.final_point(), pt(0.0, 1.0));

        let c = Path::from_rect(Rect::new(5.0, 5.0, 6.0, 6.0));
        assert!(a.append_path(&c).is_err());
        a.set_stitching(true);
        a.append_path(&c).unwrap();
        assert_eq!(a.size(), 3 + 1 + 4);
        assert!(a.check_continuity().is_ok());
    }

    #[test]
    fn end_point_edits() {
        let mut path = three_cubics();
        path.set_initial(pt(0.0, 1.0)).unwrap();
        path.set_final(pt(9.0, 1.0)).unwrap();
        assert_eq!(path.initial_point(), pt(0.0, 1.0));
        assert_eq!(path.final_point(), pt(9.0, 1.0));
        assert!(path.check_continuity().is_ok());

        let mut closed = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert!(closed.set_initial(pt(0.5, 0.0)).is_err());

        let mut nearly = Path::new(pt(0.0, 0.0));
        nearly.line_to(pt(1.0, 0.0));
        nearly.line_to(pt(1.0, 1.0));
        nearly.line_to(pt(1e-9, 0.0));
        nearly.close(true);
        nearly.snap_ends(1e-6);
        assert!(nearly.closing_segment().is_degenerate());
        assert_eq!(nearly.size(), 3);
        assert!(nearly.check_continuity().is_ok());

        nearly.start(pt(3.0, 3.0));
        assert!(nearly.is_empty());
        assert_eq!(nearly.initial_point(), pt(3.0, 3.0));
        nearly.clear();
        assert!(!nearly.is_closed());
    }

    #[test]
    fn reverse_is_involution() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..50 {
            let path = random_path(&mut rng);
            let reversed = path.reversed();
            assert!(reversed.check_continuity().is_ok());
            assert_eq!(reversed.size(), path.size());
            assert_eq!(reversed.reversed(), path);
        }

        let rect = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(rect.reversed().reversed(), rect);
        let circle = Path::from_circle(Circle::new((0.0, 0.0), 2.0));
        assert_eq!(circle.reversed().reversed(), circle);
    }

    #[test]
    fn portions_rebuild_path() {
        let path = three_cubics();
        let mut rebuilt = path.portion(0.0, 1.5).unwrap();
        path.append_portion_to(&mut rebuilt, 1.5, 2.25).unwrap();
        path.append_portion_to(&mut rebuilt, 2.25, 3.0).unwrap();
        assert_eq!(rebuilt.size(), 5);
        assert_eq!(rebuilt.initial_point(), path.initial_point());
        assert_eq!(rebuilt.final_point(), path.final_point());
        assert_eq!(rebuilt.point_at(2.0), path.point_at(1.5));
        assert!(rebuilt.check_continuity().is_ok());

        // Zero as the end time means the end of the path.
        let tail = path.portion(2.5, 0.0).unwrap();
        assert_eq!(tail.size(), 1);
        assert_eq!(tail.final_point(), path.final_point());

        assert!(matches!(
            path.portion(-1.0, 2.0),
            Err(PathError::TimeOutOfRange { .. })
        ));
    }

    #[test]
    fn random_portions_are_continuous() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..30 {
            let mut path = random_path(&mut rng);
            path.close(false);
            let size = path.size() as f64;
            let a = rng.random_range(0.0..size);
            let b = rng.random_range(a..=size);
            let mut rebuilt = path.portion(0.0, a).unwrap();
            path.append_portion_to(&mut rebuilt, a, b).unwrap();
            path.append_portion_to(&mut rebuilt, b, size).unwrap();
            assert!(rebuilt.check_continuity().is_ok());
            assert!(rebuilt.final_point().distance(path.final_point()) < 1e-9);
        }
    }

    #[test]
    fn wrapping_portion() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let wrapped = rect.portion(3.5, 0.5).unwrap();
        assert_eq!(wrapped.size(), 2);
        assert_eq!(wrapped.initial_point(), pt(0.0, 2.0));
        assert_eq!(wrapped.final_point(), pt(2.0, 0.0));
    }

    #[test]
    fn interval_portions() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let ival = PathInterval::new(PathTime::new(0, 0.5), PathTime::new(2, 0.5), false, 4);
        let forward = rect.portion_interval(&ival).unwrap();
        assert_eq!(forward.size(), 3);
        assert_eq!(forward.initial_point(), pt(2.0, 0.0));
        assert_eq!(forward.final_point(), pt(2.0, 4.0));

        let back = PathInterval::from_direction(PathTime::new(2, 0.5), PathTime::new(0, 0.5), true, 4);
        let backward = rect.portion_interval(&back).unwrap();
        assert_eq!(backward.size(), 3);
        assert_eq!(backward.initial_point(), pt(2.0, 4.0));
        assert_eq!(backward.nodes()[1], pt(4.0, 4.0));
        assert_eq!(backward.final_point(), pt(2.0, 0.0));

        let wrap = PathInterval::new(PathTime::new(3, 0.5), PathTime::new(0, 0.5), true, 4);
        let mut target = Path::new(Point::ORIGIN);
        rect.append_portion_interval_to(&mut target, &wrap, Some(pt(0.0, 2.5)), None)
            .unwrap();
        assert_eq!(target.size(), 2);
        assert_eq!(target.initial_point(), pt(0.0, 2.5));

        let single = PathInterval::new(PathTime::new(1, 0.25), PathTime::new(1, 0.75), false, 4);
        assert_eq!(rect.portion_interval(&single).unwrap().size(), 1);

        let mismatched = PathInterval::new(PathTime::new(0, 0.5), PathTime::new(1, 0.5), false, 3);
        assert_eq!(
            rect.portion_interval(&mismatched),
            Err(PathError::PathSizeMismatch {
                interval: 3,
                path: 4
            })
        );
    }

    #[test]
    fn degenerate_interval_stitches_target() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let ival = PathInterval::new(PathTime::new(1, 0.5), PathTime::new(1, 0.5), false, 4);
        let mut target = Path::new(pt(4.0, 0.0));
        target.line_to(pt(4.0, 1.0));
        target.set_stitching(true);
        rect.append_portion_interval_to(&mut target, &ival, None, None)
            .unwrap();
        assert_eq!(target.final_point(), pt(4.0, 2.0));
        assert!(target[1].is_stitch());
    }

    #[test]
    fn nearest_queries() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let (time, dist) = rect.nearest_time(pt(2.0, -1.0));
        assert_eq!(time, PathTime::new(0, 0.5));
        assert!((dist - 1.0).abs() < 1e-12);

        let all = rect.all_nearest_times(pt(2.0, 2.0), 0.0, 4.0).unwrap();
        assert_eq!(all, vec![0.5, 1.5, 2.5, 3.5]);
        let some = rect.all_nearest_times(pt(2.0, 2.0), 1.0, 0.0).unwrap();
        assert_eq!(some, vec![0.5]);
        assert!(matches!(
            rect.all_nearest_times(pt(2.0, 2.0), 0.0, 5.0),
            Err(PathError::IntervalOutOfRange { .. })
        ));

        let per_curve = rect.nearest_time_per_curve(pt(2.0, 2.0));
        assert_eq!(per_curve, vec![0.5; 4]);
    }

    #[test]
    fn flat_times() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        assert_eq!(rect.time_range(), Interval::new(0.0, 4.0));
        assert_eq!(rect.factor_time(4.0), Ok(PathTime::new(3, 1.0)));
        assert_eq!(rect.factor_time(1.25), Ok(PathTime::new(1, 0.25)));
        assert!(matches!(
            rect.factor_time(4.5),
            Err(PathError::TimeOutOfRange { .. })
        ));
        assert_eq!(rect.point_at(2.5), Ok(pt(2.0, 4.0)));
        assert_eq!(rect.value_at(1.5, Axis::Vertical), Ok(2.0));
        let (curve, t) = rect.curve_at(3.5).unwrap();
        assert!(curve.is_closing());
        assert_eq!(t, 0.5);

        let roots = rect.roots(2.0, Axis::Horizontal);
        assert_eq!(roots, vec![PathTime::new(0, 0.5), PathTime::new(2, 0.5)]);
    }

    #[test]
    fn piecewise_form() {
        let rect = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let pw = rect.to_piecewise();
        assert_eq!(pw.len(), 4);
        assert_eq!(pw.cuts(), &[0.0, 1.0, 2.0, 3.0, 4.0]);
        assert_eq!(pw.point_at(3.5), Some(pt(0.0, 2.0)));
        assert_eq!(pw.domain(), Some(Interval::new(0.0, 4.0)));

        let dot = Path::new(pt(1.0, 1.0)).to_piecewise();
        assert_eq!(dot.len(), 1);
        assert_eq!(dot.point_at(0.3), Some(pt(1.0, 1.0)));
    }

    #[test]
    fn copy_on_write() {
        let a = three_cubics();
        let mut b = a.clone();
        assert!(a.is_shared() && b.is_shared());
        b.line_to(pt(10.0, 0.0));
        assert!(!a.is_shared());
        assert_eq!(a.size(), 3);
        assert_eq!(b.size(), 4);

        let mut c = a.clone();
        c.unshare();
        assert!(!c.is_shared());
        assert_eq!(c, a);
        assert!(are_near(&a, &c, 1e-12));
        assert!(!are_near(&a, &b, 1e-12));
    }

    #[test]
    fn random_edits_keep_continuity() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..40 {
            let mut path = random_path(&mut rng);
            path.set_stitching(true);
            if path.size_open() > 1 {
                let first = rng.random_range(0..path.size_open());
                let last = rng.random_range(first..=path.size_open());
                path.erase_range(first, last).unwrap();
            }
            assert!(path.check_continuity().is_ok());
            if !path.is_empty() {
                path.erase_last().unwrap();
            }
            assert!(path.check_continuity().is_ok());
        }
    }

    #[test]
    fn convex_hull_polygon() {
        let hull = ConvexHull::new(vec![pt(0.0, 0.0), pt(3.0, 0.0), pt(3.0, 3.0), pt(0.0, 3.0), pt(1.0, 1.0)]);
        let path = Path::from_convex_hull(&hull);
        assert!(path.is_closed());
        assert_eq!(path.size(), 4);
        assert!(path.check_continuity().is_ok());
        assert_eq!(path.winding(pt(1.5, 1.5)).abs(), 1);
        assert!(Path::from_convex_hull(&ConvexHull::default()).is_empty());
    }

    #[test]
    fn closing_absorbs_stitch() {
        let mut path = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
        path.set_stitching(true);
        let size = path.size_open();
        // A stitch retracing the closing segment adds nothing.
        path.append(Curve::Stitch(Line::new(pt(0.0, 1.0), pt(0.0, 0.0)))).unwrap();
        assert_eq!(path.size_open(), size);
        assert!(path.check_continuity().is_ok());
    }

    #[test]
    fn affine_maps_circle() {
        let circle = Path::from_circle(Circle::new((0.0, 0.0), 1.0));
        let affine = Affine::translate((3.0, -2.0)) * Affine::scale_non_uniform(2.0, 0.5);
        let mapped = affine * &circle;
        assert_eq!(mapped.size(), circle.size());
        assert!(mapped.is_closed());
        assert!(mapped.check_continuity().is_ok());
        for i in 0..=40 {
            let t = i as f64 * circle.size() as f64 / 40.0;
            let p = circle.point_at(t).unwrap();
            let q = mapped.point_at(t).unwrap();
            assert!(q.distance(affine * p) < 1e-9, "{q:?} at {t}");
        }
        assert_eq!(mapped.winding(pt(3.0, -2.0)), 1);
        assert_eq!(mapped.winding(pt(4.5, -2.0)), 1);
        assert_eq!(mapped.winding(pt(3.0, -1.0)), 0);
        let b = mapped.bounds_exact().unwrap();
        assert!((b.x0 - 1.0).abs() < 1e-9 && (b.x1 - 5.0).abs() < 1e-9);
        assert!((b.y0 + 2.5).abs() < 1e-9 && (b.y1 + 1.5).abs() < 1e-9);

        // Reflections reverse the orientation.
        let flipped = Affine::FLIP_X * circle.clone();
        assert_eq!(flipped.winding(pt(0.0, 0.0)), -1);

        // Clones keep the old geometry.
        let mut moved = circle.clone();
        moved.apply_affine(Affine::translate((10.0, 0.0)));
        assert!(!moved.is_shared());
        assert_eq!(circle.winding(pt(0.0, 0.0)), 1);
        assert_eq!(moved.winding(pt(0.0, 0.0)), 0);
        assert_eq!(moved.winding(pt(10.0, 0.0)), 1);
    }

    // Every sampled point of `a` lies on `b`.
    fn assert_traces(a: &Path, b: &Path, tolerance: f64) {
        let samples = 64 * a.size();
        for i in 0..=samples {
            let t = i as f64 * a.size() as f64 / samples as f64;
            let p = a.point_at(t).unwrap();
            let (_, d) = b.nearest_time(p);
            assert!(d < tolerance, "{p:?} at {t} is {d} away");
        }
    }

    #[test]
    fn split_portions_trace_path() {
        let mut mixed = Path::new(pt(0.0, 0.0));
        mixed.line_to(pt(2.0, 1.0));
        mixed.quad_to(pt(4.0, 3.0), pt(5.0, 0.0));
        mixed.arc_to(Vec2::new(2.0, 1.5), 0.3, false, true, pt(8.0, 1.0));
        mixed.quad_to(pt(9.0, -3.0), pt(11.0, -1.0));

        let mut rng = StdRng::seed_from_u64(11);
        for (path, tolerance) in [(mixed, 1e-9), (three_cubics(), 1e-8)] {
            let size = path.size() as f64;
            for _ in 0..8 {
                let cut = rng.random_range(0.1..size - 0.1);
                let mut rebuilt = path.portion(0.0, cut).unwrap();
                rebuilt.append_path(&path.portion(cut, size).unwrap()).unwrap();
                assert_eq!(rebuilt.initial_point(), path.initial_point());
                assert_eq!(rebuilt.final_point(), path.final_point());
                assert_traces(&path, &rebuilt, tolerance);
                assert_traces(&rebuilt, &path, tolerance);
            }
        }
    }

    #[test]
    fn curved_intersections_are_symmetric() {
        let circle = Path::from_circle(Circle::new((0.0, 0.0), 2.0));
        let mut wave = Path::new(pt(-3.0, 0.5));
        wave.curve_to(pt(-2.0, 1.5), pt(-1.0, -0.5), pt(0.5, 0.5));
        wave.quad_to(pt(2.0, 1.0), pt(3.0, -0.5));

        let xs = circle.intersect(&wave, 1e-6);
        let mut ys: Vec<_> = wave
            .intersect(&circle, 1e-6)
            .into_iter()
            .map(|x| x.swapped())
            .collect();
        sort_and_dedup(&mut ys);
        assert_eq!(xs.len(), 2);
        assert_eq!(ys.len(), xs.len());
        for (x, y) in xs.iter().zip(&ys) {
            assert_eq!(x.first.curve_index, y.first.curve_index);
            assert_eq!(x.second.curve_index, y.second.curve_index);
            assert!((x.first.t - y.first.t).abs() < 1e-6);
            assert!((x.second.t - y.second.t).abs() < 1e-6);
            assert!(circle.point_at_time(x.first).distance(x.point) < 1e-6);
            assert!(wave.point_at_time(x.second).distance(x.point) < 1e-6);
        }
        // One crossing on the cubic, one on the quad.
        assert_eq!(xs.iter().filter(|x| x.second.curve_index == 0).count(), 1);
        assert_eq!(xs.iter().filter(|x| x.second.curve_index == 1).count(), 1);
    }
}

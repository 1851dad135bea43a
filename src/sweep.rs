// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sweep-line pruning of pairwise curve tests.
//!
//! Items are projected onto one axis. An item becomes active when the sweep
//! reaches the start of its projection and inactive when it passes the end,
//! so only items whose projections overlap are ever active together.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;

use crate::{Axis, Interval, Path, PathIntersection, PathTime};

/// A set of items that a [`Sweeper`] activates and deactivates.
///
/// Items are addressed by their index in `0..len()`.
pub trait SweepSet {
    /// The number of items.
    fn len(&self) -> usize;

    /// Whether the set holds no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The extent of item `index` along the sweep axis.
    fn item_bounds(&self, index: usize) -> Interval;

    /// Called when the sweep line reaches the start of the item.
    fn insert(&mut self, index: usize);

    /// Called when the sweep line leaves the end of the item.
    fn remove(&mut self, index: usize);
}

/// Drives a [`SweepSet`] over the events of its items in coordinate order.
#[derive(Debug)]
pub struct Sweeper<S> {
    set: S,
}

impl<S: SweepSet> Sweeper<S> {
    /// Create a sweeper over `set`.
    pub fn new(set: S) -> Sweeper<S> {
        Sweeper { set }
    }

    /// Run the sweep.
    ///
    /// At equal coordinates entries are processed before exits, so items
    /// that merely touch are active at the same time.
    pub fn process(&mut self) {
        let n = self.set.len();
        if n == 0 {
            return;
        }
        let bounds: Vec<Interval> = (0..n).map(|i| self.set.item_bounds(i)).collect();
        let mut entries: Vec<usize> = (0..n).collect();
        entries.sort_by(|&a, &b| bounds[a].min().total_cmp(&bounds[b].min()));
        let mut exits: Vec<usize> = (0..n).collect();
        exits.sort_by(|&a, &b| bounds[a].max().total_cmp(&bounds[b].max()));

        let (mut next_entry, mut next_exit) = (0, 0);
        while next_exit < n {
            let exit = exits[next_exit];
            if next_entry < n && bounds[entries[next_entry]].min() <= bounds[exit].max() {
                self.set.insert(entries[next_entry]);
                next_entry += 1;
            } else {
                self.set.remove(exit);
                next_exit += 1;
            }
        }
    }

    /// The swept set.
    pub fn set(&self) -> &S {
        &self.set
    }

    /// Consume the sweeper, returning the swept set.
    pub fn into_inner(self) -> S {
        self.set
    }
}

#[derive(Clone, Copy, Debug)]
struct CurveRecord {
    bounds: Rect,
    index: usize,
    which: usize,
}

/// Finds the intersections between the curves of two paths.
///
/// Curves of the two paths are swept together; each curve that becomes
/// active is tested against the active curves of the other path whose
/// bounding boxes overlap its own.
#[derive(Debug)]
pub struct CurveIntersectionSweepSet<'a> {
    paths: [&'a Path; 2],
    precision: f64,
    axis: Axis,
    records: Vec<CurveRecord>,
    active: [Vec<usize>; 2],
    // Position of each record within its active list.
    slots: Vec<usize>,
    results: Vec<PathIntersection>,
}

impl<'a> CurveIntersectionSweepSet<'a> {
    /// Prepare a sweep over the curves of `a` and `b`.
    pub fn new(a: &'a Path, b: &'a Path, precision: f64) -> CurveIntersectionSweepSet<'a> {
        let mut records = Vec::with_capacity(a.size() + b.size());
        for (which, path) in [a, b].into_iter().enumerate() {
            records.extend((0..path.size()).map(|index| CurveRecord {
                bounds: path[index].bounds_fast(),
                index,
                which,
            }));
        }

        let union = match (a.bounds_fast(), b.bounds_fast()) {
            (Some(ra), Some(rb)) => Some(ra.union(rb)),
            (ra, rb) => ra.or(rb),
        };
        let axis = match union {
            Some(r) if r.height() > r.width() => Axis::Vertical,
            _ => Axis::Horizontal,
        };

        let slots = vec![0; records.len()];
        CurveIntersectionSweepSet {
            paths: [a, b],
            precision,
            axis,
            records,
            active: [Vec::new(), Vec::new()],
            slots,
            results: Vec::new(),
        }
    }

    /// The axis the curves are swept along.
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The intersections found so far, times on the first path first.
    pub fn results(&self) -> &[PathIntersection] {
        &self.results
    }

    /// Consume the set, returning the intersections found.
    pub fn into_results(self) -> Vec<PathIntersection> {
        self.results
    }
}

impl SweepSet for CurveIntersectionSweepSet<'_> {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn item_bounds(&self, index: usize) -> Interval {
        self.axis.interval(self.records[index].bounds)
    }

    fn insert(&mut self, index: usize) {
        let rec = self.records[index];
        let other = 1 - rec.which;
        let paths = self.paths;
        let curve = &paths[rec.which][rec.index];
        for &j in &self.active[other] {
            let orec = self.records[j];
            if !boxes_touch(rec.bounds, orec.bounds) {
                continue;
            }
            let other_curve = &paths[other][orec.index];
            let xs = curve.intersect(other_curve, self.precision);
            if !xs.is_empty() {
                log::trace!(
                    "sweep: {} hits between curve {} of path {} and curve {} of path {}",
                    xs.len(),
                    rec.index,
                    rec.which,
                    orec.index,
                    other
                );
            }
            for x in xs {
                let tw = PathTime::new(rec.index, x.first);
                let tow = PathTime::new(orec.index, x.second);
                let (first, second) = if rec.which == 0 { (tw, tow) } else { (tow, tw) };
                self.results
                    .push(PathIntersection::new(first, second, x.point));
            }
        }
        self.slots[index] = self.active[rec.which].len();
        self.active[rec.which].push(index);
    }

    fn remove(&mut self, index: usize) {
        let which = self.records[index].which;
        let list = &mut self.active[which];
        let pos = self.slots[index];
        debug_assert_eq!(list[pos], index, "active slot table out of sync");
        list.swap_remove(pos);
        if let Some(&moved) = list.get(pos) {
            self.slots[moved] = pos;
        }
    }
}

// Closed boxes overlap, shared edges included.
#[inline]
fn boxes_touch(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;

    struct Spans {
        spans: Vec<Interval>,
        active: Vec<usize>,
        pairs: Vec<(usize, usize)>,
        max_active: usize,
    }

    impl Spans {
        fn new(spans: Vec<Interval>) -> Spans {
            Spans {
                spans,
                active: Vec::new(),
                pairs: Vec::new(),
                max_active: 0,
            }
        }
    }

    impl SweepSet for Spans {
        fn len(&self) -> usize {
            self.spans.len()
        }

        fn item_bounds(&self, index: usize) -> Interval {
            self.spans[index]
        }

        fn insert(&mut self, index: usize) {
            for &j in &self.active {
                self.pairs.push((j.min(index), j.max(index)));
            }
            self.active.push(index);
            self.max_active = self.max_active.max(self.active.len());
        }

        fn remove(&mut self, index: usize) {
            self.active.retain(|&i| i != index);
        }
    }

    #[test]
    fn overlapping_spans_meet() {
        let mut sweeper = Sweeper::new(Spans::new(vec![
            Interval::new(0.0, 1.0),
            Interval::new(1.0, 2.0),
            Interval::new(3.0, 4.0),
            Interval::new(0.5, 3.5),
        ]));
        sweeper.process();
        let mut spans = sweeper.into_inner();
        spans.pairs.sort_unstable();
        // Touching at 1.0 still counts.
        assert_eq!(spans.pairs, vec![(0, 1), (0, 3), (1, 3), (2, 3)]);
        assert!(spans.active.is_empty());
        assert_eq!(spans.max_active, 3);
    }

    #[test]
    fn disjoint_spans_never_coexist() {
        let mut sweeper = Sweeper::new(Spans::new(
            (0..5)
                .map(|i| Interval::new(2.0 * i as f64, 2.0 * i as f64 + 1.0))
                .collect(),
        ));
        sweeper.process();
        assert!(sweeper.set().pairs.is_empty());
        assert_eq!(sweeper.set().max_active, 1);
    }

    #[test]
    fn crossing_rectangles() {
        let a = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
        let b = Path::from_rect(Rect::new(2.0, 2.0, 6.0, 6.0));
        let mut sweeper = Sweeper::new(CurveIntersectionSweepSet::new(&a, &b, 1e-6));
        sweeper.process();
        let set = sweeper.into_inner();
        assert_eq!(set.axis(), Axis::Horizontal);
        let mut points: Vec<Point> = set.results().iter().map(|x| x.point).collect();
        points.sort_by(|p, q| p.x.total_cmp(&q.x));
        assert!(points.len() >= 2);
        assert!(points.iter().any(|p| p.distance(Point::new(4.0, 2.0)) < 1e-6));
        assert!(points.iter().any(|p| p.distance(Point::new(2.0, 4.0)) < 1e-6));
        for x in set.results() {
            assert!(a.point_at_time(x.first).distance(x.point) < 1e-6);
            assert!(b.point_at_time(x.second).distance(x.point) < 1e-6);
        }
    }

    #[test]
    fn tall_union_sweeps_vertically() {
        let a = Path::from_rect(Rect::new(0.0, 0.0, 1.0, 10.0));
        let b = Path::from_rect(Rect::new(0.5, 2.0, 1.5, 3.0));
        let set = CurveIntersectionSweepSet::new(&a, &b, 1e-6);
        assert_eq!(set.axis(), Axis::Vertical);
        assert_eq!(set.len(), 8);
    }
}

// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contiguous curve paths and their intersections.
//!
//! A [`Path`] is a sequence of [`Curve`]s where each curve starts exactly
//! where the previous one ends, followed by a closing segment leading back
//! to the start. Positions on a path are addressed by [`PathTime`]s, and
//! stretches of it by [`PathInterval`]s; both stay meaningful when the path
//! is reversed or cut into portions.
//!
//! Intersections between two paths are found in two phases. A sweep over
//! the curves' bounding boxes ([`Sweeper`], [`CurveIntersectionSweepSet`])
//! picks the pairs of curves that may meet, and Bézier clipping
//! ([`bezier_clipping`]) finds where they do.
//!
//! # Examples
//!
//! ```
//! use kurbo::{Point, Rect};
//! use kurbo_path::Path;
//!
//! let a = Path::from_rect(Rect::new(0.0, 0.0, 4.0, 4.0));
//! let b = Path::from_rect(Rect::new(2.0, 2.0, 6.0, 6.0));
//!
//! let crossings = a.intersect(&b, 1e-6);
//! assert_eq!(crossings.len(), 2);
//! assert!(crossings[0].point.distance(Point::new(4.0, 2.0)) < 1e-9);
//!
//! assert_eq!(a.winding(Point::new(1.0, 1.0)), 1);
//! assert_eq!(a.winding(Point::new(5.0, 5.0)), 0);
//! ```
//!
//! Paths are edited through methods that keep them contiguous:
//!
//! ```
//! use kurbo::{Line, Point};
//! use kurbo_path::{Path, PathError};
//!
//! let mut path = Path::new(Point::new(0.0, 0.0));
//! path.line_to((1.0, 0.0));
//! path.curve_to((2.0, 1.0), (3.0, 1.0), (4.0, 0.0));
//!
//! // A curve that does not start at the end of the path is rejected...
//! let gap = Line::new((5.0, 0.0), (6.0, 0.0));
//! assert!(matches!(path.append(gap), Err(PathError::Continuity { .. })));
//!
//! // ...unless gaps may be bridged.
//! path.set_stitching(true);
//! path.append(gap).unwrap();
//! assert!(path[2].is_stitch());
//! ```
//!
//! # Features
//!
//! This crate either uses the standard library or the [`libm`] crate for
//! math functionality. The `std` feature is enabled by default, but can be
//! disabled, as long as the `libm` feature is enabled. This is useful for
//! `no_std` environments. The crate still uses the `alloc` crate regardless.
//!
//! The `serde` feature adds serialization to the value types.
//!
//! [`libm`]: https://docs.rs/libm

#![forbid(unsafe_code)]
#![deny(missing_docs, clippy::trivially_copy_pass_by_ref)]
#![warn(clippy::doc_markdown, rustdoc::broken_intra_doc_links)]
#![warn(clippy::semicolon_if_nothing_returned)]
#![warn(unused_qualifications)]
#![allow(
    clippy::unreadable_literal,
    clippy::many_single_char_names,
    clippy::excessive_precision,
    clippy::bool_to_int_with_if
)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![cfg_attr(all(not(feature = "std"), not(test)), no_std)]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("kurbo_path requires either the `std` or `libm` feature");

extern crate alloc;

mod arc;
mod axis;
pub mod bezier_clipping;
pub mod common;
mod convex_hull;
mod curve;
mod error;
mod interval;
mod path;
mod path_time;
mod sweep;

pub use crate::arc::EllipticalArc;
pub use crate::axis::Axis;
pub use crate::bezier_clipping::{
    find_collinear_normal, find_collinear_normal_with_budget, find_intersections_bezier_clipping,
    find_intersections_with_budget, ClipBudget,
};
pub use crate::convex_hull::ConvexHull;
pub use crate::curve::Curve;
pub use crate::error::PathError;
pub use crate::interval::Interval;
pub use crate::path::{are_near, Path, Piecewise};
pub use crate::path_time::{
    CurveIntersection, Intersection, PathInterval, PathIntersection, PathTime,
};
pub use crate::sweep::{CurveIntersectionSweepSet, SweepSet, Sweeper};

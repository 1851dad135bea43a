// Copyright 2018 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common numerical helpers shared by the path and clipping code.

use kurbo::Point;

/// Defines a trait that chooses between libstd or libm implementations of float methods.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident;
    )+) => {
        #[cfg(not(feature = "std"))]
        pub(crate) trait FloatFuncs : Sized {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("kurbo_path requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs;
    fn acos(self) -> Self => acos;
    fn atan2(self, other: Self) -> Self => atan2;
    fn ceil(self) -> Self => ceil;
    fn floor(self) -> Self => floor;
    fn hypot(self, other: Self) -> Self => hypot;
    fn sin_cos(self) -> (Self, Self) => sincos;
    fn sqrt(self) -> Self => sqrt;
    fn tan(self) -> Self => tan;
    fn trunc(self) -> Self => trunc;
}

/// Default tolerance for geometric comparisons.
pub const EPSILON: f64 = 1e-6;

/// Whether two numbers differ by at most `eps`.
#[inline]
pub fn are_near(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// Whether two points lie within `eps` of each other.
#[inline]
pub fn are_near_points(a: Point, b: Point, eps: f64) -> bool {
    are_near(a.distance(b), 0.0, eps)
}

/// Linear interpolation, `a` at `t == 0` and `b` at `t == 1`.
#[inline]
pub(crate) fn lerp(t: f64, a: f64, b: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Split a flat time into its integral and fractional parts, like C's `modf`.
#[inline]
pub(crate) fn split_time(t: f64) -> (f64, f64) {
    let whole = t.trunc();
    (whole, t - whole)
}

/// The next representable `f64` after `x` in the direction of `toward`.
pub fn next_after(x: f64, toward: f64) -> f64 {
    if x.is_nan() || toward.is_nan() {
        return f64::NAN;
    }
    if x == toward {
        return toward;
    }
    if x == 0.0 {
        let tiny = f64::from_bits(1);
        return if toward > 0.0 { tiny } else { -tiny };
    }
    let bits = x.to_bits();
    let up = (toward > x) == (x > 0.0);
    f64::from_bits(if up { bits + 1 } else { bits - 1 })
}

/// The binomial coefficient `n` choose `k`, as a float.
pub(crate) fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result = result * (n - i) as f64 / (i + 1) as f64;
    }
    result
}

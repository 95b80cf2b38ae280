//! Interpolation utilities

use crate::numeric::{AccumFixed, FixedPoint, Vec4};

/// Describes a type that can be interpolated between vertices.
///
/// The clipper uses `linear_interpolate` to place vertices on clip plane intersections, and the
/// rasterizer uses `barycentric_interpolate` with perspective-corrected weights for each fragment.
///
/// All weights are in the core fixed-point format and are expected to lie in `[0, 1]`.
pub trait Interpolate {
    /// Interpolate the three values with their corresponding barycentric coordinate weight
    fn barycentric_interpolate(u: FixedPoint, x1: &Self, v: FixedPoint, x2: &Self, w: FixedPoint, x3: &Self) -> Self;

    /// Simple linear interpolation, `x1` at `t = 0` and `x2` at `t = 1`
    fn linear_interpolate(t: FixedPoint, x1: &Self, x2: &Self) -> Self;
}

impl Interpolate for () {
    #[inline(always)]
    fn barycentric_interpolate(_: FixedPoint, _: &Self, _: FixedPoint, _: &Self, _: FixedPoint, _: &Self) -> Self { () }

    #[inline(always)]
    fn linear_interpolate(_: FixedPoint, _: &Self, _: &Self) -> Self { () }
}

impl Interpolate for FixedPoint {
    #[inline]
    fn barycentric_interpolate(u: FixedPoint, x1: &Self, v: FixedPoint, x2: &Self, w: FixedPoint, x3: &Self) -> Self {
        let a: AccumFixed = u.mul_into(*x1);
        let b: AccumFixed = v.mul_into(*x2);
        let c: AccumFixed = w.mul_into(*x3);

        (a + b + c).convert()
    }

    #[inline]
    fn linear_interpolate(t: FixedPoint, x1: &Self, x2: &Self) -> Self {
        let delta: AccumFixed = x2.convert::<48, 13>() - x1.convert();
        let step: AccumFixed = t.mul_into(delta);

        (x1.convert::<48, 13>() + step).convert()
    }
}

impl Interpolate for Vec4 {
    #[inline]
    fn barycentric_interpolate(u: FixedPoint, x1: &Self, v: FixedPoint, x2: &Self, w: FixedPoint, x3: &Self) -> Self {
        Vec4::from_fn(|i, _| Interpolate::barycentric_interpolate(u, &x1[i], v, &x2[i], w, &x3[i]))
    }

    #[inline]
    fn linear_interpolate(t: FixedPoint, x1: &Self, x2: &Self) -> Self {
        x1.zip_map(x2, |a, b| Interpolate::linear_interpolate(t, &a, &b))
    }
}

impl<T, const N: usize> Interpolate for [T; N] where T: Interpolate {
    #[inline]
    fn barycentric_interpolate(u: FixedPoint, x1: &Self, v: FixedPoint, x2: &Self, w: FixedPoint, x3: &Self) -> Self {
        std::array::from_fn(|i| T::barycentric_interpolate(u, &x1[i], v, &x2[i], w, &x3[i]))
    }

    #[inline]
    fn linear_interpolate(t: FixedPoint, x1: &Self, x2: &Self) -> Self {
        std::array::from_fn(|i| T::linear_interpolate(t, &x1[i], &x2[i]))
    }
}

//! Fixed-point number formats used throughout the pipeline

use nalgebra::Vector4;

pub mod fixed;
pub mod reciprocal;

pub use self::fixed::Fixed;
pub use self::reciprocal::{Reciprocal, ReciprocalUnit, DEFAULT_RECIPROCAL_STEPS};

/// Core attribute format, 13 integer bits and 13 fractional bits
pub type FixedPoint = Fixed<13, 13>;

/// Register and framebuffer-facing format, 16 integer bits and 16 fractional bits
pub type FixedPointMem = Fixed<16, 16>;

/// Screen-space positions, snapped to 1/16th of a pixel
pub type ScreenFixed = Fixed<16, 4>;

/// Edge function values. A product of two `ScreenFixed` differences is exact in this format.
pub type EdgeFixed = Fixed<40, 8>;

/// Accumulator for weighted attribute sums in the rasterizer
pub type AccumFixed = Fixed<48, 13>;

/// Reciprocals with enough fractional bits to normalize large edge sums
pub type RecipFixed = Fixed<16, 44>;

/// Intersection parameters along clipped edges
pub type WideFixed = Fixed<20, 40>;

/// Four-component attribute vector in the core format
pub type Vec4 = Vector4<FixedPoint>;

/// Builds a `Vec4` from floating point components, rounding each to nearest.
#[inline]
pub fn vec4(x: f64, y: f64, z: f64, w: f64) -> Vec4 {
    Vec4::new(FixedPoint::from_f64(x), FixedPoint::from_f64(y), FixedPoint::from_f64(z), FixedPoint::from_f64(w))
}

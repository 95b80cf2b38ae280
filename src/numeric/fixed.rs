//! Saturating signed fixed-point scalar

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_traits::{Bounded, One, Zero};

/// Signed fixed-point number with `INT` integer bits (sign included) and `FRAC` fractional bits.
///
/// The raw value is stored in an `i64`, so `INT + FRAC` must not exceed 63. Every arithmetic
/// operation saturates to `[-2^(INT-1), 2^(INT-1))` instead of wrapping, and every conversion that
/// drops fractional bits rounds to nearest.
///
/// Products are always computed in 128 bits before being rescaled, so `mul_into` can deliver the
/// product of two different formats in a third one without intermediate overflow.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed<const INT: u32, const FRAC: u32>(i64);

impl<const INT: u32, const FRAC: u32> Fixed<INT, FRAC> {
    /// Total number of bits in the format
    pub const BITS: u32 = INT + FRAC;
    /// Number of fractional bits in the format
    pub const FRAC_BITS: u32 = FRAC;

    pub const MAX: Self = Fixed((1i64 << (INT + FRAC - 1)) - 1);
    pub const MIN: Self = Fixed(-(1i64 << (INT + FRAC - 1)));
    pub const ZERO: Self = Fixed(0);
    /// One, which every format used by the pipeline can represent exactly (`INT >= 2`)
    pub const ONE: Self = Fixed(1i64 << FRAC);
    /// Smallest positive value, one unit in the last place
    pub const EPSILON: Self = Fixed(1);

    /// Creates a value from its raw representation, saturating it into range.
    #[inline]
    pub fn from_raw(raw: i64) -> Self {
        Self::saturate_wide(raw as i128)
    }

    /// Returns the raw representation
    #[inline(always)]
    pub fn raw(self) -> i64 { self.0 }

    #[inline]
    pub fn from_int(value: i64) -> Self {
        Self::saturate_wide(shift_left_saturating(value as i128, FRAC))
    }

    /// Converts from floating point, rounding to nearest.
    ///
    /// Only meant for the edges of the pipeline (tests, register setup), stage arithmetic never
    /// goes through floating point.
    #[inline]
    pub fn from_f64(value: f64) -> Self {
        Self::saturate_wide((value * (1u64 << FRAC) as f64).round() as i128)
    }

    #[inline]
    pub fn to_f64(self) -> f64 {
        self.0 as f64 / (1u64 << FRAC) as f64
    }

    /// Changes format, rounding dropped fractional bits and saturating the integer part.
    #[inline]
    pub fn convert<const I2: u32, const F2: u32>(self) -> Fixed<I2, F2> {
        Fixed::saturate_wide(rescale(self.0 as i128, FRAC, F2))
    }

    /// Multiplies two values of any format and delivers the product in a third format.
    #[inline]
    pub fn mul_into<const IR: u32, const FR: u32, const IO: u32, const FO: u32>(self, rhs: Fixed<IR, FR>) -> Fixed<IO, FO> {
        let product = self.0 as i128 * rhs.raw() as i128;

        Fixed::saturate_wide(rescale(product, FRAC + FR, FO))
    }

    /// Largest integer less than or equal to the value
    #[inline]
    pub fn floor(self) -> i64 {
        self.0 >> FRAC
    }

    /// Smallest integer greater than or equal to the value
    #[inline]
    pub fn ceil(self) -> i64 {
        (self.0 + (1i64 << FRAC) - 1) >> FRAC
    }

    /// Divides by two, rounding towards negative infinity
    #[inline]
    pub fn halve(self) -> Self {
        Fixed(self.0 >> 1)
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self::saturate_wide((self.0 as i128).abs())
    }

    #[inline]
    pub fn is_negative(self) -> bool { self.0 < 0 }

    #[inline]
    pub fn is_positive(self) -> bool { self.0 > 0 }

    #[inline]
    pub(crate) fn saturate_wide(raw: i128) -> Self {
        if raw > Self::MAX.0 as i128 {
            Self::MAX
        } else if raw < Self::MIN.0 as i128 {
            Self::MIN
        } else {
            Fixed(raw as i64)
        }
    }
}

/// Moves a raw value from `from` fractional bits to `to` fractional bits.
#[inline]
pub(crate) fn rescale(raw: i128, from: u32, to: u32) -> i128 {
    if to >= from {
        shift_left_saturating(raw, to - from)
    } else {
        shift_right_rounding(raw, from - to)
    }
}

/// Left shift that pins to a huge magnitude instead of losing the sign bit.
///
/// The pinned value is still far outside any `i64` format, so the caller's saturation
/// turns it into that format's `MIN`/`MAX`.
#[inline]
pub(crate) fn shift_left_saturating(raw: i128, shift: u32) -> i128 {
    if raw == 0 {
        return 0;
    }

    if shift >= 126 || raw.unsigned_abs().leading_zeros() <= shift + 1 {
        return if raw < 0 { i128::MIN / 2 } else { i128::MAX / 2 };
    }

    raw << shift
}

/// Right shift rounding half up.
#[inline]
pub(crate) fn shift_right_rounding(raw: i128, shift: u32) -> i128 {
    match shift {
        0 => raw,
        s if s >= 126 => 0,
        s => (raw + (1i128 << (s - 1))) >> s,
    }
}

impl<const INT: u32, const FRAC: u32> fmt::Debug for Fixed<INT, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

impl<const INT: u32, const FRAC: u32> fmt::Display for Fixed<INT, FRAC> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.to_f64(), f)
    }
}

impl<const INT: u32, const FRAC: u32> Add for Fixed<INT, FRAC> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::saturate_wide(self.0 as i128 + rhs.0 as i128)
    }
}

impl<const INT: u32, const FRAC: u32> Sub for Fixed<INT, FRAC> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::saturate_wide(self.0 as i128 - rhs.0 as i128)
    }
}

impl<const INT: u32, const FRAC: u32> Mul for Fixed<INT, FRAC> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.mul_into(rhs)
    }
}

impl<const INT: u32, const FRAC: u32> Neg for Fixed<INT, FRAC> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::saturate_wide(-(self.0 as i128))
    }
}

impl<const INT: u32, const FRAC: u32> AddAssign for Fixed<INT, FRAC> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<const INT: u32, const FRAC: u32> SubAssign for Fixed<INT, FRAC> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<const INT: u32, const FRAC: u32> MulAssign for Fixed<INT, FRAC> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) { *self = *self * rhs; }
}

impl<const INT: u32, const FRAC: u32> Sum for Fixed<INT, FRAC> {
    fn sum<I: Iterator<Item=Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<const INT: u32, const FRAC: u32> Zero for Fixed<INT, FRAC> {
    #[inline(always)]
    fn zero() -> Self { Self::ZERO }

    #[inline(always)]
    fn is_zero(&self) -> bool { self.0 == 0 }
}

impl<const INT: u32, const FRAC: u32> One for Fixed<INT, FRAC> {
    #[inline(always)]
    fn one() -> Self { Self::ONE }
}

impl<const INT: u32, const FRAC: u32> Bounded for Fixed<INT, FRAC> {
    #[inline(always)]
    fn min_value() -> Self { Self::MIN }

    #[inline(always)]
    fn max_value() -> Self { Self::MAX }
}

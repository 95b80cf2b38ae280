//! Newton-Raphson reciprocal unit
//!
//! The dividend is normalized to a mantissa in `[1, 2)` by its leading-zero count, the mantissa
//! reciprocal is refined from a small seed table, and the result is shifted back into whatever
//! fixed-point format the caller wants.

use log::trace;

use crate::error::{RenderError, RenderResult};

use super::fixed::{Fixed, shift_left_saturating, shift_right_rounding};

/// Fractional bits of the normalized mantissa (Q2.30)
pub const MANTISSA_BITS: u32 = 30;

/// Number of mantissa fraction bits used to index the seed table
pub const SEED_BITS: u32 = 4;

/// Newton-Raphson steps performed when nothing else is configured
pub const DEFAULT_RECIPROCAL_STEPS: u32 = 4;

const MANTISSA_ONE: u64 = 1 << MANTISSA_BITS;

/// Initial guesses, entry `i` being `1 / (1 + (i + 0.5) / 16)` in Q2.30
const SEED_TABLE: [u64; 1 << SEED_BITS] = seed_table();

const fn seed_table() -> [u64; 1 << SEED_BITS] {
    let mut table = [0u64; 1 << SEED_BITS];
    let mut i = 0;

    // 1 / (1 + (i + 0.5) / 16) == 32 / (33 + 2i)
    while i < table.len() {
        table[i] = (32u64 << MANTISSA_BITS) / (33 + 2 * i as u64);
        i += 1;
    }

    table
}

/// Reciprocal of a Q2.30 mantissa in `[1, 2)`, giving a Q2.30 value in `(0.5, 1]`.
///
/// Each step computes `x = 2x - m * x * x` with truncating products.
pub fn reciprocal_small_domain(mantissa: u64, steps: u32) -> u64 {
    debug_assert!(mantissa >= MANTISSA_ONE && mantissa < 2 * MANTISSA_ONE);

    if mantissa == MANTISSA_ONE {
        return MANTISSA_ONE;
    }

    let index = (mantissa >> (MANTISSA_BITS - SEED_BITS)) & ((1 << SEED_BITS) - 1);

    let mut x = SEED_TABLE[index as usize];

    for _ in 0..steps {
        let x2 = (x as u128 * x as u128) >> MANTISSA_BITS;
        let vx2 = (mantissa as u128 * x2) >> MANTISSA_BITS;

        x = ((x as u128) << 1).saturating_sub(vx2) as u64;
    }

    x
}

/// Normalized reciprocal, `(-1)^negative * mantissa * 2^(exponent - 30)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reciprocal {
    pub mantissa: u64,
    pub exponent: i32,
    pub negative: bool,
}

impl Reciprocal {
    /// Denormalizes the reciprocal into the requested format, rounding and saturating.
    pub fn to_fixed<const I: u32, const F: u32>(&self) -> Fixed<I, F> {
        let shift = self.exponent + F as i32 - MANTISSA_BITS as i32;

        let magnitude = if shift >= 0 {
            shift_left_saturating(self.mantissa as i128, shift as u32)
        } else {
            shift_right_rounding(self.mantissa as i128, (-shift) as u32)
        };

        Fixed::saturate_wide(if self.negative { -magnitude } else { magnitude })
    }

    pub fn to_f64(&self) -> f64 {
        let value = self.mantissa as f64 * 2f64.powi(self.exponent - MANTISSA_BITS as i32);

        if self.negative { -value } else { value }
    }
}

/// Approximates `1/d` with the given number of refinement steps. Returns `None` for zero.
pub fn reciprocal<const I: u32, const F: u32>(d: Fixed<I, F>, steps: u32) -> Option<Reciprocal> {
    let raw = d.raw();

    if raw == 0 {
        return None;
    }

    let magnitude = raw.unsigned_abs();
    let msb = 63 - magnitude.leading_zeros();

    // Truncation only happens when |d| has more than 31 significant bits
    let mantissa = if msb > MANTISSA_BITS {
        magnitude >> (msb - MANTISSA_BITS)
    } else {
        magnitude << (MANTISSA_BITS - msb)
    };

    Some(Reciprocal {
        mantissa: reciprocal_small_domain(mantissa, steps),
        exponent: F as i32 - msb as i32,
        negative: raw < 0,
    })
}

/// A reciprocal unit with a single request slot.
///
/// `request` posts a dividend and `response` collects the result. Posting again before the
/// result was collected is refused, mirroring a unit shared between several call sites.
#[derive(Debug, Clone)]
pub struct ReciprocalUnit {
    steps: u32,
    pending: Option<Reciprocal>,
}

impl Default for ReciprocalUnit {
    fn default() -> ReciprocalUnit {
        ReciprocalUnit { steps: DEFAULT_RECIPROCAL_STEPS, pending: None }
    }
}

impl ReciprocalUnit {
    pub fn new(steps: u32) -> RenderResult<ReciprocalUnit> {
        if steps == 0 {
            return Err(RenderError::InvalidReciprocalSteps);
        }

        Ok(ReciprocalUnit { steps, pending: None })
    }

    #[inline]
    pub fn steps(&self) -> u32 { self.steps }

    /// True when a new request can be posted
    #[inline]
    pub fn is_ready(&self) -> bool { self.pending.is_none() }

    pub fn request<const I: u32, const F: u32>(&mut self, d: Fixed<I, F>) -> RenderResult<()> {
        if self.pending.is_some() {
            return Err(RenderError::ReciprocalBusy);
        }

        self.pending = Some(reciprocal(d, self.steps).ok_or(RenderError::ZeroDivisor)?);

        Ok(())
    }

    /// Collects the result of the last request, freeing the unit
    pub fn response(&mut self) -> Option<Reciprocal> {
        self.pending.take()
    }

    /// Request and response in one call
    pub fn compute<const I: u32, const F: u32>(&mut self, d: Fixed<I, F>) -> RenderResult<Reciprocal> {
        self.request(d)?;

        let result = self.response().ok_or(RenderError::ZeroDivisor)?;

        trace!("1/{} ~ {}", d, result.to_f64());

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::error::RenderError;
    use crate::numeric::{FixedPoint, RecipFixed};

    fn relative_error(d: f64, steps: u32) -> f64 {
        let r = reciprocal(FixedPoint::from_f64(d), steps).unwrap();
        let exact = 1.0 / FixedPoint::from_f64(d).to_f64();

        ((r.to_f64() - exact) / exact).abs()
    }

    #[test]
    fn test_seed_table() {
        assert_eq!(SEED_TABLE[0], (32u64 << 30) / 33);
        assert!(SEED_TABLE.windows(2).all(|w| w[0] > w[1]));
        assert!(SEED_TABLE[15] > MANTISSA_ONE / 2);
    }

    #[test]
    fn test_one_is_exact() {
        assert_eq!(reciprocal_small_domain(MANTISSA_ONE, 4), MANTISSA_ONE);

        let r = reciprocal(FixedPoint::ONE, 4).unwrap();
        assert_eq!(r.to_fixed::<13, 13>(), FixedPoint::ONE);
    }

    #[test]
    fn test_accuracy_across_range() {
        for &d in &[0.000244140625, 0.001, 0.3, 0.5, 0.75, 1.5, 2.0, 3.0, 7.25, 100.0, 4095.0, -0.3, -1.5, -4095.0] {
            assert!(relative_error(d, 4) < 1e-8, "1/{} too inaccurate", d);
        }
    }

    #[test]
    fn test_more_steps_converge() {
        let coarse = relative_error(1.4, 1);
        let fine = relative_error(1.4, 3);

        assert!(coarse < 1e-3);
        assert!(fine <= coarse);
    }

    #[test]
    fn test_result_in_same_format_is_within_one_lsb() {
        for &d in &[0.5, 2.0, 3.0, 10.0, -6.0] {
            let r: FixedPoint = reciprocal(FixedPoint::from_f64(d), 4).unwrap().to_fixed();
            assert!((r.to_f64() - 1.0 / d).abs() <= 1.0 / 8192.0);
        }

        // 1/epsilon does not fit in the core format
        let big: FixedPoint = reciprocal(FixedPoint::EPSILON, 4).unwrap().to_fixed();
        assert_eq!(big, FixedPoint::MAX);

        let wide: RecipFixed = reciprocal(FixedPoint::EPSILON, 4).unwrap().to_fixed();
        assert_eq!(wide.to_f64(), 8192.0);
    }

    #[test]
    fn test_zero_has_no_reciprocal() {
        assert_eq!(reciprocal(FixedPoint::ZERO, 4), None);

        let mut unit = ReciprocalUnit::default();
        assert_eq!(unit.compute(FixedPoint::ZERO), Err(RenderError::ZeroDivisor));
        assert!(unit.is_ready());
    }

    #[test]
    fn test_unit_serializes_requests() {
        let mut unit = ReciprocalUnit::new(2).unwrap();

        unit.request(FixedPoint::from_f64(4.0)).unwrap();
        assert!(!unit.is_ready());
        assert_eq!(unit.request(FixedPoint::ONE), Err(RenderError::ReciprocalBusy));
        assert_eq!(unit.compute(FixedPoint::ONE), Err(RenderError::ReciprocalBusy));

        let r = unit.response().unwrap();
        assert_eq!(r.to_fixed::<13, 13>().to_f64(), 0.25);
        assert!(unit.is_ready());
        assert_eq!(unit.response(), None);
    }

    #[test]
    fn test_zero_steps_is_rejected() {
        assert_eq!(ReciprocalUnit::new(0).unwrap_err(), RenderError::InvalidReciprocalSteps);
    }
}

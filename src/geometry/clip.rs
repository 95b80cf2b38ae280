//! Clipping planes

use std::ops::{BitAnd, BitOr};

use crate::error::RenderResult;
use crate::interpolate::Interpolate;
use crate::numeric::{FixedPoint, ReciprocalUnit, Vec4, WideFixed};
use crate::utils::clamp;

use super::GeometryVertex;

/// The six canonical planes of the homogeneous view volume `-w <= x, y, z <= w`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClippingPlane {
    /// `x <= w`
    PositiveX,
    /// `x >= -w`
    NegativeX,
    /// `y <= w`
    PositiveY,
    /// `y >= -w`
    NegativeY,
    /// `z <= w`
    PositiveZ,
    /// `z >= -w`
    NegativeZ,
}

/// All clipping planes in a constant array, in the order they are clipped against.
pub const ALL_CLIPPING_PLANES: [ClippingPlane; 6] = [
    ClippingPlane::PositiveX,
    ClippingPlane::NegativeX,
    ClippingPlane::PositiveY,
    ClippingPlane::NegativeY,
    ClippingPlane::PositiveZ,
    ClippingPlane::NegativeZ,
];

impl ClippingPlane {
    /// Bit of this plane in a `ClipCode`
    #[inline]
    pub fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Signed distance of a clip-space position to the plane, negative when outside
    #[inline]
    pub fn distance(self, position: &Vec4) -> FixedPoint {
        let (x, y, z, w) = (position[0], position[1], position[2], position[3]);

        match self {
            ClippingPlane::PositiveX => w - x,
            ClippingPlane::NegativeX => x + w,
            ClippingPlane::PositiveY => w - y,
            ClippingPlane::NegativeY => y + w,
            ClippingPlane::PositiveZ => w - z,
            ClippingPlane::NegativeZ => z + w,
        }
    }

    /// Check if the clipping plane has the given clip-space vertex inside of it, boundary included
    #[inline]
    pub fn has_inside<const T: usize>(self, v: &GeometryVertex<T>) -> bool {
        !self.distance(&v.position).is_negative()
    }

    /// Find the intersection of the edge `curr -> next` with the plane.
    ///
    /// The endpoints must lie on opposite sides. Every attribute is interpolated at
    /// `t = d_curr / (d_curr - d_next)`, with the reciprocal taken from `recip`.
    pub fn intersect<const T: usize>(self, curr: &GeometryVertex<T>, next: &GeometryVertex<T>, recip: &mut ReciprocalUnit) -> RenderResult<GeometryVertex<T>> {
        let d_curr = self.distance(&curr.position);
        let d_next = self.distance(&next.position);

        let denominator = d_curr - d_next;

        assert!(denominator != FixedPoint::ZERO, "Clip edge does not cross {:?}", self);

        let inv: WideFixed = recip.compute(denominator)?.to_fixed();

        let t: FixedPoint = clamp(d_curr.mul_into(inv), FixedPoint::ZERO, FixedPoint::ONE);

        Ok(Interpolate::linear_interpolate(t, curr, next))
    }
}

/// Six-bit outcode, bit `i` set when the position is strictly outside `ALL_CLIPPING_PLANES[i]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ClipCode(pub u8);

impl ClipCode {
    pub const INSIDE: ClipCode = ClipCode(0);

    pub fn of(position: &Vec4) -> ClipCode {
        let mut code = 0;

        for plane in &ALL_CLIPPING_PLANES {
            if plane.distance(position).is_negative() {
                code |= plane.bit();
            }
        }

        ClipCode(code)
    }

    #[inline]
    pub fn bits(self) -> u8 { self.0 }

    /// True when inside every plane
    #[inline]
    pub fn is_inside(self) -> bool { self.0 == 0 }

    #[inline]
    pub fn is_outside(self, plane: ClippingPlane) -> bool {
        self.0 & plane.bit() != 0
    }
}

impl BitAnd for ClipCode {
    type Output = ClipCode;

    #[inline]
    fn bitand(self, rhs: ClipCode) -> ClipCode { ClipCode(self.0 & rhs.0) }
}

impl BitOr for ClipCode {
    type Output = ClipCode;

    #[inline]
    fn bitor(self, rhs: ClipCode) -> ClipCode { ClipCode(self.0 | rhs.0) }
}

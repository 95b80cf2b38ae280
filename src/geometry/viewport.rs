//! Screen mapping registers

use crate::error::{RenderError, RenderResult};
use crate::numeric::{Fixed, FixedPoint, FixedPointMem, ScreenFixed};

use super::Dimensions;

/// Intermediate format for the viewport transform, wide enough for any register value
type ViewportFixed = Fixed<24, 16>;

/// Maps normalized device coordinates onto the screen.
///
/// `screen = origin + (ndc + 1) * size / 2` on each axis. There is no y flip, so `ndc_y = -1` maps
/// to the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: FixedPointMem,
    pub y: FixedPointMem,
    pub width: FixedPointMem,
    pub height: FixedPointMem,
}

impl Viewport {
    pub fn new(x: FixedPointMem, y: FixedPointMem, width: FixedPointMem, height: FixedPointMem) -> Viewport {
        Viewport { x, y, width, height }
    }

    /// A viewport at the origin covering the whole target
    pub fn covering(dimensions: Dimensions) -> Viewport {
        Viewport {
            x: FixedPointMem::ZERO,
            y: FixedPointMem::ZERO,
            width: FixedPointMem::from_int(dimensions.width as i64),
            height: FixedPointMem::from_int(dimensions.height as i64),
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        if !self.width.is_positive() || !self.height.is_positive() {
            return Err(RenderError::InvalidViewport);
        }

        Ok(())
    }

    /// Screen position of an NDC point, snapped to the sub-pixel grid
    #[inline]
    pub fn to_screen(&self, ndc_x: FixedPoint, ndc_y: FixedPoint) -> (ScreenFixed, ScreenFixed) {
        (map_axis(ndc_x, self.x, self.width), map_axis(ndc_y, self.y, self.height))
    }
}

#[inline]
fn map_axis(ndc: FixedPoint, origin: FixedPointMem, size: FixedPointMem) -> ScreenFixed {
    let shifted: ViewportFixed = ndc.convert::<24, 16>() + ViewportFixed::ONE;
    let scaled: ViewportFixed = shifted.mul_into(size.halve());

    (origin.convert::<24, 16>() + scaled).convert()
}

/// Rectangle of pixels allowed to receive fragments, bounds inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scissor {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: u32,
    pub height: u32,
}

impl Scissor {
    pub fn new(offset_x: i32, offset_y: i32, width: u32, height: u32) -> Scissor {
        Scissor { offset_x, offset_y, width, height }
    }

    /// A scissor exactly covering the whole target
    pub fn covering(dimensions: Dimensions) -> Scissor {
        Scissor { offset_x: 0, offset_y: 0, width: dimensions.width, height: dimensions.height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn min_x(&self) -> i64 { self.offset_x as i64 }

    #[inline]
    pub fn min_y(&self) -> i64 { self.offset_y as i64 }

    /// Last column inside the scissor
    #[inline]
    pub fn max_x(&self) -> i64 { self.offset_x as i64 + self.width as i64 - 1 }

    /// Last row inside the scissor
    #[inline]
    pub fn max_y(&self) -> i64 { self.offset_y as i64 + self.height as i64 - 1 }
}

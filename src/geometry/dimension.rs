use crate::error::{RenderError, RenderResult};

use super::Coordinate;

/// Render target size in pixels
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    #[inline(always)]
    pub fn new(width: u32, height: u32) -> Dimensions {
        Dimensions { width, height }
    }

    #[inline]
    pub fn in_bounds(&self, coord: Coordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// A target needs at least one row and one column
    pub fn validate(&self) -> RenderResult<()> {
        match (self.width, self.height) {
            (0, _) | (_, 0) => Err(RenderError::InvalidFramebuffer(self.width, self.height)),
            _ => Ok(()),
        }
    }
}

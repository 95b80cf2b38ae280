pub mod triangle;

use crate::error::RenderResult;
use crate::geometry::{Dimensions, Scissor, Viewport};

/// Screen mapping state the rasterizer works against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterizerConfig {
    pub viewport: Viewport,
    pub scissor: Scissor,
    /// Informational only, coverage is bounded by the scissor
    pub framebuffer: Dimensions,
}

impl RasterizerConfig {
    /// Viewport and scissor both covering the whole framebuffer
    pub fn covering(framebuffer: Dimensions) -> RasterizerConfig {
        RasterizerConfig {
            viewport: Viewport::covering(framebuffer),
            scissor: Scissor::covering(framebuffer),
            framebuffer,
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        self.framebuffer.validate()?;
        self.viewport.validate()
    }
}

pub use self::triangle::{Bounds, ScanCursor, TriangleSetup};

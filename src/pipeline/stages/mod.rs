//! Streaming stages of the clip and raster core
//!
//! Each stage owns its working state for exactly one primitive (or pixel) at a time and is
//! advanced by `Stage::step`. A stage never drops a computed output: it holds on to it until
//! the downstream port is free again.

use crate::error::RenderResult;
use crate::stream::Port;

pub mod rasterization;

pub mod clipper;
pub mod divide;
pub mod rasterizer;

pub use self::clipper::Clipper;
pub use self::divide::PerspectiveDivide;
pub use self::rasterizer::Rasterizer;
pub use self::rasterization::RasterizerConfig;

/// A stage stepped by a scheduler
pub trait Stage {
    type Input;
    type Output;

    /// Advances the stage by one unit of work.
    ///
    /// Takes at most one item from `input` and places at most one item in `output`. Returns true
    /// if anything moved or changed state.
    fn step(&mut self, input: &mut Port<Self::Input>, output: &mut Port<Self::Output>) -> RenderResult<bool>;

    /// True when no primitive is partially collected or in flight
    fn is_idle(&self) -> bool;
}

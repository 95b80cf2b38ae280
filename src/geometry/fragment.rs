use crate::numeric::{FixedPoint, Vec4};

use super::Coordinate;

/// One covered pixel produced by the rasterizer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<const T: usize = 0> {
    pub coord_pos: Coordinate,
    /// Linearly interpolated `z/w`
    pub depth: FixedPoint,
    /// Perspective-correct, saturated to `[0, 1]`
    pub color: Vec4,
    /// Perspective-correct
    pub texcoords: [Vec4; T],
    pub front_facing: bool,
}

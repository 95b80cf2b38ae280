//! Perspective divide between the clipper and the rasterizer

use log::warn;

use crate::error::RenderResult;
use crate::geometry::GeometryVertex;
use crate::numeric::{FixedPoint, RecipFixed, ReciprocalUnit, Vec4};
use crate::stream::Port;

use super::Stage;

/// Replaces clip-space `(x, y, z, w)` with `(x/w, y/w, z/w, 1/w)`.
///
/// A `w` of zero saturates `1/w` rather than dropping the vertex, so the grouping of vertices
/// into primitives downstream is never disturbed.
pub struct PerspectiveDivide<const T: usize = 0> {
    recip: ReciprocalUnit,
    pending: Option<GeometryVertex<T>>,
}

impl<const T: usize> PerspectiveDivide<T> {
    pub fn new(recip: ReciprocalUnit) -> PerspectiveDivide<T> {
        PerspectiveDivide { recip, pending: None }
    }

    pub fn divide(&mut self, mut vertex: GeometryVertex<T>) -> RenderResult<GeometryVertex<T>> {
        let w = vertex.w();

        let inv_w: RecipFixed = if w == FixedPoint::ZERO {
            warn!("Vertex {:?} has w = 0, saturating 1/w", vertex.position);

            RecipFixed::MAX
        } else {
            self.recip.compute(w)?.to_fixed()
        };

        let project = |c: FixedPoint| -> FixedPoint { c.mul_into(inv_w) };

        vertex.position = Vec4::new(
            project(vertex.position[0]),
            project(vertex.position[1]),
            project(vertex.position[2]),
            inv_w.convert(),
        );

        Ok(vertex)
    }
}

impl<const T: usize> Stage for PerspectiveDivide<T> {
    type Input = GeometryVertex<T>;
    type Output = GeometryVertex<T>;

    fn step(&mut self, input: &mut Port<GeometryVertex<T>>, output: &mut Port<GeometryVertex<T>>) -> RenderResult<bool> {
        if let Some(vertex) = self.pending.take() {
            if let Err(vertex) = output.offer(vertex) {
                self.pending = Some(vertex);
                return Ok(false);
            }

            return Ok(true);
        }

        match input.take() {
            Some(vertex) => {
                let divided = self.divide(vertex)?;

                if let Err(divided) = output.offer(divided) {
                    self.pending = Some(divided);
                }

                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

//! Triangle rasterizer stage

use std::mem;

use log::debug;
use smallvec::SmallVec;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Fragment, GeometryVertex};
use crate::numeric::ReciprocalUnit;
use crate::primitive::PrimitiveType;
use crate::stream::Port;

use super::Stage;
use super::rasterization::{RasterizerConfig, ScanCursor, TriangleSetup};

/// Turns triangles in `(x/w, y/w, z/w, 1/w)` form into one fragment per covered pixel.
///
/// Pixels are visited row by row inside the triangle's bounds clamped to the scissor. When the
/// consumer refuses a fragment the scan stops on it until it is taken.
pub struct Rasterizer<const T: usize = 0> {
    config: RasterizerConfig,
    primitive_type: PrimitiveType,
    recip: ReciprocalUnit,
    collected: SmallVec<[GeometryVertex<T>; 3]>,
    scan: Option<(TriangleSetup<T>, ScanCursor)>,
    pending: Option<Fragment<T>>,
}

impl<const T: usize> Rasterizer<T> {
    pub fn new(config: RasterizerConfig, recip: ReciprocalUnit) -> Rasterizer<T> {
        Rasterizer {
            config,
            primitive_type: PrimitiveType::Triangles,
            recip,
            collected: SmallVec::new(),
            scan: None,
            pending: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &RasterizerConfig { &self.config }

    pub fn set_config(&mut self, config: RasterizerConfig) -> RenderResult<()> {
        if !self.is_idle() {
            return Err(RenderError::PipelineBusy);
        }

        config.validate()?;

        debug!("Rasterizer config {:?}", config);

        self.config = config;

        Ok(())
    }

    /// Only triangles produce fragments, vertices of other primitive types are consumed and dropped
    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) -> RenderResult<()> {
        if !self.is_idle() {
            return Err(RenderError::PipelineBusy);
        }

        self.primitive_type = primitive_type;

        Ok(())
    }

    fn setup(&mut self, primitive: SmallVec<[GeometryVertex<T>; 3]>) -> RenderResult<()> {
        if self.primitive_type != PrimitiveType::Triangles {
            debug!("No rasterization for {:?}, dropping primitive", self.primitive_type);
            return Ok(());
        }

        let vertices = [primitive[0], primitive[1], primitive[2]];

        if let Some(setup) = TriangleSetup::new(vertices, &self.config.viewport, &self.config.scissor, &mut self.recip)? {
            let cursor = setup.start();

            self.scan = Some((setup, cursor));
        }

        Ok(())
    }
}

impl<const T: usize> Stage for Rasterizer<T> {
    type Input = GeometryVertex<T>;
    type Output = Fragment<T>;

    fn step(&mut self, input: &mut Port<GeometryVertex<T>>, output: &mut Port<Fragment<T>>) -> RenderResult<bool> {
        if let Some(fragment) = self.pending.take() {
            if let Err(fragment) = output.offer(fragment) {
                self.pending = Some(fragment);
                return Ok(false);
            }

            return Ok(true);
        }

        if let Some((setup, cursor)) = self.scan.as_mut() {
            match setup.next_fragment(cursor, &mut self.recip)? {
                Some(fragment) => {
                    if let Err(fragment) = output.offer(fragment) {
                        self.pending = Some(fragment);
                    }
                }
                None => self.scan = None,
            }

            return Ok(true);
        }

        match input.take() {
            Some(vertex) => {
                self.collected.push(vertex);

                if self.collected.len() == self.primitive_type.num_vertices() {
                    let primitive = mem::take(&mut self.collected);

                    self.setup(primitive)?;
                }

                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn is_idle(&self) -> bool {
        self.collected.is_empty() && self.scan.is_none() && self.pending.is_none()
    }
}

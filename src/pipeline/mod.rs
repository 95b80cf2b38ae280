//! Clip and raster pipeline schedulers
//!
//! `Pipeline` steps every stage once per tick on the calling thread. `render_threaded` runs the
//! same stages on their own threads. Both deliver the same fragments in the same order.

use log::{debug, warn};

use crate::error::{RenderError, RenderResult};
use crate::geometry::{Dimensions, Fragment, GeometryVertex, Scissor, Viewport};
use crate::numeric::{ReciprocalUnit, DEFAULT_RECIPROCAL_STEPS};
use crate::primitive::PrimitiveType;
use crate::stream::Port;

pub mod stages;
pub mod threaded;

pub use self::stages::{Clipper, PerspectiveDivide, Rasterizer, RasterizerConfig, Stage};
pub use self::threaded::render_threaded;

/// Everything needed to build a pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    pub primitive_type: PrimitiveType,
    pub viewport: Viewport,
    pub scissor: Scissor,
    pub framebuffer: Dimensions,
    /// Newton-Raphson steps for every reciprocal unit in the pipeline
    pub reciprocal_steps: u32,
}

impl PipelineConfig {
    /// Triangles, with viewport and scissor covering the whole framebuffer
    pub fn new(framebuffer: Dimensions) -> PipelineConfig {
        PipelineConfig {
            primitive_type: PrimitiveType::default(),
            viewport: Viewport::covering(framebuffer),
            scissor: Scissor::covering(framebuffer),
            framebuffer,
            reciprocal_steps: DEFAULT_RECIPROCAL_STEPS,
        }
    }

    pub fn validate(&self) -> RenderResult<()> {
        self.rasterizer_config().validate()?;

        if self.reciprocal_steps == 0 {
            return Err(RenderError::InvalidReciprocalSteps);
        }

        Ok(())
    }

    pub fn rasterizer_config(&self) -> RasterizerConfig {
        RasterizerConfig {
            viewport: self.viewport,
            scissor: self.scissor,
            framebuffer: self.framebuffer,
        }
    }

    /// Builds the three stages described by this configuration
    pub fn build_stages<const T: usize>(&self) -> RenderResult<(Clipper<T>, PerspectiveDivide<T>, Rasterizer<T>)> {
        self.validate()?;

        let recip = ReciprocalUnit::new(self.reciprocal_steps)?;

        let clipper = Clipper::new(self.primitive_type, recip.clone());
        let divide = PerspectiveDivide::new(recip.clone());
        let mut rasterizer = Rasterizer::new(self.rasterizer_config(), recip);

        rasterizer.set_primitive_type(self.primitive_type)?;

        Ok((clipper, divide, rasterizer))
    }
}

/// Cooperative scheduler for clipper, perspective divide and rasterizer.
///
/// Stages are connected by single-slot ports and stepped downstream first, so a slot freed by a
/// stage can be refilled by its producer within the same tick.
pub struct Pipeline<const T: usize = 0> {
    config: PipelineConfig,
    clipper: Clipper<T>,
    divide: PerspectiveDivide<T>,
    rasterizer: Rasterizer<T>,
    input: Port<GeometryVertex<T>>,
    clipped: Port<GeometryVertex<T>>,
    divided: Port<GeometryVertex<T>>,
    output: Port<Fragment<T>>,
}

impl<const T: usize> Pipeline<T> {
    /// Create a new pipeline, failing on an invalid configuration
    pub fn new(config: PipelineConfig) -> RenderResult<Pipeline<T>> {
        let (clipper, divide, rasterizer) = config.build_stages()?;

        Ok(Pipeline {
            config,
            clipper,
            divide,
            rasterizer,
            input: Port::new(),
            clipped: Port::new(),
            divided: Port::new(),
            output: Port::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &PipelineConfig { &self.config }

    /// Steps every stage once. Returns true if anything moved.
    pub fn tick(&mut self) -> RenderResult<bool> {
        let rasterized = self.rasterizer.step(&mut self.divided, &mut self.output)?;
        let divided = self.divide.step(&mut self.clipped, &mut self.divided)?;
        let clipped = self.clipper.step(&mut self.input, &mut self.clipped)?;

        Ok(rasterized || divided || clipped)
    }

    /// Offers a vertex to the clipper, handing it back if the input slot is still occupied
    #[inline]
    pub fn push_vertex(&mut self, vertex: GeometryVertex<T>) -> Result<(), GeometryVertex<T>> {
        self.input.offer(vertex)
    }

    #[inline]
    pub fn pop_fragment(&mut self) -> Option<Fragment<T>> {
        self.output.take()
    }

    /// True when no vertex or fragment is anywhere in the pipeline
    pub fn is_idle(&self) -> bool {
        self.input.is_free() && self.clipped.is_free() && self.divided.is_free() && self.output.is_free() &&
            self.clipper.is_idle() && self.divide.is_idle() && self.rasterizer.is_idle()
    }

    /// Drops everything in flight, including a partially collected primitive
    pub fn reset(&mut self) -> RenderResult<()> {
        *self = Pipeline::new(self.config)?;

        Ok(())
    }

    fn ensure_idle(&self) -> RenderResult<()> {
        if self.is_idle() { Ok(()) } else { Err(RenderError::PipelineBusy) }
    }

    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) -> RenderResult<()> {
        self.ensure_idle()?;

        self.clipper.set_primitive_type(primitive_type)?;
        self.rasterizer.set_primitive_type(primitive_type)?;
        self.config.primitive_type = primitive_type;

        Ok(())
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> RenderResult<()> {
        self.ensure_idle()?;

        let config = PipelineConfig { viewport, ..self.config };

        self.rasterizer.set_config(config.rasterizer_config())?;
        self.config = config;

        Ok(())
    }

    pub fn set_scissor(&mut self, scissor: Scissor) -> RenderResult<()> {
        self.ensure_idle()?;

        let config = PipelineConfig { scissor, ..self.config };

        self.rasterizer.set_config(config.rasterizer_config())?;
        self.config = config;

        Ok(())
    }

    /// Streams `vertices` through the pipeline, handing every fragment to `sink` in order.
    ///
    /// `sink` returns false to refuse a fragment, which stalls the pipeline; the same fragment is
    /// offered again on the next tick. Returns once the vertices are exhausted and nothing is left
    /// in flight. A trailing partial primitive stays collected in the clipper.
    pub fn render<F>(&mut self, vertices: &[GeometryVertex<T>], mut sink: F) -> RenderResult<()> where F: FnMut(&Fragment<T>) -> bool {
        let mut source = vertices.iter().copied();
        let mut next = source.next();

        loop {
            if let Some(vertex) = next {
                next = match self.input.offer(vertex) {
                    Ok(()) => source.next(),
                    Err(vertex) => Some(vertex),
                };
            }

            let progressed = self.tick()?;

            let delivered = match self.output.peek() {
                Some(fragment) => sink(fragment),
                None => false,
            };

            if delivered {
                self.output.take();
            }

            if next.is_none() && self.input.is_free() && self.output.is_free() && !progressed && !delivered {
                break;
            }
        }

        if !self.clipper.is_idle() {
            warn!("Vertex stream ended with {} vertices of an incomplete {:?} primitive",
                  self.clipper.collected(), self.config.primitive_type);
        }

        debug!("Pipeline drained");

        Ok(())
    }
}

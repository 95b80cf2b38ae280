//! Fixed-point clip and raster core
//!
//! ### Example:
//!
//! ```
//! use fixedrender::{Dimensions, GeometryVertex, Pipeline, PipelineConfig};
//! use fixedrender::numeric::vec4;
//!
//! let config = PipelineConfig::new(Dimensions::new(32, 32));
//! let mut pipeline: Pipeline = Pipeline::new(config).unwrap();
//!
//! let white = vec4(1.0, 1.0, 1.0, 1.0);
//! let triangle = [
//!     GeometryVertex::new(vec4(-1.0, -1.0, 0.5, 1.0), white),
//!     GeometryVertex::new(vec4(1.0, -1.0, 0.5, 1.0), white),
//!     GeometryVertex::new(vec4(0.0, 1.0, 0.5, 1.0), white),
//! ];
//!
//! let mut count = 0;
//! pipeline.render(&triangle, |_| { count += 1; true }).unwrap();
//! assert!(count > 0);
//! ```
//!
//! ### Features:
//!
//! * Saturating fixed-point arithmetic in several formats, no floating point inside the stages.
//! * Newton-Raphson reciprocal unit with a request/response interface.
//! * Sutherland-Hodgman clipping of triangles in homogeneous space, re-emitted as triangle fans.
//! * Trivial accept/reject of points and lines.
//! * Edge-function rasterization with scissor clamping, linear depth and perspective-correct
//! color and texture coordinates.
//! * Single-slot ports and depth-1 channels with back-pressure, so stalled consumers never lose
//! a vertex or fragment.
//! * Cooperative single-threaded scheduling, or one thread per stage.
//! * Built-in compatibility with the `image` crate, using the `image_compat` cargo feature.

pub mod error;
pub mod utils;
pub mod numeric;
pub mod stream;
pub mod primitive;
pub mod geometry;
pub mod interpolate;
pub mod pipeline;

#[cfg(feature = "image_compat")]
pub mod image_compat;

pub use error::{RenderError, RenderResult};
pub use numeric::{Fixed, FixedPoint, FixedPointMem, Vec4};
pub use primitive::PrimitiveType;
pub use geometry::{ClippingPlane, Coordinate, Dimensions, Fragment, GeometryVertex, Scissor, Viewport};
pub use interpolate::Interpolate;
pub use pipeline::{render_threaded, Pipeline, PipelineConfig, Stage};

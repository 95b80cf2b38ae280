//! Vertex and fragment records, clip planes and screen mapping

pub mod dimension;
pub mod coordinate;
pub mod vertex;
pub mod fragment;
pub mod clip;
pub mod viewport;

pub use self::dimension::Dimensions;
pub use self::coordinate::Coordinate;
pub use self::vertex::GeometryVertex;
pub use self::fragment::Fragment;
pub use self::clip::{ClipCode, ClippingPlane, ALL_CLIPPING_PLANES};
pub use self::viewport::{Scissor, Viewport};

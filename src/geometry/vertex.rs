use crate::interpolate::Interpolate;
use crate::numeric::{FixedPoint, Vec4};

/// Vertex record flowing from primitive assembly through the clipper into the rasterizer.
///
/// `position` is homogeneous clip space `(x, y, z, w)` up to the clipper, and
/// `(x/w, y/w, z/w, 1/w)` once it has been through the perspective divide.
///
/// `T` is the number of texture units carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryVertex<const T: usize = 0> {
    pub position: Vec4,
    pub texcoords: [Vec4; T],
    pub color: Vec4,
    /// Computed upstream, never recomputed after clipping
    pub front_facing: bool,
}

impl<const T: usize> GeometryVertex<T> {
    /// Creates a front facing vertex with zeroed texture coordinates
    #[inline]
    pub fn new(position: Vec4, color: Vec4) -> GeometryVertex<T> {
        GeometryVertex {
            position,
            texcoords: [Vec4::from_element(FixedPoint::ZERO); T],
            color,
            front_facing: true,
        }
    }

    #[inline]
    pub fn with_texcoords(mut self, texcoords: [Vec4; T]) -> GeometryVertex<T> {
        self.texcoords = texcoords;
        self
    }

    #[inline]
    pub fn with_front_facing(mut self, front_facing: bool) -> GeometryVertex<T> {
        self.front_facing = front_facing;
        self
    }

    #[inline]
    pub fn w(&self) -> FixedPoint {
        self.position[3]
    }
}

impl<const T: usize> Interpolate for GeometryVertex<T> {
    /// Fragments never need whole vertices, but the winding flag still comes from the first one
    #[inline]
    fn barycentric_interpolate(u: FixedPoint, x1: &Self, v: FixedPoint, x2: &Self, w: FixedPoint, x3: &Self) -> Self {
        GeometryVertex {
            position: Interpolate::barycentric_interpolate(u, &x1.position, v, &x2.position, w, &x3.position),
            texcoords: Interpolate::barycentric_interpolate(u, &x1.texcoords, v, &x2.texcoords, w, &x3.texcoords),
            color: Interpolate::barycentric_interpolate(u, &x1.color, v, &x2.color, w, &x3.color),
            front_facing: x1.front_facing,
        }
    }

    #[inline]
    fn linear_interpolate(t: FixedPoint, x1: &Self, x2: &Self) -> Self {
        GeometryVertex {
            position: Interpolate::linear_interpolate(t, &x1.position, &x2.position),
            texcoords: Interpolate::linear_interpolate(t, &x1.texcoords, &x2.texcoords),
            color: Interpolate::linear_interpolate(t, &x1.color, &x2.color),
            front_facing: x1.front_facing,
        }
    }
}

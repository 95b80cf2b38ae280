//! Homogeneous-space primitive clipper

use std::mem;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::error::{RenderError, RenderResult};
use crate::geometry::{ClipCode, GeometryVertex, ALL_CLIPPING_PLANES};
use crate::numeric::ReciprocalUnit;
use crate::primitive::PrimitiveType;
use crate::stream::{FanOut, Port};

use super::Stage;

/// Largest polygon a triangle can turn into after clipping against all six planes
pub const MAX_POLYGON_VERTICES: usize = 9;

/// Vertices of a single point, line or triangle
pub type Primitive<const T: usize> = SmallVec<[GeometryVertex<T>; 3]>;

/// Working buffer of the clipper
pub type Polygon<const T: usize> = SmallVec<[GeometryVertex<T>; MAX_POLYGON_VERTICES]>;

/// Clips a triangle against every plane in turn (Sutherland-Hodgman).
///
/// Stops early once the polygon is empty. The result may have fewer than three vertices, in
/// which case nothing of the triangle is left to draw.
pub fn clip_polygon<const T: usize>(vertices: &[GeometryVertex<T>], recip: &mut ReciprocalUnit) -> RenderResult<Polygon<T>> {
    let mut src: Polygon<T> = vertices.iter().copied().collect();
    let mut dst: Polygon<T> = SmallVec::new();

    for &plane in &ALL_CLIPPING_PLANES {
        dst.clear();

        for (i, curr) in src.iter().enumerate() {
            let next = &src[(i + 1) % src.len()];

            match (plane.has_inside(curr), plane.has_inside(next)) {
                (true, true) => dst.push(*next),
                (true, false) => dst.push(plane.intersect(curr, next, recip)?),
                (false, true) => {
                    dst.push(plane.intersect(curr, next, recip)?);
                    dst.push(*next);
                }
                (false, false) => {}
            }
        }

        mem::swap(&mut src, &mut dst);

        if src.is_empty() {
            break;
        }
    }

    Ok(src)
}

/// Triangle `i` of the fan over `polygon`, made of `v0, v[i-1], v[i]`.
///
/// All three vertices take the winding flag of `v[i-1]`.
pub fn fan_triangle<const T: usize>(polygon: &[GeometryVertex<T>], i: usize) -> Primitive<T> {
    let front_facing = polygon[i - 1].front_facing;

    [polygon[0], polygon[i - 1], polygon[i]].iter()
        .map(|v| v.with_front_facing(front_facing))
        .collect()
}

enum ClipState<const T: usize> {
    /// Waiting for the vertices of the next primitive
    Collect,
    /// Accepted primitive waiting for the fan-out
    Forward(Primitive<T>),
    /// Clipped polygon being emitted one fan triangle at a time
    Fan { polygon: Polygon<T>, next: usize },
}

/// Accepts, rejects or splits primitives against the six clip planes.
///
/// Only triangles are actually clipped. Points and lines are either passed through whole or
/// dropped, including lines that straddle a plane.
pub struct Clipper<const T: usize = 0> {
    primitive_type: PrimitiveType,
    recip: ReciprocalUnit,
    fanout: FanOut<[GeometryVertex<T>; 3]>,
    collected: Primitive<T>,
    state: ClipState<T>,
}

impl<const T: usize> Clipper<T> {
    pub fn new(primitive_type: PrimitiveType, recip: ReciprocalUnit) -> Clipper<T> {
        Clipper {
            primitive_type,
            recip,
            fanout: FanOut::new(),
            collected: SmallVec::new(),
            state: ClipState::Collect,
        }
    }

    #[inline]
    pub fn primitive_type(&self) -> PrimitiveType { self.primitive_type }

    pub fn set_primitive_type(&mut self, primitive_type: PrimitiveType) -> RenderResult<()> {
        if !self.is_idle() {
            return Err(RenderError::PipelineBusy);
        }

        debug!("Clipper primitive type {:?} -> {:?}", self.primitive_type, primitive_type);

        self.primitive_type = primitive_type;

        Ok(())
    }

    /// Number of vertices of the current primitive collected so far
    #[inline]
    pub fn collected(&self) -> usize { self.collected.len() }

    /// Classifies a complete primitive and decides what to emit for it
    fn process(&mut self, primitive: Primitive<T>) -> RenderResult<ClipState<T>> {
        let codes: SmallVec<[ClipCode; 3]> = primitive.iter().map(|v| ClipCode::of(&v.position)).collect();

        let common = codes.iter().fold(ClipCode(0b11_1111), |acc, &code| acc & code);
        let any = codes.iter().fold(ClipCode::INSIDE, |acc, &code| acc | code);

        if !common.is_inside() {
            trace!("Rejected {:?} primitive outside planes {:06b}", self.primitive_type, common.bits());
            return Ok(ClipState::Collect);
        }

        if any.is_inside() {
            trace!("Accepted {:?} primitive", self.primitive_type);
            return Ok(ClipState::Forward(primitive));
        }

        match self.primitive_type {
            PrimitiveType::Triangles => {
                let polygon = clip_polygon(&primitive, &mut self.recip)?;

                if polygon.len() < 3 {
                    trace!("Triangle clipped down to {} vertices, dropped", polygon.len());
                    return Ok(ClipState::Collect);
                }

                trace!("Triangle clipped into a {}-vertex polygon", polygon.len());

                Ok(ClipState::Fan { polygon, next: 2 })
            }
            _ => {
                debug!("Dropping {:?} primitive straddling planes {:06b}", self.primitive_type, any.bits());

                Ok(ClipState::Collect)
            }
        }
    }

    /// Loads the next batch of the current primitive into the fan-out
    fn feed_fanout(&mut self) -> bool {
        let batch = match mem::replace(&mut self.state, ClipState::Collect) {
            ClipState::Collect => return false,
            ClipState::Forward(primitive) => primitive,
            ClipState::Fan { polygon, next } => {
                let triangle = fan_triangle(&polygon, next);

                if next + 1 < polygon.len() {
                    self.state = ClipState::Fan { polygon, next: next + 1 };
                }

                triangle
            }
        };

        let loaded = self.fanout.load(batch).is_ok();

        debug_assert!(loaded, "Fan-out refused a batch while ready");

        loaded
    }
}

impl<const T: usize> Stage for Clipper<T> {
    type Input = GeometryVertex<T>;
    type Output = GeometryVertex<T>;

    fn step(&mut self, input: &mut Port<GeometryVertex<T>>, output: &mut Port<GeometryVertex<T>>) -> RenderResult<bool> {
        let mut progress = self.fanout.drain_into(output);

        if self.fanout.is_ready() {
            progress |= self.feed_fanout();
        }

        if let ClipState::Collect = self.state {
            if let Some(vertex) = input.take() {
                self.collected.push(vertex);

                progress = true;

                if self.collected.len() == self.primitive_type.num_vertices() {
                    let primitive = mem::take(&mut self.collected);

                    self.state = self.process(primitive)?;
                }
            }
        }

        Ok(progress)
    }

    fn is_idle(&self) -> bool {
        self.collected.is_empty() && self.fanout.is_ready() && match self.state {
            ClipState::Collect => true,
            _ => false,
        }
    }
}

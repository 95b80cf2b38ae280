//! Edge-function triangle setup and scan

use log::{debug, trace};

use crate::error::RenderResult;
use crate::geometry::{Coordinate, Fragment, GeometryVertex, Scissor, Viewport};
use crate::interpolate::Interpolate;
use crate::numeric::{AccumFixed, EdgeFixed, FixedPoint, RecipFixed, ReciprocalUnit, ScreenFixed, Vec4};
use crate::utils::{clamp, max3, min3};

/// Screen-space position with sub-pixel precision
pub type ScreenPoint = (ScreenFixed, ScreenFixed);

/// Signed double area of `a, b, p`, positive when `p` is to the left of `a -> b` with y down.
///
/// Exact, since the product of two `ScreenFixed` values always fits an `EdgeFixed`.
#[inline]
pub fn edge(a: ScreenPoint, b: ScreenPoint, p: ScreenPoint) -> EdgeFixed {
    let lhs: EdgeFixed = (b.0 - a.0).mul_into(p.1 - a.1);
    let rhs: EdgeFixed = (b.1 - a.1).mul_into(p.0 - a.0);

    lhs - rhs
}

/// Inclusive pixel rectangle the scan walks over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i64,
    pub min_y: i64,
    pub max_x: i64,
    pub max_y: i64,
}

impl Bounds {
    /// Bounding box of the three points, floor of the minimum to ceil of the maximum
    pub fn of_triangle(screen: &[ScreenPoint; 3]) -> Bounds {
        Bounds {
            min_x: min3(screen[0].0, screen[1].0, screen[2].0).floor(),
            min_y: min3(screen[0].1, screen[1].1, screen[2].1).floor(),
            max_x: max3(screen[0].0, screen[1].0, screen[2].0).ceil(),
            max_y: max3(screen[0].1, screen[1].1, screen[2].1).ceil(),
        }
    }

    /// Intersection with the scissor rectangle, never reaching below zero
    pub fn clamp_to(&self, scissor: &Scissor) -> Bounds {
        let upper = u32::MAX as i64;

        Bounds {
            min_x: self.min_x.max(scissor.min_x()).max(0),
            min_y: self.min_y.max(scissor.min_y()).max(0),
            max_x: self.max_x.min(scissor.max_x()).min(upper),
            max_y: self.max_y.min(scissor.max_y()).min(upper),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_y > self.max_y
    }

    /// Number of pixels inside
    pub fn area(&self) -> u64 {
        if self.is_empty() {
            0
        } else {
            ((self.max_x - self.min_x + 1) * (self.max_y - self.min_y + 1)) as u64
        }
    }
}

/// Row-major position of the scan inside a triangle's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    x: i64,
    y: i64,
}

impl ScanCursor {
    /// Next pixel to be tested
    #[inline]
    pub fn position(&self) -> (i64, i64) {
        (self.x, self.y)
    }
}

/// Per-triangle state computed once before scanning.
///
/// Vertices are in `(x/w, y/w, z/w, 1/w)` form.
#[derive(Debug, Clone)]
pub struct TriangleSetup<const T: usize> {
    vertices: [GeometryVertex<T>; 3],
    screen: [ScreenPoint; 3],
    area: EdgeFixed,
    area_recip: RecipFixed,
    bounds: Bounds,
}

impl<const T: usize> TriangleSetup<T> {
    /// Maps the triangle onto the screen and prepares the scan.
    ///
    /// Returns `None` for triangles that cannot produce fragments, either because their clamped
    /// bounds are empty or because their area is zero.
    pub fn new(vertices: [GeometryVertex<T>; 3], viewport: &Viewport, scissor: &Scissor, recip: &mut ReciprocalUnit) -> RenderResult<Option<TriangleSetup<T>>> {
        let screen = [
            viewport.to_screen(vertices[0].position[0], vertices[0].position[1]),
            viewport.to_screen(vertices[1].position[0], vertices[1].position[1]),
            viewport.to_screen(vertices[2].position[0], vertices[2].position[1]),
        ];

        let bounds = Bounds::of_triangle(&screen).clamp_to(scissor);

        if bounds.is_empty() {
            trace!("Triangle {:?} misses the scissor rectangle", screen);
            return Ok(None);
        }

        let area = edge(screen[0], screen[1], screen[2]);

        if area == EdgeFixed::ZERO {
            debug!("Dropping zero-area triangle {:?}", screen);
            return Ok(None);
        }

        let area_recip: RecipFixed = recip.compute(area)?.to_fixed();

        trace!("Triangle area {} scanning {:?}", area, bounds);

        Ok(Some(TriangleSetup { vertices, screen, area, area_recip, bounds }))
    }

    /// Signed double area in square pixels
    #[inline]
    pub fn area(&self) -> EdgeFixed { self.area }

    #[inline]
    pub fn bounds(&self) -> Bounds { self.bounds }

    #[inline]
    pub fn screen(&self) -> &[ScreenPoint; 3] { &self.screen }

    pub fn start(&self) -> ScanCursor {
        ScanCursor { x: self.bounds.min_x, y: self.bounds.min_y }
    }

    /// Edge functions at the center of pixel `(x, y)` if it is covered.
    ///
    /// Edge `i` is the edge opposite vertex `i`, so it doubles as that vertex's weight. A pixel
    /// is covered when no edge function disagrees with the sign of the area.
    pub fn coverage(&self, x: i64, y: i64) -> Option<[EdgeFixed; 3]> {
        let half = ScreenFixed::ONE.halve();
        let p = (ScreenFixed::from_int(x) + half, ScreenFixed::from_int(y) + half);

        let [s0, s1, s2] = self.screen;

        let e = [edge(s1, s2, p), edge(s2, s0, p), edge(s0, s1, p)];

        let covered = if self.area.is_positive() {
            e.iter().all(|e| !e.is_negative())
        } else {
            e.iter().all(|e| !e.is_positive())
        };

        if covered { Some(e) } else { None }
    }

    /// Interpolates the fragment at `(x, y)` from its edge functions.
    ///
    /// Depth is linear in screen space, color and texture coordinates are perspective-correct.
    /// Returns `None` when the `1/w` weights cancel out.
    pub fn shade(&self, x: i64, y: i64, e: [EdgeFixed; 3], recip: &mut ReciprocalUnit) -> RenderResult<Option<Fragment<T>>> {
        let [v0, v1, v2] = &self.vertices;

        let weighted_inv_w: [AccumFixed; 3] = [
            e[0].mul_into(v0.w()),
            e[1].mul_into(v1.w()),
            e[2].mul_into(v2.w()),
        ];

        let inv_w_sum: AccumFixed = weighted_inv_w.iter().copied().sum();

        if inv_w_sum == AccumFixed::ZERO {
            trace!("Skipping pixel ({}, {}) with vanishing 1/w", x, y);
            return Ok(None);
        }

        let inv_w_sum_recip: RecipFixed = recip.compute(inv_w_sum)?.to_fixed();

        let weighted_z: [AccumFixed; 3] = [
            e[0].mul_into(v0.position[2]),
            e[1].mul_into(v1.position[2]),
            e[2].mul_into(v2.position[2]),
        ];

        let z_sum: AccumFixed = weighted_z.iter().copied().sum();

        let depth: FixedPoint = z_sum.mul_into(self.area_recip);

        let p: [FixedPoint; 3] = weighted_inv_w.map(|term| term.mul_into(inv_w_sum_recip));

        let color: Vec4 = Interpolate::barycentric_interpolate(p[0], &v0.color, p[1], &v1.color, p[2], &v2.color);

        let texcoords: [Vec4; T] = Interpolate::barycentric_interpolate(p[0], &v0.texcoords, p[1], &v1.texcoords, p[2], &v2.texcoords);

        Ok(Some(Fragment {
            coord_pos: Coordinate::new(x as u32, y as u32),
            depth,
            color: color.map(|c| clamp(c, FixedPoint::ZERO, FixedPoint::ONE)),
            texcoords,
            front_facing: v0.front_facing,
        }))
    }

    /// Advances the cursor to the next covered pixel and shades it.
    ///
    /// Returns `None` once every pixel of the bounds has been visited.
    pub fn next_fragment(&self, cursor: &mut ScanCursor, recip: &mut ReciprocalUnit) -> RenderResult<Option<Fragment<T>>> {
        while cursor.y <= self.bounds.max_y {
            let (x, y) = cursor.position();

            cursor.x += 1;

            if cursor.x > self.bounds.max_x {
                cursor.x = self.bounds.min_x;
                cursor.y += 1;
            }

            if let Some(e) = self.coverage(x, y) {
                if let Some(fragment) = self.shade(x, y, e, recip)? {
                    return Ok(Some(fragment));
                }
            }
        }

        Ok(None)
    }
}

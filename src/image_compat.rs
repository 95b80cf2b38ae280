//! Copying fragment streams into `image` buffers

use image::{Rgba, RgbaImage};

use crate::geometry::{Dimensions, Fragment};
use crate::numeric::FixedPoint;

#[inline]
fn channel_to_u8(value: FixedPoint) -> u8 {
    (value.to_f64().max(0.0).min(1.0) * 255.0).floor() as u8
}

/// Converts a fragment color to 8-bit RGBA
pub fn fragment_color<const T: usize>(fragment: &Fragment<T>) -> Rgba<u8> {
    let c = &fragment.color;

    Rgba([channel_to_u8(c[0]), channel_to_u8(c[1]), channel_to_u8(c[2]), channel_to_u8(c[3])])
}

/// Collects fragments into an image without any depth test, the last fragment for a pixel wins
pub struct FragmentImage {
    image: RgbaImage,
}

impl FragmentImage {
    pub fn new(dimensions: Dimensions) -> FragmentImage {
        FragmentImage { image: RgbaImage::new(dimensions.width, dimensions.height) }
    }

    /// Writes the fragment's color. Returns false for fragments outside the image.
    pub fn write<const T: usize>(&mut self, fragment: &Fragment<T>) -> bool {
        let pos = fragment.coord_pos;

        if !self.dimensions().in_bounds(pos) {
            return false;
        }

        self.image.put_pixel(pos.x, pos.y, fragment_color(fragment));

        true
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.image.width(), self.image.height())
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

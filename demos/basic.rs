extern crate fixedrender;

use fixedrender::{Dimensions, GeometryVertex, Pipeline, PipelineConfig};
use fixedrender::image_compat::FragmentImage;
use fixedrender::numeric::vec4;

fn main() {
    let dimensions = Dimensions::new(128, 128);

    let mut pipeline: Pipeline = Pipeline::new(PipelineConfig::new(dimensions)).unwrap();

    let triangle = [
        GeometryVertex::new(vec4(-1.0, -1.0, 0.5, 1.0), vec4(1.0, 0.0, 0.0, 1.0)),
        GeometryVertex::new(vec4(1.0, -1.0, 0.5, 1.0), vec4(0.0, 1.0, 0.0, 1.0)),
        GeometryVertex::new(vec4(0.0, 2.0, 0.5, 2.0), vec4(0.0, 0.0, 1.0, 1.0)),
    ];

    let mut image = FragmentImage::new(dimensions);
    let mut fragments = 0;

    pipeline.render(&triangle, |fragment| {
        image.write(fragment);
        fragments += 1;
        true
    }).unwrap();

    println!("Rendered {} fragments", fragments);

    image.into_image().save("basic.png").unwrap();
}

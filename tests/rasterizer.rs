extern crate fixedrender;

use fixedrender::{Dimensions, Fragment, GeometryVertex, PrimitiveType, Scissor, Stage};
use fixedrender::numeric::{vec4, ReciprocalUnit, Vec4};
use fixedrender::pipeline::{Rasterizer, RasterizerConfig};
use fixedrender::stream::Port;

const SIZE: u32 = 128;

/// Vertex already divided by w, with `inv_w` in the last component
fn divided<const T: usize>(x: f64, y: f64, z: f64, inv_w: f64, color: Vec4) -> GeometryVertex<T> {
    GeometryVertex::new(vec4(x, y, z, inv_w), color)
}

fn white<const T: usize>(x: f64, y: f64) -> GeometryVertex<T> {
    divided(x, y, 0.5, 1.0, vec4(1.0, 1.0, 1.0, 1.0))
}

/// Runs the rasterizer, taking a fragment only on every `accept_every`-th step
fn run_rasterizer<const T: usize>(config: RasterizerConfig, primitive_type: PrimitiveType,
                                  vertices: &[GeometryVertex<T>], accept_every: usize) -> Vec<Fragment<T>> {
    let mut rasterizer: Rasterizer<T> = Rasterizer::new(config, ReciprocalUnit::default());
    rasterizer.set_primitive_type(primitive_type).unwrap();

    let mut input = Port::new();
    let mut output = Port::new();

    let mut source = vertices.iter().copied();
    let mut next = source.next();

    let mut fragments = Vec::new();
    let mut steps = 0;

    loop {
        if let Some(v) = next {
            if input.offer(v).is_ok() {
                next = source.next();
            }
        }

        let progressed = rasterizer.step(&mut input, &mut output).unwrap();

        steps += 1;

        if steps % accept_every == 0 {
            if let Some(fragment) = output.take() {
                fragments.push(fragment);
                continue;
            }
        }

        if !progressed && next.is_none() && input.is_free() && output.is_free() {
            break;
        }
    }

    assert!(rasterizer.is_idle());

    fragments
}

fn full_config() -> RasterizerConfig {
    RasterizerConfig::covering(Dimensions::new(SIZE, SIZE))
}

/// Screen position of an NDC point on the full viewport in 1/16 pixel units
fn sub_pixel(ndc: f64) -> i64 {
    ((ndc + 1.0) * (SIZE as f64 / 2.0) * 16.0).round() as i64
}

fn edge(a: (i64, i64), b: (i64, i64), p: (i64, i64)) -> i64 {
    (b.0 - a.0) * (p.1 - a.1) - (b.1 - a.1) * (p.0 - a.0)
}

/// Integer edge functions at the center of pixel `(x, y)`, or `None` if not covered
fn reference_edges(screen: &[(i64, i64); 3], x: u32, y: u32) -> Option<[i64; 3]> {
    let p = (x as i64 * 16 + 8, y as i64 * 16 + 8);
    let [s0, s1, s2] = *screen;

    let area = edge(s0, s1, s2);
    let e = [edge(s1, s2, p), edge(s2, s0, p), edge(s0, s1, p)];

    let covered = if area > 0 {
        e.iter().all(|&e| e >= 0)
    } else {
        e.iter().all(|&e| e <= 0)
    };

    if area != 0 && covered { Some(e) } else { None }
}

/// Row-major list of covered pixels inside the scissor
fn reference_coverage(ndc: &[(f64, f64); 3], scissor: &Scissor) -> Vec<(u32, u32)> {
    let screen = [
        (sub_pixel(ndc[0].0), sub_pixel(ndc[0].1)),
        (sub_pixel(ndc[1].0), sub_pixel(ndc[1].1)),
        (sub_pixel(ndc[2].0), sub_pixel(ndc[2].1)),
    ];

    let mut covered = Vec::new();

    for y in 0..SIZE {
        for x in 0..SIZE {
            let inside_scissor = x as i64 >= scissor.min_x() && x as i64 <= scissor.max_x() &&
                y as i64 >= scissor.min_y() && y as i64 <= scissor.max_y();

            if inside_scissor && reference_edges(&screen, x, y).is_some() {
                covered.push((x, y));
            }
        }
    }

    covered
}

fn coords<const T: usize>(fragments: &[Fragment<T>]) -> Vec<(u32, u32)> {
    fragments.iter().map(|f| (f.coord_pos.x, f.coord_pos.y)).collect()
}

#[test]
fn full_viewport_triangle_stays_on_screen() {
    let triangle: [GeometryVertex; 3] = [
        divided(-1.0, -1.0, 0.5, 1.0, vec4(0.0, 0.5, 1.0, 1.0)),
        divided(1.0, -1.0, 0.5, 1.0, vec4(1.0, 0.0, 0.5, 1.0)),
        divided(0.0, 1.0, 0.5, 1.0, vec4(0.5, 1.0, 0.0, 1.0)),
    ];

    let fragments = run_rasterizer(full_config(), PrimitiveType::Triangles, &triangle, 1);

    assert!(!fragments.is_empty());

    for f in &fragments {
        assert!(f.coord_pos.x < SIZE && f.coord_pos.y < SIZE);

        for c in f.color.iter() {
            assert!(c.to_f64() >= 0.0 && c.to_f64() <= 1.0);
        }

        assert!((f.depth.to_f64() - 0.5).abs() < 0.002);
    }
}

#[test]
fn coverage_matches_integer_edge_functions() {
    let triangles: [[(f64, f64); 3]; 4] = [
        [(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)],
        [(-0.75, -0.8125), (0.90625, -0.5), (-0.09375, 0.84375)],
        [(0.1015625, 0.3), (-0.6, -0.2), (0.55, -0.9)],
        [(-0.5, -0.5), (0.5, -0.5), (-0.5, 0.5)],
    ];

    let config = full_config();

    for ndc in &triangles {
        let vertices: Vec<GeometryVertex> = ndc.iter().map(|&(x, y)| white(x, y)).collect();

        let fragments = run_rasterizer(config, PrimitiveType::Triangles, &vertices, 1);

        assert_eq!(coords(&fragments), reference_coverage(ndc, &config.scissor), "{:?}", ndc);
    }
}

#[test]
fn both_windings_cover_the_same_pixels() {
    let ndc = [(-0.75, -0.8125), (0.90625, -0.5), (-0.09375, 0.84375)];

    let forward: Vec<GeometryVertex> = ndc.iter().map(|&(x, y)| white(x, y)).collect();
    let backward: Vec<GeometryVertex> = ndc.iter().rev().map(|&(x, y)| white(x, y)).collect();

    let a = run_rasterizer(full_config(), PrimitiveType::Triangles, &forward, 1);
    let b = run_rasterizer(full_config(), PrimitiveType::Triangles, &backward, 1);

    assert!(!a.is_empty());
    assert_eq!(coords(&a), coords(&b));
}

#[test]
fn shared_edge_is_covered_exactly_once() {
    let a = [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5)];
    let b = [(-0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)];

    let config = full_config();

    let mut total = 0;

    for ndc in &[a, b] {
        let vertices: Vec<GeometryVertex> = ndc.iter().map(|&(x, y)| white(x, y)).collect();
        total += run_rasterizer(config, PrimitiveType::Triangles, &vertices, 1).len();
    }

    // Inclusive edges count the diagonal pixels for both triangles
    let square = 64 * 64;
    assert!(total >= square);
    assert!(total <= square + 64);
}

#[test]
fn fragments_are_clamped_to_the_scissor() {
    let ndc = [(-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)];
    let vertices: Vec<GeometryVertex> = ndc.iter().map(|&(x, y)| white(x, y)).collect();

    let scissor = Scissor::new(40, 10, 30, 25);
    let config = RasterizerConfig { scissor, ..full_config() };

    let fragments = run_rasterizer(config, PrimitiveType::Triangles, &vertices, 1);

    assert!(!fragments.is_empty());

    for f in &fragments {
        assert!(f.coord_pos.x >= 40 && f.coord_pos.x < 70);
        assert!(f.coord_pos.y >= 10 && f.coord_pos.y < 35);
    }

    assert_eq!(coords(&fragments), reference_coverage(&ndc, &scissor));
}

#[test]
fn empty_or_offscreen_scissor_produces_nothing() {
    let vertices: [GeometryVertex; 3] = [white(-1.0, -1.0), white(1.0, -1.0), white(0.0, 1.0)];

    for &scissor in &[Scissor::new(0, 0, 0, 0), Scissor::new(10, 10, 5, 0), Scissor::new(-20, -20, 10, 10)] {
        let config = RasterizerConfig { scissor, ..full_config() };

        assert!(run_rasterizer(config, PrimitiveType::Triangles, &vertices, 1).is_empty(), "{:?}", scissor);
    }
}

#[test]
fn zero_area_triangle_produces_nothing() {
    let degenerate: [[GeometryVertex; 3]; 2] = [
        [white(-0.5, -0.5), white(0.0, 0.0), white(0.5, 0.5)],
        [white(0.25, 0.25), white(0.25, 0.25), white(0.25, 0.25)],
    ];

    for triangle in &degenerate {
        assert!(run_rasterizer(full_config(), PrimitiveType::Triangles, triangle, 1).is_empty());
    }
}

#[test]
fn color_is_perspective_correct_and_depth_is_linear() {
    let ndc = [(-0.75, -0.8125), (0.90625, -0.5), (-0.09375, 0.84375)];
    let z = [0.2, 0.6, -0.3];
    let inv_w = [1.0, 0.25, 0.5];
    let colors = [[1.0, 0.0, 0.0, 1.0], [0.0, 1.0, 0.0, 1.0], [0.0, 0.0, 1.0, 0.5]];

    let vertices: Vec<GeometryVertex> = (0..3).map(|i| {
        let c = colors[i];
        divided(ndc[i].0, ndc[i].1, z[i], inv_w[i], vec4(c[0], c[1], c[2], c[3]))
    }).collect();

    let fragments = run_rasterizer(full_config(), PrimitiveType::Triangles, &vertices, 1);

    assert!(fragments.len() > 100);

    let screen = [
        (sub_pixel(ndc[0].0), sub_pixel(ndc[0].1)),
        (sub_pixel(ndc[1].0), sub_pixel(ndc[1].1)),
        (sub_pixel(ndc[2].0), sub_pixel(ndc[2].1)),
    ];

    let area = edge(screen[0], screen[1], screen[2]) as f64;

    for f in &fragments {
        let e = reference_edges(&screen, f.coord_pos.x, f.coord_pos.y).unwrap();
        let b: Vec<f64> = e.iter().map(|&e| e as f64 / area).collect();

        let depth: f64 = (0..3).map(|i| b[i] * z[i]).sum();
        assert!((f.depth.to_f64() - depth).abs() < 0.002, "depth {} vs {}", f.depth, depth);

        let weight: f64 = (0..3).map(|i| b[i] * inv_w[i]).sum();

        for k in 0..4 {
            let expected: f64 = (0..3).map(|i| b[i] * inv_w[i] * colors[i][k]).sum::<f64>() / weight;

            assert!((f.color[k].to_f64() - expected).abs() < 0.004,
                    "channel {} at {:?}: {} vs {}", k, f.coord_pos, f.color[k], expected);
        }
    }
}

#[test]
fn texcoords_are_perspective_correct_and_unclamped() {
    let ndc = [(-0.9, -0.9), (0.8, -0.7), (0.1, 0.9)];
    let inv_w = [0.5, 1.0, 0.25];
    let uv = [[2.0, -1.0], [0.0, 3.0], [-2.0, 0.5]];

    let vertices: Vec<GeometryVertex<1>> = (0..3).map(|i| {
        divided(ndc[i].0, ndc[i].1, 0.0, inv_w[i], vec4(1.0, 1.0, 1.0, 1.0))
            .with_texcoords([vec4(uv[i][0], uv[i][1], 0.0, 1.0)])
    }).collect();

    let fragments = run_rasterizer(full_config(), PrimitiveType::Triangles, &vertices, 1);

    assert!(!fragments.is_empty());

    let screen = [
        (sub_pixel(ndc[0].0), sub_pixel(ndc[0].1)),
        (sub_pixel(ndc[1].0), sub_pixel(ndc[1].1)),
        (sub_pixel(ndc[2].0), sub_pixel(ndc[2].1)),
    ];

    let area = edge(screen[0], screen[1], screen[2]) as f64;

    let mut outside_unit_range = false;

    for f in &fragments {
        let e = reference_edges(&screen, f.coord_pos.x, f.coord_pos.y).unwrap();
        let b: Vec<f64> = e.iter().map(|&e| e as f64 / area).collect();

        let weight: f64 = (0..3).map(|i| b[i] * inv_w[i]).sum();

        for k in 0..2 {
            let expected: f64 = (0..3).map(|i| b[i] * inv_w[i] * uv[i][k]).sum::<f64>() / weight;
            let actual = f.texcoords[0][k].to_f64();

            assert!((actual - expected).abs() < 0.01, "{} vs {}", actual, expected);

            outside_unit_range |= actual < 0.0 || actual > 1.0;
        }
    }

    assert!(outside_unit_range);
}

#[test]
fn front_facing_comes_from_the_first_vertex() {
    let vertices: [GeometryVertex; 3] = [
        white(-0.5, -0.5).with_front_facing(false),
        white(0.5, -0.5),
        white(0.0, 0.5),
    ];

    let fragments = run_rasterizer(full_config(), PrimitiveType::Triangles, &vertices, 1);

    assert!(!fragments.is_empty());
    assert!(fragments.iter().all(|f| !f.front_facing));
}

#[test]
fn stalled_consumer_loses_no_fragments() {
    let vertices: [GeometryVertex; 6] = [
        white(-1.0, -1.0), white(1.0, -1.0), white(0.0, 1.0),
        white(-0.5, 0.0), white(0.5, 0.25), white(0.0, 0.75),
    ];

    let immediate = run_rasterizer(full_config(), PrimitiveType::Triangles, &vertices, 1);

    for &every in &[2, 3, 7] {
        let stalled = run_rasterizer(full_config(), PrimitiveType::Triangles, &vertices, every);

        assert_eq!(stalled, immediate);
    }
}

#[test]
fn points_and_lines_are_consumed_without_fragments() {
    let vertices: [GeometryVertex; 6] = [
        white(-1.0, -1.0), white(1.0, -1.0), white(0.0, 1.0),
        white(-0.5, 0.0), white(0.5, 0.25), white(0.0, 0.75),
    ];

    assert!(run_rasterizer(full_config(), PrimitiveType::Points, &vertices, 1).is_empty());
    assert!(run_rasterizer(full_config(), PrimitiveType::Lines, &vertices, 1).is_empty());
}

#[test]
fn configuration_is_rejected_while_busy() {
    let mut rasterizer: Rasterizer = Rasterizer::new(full_config(), ReciprocalUnit::default());

    let mut input = Port::new();
    let mut output = Port::new();

    input.offer(white(-1.0, -1.0)).unwrap();
    rasterizer.step(&mut input, &mut output).unwrap();

    assert!(!rasterizer.is_idle());
    assert!(rasterizer.set_config(full_config()).is_err());
    assert!(rasterizer.set_primitive_type(PrimitiveType::Lines).is_err());

    let mut fresh: Rasterizer = Rasterizer::new(full_config(), ReciprocalUnit::default());
    let broken = RasterizerConfig::covering(Dimensions::new(0, 16));
    assert!(fresh.set_config(broken).is_err());
}

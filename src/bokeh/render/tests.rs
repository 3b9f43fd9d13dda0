use std::sync::{Arc, Mutex};

use crate::bokeh::common::error::{BokehError, Result};
use crate::bokeh::common::progress::{ProgressCallback, RenderProgress};
use crate::bokeh::frame::{ColorImage, DepthMap};
use crate::bokeh::lens::{LensModel, LensParameters, ThinLensModel};
use crate::bokeh::render::pipeline::{BokehRenderer, render};
use crate::bokeh::render::timing::RenderStage;
use crate::bokeh::render::types::{RenderConfig, RenderMode};

const ALL_MODES: [RenderMode; 4] = [
    RenderMode::Gather,
    RenderMode::DirectionalOctagon,
    RenderMode::DirectionalHexagon,
    RenderMode::DirectionalBox,
];

struct MockLens {
    should_fail: bool,
    radius: f32,
    calls: Arc<Mutex<usize>>,
}

impl LensModel for MockLens {
    fn validate(&self, _lens: &LensParameters) -> Result<()> {
        if self.should_fail {
            return Err(BokehError::InvalidParameter("Mock lens error".to_string()));
        }
        Ok(())
    }

    fn coc(&self, depth: f32, _lens: &LensParameters, _max_coc_px: f32) -> f32 {
        *self.calls.lock().unwrap() += 1;
        if depth < 0.5 { self.radius } else { 0.0 }
    }
}

fn pattern_image(width: usize, height: usize) -> ColorImage {
    let data = (0..width * height)
        .flat_map(|i| {
            let x = i % width;
            let y = i / width;
            [
                (x * 37 % 256) as u8,
                (y * 53 % 256) as u8,
                ((x * y + 11) * 29 % 256) as u8,
            ]
        })
        .collect();
    ColorImage::from_rgb(width, height, data).unwrap()
}

fn pattern_depth(width: usize, height: usize) -> DepthMap {
    let data = (0..width * height)
        .map(|i| ((i * 7919) % 101) as f32 / 100.0)
        .collect();
    DepthMap::new(width, height, data).unwrap()
}

/// Black frame at the focus depth with one white pixel at `depth`.
fn point_scene(size: usize, depth: f32, focus: f32) -> (ColorImage, DepthMap) {
    let mut image = ColorImage::filled(size, size, &[0, 0, 0]).unwrap();
    image.pixel_mut(size / 2, size / 2).copy_from_slice(&[255, 255, 255]);
    let mut depths = vec![focus; size * size];
    depths[(size / 2) * size + size / 2] = depth;
    (image, DepthMap::new(size, size, depths).unwrap())
}

/// Distance from the center to the farthest lit pixel.
fn disc_radius(image: &ColorImage) -> f32 {
    let cx = (image.width / 2) as f32;
    let cy = (image.height / 2) as f32;
    let mut radius = 0.0f32;
    for y in 0..image.height {
        for x in 0..image.width {
            if image.pixel(x, y).iter().any(|&v| v > 0) {
                radius = radius.max((x as f32 - cx).hypot(y as f32 - cy));
            }
        }
    }
    radius
}

fn renderer(mode: RenderMode) -> BokehRenderer {
    BokehRenderer::new(RenderConfig::builder().mode(mode).build()).unwrap()
}

#[test]
fn test_config_builder() {
    let config = RenderConfig::builder()
        .mode(RenderMode::DirectionalHexagon)
        .intensity_epsilon(0.5)
        .directional_samples_per_pixel(2.0)
        .validate_dimensions(false)
        .max_dimension(Some(4096))
        .progress_batch_rows(8)
        .build();

    assert_eq!(config.mode, RenderMode::DirectionalHexagon);
    assert_eq!(config.intensity_epsilon, 0.5);
    assert_eq!(config.directional_samples_per_pixel, 2.0);
    assert!(!config.validate_dimensions);
    assert_eq!(config.max_dimension, Some(4096));
    assert_eq!(config.progress_batch_rows, 8);
}

#[test]
fn test_rejects_invalid_config() {
    let config = RenderConfig::builder().intensity_epsilon(0.0).build();
    assert!(matches!(
        BokehRenderer::new(config),
        Err(BokehError::InvalidParameter(_))
    ));
}

#[test]
fn test_flat_image_in_focus_is_unchanged() {
    let image = ColorImage::filled(5, 5, &[200, 80, 30]).unwrap();
    let depth = DepthMap::constant(5, 5, 0.4).unwrap();
    for mode in ALL_MODES {
        let out = render(&image, &depth, 0.4, 0.1, 0.0, mode).unwrap();
        assert_eq!(out, image, "{:?}", mode);
    }
}

#[test]
fn test_constant_depth_is_identity() {
    let image = pattern_image(12, 9);
    let depth = DepthMap::constant(12, 9, 0.05).unwrap();
    for mode in ALL_MODES {
        let out = render(&image, &depth, 0.95, 0.2, 0.0, mode).unwrap();
        assert_eq!(out, image, "{:?}", mode);
    }
}

#[test]
fn test_zero_radius_is_identity() {
    let image = pattern_image(16, 10);
    let depth = pattern_depth(16, 10);
    for mode in ALL_MODES {
        let out = render(&image, &depth, 0.5, 0.0, 0.0, mode).unwrap();
        assert_eq!(out, image, "{:?}", mode);
    }
}

#[test]
fn test_dimension_mismatch() {
    let image = pattern_image(8, 8);
    let depth = pattern_depth(8, 7);
    let result = render(&image, &depth, 0.5, 0.1, 0.0, RenderMode::Gather);
    assert!(matches!(
        result.unwrap_err(),
        BokehError::DimensionMismatch {
            color_width: 8,
            color_height: 8,
            depth_width: 8,
            depth_height: 7,
        }
    ));
}

#[test]
fn test_invalid_lens_parameters() {
    let image = pattern_image(4, 4);
    let depth = pattern_depth(4, 4);
    for (focus, radius, dof) in [(1.5, 0.1, 0.0), (0.5, -0.1, 0.0), (0.5, 0.1, -1.0)] {
        let result = render(&image, &depth, focus, radius, dof, RenderMode::Gather);
        assert!(matches!(result.unwrap_err(), BokehError::InvalidParameter(_)));
    }
}

#[test]
fn test_dimension_validation() {
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    let empty = ColorImage::from_rgb(0, 3, Vec::new()).unwrap();
    let empty_depth = DepthMap::new(0, 3, Vec::new()).unwrap();
    let result = renderer(RenderMode::Gather).render(&empty, &empty_depth, &lens);
    assert!(matches!(result.unwrap_err(), BokehError::InvalidDimensions(0, 3)));

    let config = RenderConfig::builder().max_dimension(Some(16)).build();
    let limited = BokehRenderer::new(config).unwrap();
    let result = limited.render(&pattern_image(32, 8), &pattern_depth(32, 8), &lens);
    assert!(matches!(result.unwrap_err(), BokehError::InvalidDimensions(32, 8)));
}

#[test]
fn test_dimension_validation_disabled() {
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    let config = RenderConfig::builder()
        .validate_dimensions(false)
        .max_dimension(Some(16))
        .build();
    let unlimited = BokehRenderer::new(config).unwrap();
    let result = unlimited.render(&pattern_image(32, 8), &pattern_depth(32, 8), &lens);
    assert!(result.is_ok());
}

#[test]
fn test_lens_model_failure() {
    let calls = Arc::new(Mutex::new(0));
    let lens_model = MockLens {
        should_fail: true,
        radius: 2.0,
        calls: calls.clone(),
    };
    let renderer = BokehRenderer::with_custom(lens_model, RenderConfig::default()).unwrap();
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();

    let result = renderer.render(&pattern_image(6, 6), &pattern_depth(6, 6), &lens);
    assert!(matches!(result.unwrap_err(), BokehError::InvalidParameter(_)));
    assert_eq!(*calls.lock().unwrap(), 0);
}

#[test]
fn test_custom_lens_model_drives_the_blur() {
    let calls = Arc::new(Mutex::new(0));
    let lens_model = MockLens {
        should_fail: false,
        radius: 3.0,
        calls: calls.clone(),
    };
    let renderer = BokehRenderer::with_custom(lens_model, RenderConfig::default()).unwrap();
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    let image = pattern_image(10, 10);
    // left half near, right half far
    let depth = DepthMap::new(
        10,
        10,
        (0..100).map(|i| if i % 10 < 5 { 0.0 } else { 1.0 }).collect(),
    )
    .unwrap();

    let out = renderer.render(&image, &depth, &lens).unwrap();
    assert_eq!(*calls.lock().unwrap(), 100);
    assert_ne!(out, image);
    // the last column is more than 3px away from every blurred pixel
    for y in 0..10 {
        assert_eq!(out.pixel(9, y), image.pixel(9, y));
    }
}

#[test]
fn test_output_stays_within_input_range() {
    let image = pattern_image(20, 14);
    let depth = pattern_depth(20, 14);
    for mode in ALL_MODES {
        let out = render(&image, &depth, 0.3, 0.15, 0.1, mode).unwrap();
        for c in 0..3 {
            let lo = image.data.iter().skip(c).step_by(3).min().copied().unwrap();
            let hi = image.data.iter().skip(c).step_by(3).max().copied().unwrap();
            assert!(
                out.data.iter().skip(c).step_by(3).all(|&v| v >= lo && v <= hi),
                "{:?} channel {} left [{}, {}]",
                mode,
                c,
                lo,
                hi
            );
        }
    }
}

#[test]
fn test_horizontal_flip_symmetry() {
    let image = pattern_image(18, 12);
    let depth = pattern_depth(18, 12);
    let direct = render(&image, &depth, 0.4, 0.2, 0.05, RenderMode::Gather).unwrap();
    let mirrored = render(
        &image.flipped_horizontal(),
        &depth.flipped_horizontal(),
        0.4,
        0.2,
        0.05,
        RenderMode::Gather,
    )
    .unwrap()
    .flipped_horizontal();

    for (a, b) in direct.data.iter().zip(&mirrored.data) {
        assert!(a.abs_diff(*b) <= 1, "{} vs {}", a, b);
    }
}

/// Asserts a lit disc around the center: lit within `inner`, black from `outer`.
fn assert_disc(out: &ColorImage, inner: f32, outer: f32) {
    let c = (out.width / 2) as f32;
    for y in 0..out.height {
        for x in 0..out.width {
            let dist = (x as f32 - c).hypot(y as f32 - c);
            let lit = out.pixel(x, y).iter().any(|&v| v > 0);
            if dist <= inner {
                assert!(lit, "({}, {}) at {:.2} should be lit", x, y, dist);
            } else if dist >= outer {
                assert!(!lit, "({}, {}) at {:.2} should be black", x, y, dist);
            }
        }
    }
}

#[test]
fn test_point_light_renders_a_disc() {
    let size = 64;
    let (image, depth) = point_scene(size, 0.0, 0.8);
    // 64px * 10/64 = 10px lens max, 0.8 away from focus -> 8px disc
    let out = render(&image, &depth, 0.8, 10.0 / 64.0, 0.0, RenderMode::Gather).unwrap();

    assert_disc(&out, 7.5, 8.6);
    assert_eq!(out.pixel(size / 2, size / 2), &[255, 255, 255]);
}

#[test]
fn test_point_light_behind_focus_renders_a_disc() {
    let size = 64;
    let (image, depth) = point_scene(size, 1.0, 0.2);
    let out = render(&image, &depth, 0.2, 10.0 / 64.0, 0.0, RenderMode::Gather).unwrap();

    assert_disc(&out, 7.5, 8.6);
    assert!(disc_radius(&out) > 7.0);
}

#[test]
fn test_huge_max_radius_stays_bounded() {
    let lens = LensParameters::new(0.5, 1e20, 0.0).unwrap();
    for mode in ALL_MODES {
        let out = renderer(mode)
            .render(&pattern_image(12, 12), &pattern_depth(12, 12), &lens)
            .unwrap();
        assert_eq!((out.width, out.height), (12, 12), "{:?}", mode);
    }
}

#[test]
fn test_doubling_max_radius_doubles_the_disc() {
    let size = 64;
    let (image, depth) = point_scene(size, 0.0, 0.8);
    let small = render(&image, &depth, 0.8, 5.0 / 64.0, 0.0, RenderMode::Gather).unwrap();
    let large = render(&image, &depth, 0.8, 10.0 / 64.0, 0.0, RenderMode::Gather).unwrap();

    let r_small = disc_radius(&small);
    let r_large = disc_radius(&large);
    assert!(r_small > 3.0);
    assert!(r_large >= 2.0 * r_small - 1.0, "{} vs {}", r_small, r_large);
}

#[test]
fn test_progress_reports_every_row() {
    let events: Arc<Mutex<Vec<RenderProgress>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    let callback: ProgressCallback =
        Arc::new(move |p: RenderProgress| sink.lock().unwrap().push(p));

    let config = RenderConfig::builder()
        .mode(RenderMode::DirectionalHexagon)
        .progress_batch_rows(4)
        .build();
    let renderer = BokehRenderer::new(config).unwrap().with_progress(callback);
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    renderer
        .render(&pattern_image(10, 10), &pattern_depth(10, 10), &lens)
        .unwrap();

    let events = events.lock().unwrap();
    // three passes, each reporting at rows 4, 8 and 10
    assert_eq!(events.len(), 9);
    assert!(events.iter().all(|p| p.stage == "directional" && p.total_rows == 10));
    assert_eq!(events.iter().filter(|p| p.rows_done == 10).count(), 3);
}

#[test]
fn test_render_with_timings() {
    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    let (out, timings) = renderer(RenderMode::Gather)
        .render_with_timings(&pattern_image(8, 8), &pattern_depth(8, 8), &lens)
        .unwrap();

    assert_eq!(out.width, 8);
    assert_eq!(timings.mode(), RenderMode::Gather);
    let stages: Vec<RenderStage> = timings.stages().iter().map(|(s, _)| *s).collect();
    assert_eq!(
        stages,
        vec![
            RenderStage::Validate,
            RenderStage::CocField,
            RenderStage::Decode,
            RenderStage::Blur,
            RenderStage::Encode,
        ]
    );
    let passes: Vec<&str> = timings.passes().iter().map(|p| p.label.as_str()).collect();
    assert_eq!(passes, vec!["gather", "normalize"]);
}

#[test]
fn test_sharp_render_skips_blur_timings() {
    let lens = LensParameters::new(0.5, 0.0, 0.0).unwrap();
    let (_, timings) = renderer(RenderMode::DirectionalOctagon)
        .render_with_timings(&pattern_image(8, 8), &pattern_depth(8, 8), &lens)
        .unwrap();

    assert_eq!(timings.stages().len(), 2);
    assert!(timings.stage(RenderStage::Blur).is_none());
    assert!(timings.passes().is_empty());
}

#[test]
fn test_thin_lens_model() {
    let renderer = BokehRenderer::with_custom(ThinLensModel, RenderConfig::default()).unwrap();
    let image = pattern_image(12, 12);
    let depth = pattern_depth(12, 12);

    let lens = LensParameters::new(0.5, 0.1, 0.0).unwrap();
    let out = renderer.render(&image, &depth, &lens).unwrap();
    assert_ne!(out, image);

    let far_focus = LensParameters::new(1.0, 0.1, 0.0).unwrap();
    let result = renderer.render(&image, &depth, &far_focus);
    assert!(matches!(result.unwrap_err(), BokehError::InvalidParameter(_)));
}

#[test]
fn test_rgba_alpha_is_blurred_linearly() {
    let mut data = Vec::new();
    for i in 0..36 {
        let alpha = if i % 6 < 3 { 255 } else { 0 };
        data.extend_from_slice(&[120, 120, 120, alpha]);
    }
    let image = ColorImage::from_rgba(6, 6, data).unwrap();
    let depth = DepthMap::new(6, 6, (0..36).map(|i| if i == 0 { 0.5 } else { 0.0 }).collect())
        .unwrap();
    let out = render(&image, &depth, 1.0, 0.5, 0.0, RenderMode::Gather).unwrap();

    assert_eq!(out.channels, 4);
    // color is flat so only alpha changes across the edge
    let edge_alpha = out.pixel(3, 3)[3];
    assert!(edge_alpha > 0 && edge_alpha < 255);
    assert!(out.data.chunks(4).all(|px| px[0].abs_diff(120) <= 1));
}

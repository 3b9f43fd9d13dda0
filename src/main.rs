use defocus_rs::bokeh::{
    BokehRenderer, ColorImage, DepthMap, LensParameters, RenderConfig, RenderMode,
};
use defocus_rs::logger;

use tracing::{info, warn};

const FRAME_SIZE: usize = 128;

/// Dark frame at the focus plane with a grid of bright points at mixed depths.
fn point_light_frame(focus_depth: f32) -> anyhow::Result<(ColorImage, DepthMap)> {
    let mut image = ColorImage::filled(FRAME_SIZE, FRAME_SIZE, &[12, 14, 20])?;
    let mut depths = vec![focus_depth; FRAME_SIZE * FRAME_SIZE];

    let step = FRAME_SIZE / 4;
    for (i, (gy, gx)) in (1..4).flat_map(|gy| (1..4).map(move |gx| (gy, gx))).enumerate() {
        let (x, y) = (gx * step, gy * step);
        image.pixel_mut(x, y).copy_from_slice(&[255, 240, 200]);
        depths[y * FRAME_SIZE + x] = i as f32 / 8.0;
    }

    Ok((image, DepthMap::new(FRAME_SIZE, FRAME_SIZE, depths)?))
}

fn main() -> anyhow::Result<()> {
    logger::init();

    info!("Starting defocus_rs...");

    let focus_depth = 0.5;
    let (image, depth) = point_light_frame(focus_depth)?;
    let lens = LensParameters::new(focus_depth, 0.04, 0.05)?;

    for mode in [
        RenderMode::Gather,
        RenderMode::DirectionalHexagon,
        RenderMode::DirectionalOctagon,
        RenderMode::DirectionalBox,
    ] {
        let config = RenderConfig::builder().mode(mode).build();
        let renderer = BokehRenderer::new(config)?;

        info!("Rendering {:?}", renderer.config().mode);
        match renderer.render_with_timings(&image, &depth, &lens) {
            Ok((output, timings)) => {
                let lit = output
                    .data
                    .chunks_exact(output.channels)
                    .filter(|px| px[0] > 100)
                    .count();
                info!("{:?}: {} bright pixels", mode, lit);
                timings.log_summary();
            }
            Err(e) => warn!("{:?} render failed: {}", mode, e),
        }
    }

    Ok(())
}

use rayon::prelude::*;

use crate::bokeh::coc_field::CocField;
use crate::bokeh::common::error::Result;
use crate::bokeh::common::progress::RowProgress;
use crate::bokeh::compositor::AccumulationBuffer;
use crate::bokeh::directional::offsets::LineOffsets;
use crate::bokeh::frame::LinearImage;

/// One oriented line blur.
///
/// Each pixel averages samples along `line` scaled by its own CoC. A sample
/// is kept only if its distance from the pixel is within the sample's own
/// CoC, so sharp and blurred regions do not smear into each other. Pixels
/// that keep no samples pass through unchanged.
pub fn apply_directional_blur(
    image: &LinearImage,
    field: &CocField,
    line: &LineOffsets,
    progress: &RowProgress<'_>,
) -> Result<LinearImage> {
    let width = image.width;
    let height = image.height;
    let channels = image.channels;
    let radii = &field.radii;
    let pixels = &image.data;

    let mut acc = AccumulationBuffer::for_image(image);
    acc.par_rows_mut().for_each(|(y, (color_row, weight_row))| {
        for x in 0..width {
            let radius = radii[y * width + x];
            let out = &mut color_row[x * channels..(x + 1) * channels];
            let mut accepted = 0u32;

            for &(ox, oy) in &line.offsets {
                let sx = (x as f32 + ox * radius).round();
                let sy = (y as f32 + oy * radius).round();
                if sx < 0.0 || sy < 0.0 || sx >= width as f32 || sy >= height as f32 {
                    continue;
                }
                let q = sy as usize * width + sx as usize;
                let dist = ox.hypot(oy) * radius;
                if dist > radii[q] {
                    continue;
                }

                for (o, &v) in out.iter_mut().zip(&pixels[q * channels..(q + 1) * channels]) {
                    *o += v;
                }
                accepted += 1;
            }

            weight_row[x] = accepted as f32;
        }
        progress.row_finished();
    });

    acc.normalize(image)
}

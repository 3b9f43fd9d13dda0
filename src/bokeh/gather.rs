//! Depth-aware gather kernel
//!
//! Every output pixel pulls from a square window around itself. A neighbor
//! contributes when its own blur disc reaches the output pixel, so an
//! out-of-focus point spreads over its whole CoC on either side of the focus
//! plane while each output pixel is still written by exactly one thread.
//! Background samples sharper than the output pixel are attenuated so they do
//! not leak into a blurred foreground disc. Within a row, neighbors are visited
//! in ascending index order so the sums do not depend on the thread count.

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::bokeh::coc_field::CocField;
use crate::bokeh::common::progress::RowProgress;
use crate::bokeh::compositor::AccumulationBuffer;
use crate::bokeh::frame::{DepthMap, LinearImage};

const MAX_CHANNELS: usize = 4;

pub struct GatherBlurKernel<'a> {
    image: &'a LinearImage,
    depth: &'a DepthMap,
    field: &'a CocField,
}

impl<'a> GatherBlurKernel<'a> {
    pub fn new(image: &'a LinearImage, depth: &'a DepthMap, field: &'a CocField) -> Self {
        Self {
            image,
            depth,
            field,
        }
    }

    /// Half-size of the square window scanned around each output pixel.
    ///
    /// Never larger than the image itself, however large the CoC.
    pub fn window_radius(&self) -> usize {
        let extent = self.image.width.max(self.image.height);
        let radius = self.field.max_radius.ceil().clamp(0.0, extent as f32) as usize;
        radius.saturating_add(1).min(extent)
    }

    #[instrument(skip_all, fields(width = self.image.width, height = self.image.height))]
    pub fn accumulate(&self, progress: &RowProgress<'_>) -> AccumulationBuffer {
        let width = self.image.width;
        let height = self.image.height;
        let channels = self.image.channels;
        let window = self.window_radius();
        debug!("Gathering with a {}px window", window);

        let radii = &self.field.radii;
        let intensity = &self.field.intensity;
        let depth = &self.depth.data;
        let pixels = &self.image.data;
        let focus_depth = self.field.focus_depth;
        let max_coc_px = self.field.max_coc_px;

        let mut acc = AccumulationBuffer::for_image(self.image);
        acc.par_rows_mut().for_each(|(y, (color_row, weight_row))| {
            let y0 = y.saturating_sub(window);
            let y1 = (y + window).min(height - 1);

            for x in 0..width {
                let center = y * width + x;
                let x0 = x.saturating_sub(window);
                let x1 = (x + window).min(width - 1);

                let center_radius = radii[center];
                // Sharper background samples only bleed in as far as this pixel is itself blurred.
                let leakage = if max_coc_px > 0.0 {
                    (center_radius / max_coc_px).clamp(0.0, 1.0)
                } else {
                    1.0
                };

                let mut sum = [0.0f32; MAX_CHANNELS];
                let mut weight_sum = 0.0f32;

                for qy in y0..=y1 {
                    let dy = qy as f32 - y as f32;
                    let row_start = qy * width;
                    for qx in x0..=x1 {
                        let q = row_start + qx;
                        let w = if q == center {
                            intensity[q]
                        } else {
                            let dx = qx as f32 - x as f32;
                            let dist = (dx * dx + dy * dy).sqrt();
                            let overlap = (radii[q] - dist + 0.5).clamp(0.0, 1.0);
                            if overlap <= 0.0 {
                                continue;
                            }
                            let leak = if depth[q] > focus_depth && radii[q] < center_radius {
                                leakage
                            } else {
                                1.0
                            };
                            overlap * leak * intensity[q]
                        };
                        if w <= 0.0 {
                            continue;
                        }

                        let sample = &pixels[q * channels..(q + 1) * channels];
                        for (s, &v) in sum.iter_mut().zip(sample) {
                            *s += v * w;
                        }
                        weight_sum += w;
                    }
                }

                color_row[x * channels..(x + 1) * channels].copy_from_slice(&sum[..channels]);
                weight_row[x] = weight_sum;
            }

            progress.row_finished();
        });

        acc
    }
}

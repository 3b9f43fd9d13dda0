//! Per-pixel circle-of-confusion radii and intensity weights

use rayon::prelude::*;
use tracing::debug;

use crate::bokeh::frame::DepthMap;
use crate::bokeh::lens::{LensModel, LensParameters};

/// CoC radius and inverse-square intensity weight for every pixel of a depth map
#[derive(Debug, Clone)]
pub struct CocField {
    pub width: usize,
    pub height: usize,
    /// Row-major CoC radius in pixels
    pub radii: Vec<f32>,
    /// Row-major `1 / max(radius, epsilon)^2`
    pub intensity: Vec<f32>,
    /// Largest radius in the field
    pub max_radius: f32,
    /// Lens maximum radius scaled to the image width
    pub max_coc_px: f32,
    pub focus_depth: f32,
}

impl CocField {
    /// `epsilon` is the smallest radius the intensity weight divides by.
    ///
    /// A constant depth map carries no depth separation and yields a zero
    /// radius everywhere, wherever the focus plane sits.
    pub fn compute<L: LensModel>(
        depth: &DepthMap,
        lens: &LensParameters,
        model: &L,
        epsilon: f32,
    ) -> Self {
        let width = depth.width;
        let height = depth.height;
        let max_coc_px = lens.max_coc_pixels(width).min(f32::MAX);
        let mut radii = vec![0.0f32; width * height];
        let mut intensity = vec![0.0f32; width * height];

        let degenerate = depth.is_constant();
        if degenerate {
            debug!("Depth map is constant, CoC is zero everywhere");
            intensity.fill(1.0 / (epsilon * epsilon));
        } else if width > 0 {
            radii
                .par_chunks_mut(width)
                .zip(intensity.par_chunks_mut(width))
                .zip(depth.data.par_chunks(width))
                .for_each(|((radius_row, intensity_row), depth_row)| {
                    for ((r, i), &d) in radius_row
                        .iter_mut()
                        .zip(intensity_row.iter_mut())
                        .zip(depth_row)
                    {
                        *r = model.coc(d, lens, max_coc_px).clamp(0.0, f32::MAX);
                        let guarded = r.max(epsilon);
                        *i = 1.0 / (guarded * guarded);
                    }
                });
        }

        let max_radius = radii.iter().copied().fold(0.0f32, f32::max);
        debug!(
            "CoC field {}x{}: max radius {:.2}px (lens max {:.2}px)",
            width, height, max_radius, max_coc_px
        );

        Self {
            width,
            height,
            radii,
            intensity,
            max_radius,
            max_coc_px,
            focus_depth: lens.focus_depth(),
        }
    }

    #[inline]
    pub fn radius_at(&self, x: usize, y: usize) -> f32 {
        self.radii[y * self.width + x]
    }

    #[inline]
    pub fn intensity_at(&self, x: usize, y: usize) -> f32 {
        self.intensity[y * self.width + x]
    }

    /// True when every radius is zero and rendering reduces to a copy.
    pub fn is_sharp(&self) -> bool {
        self.max_radius <= 0.0
    }
}

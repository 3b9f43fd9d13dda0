//! Separable bokeh approximation built from oriented line blurs
//!
//! Two chains of line blurs are run from the same source and merged by
//! keeping the darker result per pixel, which trims the over-bright overlap
//! of skewed box footprints down to a polygon. Cost grows with the sample
//! count per line instead of the disc area.

mod combine;
mod offsets;
mod pass;

pub use combine::combine_by_min_luminance;
pub use offsets::LineOffsets;
pub use pass::apply_directional_blur;

use tracing::{debug, info_span};

use crate::bokeh::coc_field::CocField;
use crate::bokeh::common::error::Result;
use crate::bokeh::common::progress::{ProgressCallback, RowProgress};
use crate::bokeh::frame::LinearImage;
use crate::bokeh::render::PassTiming;

/// Footprint produced by the directional path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionalShape {
    /// 0° then {60°, 120°}, merged
    Hexagon,
    /// {0° then 90°} and {45° then 135°}, merged
    Octagon,
    /// 0° then 90°, no merge
    Box,
}

pub struct DirectionalBlurApproximator<'a> {
    field: &'a CocField,
    samples: usize,
    batch_rows: usize,
    callback: Option<&'a ProgressCallback>,
}

impl<'a> DirectionalBlurApproximator<'a> {
    pub fn new(field: &'a CocField, samples_per_pixel: f32) -> Self {
        let diagonal = (field.width as f32).hypot(field.height as f32);
        Self {
            field,
            samples: LineOffsets::count_for_radius(field.max_radius, samples_per_pixel, diagonal),
            batch_rows: usize::MAX,
            callback: None,
        }
    }

    pub fn with_progress(
        mut self,
        batch_rows: usize,
        callback: Option<&'a ProgressCallback>,
    ) -> Self {
        self.batch_rows = batch_rows;
        self.callback = callback;
        self
    }

    pub fn samples_per_line(&self) -> usize {
        self.samples
    }

    pub fn render(&self, image: &LinearImage, shape: DirectionalShape) -> Result<LinearImage> {
        self.render_timed(image, shape).map(|(out, _)| out)
    }

    /// Like [`render`](Self::render), also returning the time spent in each
    /// line pass and merge.
    pub fn render_timed(
        &self,
        image: &LinearImage,
        shape: DirectionalShape,
    ) -> Result<(LinearImage, Vec<PassTiming>)> {
        debug!(
            "Directional {:?} blur with {} samples per line",
            shape, self.samples
        );
        let mut passes = Vec::new();
        let out = match shape {
            DirectionalShape::Hexagon => {
                let base = self.pass(image, 0.0, &mut passes)?;
                let left = self.pass(&base, 60.0, &mut passes)?;
                let right = self.pass(&base, 120.0, &mut passes)?;
                self.merge(&left, &right, &mut passes)?
            }
            DirectionalShape::Octagon => {
                let horizontal = self.pass(image, 0.0, &mut passes)?;
                let square = self.pass(&horizontal, 90.0, &mut passes)?;
                let diagonal = self.pass(image, 45.0, &mut passes)?;
                let diamond = self.pass(&diagonal, 135.0, &mut passes)?;
                self.merge(&square, &diamond, &mut passes)?
            }
            DirectionalShape::Box => {
                let horizontal = self.pass(image, 0.0, &mut passes)?;
                self.pass(&horizontal, 90.0, &mut passes)?
            }
        };
        Ok((out, passes))
    }

    fn pass(
        &self,
        image: &LinearImage,
        angle_degrees: f32,
        passes: &mut Vec<PassTiming>,
    ) -> Result<LinearImage> {
        let _span = info_span!("directional_pass", angle = angle_degrees).entered();
        let line = LineOffsets::new(angle_degrees, self.samples);
        let progress =
            RowProgress::new("directional", image.height, self.batch_rows, self.callback);
        let (out, timing) = PassTiming::measure(format!("line {}°", angle_degrees), || {
            apply_directional_blur(image, self.field, &line, &progress)
        });
        passes.push(timing);
        out
    }

    fn merge(
        &self,
        a: &LinearImage,
        b: &LinearImage,
        passes: &mut Vec<PassTiming>,
    ) -> Result<LinearImage> {
        let (out, timing) =
            PassTiming::measure("min_luminance", || combine_by_min_luminance(a, b));
        passes.push(timing);
        out
    }
}

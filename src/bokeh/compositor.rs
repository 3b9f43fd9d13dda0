//! Accumulation buffers and per-pixel normalization
//!
//! Both rendering paths sum weighted colors into an [`AccumulationBuffer`] and
//! divide by the summed weight here. A pixel whose weight stayed at zero falls
//! back to its own source color.

use rayon::prelude::*;

use crate::bokeh::common::error::{BokehError, Result};
use crate::bokeh::frame::LinearImage;

/// Weighted color sums and weight sums, one cell per output pixel
#[derive(Debug, Clone)]
pub struct AccumulationBuffer {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
    /// Interleaved weighted color sums
    pub color: Vec<f32>,
    /// Row-major weight sums
    pub weight: Vec<f32>,
}

impl AccumulationBuffer {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            color: vec![0.0; width * height * channels],
            weight: vec![0.0; width * height],
        }
    }

    pub fn for_image(image: &LinearImage) -> Self {
        Self::new(image.width, image.height, image.channels)
    }

    /// Mutable (color, weight) slices of each row, for row-parallel writers.
    pub fn par_rows_mut(
        &mut self,
    ) -> impl IndexedParallelIterator<Item = (usize, (&mut [f32], &mut [f32]))> {
        let row_len = (self.width * self.channels).max(1);
        let width = self.width.max(1);
        self.color
            .par_chunks_mut(row_len)
            .zip(self.weight.par_chunks_mut(width))
            .enumerate()
    }

    pub fn weight_at(&self, x: usize, y: usize) -> f32 {
        self.weight[y * self.width + x]
    }

    pub fn min_weight(&self) -> f32 {
        self.weight.iter().copied().fold(f32::INFINITY, f32::min)
    }

    /// `color / weight` per pixel, or the matching `original` pixel where the
    /// weight is not positive.
    pub fn normalize(&self, original: &LinearImage) -> Result<LinearImage> {
        if original.width != self.width
            || original.height != self.height
            || original.channels != self.channels
        {
            return Err(BokehError::BufferSize {
                expected: self.color.len(),
                actual: original.data.len(),
            });
        }

        let channels = self.channels;
        let mut data = vec![0.0f32; self.color.len()];
        data.par_chunks_mut(channels)
            .zip(self.color.par_chunks(channels))
            .zip(self.weight.par_iter())
            .zip(original.data.par_chunks(channels))
            .for_each(|(((out, sum), &weight), source)| {
                if weight > 0.0 {
                    let inv = 1.0 / weight;
                    for (o, s) in out.iter_mut().zip(sum) {
                        *o = s * inv;
                    }
                } else {
                    out.copy_from_slice(source);
                }
            });

        LinearImage::new(self.width, self.height, channels, data)
    }
}

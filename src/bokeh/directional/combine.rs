use std::cmp::Ordering;

use rayon::prelude::*;

use crate::bokeh::color::luminance;
use crate::bokeh::common::error::{BokehError, Result};
use crate::bokeh::frame::LinearImage;

/// Per pixel, keeps whichever of `a` and `b` has the lower luminance.
///
/// Equal luminances fall back to comparing channels, so swapping the
/// arguments never changes the result.
pub fn combine_by_min_luminance(a: &LinearImage, b: &LinearImage) -> Result<LinearImage> {
    if a.width != b.width || a.height != b.height {
        return Err(BokehError::DimensionMismatch {
            color_width: a.width,
            color_height: a.height,
            depth_width: b.width,
            depth_height: b.height,
        });
    }
    if a.channels != b.channels {
        return Err(BokehError::InvalidParameter(format!(
            "cannot combine {}-channel and {}-channel images",
            a.channels, b.channels
        )));
    }

    let channels = a.channels;
    let mut data = vec![0.0f32; a.data.len()];
    data.par_chunks_mut(channels)
        .zip(a.data.par_chunks(channels))
        .zip(b.data.par_chunks(channels))
        .for_each(|((out, pa), pb)| {
            let keep = if darker_or_equal(pa, pb) { pa } else { pb };
            out.copy_from_slice(keep);
        });

    LinearImage::new(a.width, a.height, channels, data)
}

fn darker_or_equal(a: &[f32], b: &[f32]) -> bool {
    let by_luma = luminance(a).total_cmp(&luminance(b));
    let ordering = a
        .iter()
        .zip(b)
        .fold(by_luma, |acc, (x, y)| acc.then(x.total_cmp(y)));
    ordering != Ordering::Greater
}

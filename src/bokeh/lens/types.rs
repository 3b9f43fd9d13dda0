//! Lens parameter types

use crate::bokeh::common::error::{BokehError, Result};

/// Immutable lens settings for a single render call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensParameters {
    focus_depth: f32,
    max_coc_radius: f32,
    depth_of_field: f32,
}

impl LensParameters {
    /// * `focus_depth` - normalized depth rendered perfectly sharp, in [0,1]
    /// * `max_coc_radius` - largest blur radius as a fraction of image width
    /// * `depth_of_field` - width of the sharp band centered on `focus_depth`
    pub fn new(focus_depth: f32, max_coc_radius: f32, depth_of_field: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&focus_depth) {
            return Err(BokehError::InvalidParameter(format!(
                "focus depth {} outside [0, 1]",
                focus_depth
            )));
        }
        if !max_coc_radius.is_finite() || max_coc_radius < 0.0 {
            return Err(BokehError::InvalidParameter(format!(
                "max CoC radius must be finite and non-negative, got {}",
                max_coc_radius
            )));
        }
        if !depth_of_field.is_finite() || depth_of_field < 0.0 {
            return Err(BokehError::InvalidParameter(format!(
                "depth of field must be finite and non-negative, got {}",
                depth_of_field
            )));
        }
        Ok(Self {
            focus_depth,
            max_coc_radius,
            depth_of_field,
        })
    }

    pub fn focus_depth(&self) -> f32 {
        self.focus_depth
    }

    pub fn max_coc_radius(&self) -> f32 {
        self.max_coc_radius
    }

    pub fn depth_of_field(&self) -> f32 {
        self.depth_of_field
    }

    /// Largest CoC radius in pixels for an image `width` pixels wide.
    pub fn max_coc_pixels(&self, width: usize) -> f32 {
        self.max_coc_radius * width as f32
    }

    /// Scales the blur strength by `2^stops`.
    pub fn with_blur_stops(self, stops: f32) -> Result<Self> {
        Self::new(
            self.focus_depth,
            self.max_coc_radius * stops.exp2(),
            self.depth_of_field,
        )
    }
}

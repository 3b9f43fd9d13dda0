use crate::bokeh::common::error::{BokehError, Result};
use crate::bokeh::lens::model::LensModel;
use crate::bokeh::lens::types::LensParameters;

const MIN_DENOMINATOR: f32 = 1e-6;

/// Thin-lens CoC with a focal length derived from the focus depth.
///
/// Object and image distance of the focus plane sum to `focus_depth + 1`.
/// The focal length is placed midway
/// between the bounds that keep the image distance real and in front of the
/// sensor. The normalized CoC is clamped to [0,1] before scaling to pixels,
/// which also absorbs the blow-up close to the lens.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThinLensModel;

impl ThinLensModel {
    fn focal_bounds(focus_depth: f32) -> (f32, f32) {
        let min_f = focus_depth / (focus_depth + 1.0);
        let max_f = (focus_depth + 1.0) / 4.0;
        (min_f, max_f)
    }

    /// Focal length and image distance for a focus depth.
    fn optics(focus_depth: f32) -> (f32, f32) {
        let (min_f, max_f) = Self::focal_bounds(focus_depth);
        let focal_length = (min_f + max_f) / 2.0;
        let total = focus_depth + 1.0;
        let s1 = 0.5 * (total - (total * (total - 4.0 * focal_length)).max(0.0).sqrt());
        (focal_length, s1)
    }
}

impl LensModel for ThinLensModel {
    fn validate(&self, lens: &LensParameters) -> Result<()> {
        let (min_f, max_f) = Self::focal_bounds(lens.focus_depth());
        let focal_length = (min_f + max_f) / 2.0;
        if !(min_f < focal_length && focal_length < max_f) {
            return Err(BokehError::InvalidParameter(format!(
                "thin lens has no valid focal length for focus depth {} (bounds {}..{})",
                lens.focus_depth(),
                min_f,
                max_f
            )));
        }
        Ok(())
    }

    fn coc(&self, depth: f32, lens: &LensParameters, max_coc_px: f32) -> f32 {
        let focus = lens.focus_depth();
        if (focus - depth).abs() <= lens.depth_of_field() * 0.5 {
            return 0.0;
        }

        let (focal_length, s1) = Self::optics(focus);
        let s2 = s1 - focus + depth;
        let denominator = s2 * (s1 - focal_length);
        if s2 <= 0.0 || denominator.abs() < MIN_DENOMINATOR {
            return max_coc_px;
        }

        let normalized = ((s2 - s1).abs() * focal_length / denominator).clamp(0.0, 1.0);
        normalized * max_coc_px
    }
}

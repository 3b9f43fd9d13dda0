use crate::bokeh::lens::model::LensModel;
use crate::bokeh::lens::types::LensParameters;

/// `max_coc_radius * max(|focus_depth - depth| - depth_of_field / 2, 0)`
#[inline]
pub fn coc_radius(depth: f32, focus_depth: f32, max_coc_radius: f32, depth_of_field: f32) -> f32 {
    max_coc_radius * ((focus_depth - depth).abs() - depth_of_field * 0.5).max(0.0)
}

/// Linear CoC falloff around the focus plane, the default model.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearLens;

impl LensModel for LinearLens {
    fn coc(&self, depth: f32, lens: &LensParameters, max_coc_px: f32) -> f32 {
        coc_radius(depth, lens.focus_depth(), max_coc_px, lens.depth_of_field())
    }
}

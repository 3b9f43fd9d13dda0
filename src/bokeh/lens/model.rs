use crate::bokeh::common::error::Result;
use crate::bokeh::lens::types::LensParameters;

/// Maps a pixel depth to a blur radius in pixels.
///
/// Implementations are pure; the CoC field evaluates them from several
/// threads at once.
pub trait LensModel: Sync {
    /// Rejects lens settings the model cannot evaluate.
    fn validate(&self, _lens: &LensParameters) -> Result<()> {
        Ok(())
    }

    /// Radius in pixels, never negative. `max_coc_px` is the lens' maximum
    /// radius already scaled to the image width.
    fn coc(&self, depth: f32, lens: &LensParameters, max_coc_px: f32) -> f32;
}

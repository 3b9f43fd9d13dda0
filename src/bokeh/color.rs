//! Conversion between 8-bit gamma-encoded and linear-light pixels

mod converter;
pub mod types;

pub use converter::ColorSpaceConverter;
pub use types::TransferFunction;

/// Rec. 709 luminance weights applied to linear RGB.
pub const LUMA_WEIGHTS: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Relative luminance of a linear-light pixel (alpha ignored).
#[inline]
pub fn luminance(px: &[f32]) -> f32 {
    LUMA_WEIGHTS[0] * px[0] + LUMA_WEIGHTS[1] * px[1] + LUMA_WEIGHTS[2] * px[2]
}

use tracing::debug;

use crate::bokeh::color::types::TransferFunction;
use crate::bokeh::common::error::Result;
use crate::bokeh::frame::{ColorImage, LinearImage};

const ALPHA_CHANNEL: usize = 3;

/// Decodes 8-bit images to linear light and quantizes them back.
///
/// Decoding goes through a 256-entry table built once per converter; encoding
/// evaluates the curve exactly so an 8-bit value survives a round trip.
#[derive(Debug, Clone)]
pub struct ColorSpaceConverter {
    transfer: TransferFunction,
    to_linear: [f32; 256],
}

impl ColorSpaceConverter {
    pub fn new(transfer: TransferFunction) -> Self {
        let mut to_linear = [0.0f32; 256];
        for (v, slot) in to_linear.iter_mut().enumerate() {
            *slot = transfer.to_linear(v as f32 / 255.0);
        }
        Self {
            transfer,
            to_linear,
        }
    }

    #[inline]
    pub fn decode_sample(&self, v: u8) -> f32 {
        self.to_linear[v as usize]
    }

    #[inline]
    pub fn encode_sample(&self, linear: f32) -> u8 {
        let encoded = self.transfer.from_linear(linear.clamp(0.0, 1.0));
        (encoded * 255.0).round().clamp(0.0, 255.0) as u8
    }

    pub fn decode(&self, image: &ColorImage) -> Result<LinearImage> {
        debug!(
            "Decoding {}x{} image to linear light ({:?})",
            image.width, image.height, self.transfer
        );
        let channels = image.channels;
        let data = image
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i % channels == ALPHA_CHANNEL {
                    v as f32 / 255.0
                } else {
                    self.decode_sample(v)
                }
            })
            .collect();
        LinearImage::new(image.width, image.height, channels, data)
    }

    pub fn encode(&self, image: &LinearImage) -> Result<ColorImage> {
        debug!(
            "Encoding {}x{} image from linear light ({:?})",
            image.width, image.height, self.transfer
        );
        let channels = image.channels;
        let data = image
            .data
            .iter()
            .enumerate()
            .map(|(i, &v)| {
                if i % channels == ALPHA_CHANNEL {
                    (v.clamp(0.0, 1.0) * 255.0).round() as u8
                } else {
                    self.encode_sample(v)
                }
            })
            .collect();
        ColorImage::new(image.width, image.height, channels, data)
    }
}

impl Default for ColorSpaceConverter {
    fn default() -> Self {
        Self::new(TransferFunction::default())
    }
}

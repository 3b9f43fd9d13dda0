/// Transfer curve of the 8-bit interchange images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferFunction {
    /// IEC 61966-2-1 piecewise sRGB curve
    #[default]
    Srgb,
    /// Samples are already proportional to light, only rescaled to [0,1]
    Linear,
}

impl TransferFunction {
    pub fn to_linear(self, encoded: f32) -> f32 {
        match self {
            TransferFunction::Srgb => {
                if encoded <= 0.04045 {
                    encoded / 12.92
                } else {
                    ((encoded + 0.055) / 1.055).powf(2.4)
                }
            }
            TransferFunction::Linear => encoded,
        }
    }

    pub fn from_linear(self, linear: f32) -> f32 {
        match self {
            TransferFunction::Srgb => {
                if linear <= 0.003_130_8 {
                    12.92 * linear
                } else {
                    1.055 * linear.powf(1.0 / 2.4) - 0.055
                }
            }
            TransferFunction::Linear => linear,
        }
    }
}

//! Pixel buffer types

use crate::bokeh::common::error::{BokehError, Result};

/// 8-bit gamma-encoded image, the interchange form of the kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel, 3 (RGB) or 4 (RGBA)
    pub channels: usize,
    /// Interleaved pixel data [R, G, B, (A), R, G, B, (A), ...]
    pub data: Vec<u8>,
}

impl ColorImage {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        check_channels(channels)?;
        check_len(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn from_rgb(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 3, data)
    }

    pub fn from_rgba(width: usize, height: usize, data: Vec<u8>) -> Result<Self> {
        Self::new(width, height, 4, data)
    }

    /// Image filled with a single color; `color.len()` sets the channel count.
    pub fn filled(width: usize, height: usize, color: &[u8]) -> Result<Self> {
        check_channels(color.len())?;
        let data = color
            .iter()
            .copied()
            .cycle()
            .take(width * height * color.len())
            .collect();
        Self::new(width, height, color.len(), data)
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[u8] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [u8] {
        let start = (y * self.width + x) * self.channels;
        &mut self.data[start..start + self.channels]
    }

    /// Mirror image around the vertical axis.
    pub fn flipped_horizontal(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact((self.width * self.channels).max(1)) {
            for px in row.chunks_exact(self.channels).rev() {
                data.extend_from_slice(px);
            }
        }
        Self {
            width: self.width,
            height: self.height,
            channels: self.channels,
            data,
        }
    }
}

/// Linear-light working image, one `f32` per sample
#[derive(Debug, Clone, PartialEq)]
pub struct LinearImage {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
    /// Samples per pixel, 3 (RGB) or 4 (RGBA)
    pub channels: usize,
    /// Interleaved linear-light samples
    pub data: Vec<f32>,
}

impl LinearImage {
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f32>) -> Result<Self> {
        check_channels(channels)?;
        check_len(width, height, channels, data.len())?;
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = (y * self.width + x) * self.channels;
        &self.data[start..start + self.channels]
    }
}

/// Per-pixel normalized depth in [0,1], larger values are farther away
#[derive(Debug, Clone, PartialEq)]
pub struct DepthMap {
    /// Width of the map in pixels
    pub width: usize,
    /// Height of the map in pixels
    pub height: usize,
    /// Row-major depth values
    pub data: Vec<f32>,
}

impl DepthMap {
    pub fn new(width: usize, height: usize, data: Vec<f32>) -> Result<Self> {
        check_len(width, height, 1, data.len())?;
        if let Some(bad) = data.iter().find(|d| !(0.0..=1.0).contains(*d)) {
            return Err(BokehError::InvalidParameter(format!(
                "depth value {} outside [0, 1]",
                bad
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn constant(width: usize, height: usize, depth: f32) -> Result<Self> {
        Self::new(width, height, vec![depth; width * height])
    }

    /// Normalizes an 8-bit grayscale depth render (`value / 255`).
    pub fn from_luma8(width: usize, height: usize, luma: &[u8]) -> Result<Self> {
        check_len(width, height, 1, luma.len())?;
        let data = luma.iter().map(|&v| v as f32 / u8::MAX as f32).collect();
        Self::new(width, height, data)
    }

    /// Normalizes a 16-bit grayscale depth render (`value / 65535`).
    pub fn from_luma16(width: usize, height: usize, luma: &[u16]) -> Result<Self> {
        check_len(width, height, 1, luma.len())?;
        let data = luma.iter().map(|&v| v as f32 / u16::MAX as f32).collect();
        Self::new(width, height, data)
    }

    /// True when every pixel holds the same depth, so no plane can be told apart.
    pub fn is_constant(&self) -> bool {
        self.data.windows(2).all(|w| w[0] == w[1])
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.data[y * self.width + x]
    }

    /// Depth under normalized image coordinates `(u, v)` in [0,1].
    ///
    /// Coordinates truncate to the containing pixel and the far edge maps to
    /// the last row/column.
    pub fn depth_at_normalized(&self, u: f32, v: f32) -> Result<f32> {
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return Err(BokehError::InvalidParameter(format!(
                "normalized coordinate ({}, {}) outside [0, 1]",
                u, v
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(BokehError::InvalidDimensions(self.width, self.height));
        }
        let x = ((u * self.width as f32) as usize).min(self.width - 1);
        let y = ((v * self.height as f32) as usize).min(self.height - 1);
        Ok(self.depth_at(x, y))
    }

    /// Mirror map around the vertical axis.
    pub fn flipped_horizontal(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(self.width.max(1)) {
            data.extend(row.iter().rev());
        }
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

fn check_channels(channels: usize) -> Result<()> {
    if channels == 3 || channels == 4 {
        Ok(())
    } else {
        Err(BokehError::InvalidParameter(format!(
            "expected 3 or 4 channels, got {}",
            channels
        )))
    }
}

fn check_len(width: usize, height: usize, channels: usize, actual: usize) -> Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|v| v.checked_mul(channels))
        .ok_or(BokehError::InvalidDimensions(width, height))?;
    if expected != actual {
        return Err(BokehError::BufferSize { expected, actual });
    }
    Ok(())
}

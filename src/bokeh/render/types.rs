//! Render configuration types

use crate::bokeh::color::TransferFunction;
use crate::bokeh::common::error::{BokehError, Result};
use crate::bokeh::directional::DirectionalShape;

/// Blur algorithm used for a render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Circular gather kernel (highest quality, cost grows with radius squared)
    #[default]
    Gather,
    /// Line-blur approximation with an octagonal footprint
    DirectionalOctagon,
    /// Line-blur approximation with a hexagonal footprint
    DirectionalHexagon,
    /// Horizontal then vertical line blur, square footprint
    DirectionalBox,
}

impl RenderMode {
    pub fn directional_shape(self) -> Option<DirectionalShape> {
        match self {
            RenderMode::Gather => None,
            RenderMode::DirectionalOctagon => Some(DirectionalShape::Octagon),
            RenderMode::DirectionalHexagon => Some(DirectionalShape::Hexagon),
            RenderMode::DirectionalBox => Some(DirectionalShape::Box),
        }
    }
}

/// Configuration for a bokeh render
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Blur algorithm
    pub mode: RenderMode,
    /// Transfer curve of the input and output images
    pub transfer: TransferFunction,
    /// Smallest radius (px) the inverse-square intensity weight divides by
    pub intensity_epsilon: f32,
    /// Line samples per pixel of maximum CoC radius, directional modes only
    pub directional_samples_per_pixel: f32,
    /// Whether to reject empty or oversized images before rendering
    pub validate_dimensions: bool,
    /// Largest accepted width or height when validating
    pub max_dimension: Option<usize>,
    /// Rows per progress report
    pub progress_batch_rows: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Gather,
            transfer: TransferFunction::Srgb,
            intensity_epsilon: 1.0,
            directional_samples_per_pixel: 1.0,
            validate_dimensions: true,
            max_dimension: None,
            progress_batch_rows: 64,
        }
    }
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.intensity_epsilon.is_finite() || self.intensity_epsilon <= 0.0 {
            return Err(BokehError::InvalidParameter(format!(
                "intensity epsilon must be positive, got {}",
                self.intensity_epsilon
            )));
        }
        if !self.directional_samples_per_pixel.is_finite()
            || self.directional_samples_per_pixel <= 0.0
        {
            return Err(BokehError::InvalidParameter(format!(
                "directional samples per pixel must be positive, got {}",
                self.directional_samples_per_pixel
            )));
        }
        Ok(())
    }
}

/// Builder for RenderConfig
#[derive(Default)]
pub struct RenderConfigBuilder {
    mode: Option<RenderMode>,
    transfer: Option<TransferFunction>,
    intensity_epsilon: Option<f32>,
    directional_samples_per_pixel: Option<f32>,
    validate_dimensions: Option<bool>,
    max_dimension: Option<Option<usize>>,
    progress_batch_rows: Option<usize>,
}

impl RenderConfigBuilder {
    pub fn mode(mut self, mode: RenderMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn transfer(mut self, transfer: TransferFunction) -> Self {
        self.transfer = Some(transfer);
        self
    }

    pub fn intensity_epsilon(mut self, epsilon: f32) -> Self {
        self.intensity_epsilon = Some(epsilon);
        self
    }

    pub fn directional_samples_per_pixel(mut self, samples: f32) -> Self {
        self.directional_samples_per_pixel = Some(samples);
        self
    }

    pub fn validate_dimensions(mut self, validate: bool) -> Self {
        self.validate_dimensions = Some(validate);
        self
    }

    pub fn max_dimension(mut self, max: Option<usize>) -> Self {
        self.max_dimension = Some(max);
        self
    }

    pub fn progress_batch_rows(mut self, rows: usize) -> Self {
        self.progress_batch_rows = Some(rows);
        self
    }

    pub fn build(self) -> RenderConfig {
        let default = RenderConfig::default();
        RenderConfig {
            mode: self.mode.unwrap_or(default.mode),
            transfer: self.transfer.unwrap_or(default.transfer),
            intensity_epsilon: self.intensity_epsilon.unwrap_or(default.intensity_epsilon),
            directional_samples_per_pixel: self
                .directional_samples_per_pixel
                .unwrap_or(default.directional_samples_per_pixel),
            validate_dimensions: self
                .validate_dimensions
                .unwrap_or(default.validate_dimensions),
            max_dimension: self.max_dimension.unwrap_or(default.max_dimension),
            progress_batch_rows: self
                .progress_batch_rows
                .unwrap_or(default.progress_batch_rows),
        }
    }
}

use tracing::{debug, info, instrument, warn};

use crate::bokeh::{
    coc_field::CocField,
    color::ColorSpaceConverter,
    common::{
        error::{BokehError, Result},
        progress::{ProgressCallback, RowProgress},
    },
    directional::DirectionalBlurApproximator,
    frame::{ColorImage, DepthMap, LinearImage},
    gather::GatherBlurKernel,
    lens::{LensModel, LensParameters, LinearLens},
    render::{
        timing::{PassTiming, RenderStage, RenderTimings},
        types::{RenderConfig, RenderMode},
    },
};

/// Renders depth-of-field from a sharp image and its depth map.
///
/// Holds no per-render state: every call gets its lens settings explicitly
/// and allocates its own working buffers.
pub struct BokehRenderer<L: LensModel = LinearLens> {
    lens_model: L,
    config: RenderConfig,
    progress: Option<ProgressCallback>,
}

impl BokehRenderer<LinearLens> {
    pub fn new(config: RenderConfig) -> Result<Self> {
        Self::with_custom(LinearLens, config)
    }
}

impl<L: LensModel> BokehRenderer<L> {
    pub fn with_custom(lens_model: L, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            lens_model,
            config,
            progress: None,
        })
    }

    /// Reports finished rows every `progress_batch_rows` rows of each pass.
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    fn validate_inputs(&self, color: &ColorImage, depth: &DepthMap) -> Result<()> {
        if color.width != depth.width || color.height != depth.height {
            return Err(BokehError::DimensionMismatch {
                color_width: color.width,
                color_height: color.height,
                depth_width: depth.width,
                depth_height: depth.height,
            });
        }

        if !self.config.validate_dimensions {
            return Ok(());
        }

        if color.width == 0 || color.height == 0 {
            return Err(BokehError::InvalidDimensions(color.width, color.height));
        }

        if let Some(max) = self.config.max_dimension {
            if color.width > max || color.height > max {
                warn!(
                    "Image dimensions {}x{} exceed maximum {}",
                    color.width, color.height, max
                );
                return Err(BokehError::InvalidDimensions(color.width, color.height));
            }
        }

        Ok(())
    }

    pub fn render(
        &self,
        color: &ColorImage,
        depth: &DepthMap,
        lens: &LensParameters,
    ) -> Result<ColorImage> {
        let mut timings = RenderTimings::new(self.config.mode, color.width * color.height);
        self.run(color, depth, lens, &mut timings)
    }

    pub fn render_with_timings(
        &self,
        color: &ColorImage,
        depth: &DepthMap,
        lens: &LensParameters,
    ) -> Result<(ColorImage, RenderTimings)> {
        let mut timings = RenderTimings::new(self.config.mode, color.width * color.height);
        let image = self.run(color, depth, lens, &mut timings)?;
        Ok((image, timings))
    }

    #[instrument(
        skip(self, color, depth, lens, timings),
        fields(width = color.width, height = color.height, mode = ?self.config.mode)
    )]
    fn run(
        &self,
        color: &ColorImage,
        depth: &DepthMap,
        lens: &LensParameters,
        timings: &mut RenderTimings,
    ) -> Result<ColorImage> {
        info!("Starting bokeh render");

        timings.time(RenderStage::Validate, || -> Result<()> {
            let _span = tracing::info_span!("validate").entered();
            self.config.validate()?;
            self.validate_inputs(color, depth)?;
            self.lens_model.validate(lens)
        })?;

        let field = timings.time(RenderStage::CocField, || {
            let _span = tracing::info_span!("coc_field").entered();
            CocField::compute(depth, lens, &self.lens_model, self.config.intensity_epsilon)
        });

        if field.is_sharp() {
            debug!("CoC is zero everywhere, returning input unchanged");
            return Ok(color.clone());
        }

        let converter = ColorSpaceConverter::new(self.config.transfer);
        let linear = timings.time(RenderStage::Decode, || {
            let _span = tracing::info_span!("decode").entered();
            converter.decode(color)
        })?;

        let (blurred, passes) = timings.time(RenderStage::Blur, || {
            let _span = tracing::info_span!("blur", mode = ?self.config.mode).entered();
            self.blur(&linear, depth, &field)
        })?;
        timings.record_passes(passes);

        let output = timings.time(RenderStage::Encode, || {
            let _span = tracing::info_span!("encode").entered();
            converter.encode(&blurred)
        })?;

        info!(
            width = output.width,
            height = output.height,
            max_coc_px = field.max_radius,
            elapsed_ms = timings.total_duration().as_secs_f64() * 1000.0,
            "Render complete"
        );
        Ok(output)
    }

    fn blur(
        &self,
        linear: &LinearImage,
        depth: &DepthMap,
        field: &CocField,
    ) -> Result<(LinearImage, Vec<PassTiming>)> {
        match self.config.mode.directional_shape() {
            None => {
                let progress = RowProgress::new(
                    "gather",
                    linear.height,
                    self.config.progress_batch_rows,
                    self.progress.as_ref(),
                );
                let (acc, gathered) = PassTiming::measure("gather", || {
                    GatherBlurKernel::new(linear, depth, field).accumulate(&progress)
                });
                let (out, normalized) = PassTiming::measure("normalize", || acc.normalize(linear));
                Ok((out?, vec![gathered, normalized]))
            }
            Some(shape) => {
                DirectionalBlurApproximator::new(field, self.config.directional_samples_per_pixel)
                    .with_progress(self.config.progress_batch_rows, self.progress.as_ref())
                    .render_timed(linear, shape)
            }
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn lens_model(&self) -> &L {
        &self.lens_model
    }
}

/// One-shot render with the linear lens model and default settings.
///
/// `max_coc_radius` is a fraction of the image width.
pub fn render(
    color: &ColorImage,
    depth: &DepthMap,
    focus_depth: f32,
    max_coc_radius: f32,
    depth_of_field: f32,
    mode: RenderMode,
) -> Result<ColorImage> {
    let lens = LensParameters::new(focus_depth, max_coc_radius, depth_of_field)?;
    let config = RenderConfig::builder().mode(mode).build();
    BokehRenderer::new(config)?.render(color, depth, &lens)
}

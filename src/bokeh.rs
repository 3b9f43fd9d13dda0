//! Depth-of-field rendering kernel
//!
//! This module turns a sharp color image and a normalized depth map into a
//! defocused image, with separate modules for the lens model, CoC field, the
//! two blur paths and the final compositing.

pub mod coc_field;
pub mod color;
pub mod common;
pub mod compositor;
pub mod directional;
pub mod frame;
pub mod gather;
pub mod lens;
pub mod render;

pub use common::{BokehError, ProgressCallback, RenderProgress, Result};

pub use frame::{ColorImage, DepthMap, LinearImage};

pub use color::{ColorSpaceConverter, TransferFunction};

pub use lens::{LensModel, LensParameters, LinearLens, ThinLensModel, coc_radius};

pub use coc_field::CocField;

pub use gather::GatherBlurKernel;

pub use directional::{
    DirectionalBlurApproximator, DirectionalShape, LineOffsets, apply_directional_blur,
    combine_by_min_luminance,
};

pub use compositor::AccumulationBuffer;

pub use render::{
    BokehRenderer, PassTiming, RenderConfig, RenderConfigBuilder, RenderMode, RenderStage,
    RenderTimings, render,
};

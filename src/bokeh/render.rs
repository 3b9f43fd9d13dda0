//! Render orchestration
//!
//! Ties the converter, lens model, CoC field and one of the blur paths into a
//! single call from 8-bit color + depth to 8-bit color.

mod pipeline;
mod timing;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::{BokehRenderer, render};
pub use timing::{PassTiming, RenderStage, RenderTimings};
pub use types::{RenderConfig, RenderConfigBuilder, RenderMode};

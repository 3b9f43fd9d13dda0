pub mod bokeh;
pub mod logger;

pub use bokeh::{
    BokehError, BokehRenderer, ColorImage, DepthMap, LensParameters, RenderConfig, RenderMode,
    Result, render,
};

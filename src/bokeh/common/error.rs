use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BokehError {
    #[error(
        "Color image is {color_width}x{color_height} but depth map is {depth_width}x{depth_height}"
    )]
    DimensionMismatch {
        color_width: usize,
        color_height: usize,
        depth_width: usize,
        depth_height: usize,
    },

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("Pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, BokehError>;

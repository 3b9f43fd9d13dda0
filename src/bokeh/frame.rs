//! In-memory pixel buffers
//!
//! The kernel only ever sees these buffers; decoding files or fetching depth
//! maps from an estimator happens outside the crate.

pub mod types;

pub use types::{ColorImage, DepthMap, LinearImage};

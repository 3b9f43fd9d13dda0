//! Common utilities module
//!
//! This module contains shared utilities used across the rendering kernel.

pub mod error;
pub mod progress;

pub use error::{BokehError, Result};
pub use progress::{ProgressCallback, RenderProgress, RowProgress};

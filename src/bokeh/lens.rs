//! Lens models mapping scene depth to a circle-of-confusion radius

mod linear_lens;
mod model;
mod thin_lens;
pub mod types;

pub use linear_lens::{LinearLens, coc_radius};
pub use model::LensModel;
pub use thin_lens::ThinLensModel;
pub use types::LensParameters;

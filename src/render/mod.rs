//! Rendering delegate seam
//!
//! The pipeline treats word placement as an opaque capability: sanitized
//! text plus normalized parameters in, raster out. The built-in backend
//! lives in [`spiral`] behind the `spiral` feature; tests substitute stubs.

use image::RgbImage;

use crate::params::RenderParameters;
use crate::Result;

#[cfg(feature = "spiral")]
pub mod spiral;

#[cfg(feature = "spiral")]
pub use spiral::{SpiralConfig, SpiralRenderer};

/// Core trait for word-placement backends.
///
/// Implementations must fail with [`crate::Error::Render`] when no token
/// can be placed (empty text, zero-area canvas, fully blocked mask), never
/// panic. When `params.mask` is present the produced raster adopts the
/// mask's dimensions; otherwise it is `params.width` by `params.height`.
pub trait CloudRenderer: Send + Sync {
    fn render(&self, text: &str, params: &RenderParameters) -> Result<RgbImage>;
}

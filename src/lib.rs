//! Wclgen Word-Cloud Service
//!
//! A word-cloud rendering service for Rust that turns a block of text and a
//! small set of options into a packed, frequency-sized PNG composition.
//!
//! # Features
//!
//! - **Spiral Backend** (default): Built-in greedy spiral-packing renderer
//! - **Modular Design**: The placement engine sits behind a `CloudRenderer`
//!   trait so alternative backends can be swapped in
//! - **Lenient Defaults**: Unknown options are dropped, oversized canvases
//!   are clamped, and unrecognized mask names fall back to no mask
//!
//! # Example
//!
//! ```no_run
//! use wclgen::{masks::DirMaskStore, pipeline::Pipeline, request::RenderRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let renderer = wclgen::new_renderer(wclgen::render::SpiralConfig::default())?;
//! let pipeline = Pipeline::new(renderer, DirMaskStore::new("masks"));
//!
//! let request: RenderRequest =
//!     serde_json::from_str(r#"{"text": "hello hello world", "width": 640}"#)?;
//! let png = pipeline.handle(&request)?;
//! assert_eq!(&png[0..4], b"\x89PNG");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub use error::{Error, Result};

pub mod color;
pub mod encode;
pub mod masks;
pub mod params;
pub mod pipeline;
pub mod render;
pub mod request;
pub mod sanitize;
pub mod server;

// Built-in word-placement backend
#[cfg(feature = "spiral")]
pub use render::SpiralRenderer;

/// Hard ceiling on the canvas width, in pixels.
pub const MAX_WIDTH: u32 = 3600;

/// Hard ceiling on the canvas height, in pixels.
pub const MAX_HEIGHT: u32 = 2400;

/// Canvas width used when the request does not supply one.
pub const DEFAULT_WIDTH: u32 = 1200;

/// Canvas height used when the request does not supply one.
pub const DEFAULT_HEIGHT: u32 = 800;

/// Background color used when the request omits one or supplies null/empty.
pub const DEFAULT_BACKGROUND: &str = "white";

/// Create a renderer instance with the default backend.
///
/// This uses the built-in spiral-packing renderer when the `spiral` feature
/// is enabled (default). Creation fails if no usable font file can be found;
/// see [`render::SpiralConfig`].
#[cfg(feature = "spiral")]
pub fn new_renderer(config: render::SpiralConfig) -> Result<impl render::CloudRenderer> {
    render::SpiralRenderer::new(config)
}

//! Request-processing pipeline
//!
//! Orchestrates validate → normalize → sanitize → render → encode. The
//! pipeline is linear and synchronous; each request runs it once, with no
//! retries and no shared mutable state across requests.

use log::debug;

use crate::encode::encode_png;
use crate::masks::MaskStore;
use crate::params::normalize;
use crate::render::CloudRenderer;
use crate::request::{validate, RenderRequest};
use crate::sanitize::sanitize;
use crate::Result;

/// Behavioral switches for the pipeline.
///
/// The service historically ran in two variants, one feeding raw text to
/// the placement engine and one preprocessing it first. That difference is
/// a single flag here rather than a second pipeline.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Run the text sanitizer before rendering. On by default.
    pub sanitize_text: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self { sanitize_text: true }
    }
}

/// The request pipeline: validation through PNG bytes.
pub struct Pipeline<R, M> {
    renderer: R,
    masks: M,
    options: PipelineOptions,
}

impl<R: CloudRenderer, M: MaskStore> Pipeline<R, M> {
    pub fn new(renderer: R, masks: M) -> Self {
        Self::with_options(renderer, masks, PipelineOptions::default())
    }

    pub fn with_options(renderer: R, masks: M, options: PipelineOptions) -> Self {
        Self {
            renderer,
            masks,
            options,
        }
    }

    /// Process one request end to end, returning PNG bytes.
    ///
    /// Validation failures return immediately; nothing is normalized,
    /// sanitized, or rendered for an invalid request. Renderer failures
    /// propagate unmodified as the terminal outcome.
    pub fn handle(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        validate(request)?;

        let params = normalize(request, &self.masks)?;

        // `validate` guarantees text is present
        let raw = request.text.as_deref().unwrap_or_default();
        let text = if self.options.sanitize_text {
            sanitize(raw)
        } else {
            raw.to_string()
        };
        debug!(
            "rendering {} chars at {}x{} (mask: {})",
            text.len(),
            params.width,
            params.height,
            params.mask.is_some()
        );

        let raster = self.renderer.render(&text, &params)?;
        encode_png(&raster)
    }
}

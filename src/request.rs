//! Inbound request shape and structural validation

use serde::Deserialize;

use crate::color::is_color_like;
use crate::{Error, Result};

/// A word-cloud render request as received on the wire.
///
/// Every field except `text` is optional; defaults and bounds are applied
/// later by the normalizer. Unknown JSON fields are dropped during
/// deserialization, which is the allow-list merge the service contract
/// requires: nothing a client invents can reach the rendering delegate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RenderRequest {
    /// Source text; the only required field.
    pub text: Option<String>,
    /// CSS color for the canvas background.
    pub background_color: Option<String>,
    /// Requested canvas width in pixels.
    pub width: Option<u32>,
    /// Requested canvas height in pixels.
    pub height: Option<u32>,
    /// Silhouette name, nominally `circle` or `cloud`. Anything else is
    /// ignored by the normalizer rather than rejected here.
    pub mask: Option<String>,
}

/// Check a request for structural validity before any work is done.
///
/// Two failure modes only: absent `text`, and a present, non-null
/// `background_color` the color predicate rejects. Mask names are
/// deliberately not checked; the normalizer treats unrecognized values as
/// "no mask". This asymmetry (strict color, lenient mask) is part of the
/// service contract.
pub fn validate(request: &RenderRequest) -> Result<()> {
    if request.text.is_none() {
        return Err(Error::MissingText);
    }

    if let Some(color) = request.background_color.as_deref() {
        if !is_color_like(color) {
            return Err(Error::InvalidColor);
        }
    }

    Ok(())
}

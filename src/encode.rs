//! PNG serialization of rendered rasters

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage};

use crate::{Error, Result};

/// Encode a raster into PNG bytes.
///
/// Deterministic for a given buffer, lossless, and free of ancillary
/// metadata. Dimension bounds are enforced upstream by the normalizer, so
/// no re-validation happens here.
pub fn encode_png(raster: &RgbImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    PngEncoder::new(&mut out)
        .write_image(
            raster.as_raw(),
            raster.width(),
            raster.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    Ok(out)
}

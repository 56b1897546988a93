//! Mask asset store: named silhouette images
//!
//! Masks constrain where the placement engine may put words. The store is a
//! trait seam so tests can inject synthetic buffers; the production
//! implementation reads `<dir>/<name>.png` from a fixed directory, fresh on
//! every request. Pixel data is never mutated after load, so a process-wide
//! cache would also be safe, but the per-request read keeps the store
//! stateless.

use std::path::{Path, PathBuf};

use image::GrayImage;
use log::debug;

use crate::{Error, Result};

/// The silhouettes the service recognizes.
///
/// Anything that is not exactly one of these names is treated as "no mask"
/// by the normalizer, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    Circle,
    Cloud,
}

impl MaskKind {
    /// Lenient parse: recognized names only, everything else is `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "circle" => Some(MaskKind::Circle),
            "cloud" => Some(MaskKind::Cloud),
            _ => None,
        }
    }

    /// Asset file name inside the mask directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            MaskKind::Circle => "circle.png",
            MaskKind::Cloud => "cloud.png",
        }
    }
}

/// Loader for named mask silhouettes.
///
/// Implementations return the asset at its stored size; resizing to the
/// target canvas is the normalizer's job and always produces a new buffer.
pub trait MaskStore: Send + Sync {
    fn load(&self, kind: MaskKind) -> Result<GrayImage>;
}

/// Mask store backed by PNG files in a directory (`masks/` by default).
pub struct DirMaskStore {
    dir: PathBuf,
}

impl DirMaskStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MaskStore for DirMaskStore {
    fn load(&self, kind: MaskKind) -> Result<GrayImage> {
        let path = self.dir.join(kind.file_name());
        debug!("loading mask asset {:?}", path);
        let img = image::open(&path)
            .map_err(|e| Error::Mask(format!("{}: {}", path.display(), e)))?;
        Ok(img.to_luma8())
    }
}

//! Parameter normalization: defaults, clamping, mask resolution

use image::imageops::{self, FilterType};
use image::GrayImage;
use log::debug;

use crate::masks::{MaskKind, MaskStore};
use crate::request::RenderRequest;
use crate::{Result, DEFAULT_BACKGROUND, DEFAULT_HEIGHT, DEFAULT_WIDTH, MAX_HEIGHT, MAX_WIDTH};

/// Fully-populated rendering options, as handed to the delegate.
///
/// Derived once per request and discarded after the render call. When
/// `mask` is present its dimensions always match the target canvas:
/// `(width, width)` for a circle silhouette, `(width, height)` otherwise.
#[derive(Debug, Clone)]
pub struct RenderParameters {
    pub width: u32,
    pub height: u32,
    pub background_color: String,
    /// Treat adjacent word pairs as placeable units. Always on; kept as an
    /// explicit field because the delegate contract includes it.
    pub collocations: bool,
    pub mask: Option<GrayImage>,
}

/// Build [`RenderParameters`] from a validated request.
///
/// Client values overlay a fixed default set; only the recognized fields of
/// [`RenderRequest`] can contribute, so unknown options never propagate.
/// Dimensions get an upper clamp only: there is no lower bound, and a
/// zero-size canvas passes through to the delegate unchanged (lenient by
/// contract; the delegate reports it as a render failure). Unrecognized
/// mask names silently fall back to no mask, while recognized ones are
/// loaded through the store and resized to the canvas.
pub fn normalize(request: &RenderRequest, masks: &dyn MaskStore) -> Result<RenderParameters> {
    let width = request.width.unwrap_or(DEFAULT_WIDTH).min(MAX_WIDTH);
    let height = request.height.unwrap_or(DEFAULT_HEIGHT).min(MAX_HEIGHT);

    let background_color = match request.background_color.as_deref() {
        Some(color) if !color.is_empty() => color.to_string(),
        _ => DEFAULT_BACKGROUND.to_string(),
    };

    let mask = match request.mask.as_deref().and_then(MaskKind::parse) {
        Some(kind) => {
            let asset = masks.load(kind)?;
            // A circle silhouette squares the canvas off the requested width
            let (mask_w, mask_h) = match kind {
                MaskKind::Circle => (width, width),
                MaskKind::Cloud => (width, height),
            };
            debug!(
                "resizing {:?} mask {}x{} -> {}x{}",
                kind,
                asset.width(),
                asset.height(),
                mask_w,
                mask_h
            );
            Some(imageops::resize(&asset, mask_w, mask_h, FilterType::Nearest))
        }
        None => None,
    };

    Ok(RenderParameters {
        width,
        height,
        background_color,
        collocations: true,
        mask,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    /// Store that hands out a fixed 8x8 silhouette and records being hit.
    struct FixedStore {
        hits: std::sync::atomic::AtomicUsize,
    }

    impl FixedStore {
        fn new() -> Self {
            Self {
                hits: std::sync::atomic::AtomicUsize::new(0),
            }
        }

        fn hits(&self) -> usize {
            self.hits.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl MaskStore for FixedStore {
        fn load(&self, _kind: MaskKind) -> Result<GrayImage> {
            self.hits.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(GrayImage::from_pixel(8, 8, image::Luma([255u8])))
        }
    }

    /// Store that always fails, for asserting it is never consulted.
    struct FailingStore;

    impl MaskStore for FailingStore {
        fn load(&self, kind: MaskKind) -> Result<GrayImage> {
            Err(Error::Mask(format!("unexpected load of {kind:?}")))
        }
    }

    fn request(json: &str) -> RenderRequest {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn defaults_apply_when_fields_are_absent() {
        let params = normalize(&request(r#"{"text": "x"}"#), &FailingStore).unwrap();
        assert_eq!(params.width, 1200);
        assert_eq!(params.height, 800);
        assert_eq!(params.background_color, "white");
        assert!(params.collocations);
        assert!(params.mask.is_none());
    }

    #[test]
    fn oversized_dimensions_are_clamped_silently() {
        let params = normalize(
            &request(r#"{"text": "x", "width": 5000, "height": 9000}"#),
            &FailingStore,
        )
        .unwrap();
        assert_eq!(params.width, MAX_WIDTH);
        assert_eq!(params.height, MAX_HEIGHT);
    }

    #[test]
    fn in_bound_dimensions_pass_through() {
        let params = normalize(
            &request(r#"{"text": "x", "width": 3600, "height": 100}"#),
            &FailingStore,
        )
        .unwrap();
        assert_eq!(params.width, 3600);
        assert_eq!(params.height, 100);
    }

    #[test]
    fn no_lower_bound_on_dimensions() {
        let params = normalize(&request(r#"{"text": "x", "width": 0}"#), &FailingStore).unwrap();
        assert_eq!(params.width, 0);
    }

    #[test]
    fn garbage_mask_is_dropped_without_touching_the_store() {
        for mask in ["\"dinosaur\"", "\"Circle\"", "\"\"", "null"] {
            let params = normalize(
                &request(&format!(r#"{{"text": "x", "mask": {mask}}}"#)),
                &FailingStore,
            )
            .unwrap();
            assert!(params.mask.is_none(), "mask {mask} should be dropped");
        }
    }

    #[test]
    fn circle_mask_is_resized_to_a_square() {
        let store = FixedStore::new();
        let params = normalize(
            &request(r#"{"text": "cat cat dog", "width": 5000, "mask": "circle"}"#),
            &store,
        )
        .unwrap();
        assert_eq!(params.width, 3600);
        assert_eq!(params.height, 800);
        assert_eq!(params.mask.as_ref().unwrap().dimensions(), (3600, 3600));
        assert_eq!(store.hits(), 1);
    }

    #[test]
    fn cloud_mask_matches_the_canvas() {
        let store = FixedStore::new();
        let params = normalize(
            &request(r#"{"text": "x", "width": 300, "height": 200, "mask": "cloud"}"#),
            &store,
        )
        .unwrap();
        assert_eq!(params.mask.as_ref().unwrap().dimensions(), (300, 200));
    }

    #[test]
    fn mask_load_failure_propagates() {
        let result = normalize(&request(r#"{"text": "x", "mask": "circle"}"#), &FailingStore);
        assert!(matches!(result, Err(Error::Mask(_))));
    }

    #[test]
    fn empty_background_falls_back_to_white() {
        // The validator rejects empty strings up front, but the normalizer
        // keeps its own fallback so the invariant holds on its own
        let req = RenderRequest {
            text: Some("x".into()),
            background_color: Some(String::new()),
            ..Default::default()
        };
        let params = normalize(&req, &FailingStore).unwrap();
        assert_eq!(params.background_color, "white");
    }
}

//! Full-stack render test with the built-in spiral backend
//!
//! Skipped when no system font is available, the same way engine tests
//! that need external resources are guarded.

#![cfg(feature = "spiral")]

use image::{GrayImage, Luma};
use wclgen::masks::{MaskKind, MaskStore};
use wclgen::pipeline::Pipeline;
use wclgen::render::SpiralConfig;
use wclgen::request::RenderRequest;

/// Synthetic circle silhouette: dark disk (placeable) on a white field.
struct DiskStore;

impl MaskStore for DiskStore {
    fn load(&self, _kind: MaskKind) -> wclgen::Result<GrayImage> {
        let size = 64i32;
        Ok(GrayImage::from_fn(size as u32, size as u32, |x, y| {
            let dx = x as i32 - size / 2;
            let dy = y as i32 - size / 2;
            if dx * dx + dy * dy <= (size / 2 - 2).pow(2) {
                Luma([0u8])
            } else {
                Luma([255u8])
            }
        }))
    }
}

fn request(json: &str) -> RenderRequest {
    serde_json::from_str(json).unwrap()
}

#[test]
fn spiral_backend_renders_a_masked_cloud() {
    let renderer = match wclgen::new_renderer(SpiralConfig::default()) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("skipping: {e}");
            return;
        }
    };
    let pipeline = Pipeline::new(renderer, DiskStore);

    let png = pipeline
        .handle(&request(
            r#"{"text": "rust rust rust words words cloud", "width": 240, "mask": "circle"}"#,
        ))
        .expect("masked render should succeed");

    let img = image::load_from_memory(&png).unwrap().to_rgb8();
    // Circle mask squares the canvas off the requested width
    assert_eq!(img.dimensions(), (240, 240));

    let white = image::Rgb([255u8, 255, 255]);
    assert!(img.pixels().any(|p| *p != white), "expected placed words");

    // Corners sit outside the silhouette and must stay background
    for (x, y) in [(0u32, 0u32), (239, 0), (0, 239), (239, 239)] {
        assert_eq!(*img.get_pixel(x, y), white, "corner ({x},{y}) should be empty");
    }
}

//! Built-in greedy spiral-packing backend
//!
//! Frequency-sorted words walk an Archimedean spiral out from the canvas
//! center until they find a spot with no collision against already-placed
//! ink or blocked mask regions. Glyphs are rasterized with `fontdue`;
//! placement randomness (spiral direction, palette choice) comes from a
//! seeded ChaCha8 stream so the same input reproduces the same image.

use std::collections::HashMap;
use std::path::PathBuf;

use fontdue::{Font, FontSettings};
use image::{Rgb, RgbImage};
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::color;
use crate::params::RenderParameters;
use crate::render::CloudRenderer;
use crate::{Error, Result};

/// Coverage level at which a sprite pixel participates in collision checks.
const INK_THRESHOLD: u8 = 64;

/// Mask luma at or above which a cell is off-limits (white background of a
/// silhouette asset blocks placement, the dark shape admits it).
const MASK_BLOCKED_LUMA: u8 = 250;

/// Placement attempts per word before giving up on it.
const MAX_SPIRAL_STEPS: usize = 10_000;

/// Well-known font locations probed when no explicit path is configured.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
];

/// Configuration for [`SpiralRenderer`]
#[derive(Debug, Clone)]
pub struct SpiralConfig {
    /// Font file to rasterize with; when `None`, common system locations
    /// are probed and the first readable file wins.
    pub font_path: Option<PathBuf>,
    /// Font size assigned to the least frequent word.
    pub min_font_size: f32,
    /// Font size assigned to the most frequent word (capped to half the
    /// canvas height at render time).
    pub max_font_size: f32,
    /// Clearance in pixels kept around placed words.
    pub padding: u32,
    /// Seed for the placement/palette random stream.
    pub seed: u64,
    /// Word colors, as CSS color strings.
    pub palette: Vec<String>,
}

impl Default for SpiralConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            min_font_size: 12.0,
            max_font_size: 120.0,
            padding: 2,
            seed: 0,
            palette: default_palette(),
        }
    }
}

fn default_palette() -> Vec<String> {
    ["#264653", "#287271", "#2a9d8f", "#8ab17d", "#e9c46a"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Greedy spiral-packing word-cloud renderer.
pub struct SpiralRenderer {
    font: Font,
    config: SpiralConfig,
}

impl SpiralRenderer {
    /// Create a renderer, loading the font from `config.font_path` or the
    /// first available system font.
    pub fn new(config: SpiralConfig) -> Result<Self> {
        let path = match &config.font_path {
            Some(path) => path.clone(),
            None => SYSTEM_FONTS
                .iter()
                .map(PathBuf::from)
                .find(|p| p.exists())
                .ok_or_else(|| {
                    Error::Render("no usable font file found; configure font_path".into())
                })?,
        };
        let data = std::fs::read(&path)
            .map_err(|e| Error::Render(format!("failed to read font {}: {}", path.display(), e)))?;
        Self::from_font_bytes(data, config)
    }

    /// Create a renderer from in-memory font data.
    pub fn from_font_bytes(data: Vec<u8>, mut config: SpiralConfig) -> Result<Self> {
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| Error::Render(format!("failed to parse font: {e}")))?;
        if config.palette.is_empty() {
            config.palette = default_palette();
        }
        if config.max_font_size < config.min_font_size {
            config.max_font_size = config.min_font_size;
        }
        Ok(Self { font, config })
    }

    fn try_place(
        &self,
        sprite: &Sprite,
        occupancy: &Occupancy,
        rng: &mut ChaCha8Rng,
    ) -> Option<(i32, i32)> {
        let center_x = occupancy.width / 2;
        let center_y = occupancy.height / 2;
        let direction = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };

        for (dx, dy) in ArchimedeanSpiral::new(direction).take(MAX_SPIRAL_STEPS) {
            let left = center_x + dx - sprite.width as i32 / 2;
            let top = center_y + dy - sprite.height as i32 / 2;
            if occupancy.fits(sprite, left, top) {
                return Some((left, top));
            }
        }
        None
    }
}

impl CloudRenderer for SpiralRenderer {
    fn render(&self, text: &str, params: &RenderParameters) -> Result<RgbImage> {
        let entries = count_frequencies(text, params.collocations);
        if entries.is_empty() {
            return Err(Error::Render("no placeable tokens in input text".into()));
        }

        // A present mask drives the canvas size; the silhouette was already
        // resized to the target dimensions by the normalizer.
        let (width, height) = match &params.mask {
            Some(mask) => mask.dimensions(),
            None => (params.width, params.height),
        };
        if width == 0 || height == 0 {
            return Err(Error::Render(format!("canvas {width}x{height} has no area")));
        }

        let background = color::parse_rgb(&params.background_color).ok_or_else(|| {
            Error::Render(format!(
                "unresolvable background color {:?}",
                params.background_color
            ))
        })?;
        let mut canvas = RgbImage::from_pixel(width, height, Rgb(background));

        let mut occupancy = Occupancy::new(width, height);
        if let Some(mask) = &params.mask {
            for (x, y, pixel) in mask.enumerate_pixels() {
                if pixel.0[0] >= MASK_BLOCKED_LUMA {
                    occupancy.block(x as i32, y as i32);
                }
            }
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let max_count = entries[0].1 as f32;
        let min_count = entries[entries.len() - 1].1 as f32;
        let count_range = max_count - min_count;
        let size_cap = self
            .config
            .max_font_size
            .min(height as f32 * 0.5)
            .max(self.config.min_font_size);

        let mut placed = 0usize;
        for (word, count) in &entries {
            let normalized = if count_range > 0.0 {
                (*count as f32 - min_count) / count_range
            } else {
                1.0
            };
            let mut size = self.config.min_font_size + normalized * (size_cap - self.config.min_font_size);

            // Shrink until the word fits somewhere or drops below the floor
            while size >= self.config.min_font_size {
                let Some(sprite) = rasterize_word(&self.font, word, size) else {
                    break;
                };
                if let Some((left, top)) = self.try_place(&sprite, &occupancy, &mut rng) {
                    let swatch = &self.config.palette[rng.gen_range(0..self.config.palette.len())];
                    let rgb = color::parse_rgb(swatch).unwrap_or([40, 40, 40]);
                    blit(&mut canvas, &sprite, left, top, rgb);
                    occupancy.stamp(&sprite, left, top, self.config.padding as i32);
                    placed += 1;
                    trace!("placed {word:?} at ({left},{top}) size {size:.1}");
                    break;
                }
                size *= 0.8;
            }
        }

        if placed == 0 {
            return Err(Error::Render("could not place any words".into()));
        }
        debug!("placed {placed}/{} words on {width}x{height}", entries.len());
        Ok(canvas)
    }
}

/// Lowercased word frequencies, most frequent first.
///
/// With `collocations` set, adjacent pairs that repeat are counted as
/// additional placeable units. Ties break alphabetically so the ordering
/// (and therefore the layout) is stable across runs.
fn count_frequencies(text: &str, collocations: bool) -> Vec<(String, usize)> {
    let words: Vec<String> = text.split_whitespace().map(|w| w.to_lowercase()).collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for word in &words {
        *counts.entry(word.clone()).or_insert(0) += 1;
    }

    if collocations {
        let mut pairs: HashMap<String, usize> = HashMap::new();
        for pair in words.windows(2) {
            *pairs.entry(format!("{} {}", pair[0], pair[1])).or_insert(0) += 1;
        }
        for (pair, n) in pairs {
            if n >= 2 {
                counts.insert(pair, n);
            }
        }
    }

    let mut out: Vec<_> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Grayscale coverage bitmap of one rasterized word.
struct Sprite {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Rasterize a word at the given size. Returns `None` when the text
/// produces no ink (degenerate size or glyphless input).
fn rasterize_word(font: &Font, text: &str, px: f32) -> Option<Sprite> {
    let line = font.horizontal_line_metrics(px)?;
    let ascent = line.ascent.ceil() as i32;
    let height = (line.ascent - line.descent).ceil() as i32 + 1;

    let mut pen = 0.0f32;
    let mut glyphs = Vec::new();
    for ch in text.chars() {
        let (metrics, bitmap) = font.rasterize(ch, px);
        glyphs.push((pen, metrics, bitmap));
        pen += metrics.advance_width;
    }
    let width = pen.ceil() as i32 + 2;
    if width <= 0 || height <= 0 {
        return None;
    }

    let (w, h) = (width as usize, height as usize);
    let mut data = vec![0u8; w * h];
    for (x0, metrics, bitmap) in glyphs {
        let glyph_left = x0.round() as i32 + metrics.xmin;
        let glyph_top = ascent - metrics.ymin - metrics.height as i32;
        for row in 0..metrics.height {
            let y = glyph_top + row as i32;
            if y < 0 || y >= height {
                continue;
            }
            for col in 0..metrics.width {
                let x = glyph_left + col as i32;
                if x < 0 || x >= width {
                    continue;
                }
                let cell = &mut data[y as usize * w + x as usize];
                *cell = (*cell).max(bitmap[row * metrics.width + col]);
            }
        }
    }

    if data.iter().all(|&v| v == 0) {
        return None;
    }
    Some(Sprite { width: w, height: h, data })
}

/// Per-cell occupancy grid for collision checks.
///
/// Cells are blocked either by the mask silhouette or by previously placed
/// words (stamped with padding). Out-of-bounds counts as blocked.
struct Occupancy {
    width: i32,
    height: i32,
    cells: Vec<bool>,
}

impl Occupancy {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            cells: vec![false; width as usize * height as usize],
        }
    }

    fn block(&mut self, x: i32, y: i32) {
        if x >= 0 && y >= 0 && x < self.width && y < self.height {
            self.cells[(y * self.width + x) as usize] = true;
        }
    }

    fn fits(&self, sprite: &Sprite, left: i32, top: i32) -> bool {
        for row in 0..sprite.height {
            let y = top + row as i32;
            for col in 0..sprite.width {
                if sprite.data[row * sprite.width + col] < INK_THRESHOLD {
                    continue;
                }
                let x = left + col as i32;
                if x < 0 || y < 0 || x >= self.width || y >= self.height {
                    return false;
                }
                if self.cells[(y * self.width + x) as usize] {
                    return false;
                }
            }
        }
        true
    }

    /// Mark a placed sprite's ink, dilated by `padding` cells.
    fn stamp(&mut self, sprite: &Sprite, left: i32, top: i32, padding: i32) {
        for row in 0..sprite.height {
            for col in 0..sprite.width {
                if sprite.data[row * sprite.width + col] < INK_THRESHOLD {
                    continue;
                }
                let x = left + col as i32;
                let y = top + row as i32;
                for dy in -padding..=padding {
                    for dx in -padding..=padding {
                        self.block(x + dx, y + dy);
                    }
                }
            }
        }
    }
}

/// Integer offsets along an Archimedean spiral from the origin.
struct ArchimedeanSpiral {
    t: f32,
    direction: f32,
}

impl ArchimedeanSpiral {
    fn new(direction: f32) -> Self {
        Self { t: 0.0, direction }
    }
}

impl Iterator for ArchimedeanSpiral {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<(i32, i32)> {
        self.t += 0.1;
        let radius = 2.0 * self.t;
        let angle = self.t * self.direction;
        Some(((radius * angle.cos()) as i32, (radius * angle.sin()) as i32))
    }
}

/// Alpha-blend a sprite onto the canvas in the given color.
fn blit(canvas: &mut RgbImage, sprite: &Sprite, left: i32, top: i32, rgb: [u8; 3]) {
    let (cw, ch) = (canvas.width() as i32, canvas.height() as i32);
    for row in 0..sprite.height {
        let y = top + row as i32;
        if y < 0 || y >= ch {
            continue;
        }
        for col in 0..sprite.width {
            let coverage = sprite.data[row * sprite.width + col];
            if coverage == 0 {
                continue;
            }
            let x = left + col as i32;
            if x < 0 || x >= cw {
                continue;
            }
            let pixel = canvas.get_pixel_mut(x as u32, y as u32);
            for channel in 0..3 {
                pixel.0[channel] = blend(pixel.0[channel], rgb[channel], coverage);
            }
        }
    }
}

fn blend(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = alpha as u16;
    ((dst as u16 * (255 - a) + src as u16 * a) / 255) as u8
}

/// Locate a probe-list font for tests; `None` skips the test, mirroring how
/// environment-dependent integration tests are guarded elsewhere.
#[cfg(test)]
fn test_font_bytes() -> Option<Vec<u8>> {
    SYSTEM_FONTS
        .iter()
        .find(|p| std::path::Path::new(p).exists())
        .and_then(|p| std::fs::read(p).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RenderParameters;
    use image::GrayImage;

    fn params(width: u32, height: u32) -> RenderParameters {
        RenderParameters {
            width,
            height,
            background_color: "white".to_string(),
            collocations: true,
            mask: None,
        }
    }

    fn renderer() -> Option<SpiralRenderer> {
        let data = test_font_bytes()?;
        Some(SpiralRenderer::from_font_bytes(data, SpiralConfig::default()).unwrap())
    }

    #[test]
    fn frequencies_sort_descending_with_stable_ties() {
        let counts = count_frequencies("dog cat dog bird cat dog", false);
        assert_eq!(counts[0], ("dog".to_string(), 3));
        assert_eq!(counts[1], ("cat".to_string(), 2));
        assert_eq!(counts[2], ("bird".to_string(), 1));
    }

    #[test]
    fn frequencies_are_case_folded() {
        let counts = count_frequencies("Rust rust RUST", false);
        assert_eq!(counts, vec![("rust".to_string(), 3)]);
    }

    #[test]
    fn repeated_pairs_become_collocations() {
        let counts = count_frequencies("new york new york city", true);
        assert!(counts.iter().any(|(w, n)| w == "new york" && *n == 2));
        // A pair seen once does not qualify
        assert!(!counts.iter().any(|(w, _)| w == "york city"));
    }

    #[test]
    fn spiral_moves_outward() {
        let spiral = ArchimedeanSpiral::new(1.0);
        let points: Vec<_> = spiral.take(2000).collect();
        let far = points
            .iter()
            .map(|(x, y)| x.abs().max(y.abs()))
            .max()
            .unwrap();
        assert!(far > 100, "spiral stayed near origin: {far}");
    }

    #[test]
    fn occupancy_blocks_out_of_bounds() {
        let occ = Occupancy::new(10, 10);
        let sprite = Sprite {
            width: 4,
            height: 4,
            data: vec![255; 16],
        };
        assert!(occ.fits(&sprite, 3, 3));
        assert!(!occ.fits(&sprite, -1, 3));
        assert!(!occ.fits(&sprite, 8, 8));
    }

    #[test]
    fn stamped_regions_collide() {
        let mut occ = Occupancy::new(20, 20);
        let sprite = Sprite {
            width: 4,
            height: 4,
            data: vec![255; 16],
        };
        occ.stamp(&sprite, 8, 8, 1);
        assert!(!occ.fits(&sprite, 8, 8));
        assert!(!occ.fits(&sprite, 12, 8), "padding halo should collide");
        assert!(occ.fits(&sprite, 14, 8));
    }

    #[test]
    fn renders_words_on_a_small_canvas() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let img = renderer
            .render("hello hello hello world world rust", &params(200, 120))
            .unwrap();
        assert_eq!(img.dimensions(), (200, 120));
        let background = Rgb([255u8, 255, 255]);
        assert!(
            img.pixels().any(|p| *p != background),
            "expected at least one inked pixel"
        );
    }

    #[test]
    fn render_is_deterministic_for_a_seed() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let a = renderer.render("alpha alpha beta gamma", &params(160, 100)).unwrap();
        let b = renderer.render("alpha alpha beta gamma", &params(160, 100)).unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn empty_text_is_a_render_failure() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        assert!(matches!(
            renderer.render("", &params(100, 100)),
            Err(Error::Render(_))
        ));
        assert!(matches!(
            renderer.render("   \t \n ", &params(100, 100)),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn zero_area_canvas_is_a_render_failure() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        assert!(matches!(
            renderer.render("word", &params(0, 100)),
            Err(Error::Render(_))
        ));
    }

    #[test]
    fn fully_blocked_mask_is_a_render_failure() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let mut p = params(64, 64);
        // All-white silhouette blocks every cell
        p.mask = Some(GrayImage::from_pixel(64, 64, image::Luma([255u8])));
        assert!(matches!(renderer.render("word word", &p), Err(Error::Render(_))));
    }

    #[test]
    fn mask_dimensions_drive_the_canvas() {
        let Some(renderer) = renderer() else {
            eprintln!("skipping: no system font available");
            return;
        };
        let mut p = params(500, 400);
        // Dark (placeable) silhouette sized differently from width/height
        p.mask = Some(GrayImage::from_pixel(300, 300, image::Luma([0u8])));
        let img = renderer.render("one one two three", &p).unwrap();
        assert_eq!(img.dimensions(), (300, 300));
    }
}

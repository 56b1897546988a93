//! Color-validity predicate and RGB resolution
//!
//! Thin wrappers over `csscolorparser` so the rest of the crate treats color
//! syntax as an opaque capability. The predicate accepts everything the CSS
//! grammar does: named colors, `#rgb`/`#rrggbb[aa]` hex, `rgb()`, `hsl()`.

/// Returns true if `value` parses as a CSS color.
pub fn is_color_like(value: &str) -> bool {
    csscolorparser::parse(value).is_ok()
}

/// Resolve a color string to 8-bit RGB, dropping alpha.
///
/// Callers are expected to have run [`is_color_like`] first; `None` only
/// shows up for values that skipped validation.
pub fn parse_rgb(value: &str) -> Option<[u8; 3]> {
    let [r, g, b, _a] = csscolorparser::parse(value).ok()?.to_rgba8();
    Some([r, g, b])
}

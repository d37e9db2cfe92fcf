//! Text measurement and drawing.
//!
//! Fonts resolve in two tiers: outline fonts loaded from disk (preferred
//! paths, then well-known system locations), then a built-in 5x7 bitmap
//! face that is always available. A missing font is never an error.

use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::Rgba;
use tracing::{debug, info};

use crate::compose::Layer;

/// A resolved font.
pub enum FontFace {
    Outline(FontVec),
    Builtin,
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline(_) => f.write_str("FontFace::Outline"),
            Self::Builtin => f.write_str("FontFace::Builtin"),
        }
    }
}

impl FontFace {
    /// Resolve a font from the preferred paths, then system candidates.
    pub fn resolve(preferred: &[PathBuf]) -> Self {
        let system = system_font_candidates().iter().map(Path::new);
        Self::resolve_from(preferred.iter().map(PathBuf::as_path).chain(system))
    }

    /// Use the first candidate that loads and parses, else the built-in face.
    pub fn resolve_from<'a>(candidates: impl IntoIterator<Item = &'a Path>) -> Self {
        for path in candidates {
            match std::fs::read(path) {
                Ok(data) => match FontVec::try_from_vec(data) {
                    Ok(font) => {
                        info!(path = %path.display(), "Using font");
                        return Self::Outline(font);
                    }
                    Err(_) => debug!(path = %path.display(), "Not a usable TTF/OTF font"),
                },
                Err(e) => debug!(path = %path.display(), error = %e, "Font not readable"),
            }
        }
        info!("No outline font available, using built-in bitmap font");
        Self::Builtin
    }

    /// Pixel width of `text` at `size`.
    pub fn text_width(&self, size: f32, text: &str) -> u32 {
        match self {
            Self::Outline(font) => measure_text_width(font, PxScale::from(size), text),
            Self::Builtin => builtin::text_width(builtin::unit(size), text),
        }
    }

    /// Height of one line used for vertical centring (ascent to descent).
    pub fn text_height(&self, size: f32) -> u32 {
        match self {
            Self::Outline(font) => {
                let scaled = font.as_scaled(PxScale::from(size));
                (scaled.ascent() - scaled.descent()).ceil() as u32
            }
            Self::Builtin => builtin::text_height(builtin::unit(size)),
        }
    }

    /// Distance between stacked lines.
    pub fn line_height(&self, size: f32) -> u32 {
        match self {
            Self::Outline(font) => line_height(font, PxScale::from(size)),
            Self::Builtin => builtin::text_height(builtin::unit(size)) + builtin::unit(size) * 2,
        }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, layer: &mut Layer<'_>, x: i64, y: i64, size: f32, text: &str, color: Rgba<u8>) {
        match self {
            Self::Outline(font) => draw_outline_text(layer, font, x, y, size, text, color),
            Self::Builtin => builtin::draw(layer, x, y, builtin::unit(size), text, color),
        }
    }

    /// Draw `text` anchored centre-centre at (`cx`, `cy`).
    pub fn draw_centered(
        &self,
        layer: &mut Layer<'_>,
        cx: i64,
        cy: i64,
        size: f32,
        text: &str,
        color: Rgba<u8>,
    ) {
        let w = i64::from(self.text_width(size, text));
        let h = i64::from(self.text_height(size));
        self.draw(layer, cx - w / 2, cy - h / 2, size, text, color);
    }
}

/// Measure the pixel width of a string at the given font and scale.
pub fn measure_text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> u32 {
    let scaled = font.as_scaled(scale);
    let mut width = 0.0f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }

    width.ceil() as u32
}

/// Compute the line height for the given font and scale.
pub fn line_height<F: Font>(font: &F, scale: PxScale) -> u32 {
    let scaled = font.as_scaled(scale);
    (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
}

/// Rasterise glyph outlines, blending coverage-weighted colour.
///
/// Coverage scales the colour's alpha and the result goes through
/// [`Layer::blend_at`] once. `imageproc::drawing::draw_text_mut` instead
/// interpolates all four channels against the existing pixel before drawing,
/// which mangles translucent shadow colours and would blend twice on a layer.
fn draw_outline_text<F: Font>(
    layer: &mut Layer<'_>,
    font: &F,
    x: i64,
    y: i64,
    size: f32,
    text: &str,
    color: Rgba<u8>,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let baseline = y as f32 + scaled.ascent();
    let mut caret = x as f32;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        if let Some(prev) = prev_glyph {
            caret += scaled.kern(prev, glyph_id);
        }
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let (ox, oy) = (bounds.min.x as i64, bounds.min.y as i64);
        outlined.draw(|gx, gy, coverage| {
            let alpha = (f32::from(color[3]) * coverage.clamp(0.0, 1.0)).round() as u8;
            if alpha > 0 {
                let px = Rgba([color[0], color[1], color[2], alpha]);
                layer.blend_at(ox + i64::from(gx), oy + i64::from(gy), px);
            }
        });
    }
}

/// Wrap text to fit within `max_width` pixels.
///
/// Returns a list of lines, each fitting within the width constraint.
pub fn wrap_text(face: &FontFace, size: f32, text: &str, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width: u32 = 0;

    for word in text.split_inclusive(|c: char| c.is_whitespace()) {
        let word_width = face.text_width(size, word);

        if current_width + word_width > max_width && !current_line.is_empty() {
            lines.push(current_line.trim_end().to_string());
            current_line = String::new();
            current_width = 0;
        }

        // If a single word exceeds max_width, force-break it character by character
        if word_width > max_width && current_line.is_empty() {
            let mut char_line = String::new();
            let mut char_width: u32 = 0;
            for ch in word.chars() {
                let ch_w = face.text_width(size, &ch.to_string());
                if char_width + ch_w > max_width && !char_line.is_empty() {
                    lines.push(char_line);
                    char_line = String::new();
                    char_width = 0;
                }
                char_line.push(ch);
                char_width += ch_w;
            }
            if !char_line.is_empty() {
                current_line = char_line;
                current_width = char_width;
            }
            continue;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line.trim_end().to_string());
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn system_font_candidates() -> &'static [&'static str] {
    #[cfg(target_os = "macos")]
    {
        &[
            "/System/Library/Fonts/Supplemental/Georgia.ttf",
            "/System/Library/Fonts/Supplemental/Arial.ttf",
            "/System/Library/Fonts/Supplemental/Helvetica.ttf",
        ]
    }
    #[cfg(target_os = "windows")]
    {
        &[
            "C:\\Windows\\Fonts\\georgia.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
        ]
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        &[
            "/usr/share/fonts/truetype/msttcorefonts/Georgia.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSerif-Regular.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        ]
    }
}

/// Built-in 5x7 bitmap face, scaled by whole pixels.
mod builtin {
    use image::Rgba;

    use crate::compose::Layer;

    const GLYPH_COLS: u32 = 5;
    const GLYPH_ROWS: u32 = 7;
    /// Advance in cells, including one blank column.
    const ADVANCE: u32 = GLYPH_COLS + 1;

    /// Cell size for a nominal font size (glyph plus a blank row).
    pub(super) fn unit(size: f32) -> u32 {
        ((size / (GLYPH_ROWS + 1) as f32).round() as u32).max(1)
    }

    pub(super) fn text_width(unit: u32, text: &str) -> u32 {
        let count = text.chars().count() as u32;
        if count == 0 {
            return 0;
        }
        (count * ADVANCE - 1) * unit
    }

    pub(super) fn text_height(unit: u32) -> u32 {
        GLYPH_ROWS * unit
    }

    pub(super) fn draw(layer: &mut Layer<'_>, x: i64, y: i64, unit: u32, text: &str, color: Rgba<u8>) {
        let step = i64::from(ADVANCE * unit);
        for (i, ch) in text.chars().enumerate() {
            let origin_x = x + i as i64 * step;
            for (col, bits) in glyph(ch).iter().enumerate() {
                for row in 0..GLYPH_ROWS {
                    if bits & (1 << row) != 0 {
                        layer.fill_rect(
                            origin_x + col as i64 * i64::from(unit),
                            y + i64::from(row * unit),
                            unit,
                            unit,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Column bitmaps, least significant bit at the top.
    /// Lowercase letters render as capitals; anything unknown as `?`.
    fn glyph(ch: char) -> [u8; 5] {
        match ch.to_ascii_uppercase() {
            ' ' => [0x00, 0x00, 0x00, 0x00, 0x00],
            '!' => [0x00, 0x00, 0x5F, 0x00, 0x00],
            '"' => [0x00, 0x07, 0x00, 0x07, 0x00],
            '#' => [0x14, 0x7F, 0x14, 0x7F, 0x14],
            '%' => [0x23, 0x13, 0x08, 0x64, 0x62],
            '&' => [0x36, 0x49, 0x55, 0x22, 0x50],
            '\'' => [0x00, 0x05, 0x03, 0x00, 0x00],
            '(' => [0x00, 0x1C, 0x22, 0x41, 0x00],
            ')' => [0x00, 0x41, 0x22, 0x1C, 0x00],
            '*' => [0x08, 0x2A, 0x1C, 0x2A, 0x08],
            '+' => [0x08, 0x08, 0x3E, 0x08, 0x08],
            ',' => [0x00, 0x50, 0x30, 0x00, 0x00],
            '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
            '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
            '/' => [0x20, 0x10, 0x08, 0x04, 0x02],
            '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
            '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
            '2' => [0x42, 0x61, 0x51, 0x49, 0x46],
            '3' => [0x21, 0x41, 0x45, 0x4B, 0x31],
            '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
            '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
            '6' => [0x3C, 0x4A, 0x49, 0x49, 0x30],
            '7' => [0x01, 0x71, 0x09, 0x05, 0x03],
            '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
            '9' => [0x06, 0x49, 0x49, 0x29, 0x1E],
            ':' => [0x00, 0x36, 0x36, 0x00, 0x00],
            ';' => [0x00, 0x56, 0x36, 0x00, 0x00],
            '=' => [0x14, 0x14, 0x14, 0x14, 0x14],
            '@' => [0x32, 0x49, 0x79, 0x41, 0x3E],
            'A' => [0x7E, 0x11, 0x11, 0x11, 0x7E],
            'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
            'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
            'D' => [0x7F, 0x41, 0x41, 0x22, 0x1C],
            'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
            'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
            'G' => [0x3E, 0x41, 0x49, 0x49, 0x7A],
            'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
            'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
            'J' => [0x20, 0x40, 0x41, 0x3F, 0x01],
            'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
            'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
            'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
            'N' => [0x7F, 0x04, 0x08, 0x10, 0x7F],
            'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
            'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
            'Q' => [0x3E, 0x41, 0x51, 0x21, 0x5E],
            'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
            'S' => [0x46, 0x49, 0x49, 0x49, 0x31],
            'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
            'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
            'V' => [0x1F, 0x20, 0x40, 0x20, 0x1F],
            'W' => [0x3F, 0x40, 0x38, 0x40, 0x3F],
            'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
            'Y' => [0x07, 0x08, 0x70, 0x08, 0x07],
            'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
            _ => [0x02, 0x01, 0x51, 0x09, 0x06],
        }
    }
}

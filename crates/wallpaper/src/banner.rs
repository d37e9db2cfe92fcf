//! Informational text bands and headings.

use image::Rgba;
use imageproc::drawing::Canvas;

use crate::compose::Layer;
use crate::layout::Bounds;
use crate::text::{FontFace, wrap_text};

/// One centred line of banner text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub size: f32,
    /// Vertical centre relative to the banner top.
    pub offset_y: i64,
    pub color: Rgba<u8>,
}

/// A full-width band with feathered edges and up to two text lines.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerSpec {
    pub y: i64,
    pub height: u32,
    pub background: Rgba<u8>,
    /// Rows of alpha gradient above and below the band.
    pub edge_fade: u32,
    /// Alpha of the feather row touching the band.
    pub edge_alpha: u8,
    pub primary: Option<TextLine>,
    pub secondary: Option<TextLine>,
}

impl BannerSpec {
    /// Painted extent including the feather.
    pub fn bounds(&self, canvas_width: u32) -> Bounds {
        let fade = i64::from(self.edge_fade);
        Bounds {
            left: 0,
            top: self.y - fade,
            right: i64::from(canvas_width),
            bottom: self.y + i64::from(self.height) + fade,
        }
    }
}

/// Free-standing text with a stepped drop shadow.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingSpec {
    pub text: String,
    pub center_x: i64,
    pub center_y: i64,
    pub size: f32,
    pub color: Rgba<u8>,
    pub shadow_color: Rgba<u8>,
    /// Diagonal offsets the shadow is painted at, in drawing order.
    pub shadow_offsets: Vec<i64>,
    /// Wrap into several centred lines when set.
    pub max_width: Option<u32>,
}

/// Paint a banner band, its feathered edges and its text.
pub fn paint_banner(layer: &mut Layer<'_>, banner: &BannerSpec, font: &FontFace) {
    let width = layer.width();
    layer.fill_rect(0, banner.y, width, banner.height, banner.background);

    let bottom = banner.y + i64::from(banner.height);
    for i in 0..banner.edge_fade {
        let fade = 1.0 - i as f32 / banner.edge_fade as f32;
        let alpha = (f32::from(banner.edge_alpha) * fade) as u8;
        let color = Rgba([
            banner.background[0],
            banner.background[1],
            banner.background[2],
            alpha,
        ]);
        let i = i64::from(i);
        layer.fill_rect(0, banner.y - 1 - i, width, 1, color);
        layer.fill_rect(0, bottom + i, width, 1, color);
    }

    let center_x = i64::from(width / 2);
    for line in [&banner.primary, &banner.secondary].into_iter().flatten() {
        font.draw_centered(
            layer,
            center_x,
            banner.y + line.offset_y,
            line.size,
            &line.text,
            line.color,
        );
    }
}

/// Paint a heading: shadow passes first, then the full-opacity text.
pub fn paint_heading(layer: &mut Layer<'_>, heading: &HeadingSpec, font: &FontFace) {
    let lines = match heading.max_width {
        Some(max_width) => wrap_text(font, heading.size, &heading.text, max_width),
        None => vec![heading.text.clone()],
    };
    let line_height = i64::from(font.line_height(heading.size));
    let first_y = heading.center_y - line_height * (lines.len() as i64 - 1) / 2;

    for (i, line) in lines.iter().enumerate() {
        let cy = first_y + line_height * i as i64;
        for &offset in &heading.shadow_offsets {
            font.draw_centered(
                layer,
                heading.center_x + offset,
                cy + offset,
                heading.size,
                line,
                heading.shadow_color,
            );
        }
        font.draw_centered(layer, heading.center_x, cy, heading.size, line, heading.color);
    }
}

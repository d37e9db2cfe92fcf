//! Canvas composition: symbol placement and guarded overlay painting.

use image::{Rgba, RgbaImage, imageops};
use imageproc::drawing::{Canvas, draw_filled_rect_mut};
use imageproc::rect::Rect;
use rand::Rng;
use symbol_engine::scale_symbol;
use tracing::{debug, warn};

use crate::ComposeError;
use crate::banner::{BannerSpec, HeadingSpec, paint_banner, paint_heading};
use crate::decoration::{DecorationSpec, generate_motifs, paint_motif};
use crate::layout::{Bounds, LayoutSpec};
use crate::text::FontFace;

/// Paint target that alpha-blends onto an image.
///
/// A guarded layer silently drops every write inside its protected
/// rectangle, so overlays can never touch the symbol.
pub struct Layer<'a> {
    image: &'a mut RgbaImage,
    protected: Option<Bounds>,
}

impl<'a> Layer<'a> {
    pub fn new(image: &'a mut RgbaImage) -> Self {
        Self {
            image,
            protected: None,
        }
    }

    pub fn guarded(image: &'a mut RgbaImage, protected: Bounds) -> Self {
        Self {
            image,
            protected: Some(protected),
        }
    }

    /// Source-over blend `color` at a signed position; off-canvas and
    /// protected pixels are ignored.
    pub fn blend_at(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if color[3] == 0 || x < 0 || y < 0 {
            return;
        }
        if self.protected.is_some_and(|p| p.contains(x, y)) {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x < self.image.width() && y < self.image.height() {
            let pixel = self.image.get_pixel_mut(x, y);
            *pixel = source_over(*pixel, color);
        }
    }

    /// Overlay `top` with its top-left corner at (`x`, `y`).
    pub fn overlay(&mut self, top: &RgbaImage, x: i64, y: i64) {
        for (dx, dy, pixel) in top.enumerate_pixels() {
            self.blend_at(x + i64::from(dx), y + i64::from(dy), *pixel);
        }
    }

    pub fn fill_rect(&mut self, x: i64, y: i64, width: u32, height: u32, color: Rgba<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect::at(x as i32, y as i32).of_size(width, height);
        draw_filled_rect_mut(self, rect, color);
    }
}

/// Composite `src` over `dst`.
///
/// An opaque destination stays opaque and an opaque source replaces the
/// destination exactly.
pub fn source_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    if src[3] == 255 {
        return src;
    }
    if dst[3] == 255 {
        // Same weighting as a plain alpha mix onto an opaque backdrop.
        let alpha = f32::from(src[3]) / 255.0;
        let inv = 1.0 - alpha;
        let mix = |i: usize| {
            (f32::from(src[i]) * alpha + f32::from(dst[i]) * inv).round() as u8
        };
        return Rgba([mix(0), mix(1), mix(2), 255]);
    }

    let sa = f32::from(src[3]) / 255.0;
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |i: usize| {
        let premul = f32::from(src[i]) * sa + f32::from(dst[i]) * da * (1.0 - sa);
        (premul / out_a).round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

impl Canvas for Layer<'_> {
    type Pixel = Rgba<u8>;

    fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixel(&self, x: u32, y: u32) -> Self::Pixel {
        *self.image.get_pixel(x, y)
    }

    fn draw_pixel(&mut self, x: u32, y: u32, color: Self::Pixel) {
        self.blend_at(i64::from(x), i64::from(y), color);
    }
}

/// Everything painted around the symbol in one composition.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub layout: &'a LayoutSpec,
    pub background: Rgba<u8>,
    /// `None` disables decorations.
    pub decorations: Option<&'a DecorationSpec>,
    pub banners: &'a [BannerSpec],
    pub headings: &'a [HeadingSpec],
}

/// Compose the final canvas around a rendered symbol.
///
/// The symbol is scaled to the layout's bounds and pasted first. Motifs and
/// banners whose extent intersects the symbol are skipped, and all overlay
/// painting goes through a guarded [`Layer`], so symbol pixels are never
/// altered.
pub fn compose<R: Rng + ?Sized>(
    symbol: &RgbaImage,
    scene: &Scene<'_>,
    font: &FontFace,
    rng: &mut R,
) -> Result<RgbaImage, ComposeError> {
    let bounds = scene.layout.symbol_bounds()?;
    let (width, height) = (scene.layout.canvas_width, scene.layout.canvas_height);
    debug!(width, height, ?bounds, "Composing canvas");

    let mut canvas = RgbaImage::from_pixel(width, height, scene.background);
    let scaled = scale_symbol(symbol, bounds.width());
    imageops::replace(&mut canvas, &scaled, bounds.left, bounds.top);

    let mut layer = Layer::guarded(&mut canvas, bounds);

    if let Some(spec) = scene.decorations {
        let motifs = generate_motifs(spec, width, height, bounds.center(), rng);
        let mut skipped = 0usize;
        for motif in &motifs {
            if motif.bounds().intersects(&bounds) {
                skipped += 1;
                continue;
            }
            paint_motif(&mut layer, motif, spec);
        }
        debug!(total = motifs.len(), skipped, "Painted decorations");
    }

    for banner in scene.banners {
        if banner.bounds(width).intersects(&bounds) {
            warn!(y = banner.y, height = banner.height, "Banner overlaps symbol, skipping");
            continue;
        }
        paint_banner(&mut layer, banner, font);
    }

    for heading in scene.headings {
        paint_heading(&mut layer, heading, font);
    }

    Ok(canvas)
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;

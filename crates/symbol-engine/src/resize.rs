//! Symbol scaling for composition.
//!
//! Smoothing filters blend dark and light modules into grey fringes, which
//! breaks the two-colour guarantee and hurts scannability. Symbols are
//! therefore resampled with nearest-neighbour only.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use tracing::debug;

/// Scale a square symbol to `side` × `side` pixels.
///
/// Returns the original image unchanged if it already has that size.
pub fn scale_symbol(symbol: &RgbaImage, side: u32) -> RgbaImage {
    let (orig_w, orig_h) = symbol.dimensions();

    if orig_w == side && orig_h == side {
        debug!(side, "Symbol already at target size, skipping resize");
        return symbol.clone();
    }

    let side = side.max(1);
    debug!(orig_w, orig_h, side, "Scaling symbol");

    imageops::resize(symbol, side, side, FilterType::Nearest)
}

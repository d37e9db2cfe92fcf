//! Canvas geometry: target size and symbol placement.

use serde::{Deserialize, Serialize};

use crate::ComposeError;

/// Pixel rectangle with exclusive right/bottom edges.
///
/// Coordinates are signed so decorations hanging off the canvas edge can
/// be described before clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

impl Bounds {
    pub fn from_size(x: i64, y: i64, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x + i64::from(width),
            bottom: y + i64::from(height),
        }
    }

    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0) as u32
    }

    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }

    pub fn center(&self) -> (i64, i64) {
        ((self.left + self.right) / 2, (self.top + self.bottom) / 2)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.left && x < self.right && y >= self.top && y < self.bottom
    }

    pub fn intersects(&self, other: &Bounds) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    /// Whether the rectangle lies entirely inside `[0, width) × [0, height)`.
    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.left >= 0
            && self.top >= 0
            && self.right <= i64::from(width)
            && self.bottom <= i64::from(height)
    }
}

/// Target canvas and where the symbol sits on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Fraction of the canvas width the symbol occupies, in `(0, 1]`.
    pub symbol_fraction_of_width: f64,
    /// Fraction of the canvas height at which the symbol centre is placed.
    pub symbol_vertical_anchor: f64,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self {
            canvas_width: 1080,
            canvas_height: 1920,
            symbol_fraction_of_width: 0.5,
            symbol_vertical_anchor: 0.25,
        }
    }
}

impl LayoutSpec {
    /// Compute the symbol's bounding box on the canvas.
    ///
    /// The symbol is centred horizontally. Vertically its centre sits at the
    /// anchor, clamped so the whole symbol stays on the canvas.
    pub fn symbol_bounds(&self) -> Result<Bounds, ComposeError> {
        let (w, h) = (self.canvas_width, self.canvas_height);
        if w == 0 || h == 0 {
            return Err(ComposeError::InvalidLayout(format!(
                "canvas must be non-empty, got {w}x{h}"
            )));
        }

        let fraction = self.symbol_fraction_of_width;
        if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
            return Err(ComposeError::InvalidLayout(format!(
                "symbol fraction {fraction} outside (0, 1]"
            )));
        }
        if !self.symbol_vertical_anchor.is_finite() {
            return Err(ComposeError::InvalidLayout(format!(
                "symbol anchor {} is not finite",
                self.symbol_vertical_anchor
            )));
        }

        let side = (f64::from(w) * fraction).floor() as u32;
        if side == 0 {
            return Err(ComposeError::InvalidLayout(format!(
                "symbol side collapses to zero ({w} x {fraction})"
            )));
        }
        if side > h {
            return Err(ComposeError::InvalidLayout(format!(
                "symbol side {side} does not fit canvas height {h}"
            )));
        }

        let x = i64::from((w - side) / 2);
        let anchor_y = (f64::from(h) * self.symbol_vertical_anchor) as i64;
        let y = (anchor_y - i64::from(side / 2)).clamp(0, i64::from(h - side));

        Ok(Bounds::from_size(x, y, side, side))
    }
}

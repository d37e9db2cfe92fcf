//! Composition settings passed explicitly into every render.
//!
//! Defaults reproduce the flower theme: cream canvas, navy symbol, pink
//! contact banner and green heading.

use std::path::PathBuf;

use image::Rgba;
use serde::{Deserialize, Serialize};
use symbol_engine::{ErrorCorrection, SymbolColors};

use crate::banner::{BannerSpec, HeadingSpec, TextLine};
use crate::decoration::DecorationSpec;
use crate::layout::LayoutSpec;

/// Style of a two-line banner whose second line carries a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BannerStyle {
    /// Top edge as a fraction of canvas height.
    pub y_fraction: f64,
    pub height: u32,
    pub background: [u8; 4],
    pub edge_fade: u32,
    pub edge_alpha: u8,
    pub label: String,
    pub label_size: f32,
    pub label_offset: i64,
    pub value_size: f32,
    pub value_offset: i64,
    pub text_color: [u8; 4],
}

impl Default for BannerStyle {
    fn default() -> Self {
        Self {
            y_fraction: 0.5,
            height: 120,
            background: [255, 151, 187, 200],
            edge_fade: 20,
            edge_alpha: 150,
            label: "EMERGENCY CONTACT".into(),
            label_size: 36.0,
            label_offset: 20,
            value_size: 48.0,
            value_offset: 70,
            text_color: [255, 255, 255, 255],
        }
    }
}

impl BannerStyle {
    fn services() -> Self {
        Self {
            y_fraction: 0.8,
            height: 100,
            background: [136, 176, 75, 200],
            edge_fade: 16,
            edge_alpha: 120,
            label: "EMERGENCY SERVICES".into(),
            label_size: 28.0,
            label_offset: 24,
            value_size: 44.0,
            value_offset: 66,
            text_color: [255, 255, 255, 255],
        }
    }

    /// Place the banner on a canvas of the given height.
    pub fn banner(&self, canvas_height: u32, value: &str) -> BannerSpec {
        let color = Rgba(self.text_color);
        BannerSpec {
            y: (f64::from(canvas_height) * self.y_fraction) as i64,
            height: self.height,
            background: Rgba(self.background),
            edge_fade: self.edge_fade,
            edge_alpha: self.edge_alpha,
            primary: Some(TextLine {
                text: self.label.clone(),
                size: self.label_size,
                offset_y: self.label_offset,
                color,
            }),
            secondary: Some(TextLine {
                text: value.to_string(),
                size: self.value_size,
                offset_y: self.value_offset,
                color,
            }),
        }
    }
}

/// Style of free-standing centred text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingStyle {
    /// Vertical centre as a fraction of canvas height.
    pub y_fraction: f64,
    pub size: f32,
    pub color: [u8; 4],
    pub shadow_color: [u8; 4],
    pub shadow_offsets: Vec<i64>,
    /// Horizontal margin kept free on each side when wrapping.
    pub margin: u32,
    pub wrap: bool,
}

impl Default for HeadingStyle {
    fn default() -> Self {
        Self {
            y_fraction: 0.1,
            size: 42.0,
            color: [136, 176, 75, 255],
            shadow_color: [0, 0, 0, 50],
            shadow_offsets: vec![3, 2, 1],
            margin: 40,
            wrap: false,
        }
    }
}

impl HeadingStyle {
    fn caption() -> Self {
        Self {
            y_fraction: 0.95,
            size: 26.0,
            color: [6, 3, 100, 255],
            shadow_color: [255, 255, 255, 120],
            shadow_offsets: vec![1],
            margin: 60,
            wrap: true,
        }
    }

    /// Place `text` on a canvas of the given size.
    pub fn heading(&self, text: &str, canvas_width: u32, canvas_height: u32) -> HeadingSpec {
        HeadingSpec {
            text: text.to_string(),
            center_x: i64::from(canvas_width / 2),
            center_y: (f64::from(canvas_height) * self.y_fraction) as i64,
            size: self.size,
            color: Rgba(self.color),
            shadow_color: Rgba(self.shadow_color),
            shadow_offsets: self.shadow_offsets.clone(),
            max_width: self
                .wrap
                .then(|| canvas_width.saturating_sub(self.margin * 2).max(1)),
        }
    }
}

/// Everything a render needs besides the record, font and randomness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositionConfig {
    pub layout: LayoutSpec,
    pub background: [u8; 4],
    pub symbol_dark: [u8; 4],
    pub symbol_light: [u8; 4],
    pub plain_dark: [u8; 4],
    pub plain_light: [u8; 4],
    /// Level for the undecorated symbol; themed renders always use `High`.
    pub plain_error_correction: ErrorCorrection,
    /// `None` disables decorations.
    pub decorations: Option<DecorationSpec>,
    pub contact_banner: BannerStyle,
    pub services_banner: BannerStyle,
    pub heading_text: String,
    pub heading: HeadingStyle,
    pub caption: HeadingStyle,
    /// Opaque colour translucent pixels are flattened onto on export.
    pub flatten_color: [u8; 3],
    /// Preferred font files, tried before system fonts.
    pub fonts: Vec<PathBuf>,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            layout: LayoutSpec::default(),
            background: [249, 245, 231, 255],
            symbol_dark: [6, 3, 100, 255],
            symbol_light: [249, 245, 231, 255],
            plain_dark: [0, 0, 0, 255],
            plain_light: [255, 255, 255, 255],
            plain_error_correction: ErrorCorrection::Low,
            decorations: Some(DecorationSpec::default()),
            contact_banner: BannerStyle::default(),
            services_banner: BannerStyle::services(),
            heading_text: "MEDICAL EMERGENCY INFO".into(),
            heading: HeadingStyle::default(),
            caption: HeadingStyle::caption(),
            flatten_color: [255, 255, 255],
            fonts: Vec::new(),
        }
    }
}

impl CompositionConfig {
    pub fn themed_symbol_colors(&self) -> SymbolColors {
        SymbolColors {
            dark: Rgba(self.symbol_dark),
            light: Rgba(self.symbol_light),
        }
    }

    pub fn plain_symbol_colors(&self) -> SymbolColors {
        SymbolColors {
            dark: Rgba(self.plain_dark),
            light: Rgba(self.plain_light),
        }
    }
}

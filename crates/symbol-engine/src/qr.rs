//! QR code generation for emergency payloads.

use image::{Rgba, RgbaImage};
use qrcode::types::QrError;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SymbolError;

/// Nominal error-correction strength, trading capacity for resilience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCorrection {
    Low,
    Medium,
    Quartile,
    High,
}

impl ErrorCorrection {
    fn ec_level(self) -> EcLevel {
        match self {
            Self::Low => EcLevel::L,
            Self::Medium => EcLevel::M,
            Self::Quartile => EcLevel::Q,
            Self::High => EcLevel::H,
        }
    }
}

/// Foreground (dark module) and background colours of a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolColors {
    pub dark: Rgba<u8>,
    pub light: Rgba<u8>,
}

impl Default for SymbolColors {
    fn default() -> Self {
        Self {
            dark: Rgba([0, 0, 0, 255]),
            light: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Turns a byte payload into a square two-colour symbol.
pub trait SymbolEncoder {
    fn encode(
        &self,
        payload: &[u8],
        level: ErrorCorrection,
        colors: SymbolColors,
    ) -> Result<RgbaImage, SymbolError>;
}

/// QR encoder rendering fixed-size modules with a quiet-zone border.
#[derive(Debug, Clone, Copy)]
pub struct QrEncoder {
    /// Pixels per module.
    pub module_size: u32,
    /// Quiet zone width in modules.
    pub border: u32,
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self {
            module_size: 10,
            border: 4,
        }
    }
}

impl SymbolEncoder for QrEncoder {
    fn encode(
        &self,
        payload: &[u8],
        level: ErrorCorrection,
        colors: SymbolColors,
    ) -> Result<RgbaImage, SymbolError> {
        // The smallest version that fits is chosen automatically, up to 40.
        let code = QrCode::with_error_correction_level(payload, level.ec_level()).map_err(
            |e| match e {
                QrError::DataTooLong => SymbolError::CapacityExceeded {
                    bytes: payload.len(),
                    level,
                },
                other => SymbolError::Encode(other.to_string()),
            },
        )?;

        let modules = code.to_colors();
        let module_count = code.width() as u32;
        let scale = self.module_size.max(1);
        let img_size = (module_count + self.border * 2) * scale;

        debug!(
            bytes = payload.len(),
            ?level,
            module_count,
            img_size,
            "Rendering QR symbol"
        );

        let mut img = RgbaImage::from_pixel(img_size, img_size, colors.light);
        let offset = self.border * scale;

        for (i, color) in modules.iter().enumerate() {
            let x = (i as u32) % module_count;
            let y = (i as u32) / module_count;

            if *color == qrcode::Color::Dark {
                for dx in 0..scale {
                    for dy in 0..scale {
                        img.put_pixel(
                            offset + x * scale + dx,
                            offset + y * scale + dy,
                            colors.dark,
                        );
                    }
                }
            }
        }

        Ok(img)
    }
}

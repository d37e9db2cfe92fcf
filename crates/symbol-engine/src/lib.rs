//! Scannable symbol production.
//!
//! The symbology itself is delegated to the `qrcode` crate. This crate
//! owns the boundary around it: the error-correction policy, two-colour
//! rasterisation, and edge-preserving scaling of the finished symbol.

pub mod qr;
pub mod resize;

pub use qr::{ErrorCorrection, QrEncoder, SymbolColors, SymbolEncoder};
pub use resize::scale_symbol;

/// Errors produced while encoding a payload into a symbol.
#[derive(Debug, thiserror::Error)]
pub enum SymbolError {
    #[error("Payload of {bytes} bytes exceeds QR capacity at {level:?} error correction")]
    CapacityExceeded { bytes: usize, level: ErrorCorrection },

    #[error("QR encode error: {0}")]
    Encode(String),
}

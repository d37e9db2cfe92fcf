//! Emergency wallpaper rendering.
//!
//! Takes an encoded symbol and composes it onto a themed canvas with
//! decorations, banners and headings, guaranteeing the symbol pixels are
//! left untouched. Also provides the undecorated variant and image export.

pub mod banner;
pub mod compose;
pub mod config;
pub mod decoration;
pub mod export;
pub mod layout;
pub mod render;
pub mod text;

pub use compose::{Layer, Scene, compose};
pub use config::CompositionConfig;
pub use export::{ExportError, save};
pub use layout::{Bounds, LayoutSpec};
pub use render::{render_plain, render_themed};
pub use text::FontFace;

use emergency_record::RecordError;
use symbol_engine::SymbolError;

/// Errors produced while composing a canvas.
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),
}

/// Any failure on the way from a record to a finished image.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Symbol(#[from] SymbolError),

    #[error(transparent)]
    Compose(#[from] ComposeError),
}

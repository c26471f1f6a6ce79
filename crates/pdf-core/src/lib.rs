//! PDF Core - Low-level PDF writing
//!
//! This crate provides functionality for:
//! - Creating documents from scratch or from an existing base PDF
//! - Embedding TrueType fonts
//! - Inserting text, lines, rectangles and ellipses at page coordinates
//! - Inserting images (JPEG, PNG)
//!
//! Coordinates passed to the drawing API are in points, measured from the
//! top-left corner of the page. Conversion to PDF user space happens inside
//! [`PdfDocument`].
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{PdfDocument, TextStyle};
//!
//! let mut doc = PdfDocument::new();
//! let page = doc.add_page(595.28, 841.89)?;
//! doc.register_font("dejavu", std::fs::read("DejaVuSans.ttf")?)?;
//! doc.insert_text(page, "Hello, World!", 72.0, 72.0, &TextStyle::new("dejavu", 12.0))?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, PdfDocument, TextStyle};
pub use font::FontData;
pub use graphics::ShapeStyle;
pub use text::wrap_to_width;

use thiserror::Error;

/// Points per millimetre
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Convert millimetres to points
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * PT_PER_MM
}

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    OpenError(String),

    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("PDF parsing error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

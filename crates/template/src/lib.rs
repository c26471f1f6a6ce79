//! Template Engine - pdfme-compatible template model and rendering
//!
//! This crate provides:
//! - Template JSON types (list and legacy keyed schema pages, blank or base-PDF pages)
//! - Structural validation (`check_template`) and font registry checks (`check_font`)
//! - Input derivation for templates without a form (`get_input_from_template`)
//! - The plugin kinds the renderer understands
//! - PDF generation (`generate`) on top of `pdf-core`
//!
//! # Example
//!
//! ```ignore
//! use template::{generate, get_input_from_template, GenerateOptions, GenerateProps, Template};
//!
//! let template = Template::from_json(template_json)?;
//! let props = GenerateProps {
//!     inputs: get_input_from_template(&template),
//!     template,
//!     options: GenerateOptions::new(font_registry),
//!     plugins: template::builtin_plugins(),
//! };
//! let pdf_bytes = generate(&props)?;
//! ```

mod blocks;
mod check;
mod font;
mod inputs;
mod plugins;
mod renderer;
mod schema;

pub use check::{check_template, decode_base_pdf};
pub use font::{
    check_font, default_font, fonts_in_use, Font, FontEntry, FontSource, DEFAULT_FONT_NAME,
    DEFAULT_FONT_URL,
};
pub use inputs::{get_input_from_template, Inputs};
pub use plugins::{builtin_plugins, Plugin, PluginKind, Plugins};
pub use renderer::{generate, GenerateOptions, GenerateProps};
pub use schema::*;

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    #[error("Invalid font: {0}")]
    FontError(String),

    #[error("{0}")]
    RenderError(String),

    #[error("PDF error: {0}")]
    PdfError(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;

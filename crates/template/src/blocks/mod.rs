//! Per-kind schema rendering
//!
//! The dispatch lives in the `renderer` module; each submodule draws one
//! family of plugin kinds onto a page of a [`PdfDocument`].

mod codes;
mod picture;
mod shapes;
mod table;
mod text;

pub(crate) use codes::{render_barcode, render_qrcode};
pub(crate) use picture::render_image;
pub(crate) use shapes::{
    render_checkbox, render_ellipse, render_line, render_radio, render_rectangle,
};
pub(crate) use table::render_table;
pub(crate) use text::{render_multi_variable_text, render_text};

use crate::schema::Schema;
use crate::{Result, TemplateError};
use pdf_core::{mm_to_pt, Color, PdfDocument};

/// Where a schema is being drawn
pub(crate) struct RenderContext<'a> {
    pub doc: &'a mut PdfDocument,
    /// 1-based page number in the output document
    pub page: usize,
    /// Registered fallback font, `None` when the template draws no text
    pub fallback_font: Option<&'a str>,
}

impl RenderContext<'_> {
    /// Font a schema draws with: its `fontName` if registered, else the fallback
    pub fn font_for(&self, schema: &Schema) -> Result<String> {
        if let Some(name) = schema.prop_str("fontName").filter(|n| self.doc.has_font(n)) {
            return Ok(name.to_string());
        }
        self.fallback_font
            .map(str::to_string)
            .ok_or_else(|| TemplateError::FontError("no fallback font registered".to_string()))
    }
}

/// Schema box in points, measured from the top-left of the page
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            x: mm_to_pt(schema.position.x),
            y: mm_to_pt(schema.position.y),
            width: mm_to_pt(schema.width),
            height: mm_to_pt(schema.height),
        }
    }

    /// Shrink by `inset` points on every side
    pub fn inset(self, inset: f64) -> Self {
        Self {
            x: self.x + inset,
            y: self.y + inset,
            width: (self.width - 2.0 * inset).max(0.0),
            height: (self.height - 2.0 * inset).max(0.0),
        }
    }
}

/// Hex color property, `None` when unset or unparsable
pub(crate) fn color_prop(schema: &Schema, key: &str) -> Option<Color> {
    schema.prop_str(key).and_then(Color::from_hex)
}

/// Whether a checkbox or radio value is checked
pub(crate) fn is_checked(value: &str) -> bool {
    value.trim() == "true"
}

//! Template rendering

use crate::blocks::{self, RenderContext};
use crate::check::{check_template, decode_base_pdf};
use crate::font::{check_font, fallback_name, fonts_in_use, Font, FontSource};
use crate::inputs::Inputs;
use crate::plugins::{PluginKind, Plugins};
use crate::schema::{BasePdf, Schema, Template};
use crate::{Result, TemplateError};
use pdf_core::{mm_to_pt, PdfDocument};

/// Document-level settings for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Font registry; URL entries must already be resolved to bytes for
    /// every font the template draws with
    pub font: Font,
    /// Written to the catalog `/Lang`
    pub lang: String,
    /// Written to the info `/Title`
    pub title: String,
}

impl GenerateOptions {
    pub fn new(font: Font) -> Self {
        Self {
            font,
            lang: "en".to_string(),
            title: "pdfme".to_string(),
        }
    }
}

/// Everything `generate` needs
#[derive(Debug, Clone)]
pub struct GenerateProps {
    pub template: Template,
    /// One record per copy of the template's pages
    pub inputs: Vec<Inputs>,
    pub options: GenerateOptions,
    /// Renderers available for schema types
    pub plugins: Plugins,
}

/// Render the template once per input record and serialize the PDF
pub fn generate(props: &GenerateProps) -> Result<Vec<u8>> {
    let template = &props.template;
    check_template(template)?;
    check_font(&props.options.font, template)?;
    if props.inputs.is_empty() {
        return Err(TemplateError::RenderError("inputs should not be empty".to_string()));
    }

    let kinds = resolve_kinds(template, &props.plugins)?;
    let pages_per_copy = template.schemas.len();
    let mut doc = prepare_document(&template.base_pdf, pages_per_copy, props.inputs.len())?;
    let fallback = register_fonts(&mut doc, &props.options.font, template)?;

    for (copy, input) in props.inputs.iter().enumerate() {
        for (page_index, page) in template.schemas.iter().enumerate() {
            let mut ctx = RenderContext {
                doc: &mut doc,
                page: copy * pages_per_copy + page_index + 1,
                fallback_font: fallback.as_deref(),
            };
            tracing::debug!(page = ctx.page, schemas = page.len(), "rendering page");

            for ((name, schema), kind) in page.named().into_iter().zip(&kinds[page_index]) {
                let value = if schema.is_read_only() {
                    schema.content.clone().unwrap_or_default()
                } else {
                    input.get(name).cloned().unwrap_or_default()
                };
                render_schema(&mut ctx, schema, *kind, &value)?;
            }
        }
    }

    doc.set_info(&props.options.title, &props.options.lang);
    let bytes = doc.to_bytes()?;
    tracing::info!(
        pages = pages_per_copy * props.inputs.len(),
        bytes = bytes.len(),
        "generated pdf"
    );
    Ok(bytes)
}

/// Plugin kind for every schema, page by page
fn resolve_kinds(template: &Template, plugins: &Plugins) -> Result<Vec<Vec<PluginKind>>> {
    template
        .schemas
        .iter()
        .map(|page| {
            page.named()
                .into_iter()
                .map(|(_, schema)| {
                    plugins
                        .values()
                        .map(|plugin| plugin.kind)
                        .find(|kind| kind.type_name() == schema.kind)
                        .ok_or_else(|| {
                            TemplateError::RenderError(format!(
                                "Renderer for type {} not found",
                                schema.kind
                            ))
                        })
                })
                .collect()
        })
        .collect()
}

/// Blank pages, or the base PDF cut to one page per template page and
/// repeated for every copy
fn prepare_document(
    base_pdf: &BasePdf,
    pages_per_copy: usize,
    copies: usize,
) -> Result<PdfDocument> {
    match base_pdf {
        BasePdf::Blank(blank) => {
            let mut doc = PdfDocument::new();
            for _ in 0..pages_per_copy * copies {
                doc.add_page(mm_to_pt(blank.width), mm_to_pt(blank.height))?;
            }
            Ok(doc)
        }
        BasePdf::Pdf(data) => {
            let mut doc = PdfDocument::open_from_bytes(&decode_base_pdf(data)?)?;
            let available = doc.page_count();
            if available < pages_per_copy {
                return Err(TemplateError::RenderError(format!(
                    "basePdf has {available} pages but the template has {pages_per_copy}"
                )));
            }
            if available > pages_per_copy {
                tracing::debug!(available, kept = pages_per_copy, "dropping extra base pdf pages");
                doc.truncate_pages(pages_per_copy);
            }
            for _ in 1..copies {
                for page in 1..=pages_per_copy {
                    doc.duplicate_page(page)?;
                }
            }
            Ok(doc)
        }
    }
}

/// Embed the fonts the template draws with; returns the fallback name when
/// any text is drawn
fn register_fonts(
    doc: &mut PdfDocument,
    font: &Font,
    template: &Template,
) -> Result<Option<String>> {
    let needed = fonts_in_use(font, template)?;
    for name in &needed {
        match font.get(name).map(|entry| &entry.data) {
            Some(FontSource::Data(bytes)) => doc.register_font(name, bytes.clone())?,
            Some(FontSource::Url(url)) => {
                return Err(TemplateError::FontError(format!(
                    "font \"{name}\" must be loaded before rendering ({url})"
                )))
            }
            None => {
                return Err(TemplateError::FontError(format!(
                    "font \"{name}\" is not registered"
                )))
            }
        }
    }

    if needed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(fallback_name(font)?.to_string()))
    }
}

fn render_schema(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    kind: PluginKind,
    value: &str,
) -> Result<()> {
    match kind {
        PluginKind::Text
        | PluginKind::Date
        | PluginKind::Time
        | PluginKind::DateTime
        | PluginKind::Select => blocks::render_text(ctx, schema, value),
        PluginKind::MultiVariableText => blocks::render_multi_variable_text(ctx, schema, value),
        PluginKind::Table => blocks::render_table(ctx, schema, value),
        PluginKind::Line => blocks::render_line(ctx, schema),
        PluginKind::Rectangle => blocks::render_rectangle(ctx, schema),
        PluginKind::Ellipse => blocks::render_ellipse(ctx, schema),
        PluginKind::Image | PluginKind::Signature => blocks::render_image(ctx, schema, value),
        PluginKind::QrCode => blocks::render_qrcode(ctx, schema, value),
        PluginKind::Ean13 | PluginKind::Code128 => blocks::render_barcode(ctx, schema, kind, value),
        PluginKind::Checkbox => blocks::render_checkbox(ctx, schema, value),
        PluginKind::RadioGroup => blocks::render_radio(ctx, schema, value),
        PluginKind::Svg => {
            if !value.is_empty() {
                tracing::warn!(page = ctx.page, "svg schemas are not rendered, skipping");
            }
            Ok(())
        }
    }
}

//! Text-like kinds: text, multiVariableText, date, time, dateTime, select

use super::{color_prop, Frame, RenderContext};
use crate::schema::Schema;
use crate::Result;
use pdf_core::{wrap_to_width, Align, ShapeStyle, TextStyle};
use serde_json::{Map, Value};

/// Font size used when a schema sets none
pub(crate) const DEFAULT_FONT_SIZE: f64 = 13.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum VerticalAlign {
    Top,
    Middle,
    Bottom,
}

/// Resolved text settings for one box
#[derive(Debug, Clone)]
pub(crate) struct TextBox {
    pub style: TextStyle,
    /// Multiplier applied to the font size for line pitch
    pub line_height: f64,
    pub vertical: VerticalAlign,
}

impl TextBox {
    pub fn from_schema(schema: &Schema, font: String) -> Self {
        let size = schema.prop_f64("fontSize").filter(|s| *s > 0.0).unwrap_or(DEFAULT_FONT_SIZE);
        let color = color_prop(schema, "fontColor").unwrap_or_default();
        let align = parse_align(schema.prop_str("alignment"));
        let vertical = match schema.prop_str("verticalAlignment") {
            Some("middle") => VerticalAlign::Middle,
            Some("bottom") => VerticalAlign::Bottom,
            _ => VerticalAlign::Top,
        };

        Self {
            style: TextStyle::new(&font, size).with_color(color).with_align(align),
            line_height: schema.prop_f64("lineHeight").filter(|h| *h > 0.0).unwrap_or(1.0),
            vertical,
        }
    }
}

pub(crate) fn parse_align(value: Option<&str>) -> Align {
    match value {
        Some("center") => Align::Center,
        Some("right") => Align::Right,
        _ => Align::Left,
    }
}

/// Draw `text` wrapped into `frame`
///
/// Returns the height of the laid out lines in points.
pub(crate) fn draw_text_box(
    ctx: &mut RenderContext<'_>,
    frame: Frame,
    text: &str,
    text_box: &TextBox,
) -> Result<f64> {
    let style = &text_box.style;
    let lines = {
        let doc = &*ctx.doc;
        wrap_to_width(text, frame.width, |s| {
            doc.text_width(&style.font, s, style.size).unwrap_or(0.0)
        })
    };

    let pitch = style.size * text_box.line_height;
    let total = pitch * lines.len() as f64;
    let offset = match text_box.vertical {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => (frame.height - total) / 2.0,
        VerticalAlign::Bottom => frame.height - total,
    };
    let ascent = ctx.doc.ascent(&style.font, style.size)?;
    let x = match style.align {
        Align::Left => frame.x,
        Align::Center => frame.x + frame.width / 2.0,
        Align::Right => frame.x + frame.width,
    };

    for (i, line) in lines.iter().enumerate() {
        let baseline = frame.y + offset + pitch * i as f64 + ascent;
        ctx.doc.insert_text(ctx.page, line, x, baseline, style)?;
    }

    Ok(total)
}

fn fill_background(ctx: &mut RenderContext<'_>, schema: &Schema, frame: Frame) -> Result<()> {
    if let Some(color) = color_prop(schema, "backgroundColor") {
        let style = ShapeStyle::filled(color);
        ctx.doc.draw_rect(ctx.page, frame.x, frame.y, frame.width, frame.height, &style)?;
    }
    Ok(())
}

/// Plain text and the kinds whose value is already display text
pub(crate) fn render_text(ctx: &mut RenderContext<'_>, schema: &Schema, value: &str) -> Result<()> {
    let frame = Frame::from_schema(schema);
    fill_background(ctx, schema, frame)?;
    if value.is_empty() {
        return Ok(());
    }

    let text_box = TextBox::from_schema(schema, ctx.font_for(schema)?);
    draw_text_box(ctx, frame, value, &text_box)?;
    Ok(())
}

/// Text with `{name}` placeholders filled from a JSON object value
pub(crate) fn render_multi_variable_text(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    let variables = if value.trim().is_empty() {
        Map::new()
    } else {
        match serde_json::from_str::<Value>(value) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!(
                    kind = %schema.kind,
                    "variables are not a JSON object, rendering template text only"
                );
                Map::new()
            }
        }
    };

    let text = substitute_variables(schema.prop_str("text").unwrap_or(""), &variables);
    render_text(ctx, schema, &text)
}

/// Replace `{name}` with the matching variable; unmatched placeholders are dropped
pub(crate) fn substitute_variables(text: &str, variables: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(['{', '}']) {
            Some(end) if after.as_bytes()[end] == b'}' && end > 0 => {
                let name = &after[..end];
                match variables.get(name) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(Value::Null) | None => {}
                    Some(other) => out.push_str(&other.to_string()),
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

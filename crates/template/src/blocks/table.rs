//! Table kind
//!
//! The value is a JSON array of rows, each an array of cell strings. Column
//! headers come from the `head` property, widths from
//! `headWidthPercentages`. Rows grow to fit wrapped cell text, so a table
//! may extend below its schema box.

use super::text::{draw_text_box, parse_align, TextBox, VerticalAlign, DEFAULT_FONT_SIZE};
use super::{Frame, RenderContext};
use crate::schema::Schema;
use crate::{Result, TemplateError};
use pdf_core::{mm_to_pt, wrap_to_width, Color, ShapeStyle, TextStyle};
use serde_json::Value;

/// Space between a cell border and its text, in millimetres
const CELL_PADDING_MM: f64 = 1.5;

/// Styling for the header or body rows
struct RowStyle {
    text: TextBox,
    background: Option<Color>,
    alternate_background: Option<Color>,
}

impl RowStyle {
    fn from_schema(schema: &Schema, key: &str, font: &str, default_color: Color) -> Self {
        let color = |field: &str| schema.nested_str(key, field).and_then(Color::from_hex);
        Self {
            text: TextBox {
                style: TextStyle::new(
                    font,
                    schema
                        .nested_f64(key, "fontSize")
                        .filter(|s| *s > 0.0)
                        .unwrap_or(DEFAULT_FONT_SIZE),
                )
                .with_color(color("fontColor").unwrap_or(default_color))
                .with_align(parse_align(schema.nested_str(key, "alignment"))),
                line_height: schema
                    .nested_f64(key, "lineHeight")
                    .filter(|h| *h > 0.0)
                    .unwrap_or(1.0),
                vertical: VerticalAlign::Top,
            },
            background: color("backgroundColor"),
            alternate_background: color("alternateBackgroundColor"),
        }
    }
}

/// Parse the table value into rows of cell text
pub(crate) fn parse_rows(value: &str) -> Result<Vec<Vec<String>>> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    let invalid =
        || TemplateError::RenderError("Table content must be a JSON array of rows".to_string());

    let Value::Array(rows) = serde_json::from_str::<Value>(value).map_err(|_| invalid())? else {
        return Err(invalid());
    };
    rows.into_iter()
        .map(|row| match row {
            Value::Array(cells) => Ok(cells.into_iter().map(cell_text).collect()),
            _ => Err(invalid()),
        })
        .collect()
}

fn cell_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Column widths in points, from percentages or split evenly
pub(crate) fn column_widths(schema: &Schema, columns: usize, total: f64) -> Vec<f64> {
    let percentages: Vec<f64> = schema
        .prop("headWidthPercentages")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();

    let sum: f64 = percentages.iter().sum();
    if percentages.len() == columns && sum > 0.0 {
        percentages.iter().map(|p| total * p / sum).collect()
    } else {
        vec![total / columns as f64; columns]
    }
}

pub(crate) fn render_table(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    let head: Vec<String> = schema
        .prop("head")
        .and_then(Value::as_array)
        .map(|values| values.iter().cloned().map(cell_text).collect())
        .unwrap_or_default();
    let body = parse_rows(value)?;

    let columns = body.iter().map(Vec::len).chain([head.len()]).max().unwrap_or(0);
    if columns == 0 {
        return Ok(());
    }

    let frame = Frame::from_schema(schema);
    let font = ctx.font_for(schema)?;
    let widths = column_widths(schema, columns, frame.width);
    let padding = mm_to_pt(CELL_PADDING_MM);
    let border_width =
        mm_to_pt(schema.nested_f64("tableStyles", "borderWidth").unwrap_or(0.3).max(0.0));
    let border_color = schema
        .nested_str("tableStyles", "borderColor")
        .and_then(Color::from_hex)
        .unwrap_or_default();

    let head_style = RowStyle::from_schema(schema, "headStyles", &font, Color::white());
    let body_style = RowStyle::from_schema(schema, "bodyStyles", &font, Color::black());
    let show_head = schema.prop("showHead").and_then(Value::as_bool).unwrap_or(true);

    let mut y = frame.y;
    let mut rows: Vec<(&[String], &RowStyle, Option<Color>)> = Vec::new();
    if show_head && !head.is_empty() {
        rows.push((head.as_slice(), &head_style, head_style.background));
    }
    for (i, row) in body.iter().enumerate() {
        let background = match body_style.alternate_background {
            Some(alternate) if i % 2 == 1 => Some(alternate),
            _ => body_style.background,
        };
        rows.push((row.as_slice(), &body_style, background));
    }

    for (cells, style, background) in rows {
        let text = &style.text.style;
        let pitch = text.size * style.text.line_height;
        let line_count = widths
            .iter()
            .zip(cells)
            .map(|(width, cell)| {
                let doc = &*ctx.doc;
                wrap_to_width(cell, width - 2.0 * padding, |s| {
                    doc.text_width(&text.font, s, text.size).unwrap_or(0.0)
                })
                .len()
            })
            .max()
            .unwrap_or(1);
        let row_height = pitch * line_count as f64 + 2.0 * padding;

        let mut x = frame.x;
        for (column, width) in widths.iter().enumerate() {
            let cell = Frame {
                x,
                y,
                width: *width,
                height: row_height,
            };
            let cell_style = ShapeStyle {
                fill: background,
                stroke: Some(border_color).filter(|_| border_width > 0.0),
                line_width: border_width,
            };
            ctx.doc.draw_rect(ctx.page, cell.x, cell.y, cell.width, cell.height, &cell_style)?;

            if let Some(content) = cells.get(column).filter(|c| !c.is_empty()) {
                draw_text_box(ctx, cell.inset(padding), content, &style.text)?;
            }
            x += width;
        }
        y += row_height;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows(r#"[["a", 1, null], ["b"]]"#).unwrap();
        assert_eq!(
            rows,
            vec![vec!["a".to_string(), "1".to_string(), String::new()], vec!["b".to_string()]]
        );
        assert!(parse_rows("").unwrap().is_empty());
        assert!(parse_rows(r#"{"a": 1}"#).is_err());
        assert!(parse_rows(r#"["a"]"#).is_err());
        assert!(parse_rows("[[").is_err());
    }

    #[test]
    fn test_column_widths() {
        let schema = Schema::new("table", 0.0, 0.0, 100.0, 20.0)
            .with_prop("headWidthPercentages", json!([25, 75]));
        assert_eq!(column_widths(&schema, 2, 200.0), vec![50.0, 150.0]);
        // mismatched column count falls back to even widths
        assert_eq!(column_widths(&schema, 4, 200.0), vec![50.0; 4]);
    }

    #[test]
    fn test_row_style_from_schema() {
        let schema = Schema::new("table", 0.0, 0.0, 100.0, 20.0).with_prop(
            "headStyles",
            json!({"fontSize": 13, "fontColor": "#ffffff", "alignment": "center",
                   "backgroundColor": "#2980ba"}),
        );

        let head = RowStyle::from_schema(&schema, "headStyles", "f", Color::black());
        assert_eq!(head.text.style.font, "f");
        assert_eq!(head.text.style.size, 13.0);
        assert_eq!(head.text.style.color, Color::white());
        assert_eq!(head.text.style.align, pdf_core::Align::Center);
        assert!(head.background.is_some());

        let body = RowStyle::from_schema(&schema, "bodyStyles", "f", Color::black());
        assert_eq!(body.text.style.size, DEFAULT_FONT_SIZE);
        assert_eq!(body.text.style.color, Color::black());
        assert_eq!(body.text.style.align, pdf_core::Align::Left);
        assert_eq!(body.background, None);
    }
}

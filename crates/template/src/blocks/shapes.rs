//! Vector kinds: line, rectangle, ellipse, checkbox, radioGroup

use super::{color_prop, is_checked, Frame, RenderContext};
use crate::schema::Schema;
use crate::Result;
use pdf_core::{mm_to_pt, Color, ShapeStyle};

/// A line is a filled bar the size of its box
pub(crate) fn render_line(ctx: &mut RenderContext<'_>, schema: &Schema) -> Result<()> {
    let frame = Frame::from_schema(schema);
    let color = color_prop(schema, "color").unwrap_or_default();
    ctx.doc.draw_rect(
        ctx.page,
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        &ShapeStyle::filled(color),
    )?;
    Ok(())
}

/// Border and fill from `borderWidth` (mm), `borderColor` and `color`
///
/// The border is drawn inside the box.
fn outlined(schema: &Schema) -> (Frame, ShapeStyle) {
    let border = mm_to_pt(schema.prop_f64("borderWidth").unwrap_or(0.0).max(0.0));
    let style = ShapeStyle {
        fill: color_prop(schema, "color"),
        stroke: color_prop(schema, "borderColor").filter(|_| border > 0.0),
        line_width: border,
    };
    (Frame::from_schema(schema).inset(border / 2.0), style)
}

pub(crate) fn render_rectangle(ctx: &mut RenderContext<'_>, schema: &Schema) -> Result<()> {
    let (frame, style) = outlined(schema);
    ctx.doc.draw_rect(ctx.page, frame.x, frame.y, frame.width, frame.height, &style)?;
    Ok(())
}

pub(crate) fn render_ellipse(ctx: &mut RenderContext<'_>, schema: &Schema) -> Result<()> {
    let (frame, style) = outlined(schema);
    ctx.doc.draw_ellipse(ctx.page, frame.x, frame.y, frame.width, frame.height, &style)?;
    Ok(())
}

/// Outline width for marks, scaled with the box
fn mark_line_width(frame: Frame) -> f64 {
    (frame.width.min(frame.height) / 12.0).max(0.5)
}

/// Square box, with a tick when checked
pub(crate) fn render_checkbox(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    let color = color_prop(schema, "color").unwrap_or_default();
    let outer = Frame::from_schema(schema);
    let width = mark_line_width(outer);
    let frame = outer.inset(width / 2.0);

    ctx.doc.draw_rect(
        ctx.page,
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        &ShapeStyle::stroked(color, width),
    )?;

    if is_checked(value) {
        let at = |fx: f64, fy: f64| (frame.x + frame.width * fx, frame.y + frame.height * fy);
        ctx.doc.draw_line(ctx.page, at(0.2, 0.55), at(0.42, 0.77), width * 1.5, color)?;
        ctx.doc.draw_line(ctx.page, at(0.42, 0.77), at(0.8, 0.25), width * 1.5, color)?;
    }
    Ok(())
}

/// Circle, with a filled dot when selected
pub(crate) fn render_radio(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    let color: Color = color_prop(schema, "color").unwrap_or_default();
    let outer = Frame::from_schema(schema);
    let width = mark_line_width(outer);
    let frame = outer.inset(width / 2.0);

    ctx.doc.draw_ellipse(
        ctx.page,
        frame.x,
        frame.y,
        frame.width,
        frame.height,
        &ShapeStyle::stroked(color, width),
    )?;

    if is_checked(value) {
        let dot = outer.inset(outer.width.min(outer.height) / 4.0);
        let style = ShapeStyle::filled(color);
        ctx.doc.draw_ellipse(ctx.page, dot.x, dot.y, dot.width, dot.height, &style)?;
    }
    Ok(())
}

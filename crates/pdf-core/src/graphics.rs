//! Path drawing operators (lines, rectangles, ellipses)

use crate::document::Color;

/// Bezier control point factor for approximating a quarter circle
const KAPPA: f64 = 0.552_284_749_8;

/// Fill and stroke settings for a shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeStyle {
    /// Interior color, `None` leaves the shape unfilled
    pub fill: Option<Color>,
    /// Outline color, `None` draws no outline
    pub stroke: Option<Color>,
    /// Outline width in points
    pub line_width: f64,
}

impl ShapeStyle {
    /// Filled shape without an outline
    pub fn filled(color: Color) -> Self {
        Self {
            fill: Some(color),
            stroke: None,
            line_width: 0.0,
        }
    }

    /// Outlined shape without a fill
    pub fn stroked(color: Color, line_width: f64) -> Self {
        Self {
            fill: None,
            stroke: Some(color),
            line_width,
        }
    }

    /// Painting operator for the current path, or `n` when nothing is painted
    fn paint_operator(&self) -> &'static str {
        match (self.fill.is_some(), self.stroke.is_some() && self.line_width > 0.0) {
            (true, true) => "B",
            (true, false) => "f",
            (false, true) => "S",
            (false, false) => "n",
        }
    }

    fn state_operators(&self, ops: &mut String) {
        if let Some(fill) = self.fill {
            ops.push_str(&format!("{} {} {} rg\n", fill.r, fill.g, fill.b));
        }
        if let Some(stroke) = self.stroke {
            ops.push_str(&format!("{} {} {} RG\n", stroke.r, stroke.g, stroke.b));
            ops.push_str(&format!("{:.3} w\n", self.line_width));
        }
    }
}

/// Rectangle with lower-left corner at (`x`, `y`) in PDF user space
pub(crate) fn rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    style: &ShapeStyle,
) -> Vec<u8> {
    let mut ops = String::from("q\n");
    style.state_operators(&mut ops);
    ops.push_str(&format!("{x:.3} {y:.3} {width:.3} {height:.3} re\n"));
    ops.push_str(style.paint_operator());
    ops.push_str("\nQ\n");
    ops.into_bytes()
}

/// Straight line between two points in PDF user space
pub(crate) fn line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    width: f64,
    color: Color,
) -> Vec<u8> {
    let mut ops = String::from("q\n");
    ops.push_str(&format!("{} {} {} RG\n", color.r, color.g, color.b));
    ops.push_str(&format!("{width:.3} w\n"));
    ops.push_str(&format!("{x1:.3} {y1:.3} m\n{x2:.3} {y2:.3} l\nS\nQ\n"));
    ops.into_bytes()
}

/// Ellipse centred at (`cx`, `cy`) in PDF user space, built from four Bezier arcs
pub(crate) fn ellipse_operators(cx: f64, cy: f64, rx: f64, ry: f64, style: &ShapeStyle) -> Vec<u8> {
    let ox = rx * KAPPA;
    let oy = ry * KAPPA;

    let mut ops = String::from("q\n");
    style.state_operators(&mut ops);
    ops.push_str(&format!("{:.3} {:.3} m\n", cx + rx, cy));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx + rx,
        cy + oy,
        cx + ox,
        cy + ry,
        cx,
        cy + ry
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - ox,
        cy + ry,
        cx - rx,
        cy + oy,
        cx - rx,
        cy
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx - rx,
        cy - oy,
        cx - ox,
        cy - ry,
        cx,
        cy - ry
    ));
    ops.push_str(&format!(
        "{:.3} {:.3} {:.3} {:.3} {:.3} {:.3} c\n",
        cx + ox,
        cy - ry,
        cx + rx,
        cy - oy,
        cx + rx,
        cy
    ));
    ops.push_str("h\n");
    ops.push_str(style.paint_operator());
    ops.push_str("\nQ\n");
    ops.into_bytes()
}

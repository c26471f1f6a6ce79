//! Text rendering utilities

use crate::document::Color;

/// Generate PDF operators for a single line of text
///
/// `x`/`y` are PDF user-space coordinates of the baseline start.
pub(crate) fn generate_text_operators(
    text_hex: &str,
    x: f64,
    y: f64,
    font_resource: &str,
    font_size: f64,
    color: Color,
) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("BT\n");
    ops.push_str(&format!("{} {} {} rg\n", color.r, color.g, color.b));
    ops.push_str(&format!("/{font_resource} {font_size} Tf\n"));
    ops.push_str(&format!("{x:.3} {y:.3} Td\n"));
    ops.push_str(&format!("{text_hex} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

/// Split text into lines no wider than `max_width`
///
/// Explicit newlines always break. Words are separated on whitespace; a
/// single word wider than `max_width` is placed on its own line rather than
/// split. `measure` returns the width of a string in the same unit as
/// `max_width`. A non-positive `max_width` disables wrapping.
pub fn wrap_to_width<F>(text: &str, max_width: f64, measure: F) -> Vec<String>
where
    F: Fn(&str) -> f64,
{
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        if max_width <= 0.0 {
            lines.push(paragraph.to_string());
            continue;
        }

        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
                continue;
            }
            let candidate = format!("{current} {word}");
            if measure(&candidate) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

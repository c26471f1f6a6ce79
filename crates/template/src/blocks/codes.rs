//! Machine-readable codes: QR, EAN-13 and Code 128

use super::{color_prop, Frame, RenderContext};
use crate::plugins::PluginKind;
use crate::schema::Schema;
use crate::{Result, TemplateError};
use image::{DynamicImage, ImageFormat, Rgb};
use pdf_core::{Color, ShapeStyle};
use qrcode::QrCode;
use std::io::Cursor;

/// Render a QR code as a PNG stretched over the schema box
pub(crate) fn render_qrcode(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    let dark = color_prop(schema, "barColor").unwrap_or_default();
    let light = color_prop(schema, "backgroundColor").unwrap_or_else(Color::white);
    let png = generate_qr_image(value, dark, light)?;

    let frame = Frame::from_schema(schema);
    ctx.doc
        .insert_image(ctx.page, &png, frame.x, frame.y, frame.width, frame.height)?;
    Ok(())
}

fn to_rgb8(color: Color) -> Rgb<u8> {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgb([channel(color.r), channel(color.g), channel(color.b)])
}

/// Generate QR code image as PNG bytes
fn generate_qr_image(data: &str, dark: Color, light: Color) -> Result<Vec<u8>> {
    let code = QrCode::new(data.as_bytes())
        .map_err(|e| TemplateError::RenderError(format!("QR code: {e}")))?;

    let image = code
        .render::<Rgb<u8>>()
        .dark_color(to_rgb8(dark))
        .light_color(to_rgb8(light))
        .min_dimensions(200, 200)
        .build();

    let mut bytes: Vec<u8> = Vec::new();
    DynamicImage::ImageRgb8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| TemplateError::RenderError(format!("QR code: {e}")))?;
    Ok(bytes)
}

/// Render an EAN-13 or Code 128 barcode as vector bars
///
/// Values the symbology cannot encode are skipped with a warning.
pub(crate) fn render_barcode(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    kind: PluginKind,
    value: &str,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }

    let modules = match kind {
        PluginKind::Ean13 => encode_ean13(value),
        _ => encode_code128(value),
    };
    let Some(modules) = modules else {
        tracing::warn!(kind = kind.type_name(), value, "value cannot be encoded, skipping barcode");
        return Ok(());
    };

    let frame = Frame::from_schema(schema);
    if let Some(background) = color_prop(schema, "backgroundColor") {
        let style = ShapeStyle::filled(background);
        ctx.doc.draw_rect(ctx.page, frame.x, frame.y, frame.width, frame.height, &style)?;
    }

    let bar = ShapeStyle::filled(color_prop(schema, "barColor").unwrap_or_default());
    let module_width = frame.width / modules.len() as f64;
    for (start, len) in bar_runs(&modules) {
        ctx.doc.draw_rect(
            ctx.page,
            frame.x + start as f64 * module_width,
            frame.y,
            len as f64 * module_width,
            frame.height,
            &bar,
        )?;
    }
    Ok(())
}

/// `(start, length)` of each run of dark modules
fn bar_runs(modules: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &dark) in modules.iter().enumerate() {
        match (dark, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - s));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, modules.len() - s));
    }
    runs
}

const EAN_L: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];
const EAN_G: [&str; 10] = [
    "0100111", "0110011", "0011011", "0100001", "0011101", "0111001", "0000101", "0010001",
    "0001001", "0010111",
];
const EAN_R: [&str; 10] = [
    "1110010", "1100110", "1101100", "1000010", "1011100", "1001110", "1010000", "1000100",
    "1001000", "1110100",
];
/// L/G parity of the left half, selected by the first digit
const EAN_PARITY: [&str; 10] = [
    "LLLLLL", "LLGLGG", "LLGGLG", "LLGGGL", "LGLLGG", "LGGLLG", "LGGGLG", "LGLGLG", "LGLGGL",
    "LGGLGL",
];

fn ean13_check_digit(digits: &[u8]) -> u8 {
    let sum: u32 = digits
        .iter()
        .take(12)
        .enumerate()
        .map(|(i, &d)| d as u32 * if i % 2 == 0 { 1 } else { 3 })
        .sum();
    ((10 - sum % 10) % 10) as u8
}

/// 95 modules for 12 digits (check digit appended) or 13 with a valid check digit
pub(crate) fn encode_ean13(value: &str) -> Option<Vec<bool>> {
    let mut digits: Vec<u8> = value
        .trim()
        .chars()
        .map(|c| c.to_digit(10).map(|d| d as u8))
        .collect::<Option<_>>()?;

    match digits.len() {
        12 => digits.push(ean13_check_digit(&digits)),
        13 if digits[12] == ean13_check_digit(&digits) => {}
        _ => return None,
    }

    let mut pattern = String::with_capacity(95);
    pattern.push_str("101");
    let parity = EAN_PARITY[digits[0] as usize].as_bytes();
    for (i, &d) in digits[1..7].iter().enumerate() {
        let table = if parity[i] == b'L' { &EAN_L } else { &EAN_G };
        pattern.push_str(table[d as usize]);
    }
    pattern.push_str("01010");
    for &d in &digits[7..13] {
        pattern.push_str(EAN_R[d as usize]);
    }
    pattern.push_str("101");

    Some(pattern.bytes().map(|b| b == b'1').collect())
}

/// Bar/space widths for Code 128 symbols 0..=106
const CODE128_PATTERNS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", "132212",
    "221213", "221312", "231212", "112232", "122132", "122231", "113222", "123122", "123221",
    "223211", "221132", "221231", "213212", "223112", "312131", "311222", "321122", "321221",
    "312212", "322112", "322211", "212123", "212321", "232121", "111323", "131123", "131321",
    "112313", "132113", "132311", "211313", "231113", "231311", "112133", "112331", "132131",
    "113123", "113321", "133121", "313121", "211331", "231131", "213113", "213311", "213131",
    "311123", "311321", "331121", "312113", "312311", "332111", "314111", "221411", "431111",
    "111224", "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114",
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", "111242",
    "121142", "121241", "114212", "124112", "124211", "411212", "421112", "421211", "212141",
    "214121", "412121", "111143", "111341", "131141", "114113", "114311", "411113", "411311",
    "113141", "114131", "311141", "411131", "211412", "211214", "211232", "2331112",
];
const CODE128_START_B: usize = 104;
const CODE128_STOP: usize = 106;

/// Code set B modules for printable ASCII input
pub(crate) fn encode_code128(value: &str) -> Option<Vec<bool>> {
    let values: Vec<usize> = value
        .chars()
        .map(|c| match c {
            ' '..='\u{7f}' => Some(c as usize - 32),
            _ => None,
        })
        .collect::<Option<_>>()?;

    let checksum = values
        .iter()
        .enumerate()
        .fold(CODE128_START_B, |acc, (i, v)| acc + v * (i + 1))
        % 103;

    let mut symbols = Vec::with_capacity(values.len() + 3);
    symbols.push(CODE128_START_B);
    symbols.extend(values);
    symbols.push(checksum);
    symbols.push(CODE128_STOP);

    let mut modules = Vec::new();
    for symbol in symbols {
        for (i, width) in CODE128_PATTERNS[symbol].bytes().enumerate() {
            let dark = i % 2 == 0;
            modules.extend(std::iter::repeat(dark).take((width - b'0') as usize));
        }
    }
    Some(modules)
}

//! Image and signature kinds

use super::{Frame, RenderContext};
use crate::schema::Schema;
use crate::{Result, TemplateError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Embed a PNG/JPEG data URL stretched over the schema box
///
/// Values that are not data URLs (remote URLs, SVG markup) are skipped.
pub(crate) fn render_image(
    ctx: &mut RenderContext<'_>,
    schema: &Schema,
    value: &str,
) -> Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    let Some(bytes) = decode_data_url(value)? else {
        tracing::warn!(kind = %schema.kind, "value is not a base64 data URL, skipping image");
        return Ok(());
    };

    let frame = Frame::from_schema(schema);
    ctx.doc
        .insert_image(ctx.page, &bytes, frame.x, frame.y, frame.width, frame.height)?;
    Ok(())
}

/// Payload of a `data:<mime>;base64,` URL, `None` for any other string
fn decode_data_url(value: &str) -> Result<Option<Vec<u8>>> {
    let Some((_, payload)) = value
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(";base64,"))
    else {
        return Ok(None);
    };

    STANDARD
        .decode(payload.trim())
        .map(Some)
        .map_err(|e| TemplateError::RenderError(format!("Invalid image data URL: {e}")))
}

//! Structural template validation

use crate::schema::{BasePdf, Template};
use crate::{Result, TemplateError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashSet;

/// Validate a parsed template
///
/// Every problem found is collected and reported in a single
/// [`TemplateError::InvalidTemplate`] message, separated by `; `.
pub fn check_template(template: &Template) -> Result<()> {
    let mut problems = Vec::new();

    if template.schemas.is_empty() {
        problems.push("template must have at least one page".to_string());
    }

    match &template.base_pdf {
        BasePdf::Blank(blank) => {
            if !(blank.width.is_finite() && blank.width > 0.0) {
                problems.push(format!("basePdf.width must be positive, got {}", blank.width));
            }
            if !(blank.height.is_finite() && blank.height > 0.0) {
                problems.push(format!("basePdf.height must be positive, got {}", blank.height));
            }
            if blank.padding.iter().any(|p| !p.is_finite() || *p < 0.0) {
                problems.push(format!(
                    "basePdf.padding must be non-negative, got {:?}",
                    blank.padding
                ));
            }
        }
        BasePdf::Pdf(data) => {
            if let Err(e) = decode_base_pdf(data) {
                problems.push(e.to_string());
            }
        }
    }

    let mut seen = HashSet::new();
    for (page_index, page) in template.schemas.iter().enumerate() {
        let page_no = page_index + 1;
        for (name, schema) in page.named() {
            let label = if name.is_empty() {
                format!("page {page_no}: unnamed schema")
            } else {
                format!("page {page_no}: schema \"{name}\"")
            };

            if name.is_empty() {
                problems.push(format!("{label} must have a name"));
            } else if !seen.insert(name) {
                problems.push(format!("{label} has a duplicate name"));
            }
            if schema.kind.trim().is_empty() {
                problems.push(format!("{label} must have a type"));
            }
            if !(schema.position.x.is_finite() && schema.position.y.is_finite()) {
                problems.push(format!("{label} has a non-finite position"));
            }
            for (field, value) in [("width", schema.width), ("height", schema.height)] {
                if !value.is_finite() || value < 0.0 {
                    problems.push(format!("{label} {field} must be non-negative, got {value}"));
                }
            }
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(TemplateError::InvalidTemplate(problems.join("; ")))
    }
}

/// Decode a base PDF given as a data URL or bare base64
pub fn decode_base_pdf(data: &str) -> Result<Vec<u8>> {
    let payload = match data.strip_prefix("data:") {
        Some(rest) => match rest.split_once(";base64,") {
            Some((_, payload)) => payload,
            None => {
                return Err(TemplateError::InvalidTemplate(
                    "basePdf data URL must be base64 encoded".to_string(),
                ))
            }
        },
        None => data,
    };

    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|e| TemplateError::InvalidTemplate(format!("basePdf is not valid base64: {e}")))?;
    if bytes.is_empty() {
        return Err(TemplateError::InvalidTemplate("basePdf is empty".to_string()));
    }
    Ok(bytes)
}

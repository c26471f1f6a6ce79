//! Template JSON schema types
//!
//! Field names follow the pdfme JSON format (`basePdf`, `readOnly`, ...).
//! Properties this crate does not model are kept in `properties` /
//! `extra` so a template survives a load/save cycle unchanged.

use crate::{Result, TemplateError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top-level template descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// One entry per page
    pub schemas: Vec<SchemaPage>,

    /// Blank page geometry or an existing PDF
    pub base_pdf: BasePdf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdfme_version: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Template {
    /// Parse a template from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Convert an already-parsed JSON value into a template
    ///
    /// Shape mismatches (missing `basePdf`, a schema without `position`, ...)
    /// are reported as [`TemplateError::InvalidTemplate`].
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| TemplateError::InvalidTemplate(e.to_string()))
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Every schema on every page, paired with its field name
    pub fn named_schemas(&self) -> impl Iterator<Item = (&str, &Schema)> {
        self.schemas.iter().flat_map(SchemaPage::named)
    }
}

/// Page background: a blank sheet or an existing PDF
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BasePdf {
    Blank(BlankPdf),
    /// `data:application/pdf;base64,...` or bare base64
    Pdf(String),
}

/// Blank page geometry in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlankPdf {
    pub width: f64,
    pub height: f64,
    /// `[top, right, bottom, left]`
    pub padding: [f64; 4],

    /// `staticSchema` and anything else carried alongside the geometry
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlankPdf {
    pub fn new(width: f64, height: f64, padding: [f64; 4]) -> Self {
        Self {
            width,
            height,
            padding,
            extra: Map::new(),
        }
    }
}

/// Schemas for a single page
///
/// pdfme moved from a keyed object to a list of named schemas; both are
/// accepted and written back in the form they were read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaPage {
    List(Vec<Schema>),
    Keyed(BTreeMap<String, Schema>),
}

impl Default for SchemaPage {
    fn default() -> Self {
        SchemaPage::List(Vec::new())
    }
}

impl SchemaPage {
    /// Schemas in drawing order with their field names
    ///
    /// List entries without a `name` yield an empty string.
    pub fn named(&self) -> Vec<(&str, &Schema)> {
        match self {
            SchemaPage::List(list) => list
                .iter()
                .map(|schema| (schema.name.as_deref().unwrap_or(""), schema))
                .collect(),
            SchemaPage::Keyed(map) => {
                map.iter().map(|(name, schema)| (name.as_str(), schema)).collect()
            }
        }
    }

    pub fn len(&self) -> usize {
        match self {
            SchemaPage::List(list) => list.len(),
            SchemaPage::Keyed(map) => map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Position in millimetres from the top-left corner of the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single field on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Field name; absent in the keyed page form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Plugin type, e.g. "text" or "qrcode"
    #[serde(rename = "type")]
    pub kind: String,

    pub position: Position,
    pub width: f64,
    pub height: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    /// Default value, or the fixed value of a read-only field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,

    /// Plugin-specific properties (`fontName`, `fontSize`, `color`, ...)
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Schema {
    /// Schema of `kind` with the given box and no extra properties
    pub fn new(kind: &str, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            name: None,
            kind: kind.to_string(),
            position: Position { x, y },
            width,
            height,
            rotate: None,
            opacity: None,
            content: None,
            read_only: None,
            required: None,
            properties: Map::new(),
        }
    }

    /// Builder-style property setter
    pub fn with_prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    pub fn with_content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only.unwrap_or(false)
    }

    pub fn prop(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// String property; empty strings count as unset
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.prop(key).and_then(Value::as_str).filter(|s| !s.is_empty())
    }

    pub fn prop_f64(&self, key: &str) -> Option<f64> {
        self.prop(key).and_then(Value::as_f64)
    }

    /// String property nested one level down, e.g. `headStyles.fontColor`
    pub fn nested_str(&self, key: &str, field: &str) -> Option<&str> {
        self.prop(key)
            .and_then(|v| v.get(field))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn nested_f64(&self, key: &str, field: &str) -> Option<f64> {
        self.prop(key).and_then(|v| v.get(field)).and_then(Value::as_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_list_page_with_unknown_props() {
        let value = json!({
            "schemas": [[{
                "name": "title",
                "type": "text",
                "position": {"x": 10, "y": 20},
                "width": 100,
                "height": 10,
                "fontSize": 18,
                "customFlag": {"nested": true}
            }]],
            "basePdf": {"width": 210, "height": 297, "padding": [0, 0, 0, 0]},
            "pdfmeVersion": "4.0.0",
            "author": "me"
        });

        let template = Template::from_value(value.clone()).unwrap();
        let (name, schema) = template.named_schemas().next().unwrap();
        assert_eq!(name, "title");
        assert_eq!(schema.prop_f64("fontSize"), Some(18.0));
        assert_eq!(template.extra.get("author"), Some(&json!("me")));

        let reparsed = Template::from_json(&template.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, template);
        assert_eq!(
            reparsed.schemas[0].named()[0].1.prop("customFlag"),
            Some(&json!({"nested": true}))
        );
    }

    #[test]
    fn test_keyed_page_is_preserved() {
        let value = json!({
            "schemas": [{
                "b": {"type": "text", "position": {"x": 0, "y": 0}, "width": 10, "height": 10},
                "a": {"type": "qrcode", "position": {"x": 0, "y": 20}, "width": 10, "height": 10}
            }],
            "basePdf": {"width": 100, "height": 100, "padding": [0, 0, 0, 0]}
        });

        let template = Template::from_value(value).unwrap();
        assert!(matches!(template.schemas[0], SchemaPage::Keyed(_)));
        let names: Vec<&str> = template.named_schemas().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["a", "b"]);

        let json = template.to_json().unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert!(back["schemas"][0].is_object());
    }

    #[test]
    fn test_empty_page_object() {
        let template = Template::from_json(
            r#"{"schemas":[{}],"basePdf":{"width":210,"height":297,"padding":[20,10,20,10]}}"#,
        )
        .unwrap();
        assert_eq!(template.schemas.len(), 1);
        assert!(template.schemas[0].is_empty());
        assert_eq!(
            template.to_json().unwrap(),
            concat!(
                r#"{"schemas":[{}],"#,
                r#""basePdf":{"width":210.0,"height":297.0,"padding":[20.0,10.0,20.0,10.0]}}"#
            )
        );
    }

    #[test]
    fn test_base_pdf_string() {
        let template =
            Template::from_json(r#"{"schemas":[[]],"basePdf":"data:application/pdf;base64,AAAA"}"#)
                .unwrap();
        assert_eq!(
            template.base_pdf,
            BasePdf::Pdf("data:application/pdf;base64,AAAA".to_string())
        );
    }

    #[test]
    fn test_shape_errors_are_invalid_template() {
        let result = Template::from_json(r#"{"schemas":[[{"type":"text"}]],"basePdf":"x"}"#);
        assert!(matches!(result, Err(TemplateError::InvalidTemplate(_))));

        let result = Template::from_json("{not json");
        assert!(matches!(result, Err(TemplateError::JsonError(_))));
    }

    #[test]
    fn test_prop_helpers() {
        let schema = Schema::new("table", 0.0, 0.0, 10.0, 10.0)
            .with_prop("fontName", "")
            .with_prop("headStyles", json!({"fontColor": "#ffffff", "fontSize": 9}));
        assert_eq!(schema.prop_str("fontName"), None);
        assert_eq!(schema.nested_str("headStyles", "fontColor"), Some("#ffffff"));
        assert_eq!(schema.nested_f64("headStyles", "fontSize"), Some(9.0));
        assert!(!schema.is_read_only());
    }
}

//! Field types the renderer knows how to draw

use crate::schema::Schema;
use serde_json::json;
use std::collections::BTreeMap;

/// A schema `type` understood by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginKind {
    Text,
    MultiVariableText,
    Table,
    Line,
    Rectangle,
    Ellipse,
    Image,
    Svg,
    Signature,
    QrCode,
    DateTime,
    Date,
    Time,
    Select,
    Checkbox,
    RadioGroup,
    Ean13,
    Code128,
}

impl PluginKind {
    pub const ALL: [PluginKind; 18] = [
        PluginKind::Text,
        PluginKind::MultiVariableText,
        PluginKind::Table,
        PluginKind::Line,
        PluginKind::Rectangle,
        PluginKind::Ellipse,
        PluginKind::Image,
        PluginKind::Svg,
        PluginKind::Signature,
        PluginKind::QrCode,
        PluginKind::DateTime,
        PluginKind::Date,
        PluginKind::Time,
        PluginKind::Select,
        PluginKind::Checkbox,
        PluginKind::RadioGroup,
        PluginKind::Ean13,
        PluginKind::Code128,
    ];

    /// Value of the schema `type` field
    pub fn type_name(self) -> &'static str {
        match self {
            PluginKind::Text => "text",
            PluginKind::MultiVariableText => "multiVariableText",
            PluginKind::Table => "table",
            PluginKind::Line => "line",
            PluginKind::Rectangle => "rectangle",
            PluginKind::Ellipse => "ellipse",
            PluginKind::Image => "image",
            PluginKind::Svg => "svg",
            PluginKind::Signature => "signature",
            PluginKind::QrCode => "qrcode",
            PluginKind::DateTime => "dateTime",
            PluginKind::Date => "date",
            PluginKind::Time => "time",
            PluginKind::Select => "select",
            PluginKind::Checkbox => "checkbox",
            PluginKind::RadioGroup => "radioGroup",
            PluginKind::Ean13 => "ean13",
            PluginKind::Code128 => "code128",
        }
    }

    /// Label shown in the designer's field list
    pub fn label(self) -> &'static str {
        match self {
            PluginKind::Text => "Text",
            PluginKind::MultiVariableText => "Multi-Variable Text",
            PluginKind::Table => "Table",
            PluginKind::Line => "Line",
            PluginKind::Rectangle => "Rectangle",
            PluginKind::Ellipse => "Ellipse",
            PluginKind::Image => "Image",
            PluginKind::Svg => "SVG",
            PluginKind::Signature => "Signature",
            PluginKind::QrCode => "QR",
            PluginKind::DateTime => "DateTime",
            PluginKind::Date => "Date",
            PluginKind::Time => "Time",
            PluginKind::Select => "Select",
            PluginKind::Checkbox => "Checkbox",
            PluginKind::RadioGroup => "RadioGroup",
            PluginKind::Ean13 => "EAN13",
            PluginKind::Code128 => "Code128",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.type_name() == name)
    }

    /// Whether schemas of this kind draw text
    pub fn uses_font(self) -> bool {
        matches!(
            self,
            PluginKind::Text
                | PluginKind::MultiVariableText
                | PluginKind::Table
                | PluginKind::DateTime
                | PluginKind::Date
                | PluginKind::Time
                | PluginKind::Select
        )
    }
}

/// A field type offered to template authors
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    pub kind: PluginKind,
    /// Schema inserted when the field is added to a page
    pub default_schema: Schema,
}

impl Plugin {
    pub fn new(kind: PluginKind) -> Self {
        Self {
            kind,
            default_schema: default_schema(kind),
        }
    }
}

/// Label to plugin
pub type Plugins = BTreeMap<String, Plugin>;

/// Every built-in plugin, keyed by label
pub fn builtin_plugins() -> Plugins {
    PluginKind::ALL
        .into_iter()
        .map(|kind| (kind.label().to_string(), Plugin::new(kind)))
        .collect()
}

fn default_schema(kind: PluginKind) -> Schema {
    let text = |width: f64, height: f64| {
        Schema::new(kind.type_name(), 0.0, 0.0, width, height)
            .with_prop("alignment", "left")
            .with_prop("verticalAlignment", "top")
            .with_prop("fontSize", 13)
            .with_prop("lineHeight", 1)
            .with_prop("fontColor", "#000000")
            .with_prop("backgroundColor", "")
    };

    match kind {
        PluginKind::Text => text(45.0, 10.0).with_content("Type Something..."),
        PluginKind::MultiVariableText => text(45.0, 10.0)
            .with_prop("text", "Add text here using {} for variables")
            .with_prop("variables", json!([]))
            .with_content("{}"),
        PluginKind::DateTime => text(45.0, 10.0).with_prop("format", "yyyy/MM/dd HH:mm"),
        PluginKind::Date => text(35.0, 10.0).with_prop("format", "yyyy/MM/dd"),
        PluginKind::Time => text(35.0, 10.0).with_prop("format", "HH:mm"),
        PluginKind::Select => text(45.0, 10.0)
            .with_prop("options", json!(["option1", "option2"]))
            .with_content("option1"),
        PluginKind::Table => Schema::new(kind.type_name(), 0.0, 0.0, 150.0, 20.0)
            .with_prop("head", json!(["Name", "City", "Description"]))
            .with_prop("headWidthPercentages", json!([30, 30, 40]))
            .with_prop("tableStyles", json!({"borderWidth": 0.3, "borderColor": "#000000"}))
            .with_prop(
                "headStyles",
                json!({"fontSize": 13, "fontColor": "#ffffff", "backgroundColor": "#2980ba"}),
            )
            .with_prop("bodyStyles", json!({"fontSize": 13, "fontColor": "#000000"}))
            .with_content(
                r#"[["Alice","New York","Alice is a freelance web designer and developer"]]"#,
            ),
        PluginKind::Line => {
            Schema::new(kind.type_name(), 0.0, 0.0, 50.0, 1.0).with_prop("color", "#000000")
        }
        PluginKind::Rectangle | PluginKind::Ellipse => {
            Schema::new(kind.type_name(), 0.0, 0.0, 62.5, 37.5)
                .with_prop("borderWidth", 1)
                .with_prop("borderColor", "#000000")
                .with_prop("color", "")
        }
        PluginKind::Image | PluginKind::Signature => {
            Schema::new(kind.type_name(), 0.0, 0.0, 62.5, 37.5)
        }
        PluginKind::Svg => Schema::new(kind.type_name(), 0.0, 0.0, 40.0, 40.0),
        PluginKind::QrCode => Schema::new(kind.type_name(), 0.0, 0.0, 30.0, 30.0)
            .with_prop("backgroundColor", "#ffffff")
            .with_prop("barColor", "#000000")
            .with_content("https://pdfme.com/"),
        PluginKind::Ean13 => Schema::new(kind.type_name(), 0.0, 0.0, 35.0, 16.0)
            .with_prop("backgroundColor", "#ffffff")
            .with_prop("barColor", "#000000")
            .with_content("2112345678900"),
        PluginKind::Code128 => Schema::new(kind.type_name(), 0.0, 0.0, 40.0, 16.0)
            .with_prop("backgroundColor", "#ffffff")
            .with_prop("barColor", "#000000")
            .with_content("pdfme"),
        PluginKind::Checkbox | PluginKind::RadioGroup => {
            Schema::new(kind.type_name(), 0.0, 0.0, 8.0, 8.0)
                .with_prop("color", "#000000")
                .with_content("false")
        }
    }
}

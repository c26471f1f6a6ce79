//! Font registry

use crate::plugins::PluginKind;
use crate::schema::Template;
use crate::{Result, TemplateError};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Name of the font every registry starts with
pub const DEFAULT_FONT_NAME: &str = "Roboto";

/// Where the default font is downloaded from
pub const DEFAULT_FONT_URL: &str =
    "https://fonts.gstatic.com/s/roboto/v30/KFOmCnqEu92Fr1Me5WZLCzYlKw.ttf";

/// Font payload: raw TrueType bytes or a URL still to be fetched
#[derive(Clone, PartialEq, Eq)]
pub enum FontSource {
    Data(Vec<u8>),
    Url(String),
}

impl fmt::Debug for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Data(bytes) => write!(f, "Data({} bytes)", bytes.len()),
            FontSource::Url(url) => f.debug_tuple("Url").field(url).finish(),
        }
    }
}

/// A registry entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontEntry {
    pub data: FontSource,
    /// Used for any schema that names no font (or an unknown one)
    pub fallback: bool,
    pub subset: bool,
}

impl FontEntry {
    pub fn url(url: impl Into<String>) -> Self {
        Self {
            data: FontSource::Url(url.into()),
            fallback: false,
            subset: true,
        }
    }

    pub fn data(bytes: Vec<u8>) -> Self {
        Self {
            data: FontSource::Data(bytes),
            fallback: false,
            subset: true,
        }
    }

    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Font name to entry
pub type Font = BTreeMap<String, FontEntry>;

/// The registry generation starts from: Roboto as the fallback
pub fn default_font() -> Font {
    let mut font = Font::new();
    font.insert(
        DEFAULT_FONT_NAME.to_string(),
        FontEntry::url(DEFAULT_FONT_URL).with_fallback(true),
    );
    font
}

/// Name of the single fallback entry
pub(crate) fn fallback_name(font: &Font) -> Result<&str> {
    let fallbacks: Vec<&str> = font
        .iter()
        .filter(|(_, entry)| entry.fallback)
        .map(|(name, _)| name.as_str())
        .collect();

    match fallbacks.as_slice() {
        [name] => Ok(*name),
        [] => Err(TemplateError::FontError(
            "fallback flag is not found in font. true fallback flag must be only one.".to_string(),
        )),
        many => Err(TemplateError::FontError(format!(
            "{} fallback flags found in font ({}). true fallback flag must be only one.",
            many.len(),
            many.join(", ")
        ))),
    }
}

/// Check the registry against the template
///
/// Exactly one entry must be the fallback, and every `fontName` the
/// template refers to must be registered.
pub fn check_font(font: &Font, template: &Template) -> Result<()> {
    fallback_name(font)?;

    let missing: BTreeSet<&str> = template
        .named_schemas()
        .filter_map(|(_, schema)| schema.prop_str("fontName"))
        .filter(|name| !font.contains_key(*name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        let names: Vec<&str> = missing.into_iter().collect();
        Err(TemplateError::FontError(format!(
            "{} of template.schemas is not found in font.",
            names.join(", ")
        )))
    }
}

/// Registry names rendering `template` will draw with
///
/// The fallback is included whenever any schema draws text. Empty when the
/// template has no text at all.
pub fn fonts_in_use(font: &Font, template: &Template) -> Result<BTreeSet<String>> {
    let fallback = fallback_name(font)?;
    let mut names = BTreeSet::new();

    for (_, schema) in template.named_schemas() {
        let draws_text =
            PluginKind::from_type_name(&schema.kind).is_some_and(PluginKind::uses_font);
        if !draws_text {
            continue;
        }
        names.insert(fallback.to_string());
        if let Some(name) = schema.prop_str("fontName").filter(|n| font.contains_key(*n)) {
            names.insert(name.to_string());
        }
    }

    Ok(names)
}

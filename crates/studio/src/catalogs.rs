//! Static catalogs and small helpers for the studio UI

use crate::config::resolve_url;
use crate::template_io::parse_template_json;
use crate::{Result, StudioError};
use template::{
    builtin_plugins, BasePdf, BlankPdf, Plugin, PluginKind, Plugins, SchemaPage, Template,
};

/// A UI language choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translation {
    pub value: &'static str,
    pub label: &'static str,
}

const TRANSLATIONS: [Translation; 11] = [
    Translation { value: "en", label: "English" },
    Translation { value: "zh", label: "Chinese" },
    Translation { value: "ko", label: "Korean" },
    Translation { value: "ja", label: "Japanese" },
    Translation { value: "ar", label: "Arabic" },
    Translation { value: "th", label: "Thai" },
    Translation { value: "pl", label: "Polish" },
    Translation { value: "it", label: "Italian" },
    Translation { value: "de", label: "German" },
    Translation { value: "fr", label: "French" },
    Translation { value: "es", label: "Spanish" },
];

/// Languages the UI can be shown in
pub fn translations() -> &'static [Translation] {
    &TRANSLATIONS
}

/// Field types offered in the designer, keyed by label
pub fn get_plugins() -> Plugins {
    builtin_plugins()
}

/// Field types in the order the designer lists them
pub fn plugin_catalog() -> Vec<(&'static str, Plugin)> {
    PluginKind::ALL
        .into_iter()
        .map(|kind| (kind.label(), Plugin::new(kind)))
        .collect()
}

/// A4 portrait with one empty page
pub fn get_blank_template() -> Template {
    Template {
        schemas: vec![SchemaPage::Keyed(Default::default())],
        base_pdf: BasePdf::Blank(BlankPdf::new(210.0, 297.0, [20.0, 10.0, 20.0, 10.0])),
        pdfme_version: None,
        extra: Default::default(),
    }
}

/// `invoice-simple` -> `Invoice Simple`
pub fn from_kebab_case(s: &str) -> String {
    s.split('-')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn is_json_string(s: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(s).is_ok()
}

/// Bundled templates served under `<base>/template-assets/<id>/template.json`
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl TemplateCatalog {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    /// URL of a bundled template
    pub fn template_url(&self, id: &str) -> String {
        resolve_url(&self.base_url, &format!("/template-assets/{id}/template.json"))
    }

    /// Fetch, parse and validate a bundled template
    pub async fn get_template_by_id(&self, id: &str) -> Result<Template> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(StudioError::InvalidArgument(format!(
                "invalid template id {id:?}"
            )));
        }

        let url = self.template_url(id);
        tracing::debug!(url, "fetching template");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StudioError::TemplateFetch {
                url,
                status: status.as_u16(),
            });
        }
        parse_template_json(&response.text().await?)
    }
}

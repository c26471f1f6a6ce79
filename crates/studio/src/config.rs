//! Studio configuration
//!
//! Settings are read from a JSON file (`studio.json` by default). Every field
//! has a default, so a partial file only overrides what it names. A missing
//! file yields the defaults; an unparsable one is reported and ignored.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "studio.json";

/// A named font file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FontSpec {
    /// Name the font is registered under (what `fontName` refers to)
    pub name: String,
    /// Absolute URL, or a path resolved against `asset_base_url`
    pub url: String,
}

impl FontSpec {
    pub fn new(name: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Studio settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StudioConfig {
    /// Origin the app's static assets are served from
    pub asset_base_url: String,
    /// Fonts downloaded up front and embedded as bytes
    pub local_fonts: Vec<FontSpec>,
    /// Fonts registered by URL and only downloaded when a template uses them
    pub remote_fonts: Vec<FontSpec>,
    /// `/Title` of generated documents, also the presented file name
    pub document_title: String,
    /// Language used when the UI options carry none
    pub default_lang: String,
    /// Where generated PDFs are written
    pub output_dir: PathBuf,
    /// Where template downloads are written
    pub download_dir: PathBuf,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            asset_base_url: "http://localhost:3000".to_string(),
            local_fonts: vec![
                FontSpec::new("Tinos-Regular", "/assets/fonts/tinos/Tinos-Regular.ttf"),
                FontSpec::new("Tinos-Bold", "/assets/fonts/tinos/Tinos-Bold.ttf"),
            ],
            remote_fonts: vec![
                FontSpec::new(
                    "NotoSerifJP",
                    concat!(
                        "https://fonts.gstatic.com/s/notoserifjp/v30/",
                        "xn71YHs72GKoTvER4Gn3b5eMRtWGkp6o7MjQ2bwxOubAILO5wBCU.ttf"
                    ),
                ),
                FontSpec::new(
                    "NotoSansJP",
                    concat!(
                        "https://fonts.gstatic.com/s/notosansjp/v53/",
                        "-F6jfjtqLzI2JPCgQBnw7HFyzSD-AsregP8VFBEj75vY0rw-oME.ttf"
                    ),
                ),
                FontSpec::new(
                    "PinyonScript-Regular",
                    concat!(
                        "https://fonts.gstatic.com/s/pinyonscript/v22/",
                        "6xKpdSJbL9-e9LuoeQiDRQR8aOLQO4bhiDY.ttf"
                    ),
                ),
            ],
            document_title: "pdfme".to_string(),
            default_lang: "en".to_string(),
            output_dir: PathBuf::from("."),
            download_dir: PathBuf::from("."),
        }
    }
}

impl StudioConfig {
    /// Load settings from `path`, or return defaults if the file doesn't exist
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::parse_or_default(&content, path))
    }

    fn parse_or_default(content: &str, path: &Path) -> Self {
        match serde_json::from_str::<StudioConfig>(content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to parse {}, using defaults: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Resolve an asset path against a base URL
///
/// Absolute `http(s)://` URLs are returned unchanged.
pub(crate) fn resolve_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

//! Font loading
//!
//! Builds the font registry handed to the generator: the default font, the
//! configured remote fonts (registered by URL) and the local fonts
//! (downloaded and registered as bytes).

use crate::config::{resolve_url, FontSpec, StudioConfig};
use crate::{Result, StudioError};
use std::collections::BTreeSet;
use template::{default_font, Font, FontEntry, FontSource};
use tokio::task::JoinSet;

/// Source of the font registry used for generation
#[allow(async_fn_in_trait)]
pub trait FontProvider {
    async fn fonts(&self) -> Result<Font>;
}

/// Downloads fonts over HTTP
#[derive(Debug, Clone)]
pub struct FontLoader {
    client: reqwest::Client,
    asset_base_url: String,
    local_fonts: Vec<FontSpec>,
    remote_fonts: Vec<FontSpec>,
}

impl FontLoader {
    pub fn new(config: &StudioConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    pub fn with_client(client: reqwest::Client, config: &StudioConfig) -> Self {
        Self {
            client,
            asset_base_url: config.asset_base_url.clone(),
            local_fonts: config.local_fonts.clone(),
            remote_fonts: config.remote_fonts.clone(),
        }
    }

    /// Fetch a font file
    ///
    /// A non-success status is an error, never a payload.
    pub async fn load_font_as_bytes(&self, url: &str) -> Result<Vec<u8>> {
        fetch_bytes(&self.client, url).await
    }

    /// Default font plus the configured remote and local fonts
    ///
    /// Local fonts are downloaded concurrently; the first failure is
    /// returned and the remaining downloads are dropped.
    pub async fn get_fonts_data(&self) -> Result<Font> {
        let mut downloads = JoinSet::new();
        for (index, spec) in self.local_fonts.iter().enumerate() {
            let client = self.client.clone();
            let url = resolve_url(&self.asset_base_url, &spec.url);
            downloads.spawn(async move { (index, fetch_bytes(&client, &url).await) });
        }

        let mut local: Vec<Option<Vec<u8>>> = vec![None; self.local_fonts.len()];
        while let Some(joined) = downloads.join_next().await {
            let (index, bytes) = joined.map_err(|e| {
                StudioError::Generation(format!("font download task failed: {e}"))
            })?;
            local[index] = Some(bytes?);
        }

        let mut font = default_font();
        for spec in &self.remote_fonts {
            font.insert(spec.name.clone(), FontEntry::url(spec.url.clone()));
        }
        for (spec, bytes) in self.local_fonts.iter().zip(local) {
            if let Some(bytes) = bytes {
                font.insert(spec.name.clone(), FontEntry::data(bytes));
            }
        }

        tracing::debug!(fonts = font.len(), "font registry ready");
        Ok(font)
    }

    /// Replace the URL entries named in `names` with their downloaded bytes
    pub async fn resolve_urls(&self, font: &mut Font, names: &BTreeSet<String>) -> Result<()> {
        for name in names {
            let Some(entry) = font.get_mut(name) else {
                continue;
            };
            if let FontSource::Url(url) = &entry.data {
                let url = resolve_url(&self.asset_base_url, url);
                entry.data = FontSource::Data(self.load_font_as_bytes(&url).await?);
            }
        }
        Ok(())
    }
}

impl FontProvider for FontLoader {
    async fn fonts(&self) -> Result<Font> {
        self.get_fonts_data().await
    }
}

async fn fetch_bytes(client: &reqwest::Client, url: &str) -> Result<Vec<u8>> {
    tracing::debug!(url, "fetching font");
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(StudioError::FontFetch {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}

//! Reading user-selected files

use crate::{Result, StudioError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::{Path, PathBuf};

/// A file picked by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectedFile {
    /// Upload already held in memory
    Memory {
        name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
    /// File on disk
    Path(PathBuf),
}

impl SelectedFile {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        SelectedFile::Path(path.into())
    }

    pub fn from_bytes(name: &str, bytes: Vec<u8>) -> Self {
        SelectedFile::Memory {
            name: name.to_string(),
            mime: None,
            bytes,
        }
    }

    pub fn name(&self) -> String {
        match self {
            SelectedFile::Memory { name, .. } => name.clone(),
            SelectedFile::Path(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// MIME type, guessed from the extension when not given
    pub fn mime(&self) -> String {
        match self {
            SelectedFile::Memory { mime: Some(mime), .. } => mime.clone(),
            SelectedFile::Memory { name, .. } => guess_mime(Path::new(name)).to_string(),
            SelectedFile::Path(path) => guess_mime(path).to_string(),
        }
    }

    async fn bytes(&self) -> Result<Vec<u8>> {
        match self {
            SelectedFile::Memory { bytes, .. } => Ok(bytes.clone()),
            SelectedFile::Path(path) => {
                tracing::debug!(path = %path.display(), "reading file");
                Ok(tokio::fs::read(path).await?)
            }
        }
    }
}

fn guess_mime(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "json" => "application/json",
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "svg" => "image/svg+xml",
        "ttf" => "font/ttf",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// How file contents are returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    Text,
    DataUrl,
    Binary,
}

/// File contents in the requested form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    Text(String),
    DataUrl(String),
    Binary(Vec<u8>),
}

impl FileContent {
    /// Text or data URL contents
    pub fn into_string(self) -> Option<String> {
        match self {
            FileContent::Text(s) | FileContent::DataUrl(s) => Some(s),
            FileContent::Binary(_) => None,
        }
    }
}

/// Read a selected file
///
/// `None` (nothing selected) fails immediately. Text is decoded as UTF-8
/// with invalid sequences replaced and a leading byte order mark dropped.
pub async fn read_file(file: Option<&SelectedFile>, mode: ReadMode) -> Result<FileContent> {
    let file = file.ok_or_else(|| StudioError::InvalidArgument("no file selected".to_string()))?;
    let bytes = file.bytes().await?;

    Ok(match mode {
        ReadMode::Text => {
            let text = String::from_utf8_lossy(&bytes);
            FileContent::Text(text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string())
        }
        ReadMode::DataUrl => {
            FileContent::DataUrl(format!("data:{};base64,{}", file.mime(), STANDARD.encode(&bytes)))
        }
        ReadMode::Binary => FileContent::Binary(bytes),
    })
}

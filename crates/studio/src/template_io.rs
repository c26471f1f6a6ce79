//! Loading templates from files and saving them as JSON downloads

use crate::file_reader::{read_file, ReadMode, SelectedFile};
use crate::handle::TemplateHandle;
use crate::notify::Notifier;
use crate::{Result, StudioError};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use template::{check_template, Template};

/// Alert shown when a selected template file is rejected
pub const INVALID_TEMPLATE_ALERT: &str = "Invalid template file.\n--------------------------\n";

/// Parse and validate template JSON
pub fn parse_template_json(text: &str) -> Result<Template> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let template = Template::from_value(value).map_err(StudioError::from_template_load)?;
    check_template(&template).map_err(StudioError::from_template_load)?;
    Ok(template)
}

/// Read a selected file as a template
pub async fn parse_template_from_file(file: &SelectedFile) -> Result<Template> {
    let text = read_file(Some(file), ReadMode::Text)
        .await?
        .into_string()
        .unwrap_or_default();
    let template = parse_template_json(&text)?;
    tracing::debug!(file = %file.name(), pages = template.schemas.len(), "parsed template");
    Ok(template)
}

/// Write `data` as compact JSON to `<dir>/<title>.json`
///
/// The content goes to a temporary file in `dir` first and is moved into
/// place once fully written.
pub fn download_as_json_file<T: Serialize + ?Sized>(
    data: &T,
    title: &str,
    dir: &Path,
) -> Result<PathBuf> {
    if title.is_empty() || title.contains(['/', '\\']) {
        return Err(StudioError::InvalidArgument(format!("invalid download title {title:?}")));
    }
    let json = serde_json::to_string(data)?;

    std::fs::create_dir_all(dir)?;
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(json.as_bytes())?;
    file.flush()?;

    let path = dir.join(format!("{title}.json"));
    file.persist(&path).map_err(|e| StudioError::Io(e.error))?;
    tracing::info!(path = %path.display(), bytes = json.len(), "saved template download");
    Ok(path)
}

/// What `handle_load_template` did
#[derive(Debug)]
pub enum LoadOutcome {
    /// No file was selected
    NoFile,
    /// The template replaced the handle's template
    Loaded,
    /// The template was valid but no UI instance is live
    NoTarget,
    /// The file was rejected and the user alerted
    Rejected(StudioError),
}

/// Load the first selected file into the live UI instance
///
/// On failure the user gets exactly one alert and the handle is left
/// untouched.
pub async fn handle_load_template(
    files: &[SelectedFile],
    target: Option<&dyn TemplateHandle>,
    notifier: &dyn Notifier,
) -> LoadOutcome {
    let Some(file) = files.first() else {
        return LoadOutcome::NoFile;
    };

    match parse_template_from_file(file).await {
        Ok(template) => match target {
            Some(handle) => {
                handle.update_template(template);
                tracing::info!(file = %file.name(), "template loaded");
                LoadOutcome::Loaded
            }
            None => LoadOutcome::NoTarget,
        },
        Err(e) => {
            tracing::error!(file = %file.name(), error = %e, "rejected template file");
            notifier.alert(&format!("{INVALID_TEMPLATE_ALERT}{e}"));
            LoadOutcome::Rejected(e)
        }
    }
}

//! User-facing outputs: alerts and presented documents

use crate::{Result, StudioError};
use std::path::PathBuf;

/// Shows a blocking message to the user
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// Prints alerts to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}

/// Hands a generated PDF to the user, returning where it can be found
#[allow(async_fn_in_trait)]
pub trait DocumentPresenter {
    async fn present(&self, pdf: Vec<u8>, title: &str) -> Result<PathBuf>;
}

/// Writes generated PDFs into a directory as `<title>.pdf`
#[derive(Debug, Clone)]
pub struct DirectoryPresenter {
    dir: PathBuf,
}

impl DirectoryPresenter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DocumentPresenter for DirectoryPresenter {
    async fn present(&self, pdf: Vec<u8>, title: &str) -> Result<PathBuf> {
        if title.is_empty() || title.contains(['/', '\\']) {
            return Err(StudioError::InvalidArgument(format!("invalid document title {title:?}")));
        }
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{title}.pdf"));
        tokio::fs::write(&path, &pdf).await?;
        tracing::info!(path = %path.display(), bytes = pdf.len(), "presented pdf");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_directory_presenter_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = DirectoryPresenter::new(dir.path().join("out"));
        let path = presenter.present(b"%PDF-1.7".to_vec(), "pdfme").await.unwrap();
        assert_eq!(path, dir.path().join("out").join("pdfme.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_title_with_separator_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let presenter = DirectoryPresenter::new(dir.path());
        let result = presenter.present(Vec::new(), "../escape").await;
        assert!(matches!(result, Err(StudioError::InvalidArgument(_))));
    }
}

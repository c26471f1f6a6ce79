//! Template Studio - helpers behind a pdfme template editor
//!
//! This crate provides:
//! - Font loading over HTTP (`FontLoader`)
//! - Reading user-selected files as text, data URLs or bytes (`read_file`)
//! - Template loading, validation and JSON downloads (`template_io`)
//! - The "generate PDF" flow with alerts and state (`GenerationOrchestrator`)
//! - Static catalogs: plugins, UI languages, the blank template, bundled templates
//!
//! # Example
//!
//! ```ignore
//! use template_studio::{Form, GenerationOrchestrator, StderrNotifier, StudioConfig, UiOptions};
//!
//! let config = StudioConfig::load(Path::new("studio.json")).await?;
//! let orchestrator = GenerationOrchestrator::from_config(&config, StderrNotifier);
//! let form = Form::new(template, inputs, UiOptions::with_lang("en"));
//! let pdf_path = orchestrator.generate_pdf(Some(&form)).await?;
//! ```

pub mod catalogs;
pub mod config;
mod error;
pub mod file_reader;
pub mod fonts;
pub mod generate;
pub mod handle;
pub mod notify;
pub mod template_io;

pub use catalogs::{
    from_kebab_case, get_blank_template, get_plugins, is_json_string, plugin_catalog, translations,
    TemplateCatalog, Translation,
};
pub use config::{FontSpec, StudioConfig, CONFIG_FILE_NAME};
pub use error::{Result, StudioError};
pub use file_reader::{read_file, FileContent, ReadMode, SelectedFile};
pub use fonts::{FontLoader, FontProvider};
pub use generate::{
    EngineGenerator, GenerationOrchestrator, GenerationRequest, GenerationState, Generator,
};
pub use handle::{Designer, Form, TemplateHandle, UiOptions, Viewer};
pub use notify::{DirectoryPresenter, DocumentPresenter, Notifier, StderrNotifier};
pub use template_io::{
    download_as_json_file, handle_load_template, parse_template_from_file, parse_template_json,
    LoadOutcome,
};

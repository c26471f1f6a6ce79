//! PDF generation flow
//!
//! [`GenerationOrchestrator`] reads the live UI instance, waits for the font
//! registry, runs a [`Generator`] and hands the bytes to a presenter. Any
//! failure along the way becomes a single alert and is returned to the caller.

use crate::catalogs::get_plugins;
use crate::config::StudioConfig;
use crate::fonts::{FontLoader, FontProvider};
use crate::handle::TemplateHandle;
use crate::notify::{DirectoryPresenter, DocumentPresenter, Notifier};
use crate::{Result, StudioError};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use template::{
    fonts_in_use, generate, get_input_from_template, Font, GenerateOptions, GenerateProps, Inputs,
    Plugins, Template,
};

/// Suffix appended to every generation alert
pub const GENERATION_ALERT_SUFFIX: &str = "\n\nCheck the log output for details";

/// Where a generation run is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    LoadingFonts,
    Generating,
    Displaying,
    Failed,
}

/// Everything a generator is given
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub template: Template,
    pub inputs: Vec<Inputs>,
    pub font: Font,
    pub lang: String,
    pub title: String,
    pub plugins: Plugins,
}

/// Turns a request into PDF bytes
#[allow(async_fn_in_trait)]
pub trait Generator {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<u8>>;
}

/// Generator backed by the `template` crate
///
/// URL font entries the template draws with are downloaded first; the
/// rendering itself runs on the blocking pool.
#[derive(Debug, Clone)]
pub struct EngineGenerator {
    loader: FontLoader,
}

impl EngineGenerator {
    pub fn new(loader: FontLoader) -> Self {
        Self { loader }
    }
}

impl Generator for EngineGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<u8>> {
        let GenerationRequest {
            template,
            inputs,
            mut font,
            lang,
            title,
            plugins,
        } = request;

        let needed = fonts_in_use(&font, &template)?;
        self.loader.resolve_urls(&mut font, &needed).await?;

        let props = GenerateProps {
            template,
            inputs,
            options: GenerateOptions { font, lang, title },
            plugins,
        };
        let pdf = tokio::task::spawn_blocking(move || generate(&props))
            .await
            .map_err(|e| StudioError::Generation(format!("generation task failed: {e}")))??;
        Ok(pdf)
    }
}

/// Drives one "generate PDF" action end to end
pub struct GenerationOrchestrator<F, G, N, P> {
    fonts: F,
    generator: G,
    notifier: N,
    presenter: P,
    title: String,
    default_lang: String,
    state: Mutex<GenerationState>,
}

impl<F, G, N, P> GenerationOrchestrator<F, G, N, P>
where
    F: FontProvider,
    G: Generator,
    N: Notifier,
    P: DocumentPresenter,
{
    pub fn new(fonts: F, generator: G, notifier: N, presenter: P) -> Self {
        Self {
            fonts,
            generator,
            notifier,
            presenter,
            title: "pdfme".to_string(),
            default_lang: "en".to_string(),
            state: Mutex::new(GenerationState::Idle),
        }
    }

    /// Document title, also the presented file name
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Language used when the UI options carry none
    pub fn with_default_lang(mut self, lang: &str) -> Self {
        self.default_lang = lang.to_string();
        self
    }

    pub fn state(&self) -> GenerationState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn fonts(&self) -> &F {
        &self.fonts
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn set_state(&self, state: GenerationState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
        tracing::debug!(?state, "generation state");
    }

    /// Generate a PDF from the live UI instance and present it
    ///
    /// Without a live instance nothing happens and `Ok(None)` is returned.
    pub async fn generate_pdf(
        &self,
        handle: Option<&dyn TemplateHandle>,
    ) -> Result<Option<PathBuf>> {
        let Some(handle) = handle else {
            return Ok(None);
        };

        match self.run(handle).await {
            Ok(path) => Ok(Some(path)),
            Err(e) => {
                self.set_state(GenerationState::Failed);
                tracing::error!(error = %e, "pdf generation failed");
                self.notifier.alert(&format!("{e}{GENERATION_ALERT_SUFFIX}"));
                Err(e)
            }
        }
    }

    async fn run(&self, handle: &dyn TemplateHandle) -> Result<PathBuf> {
        let template = handle.template();
        let lang = handle.options().lang.unwrap_or_else(|| self.default_lang.clone());
        let inputs = handle
            .inputs()
            .unwrap_or_else(|| get_input_from_template(&template));

        self.set_state(GenerationState::LoadingFonts);
        let font = self.fonts.fonts().await?;

        self.set_state(GenerationState::Generating);
        let pdf = self
            .generator
            .generate(GenerationRequest {
                template,
                inputs,
                font,
                lang,
                title: self.title.clone(),
                plugins: get_plugins(),
            })
            .await?;

        let path = self.presenter.present(pdf, &self.title).await?;
        self.set_state(GenerationState::Displaying);
        tracing::info!(path = %path.display(), "pdf ready");
        Ok(path)
    }
}

impl<N: Notifier> GenerationOrchestrator<FontLoader, EngineGenerator, N, DirectoryPresenter> {
    /// Orchestrator wired to HTTP fonts, the template engine and the output directory
    pub fn from_config(config: &StudioConfig, notifier: N) -> Self {
        let loader = FontLoader::new(config);
        Self::new(
            loader.clone(),
            EngineGenerator::new(loader),
            notifier,
            DirectoryPresenter::new(&config.output_dir),
        )
        .with_title(&config.document_title)
        .with_default_lang(&config.default_lang)
    }
}

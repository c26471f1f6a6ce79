//! The "generate PDF" flow with fake collaborators

mod common;

use common::{dejavu_font, RecordingNotifier};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use template::{default_font, Font, Inputs, Template};
use template_studio::generate::GENERATION_ALERT_SUFFIX;
use template_studio::{
    Designer, DirectoryPresenter, DocumentPresenter, EngineGenerator, FontLoader, FontProvider,
    Form, GenerationOrchestrator, GenerationRequest, GenerationState, Generator, Result,
    StudioConfig, StudioError, UiOptions, Viewer,
};

struct FakeFonts {
    font: Option<Font>,
    calls: AtomicUsize,
}

impl FakeFonts {
    fn with(font: Font) -> Self {
        Self {
            font: Some(font),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            font: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl FontProvider for FakeFonts {
    async fn fonts(&self) -> Result<Font> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.font.clone().ok_or_else(|| StudioError::FontFetch {
            url: "http://localhost:3000/assets/fonts/tinos/Tinos-Bold.ttf".to_string(),
            status: 404,
        })
    }
}

/// Records requests and answers with a fixed result
struct FakeGenerator {
    fail_with: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl FakeGenerator {
    fn ok() -> Self {
        Self {
            fail_with: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }
}

impl Generator for FakeGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<u8>> {
        self.requests.lock().unwrap().push(request);
        match &self.fail_with {
            Some(message) => Err(StudioError::Generation(message.clone())),
            None => Ok(b"%PDF-fake".to_vec()),
        }
    }
}

#[derive(Default)]
struct RecordingPresenter {
    presented: Mutex<Vec<(Vec<u8>, String)>>,
}

impl DocumentPresenter for RecordingPresenter {
    async fn present(&self, pdf: Vec<u8>, title: &str) -> Result<PathBuf> {
        self.presented.lock().unwrap().push((pdf, title.to_string()));
        Ok(PathBuf::from(format!("/tmp/{title}.pdf")))
    }
}

type FakeOrchestrator =
    GenerationOrchestrator<FakeFonts, FakeGenerator, RecordingNotifier, RecordingPresenter>;

fn orchestrator(fonts: FakeFonts, generator: FakeGenerator) -> FakeOrchestrator {
    GenerationOrchestrator::new(
        fonts,
        generator,
        RecordingNotifier::default(),
        RecordingPresenter::default(),
    )
}

fn letter_template() -> Template {
    Template::from_value(json!({
        "schemas": [[
            {"name": "name", "type": "text", "position": {"x": 20, "y": 20},
             "width": 120, "height": 10, "content": "Jane"},
            {"name": "footer", "type": "text", "position": {"x": 20, "y": 270},
             "width": 120, "height": 10, "readOnly": true, "content": "Thank you"}
        ]],
        "basePdf": {"width": 210, "height": 297, "padding": [20, 10, 20, 10]}
    }))
    .unwrap()
}

fn record(name: &str) -> Inputs {
    let mut inputs = Inputs::new();
    inputs.insert("name".to_string(), name.to_string());
    inputs
}

#[tokio::test]
async fn test_no_live_instance_is_a_no_op() {
    let orchestrator = orchestrator(FakeFonts::with(default_font()), FakeGenerator::ok());

    let result = orchestrator.generate_pdf(None).await.unwrap();

    assert_eq!(result, None);
    assert!(orchestrator.notifier().alerts().is_empty());
    assert!(orchestrator.presenter().presented.lock().unwrap().is_empty());
    assert_eq!(orchestrator.fonts().calls(), 0);
    assert_eq!(orchestrator.state(), GenerationState::Idle);
}

#[tokio::test]
async fn test_generator_failure_alerts_once_and_returns_the_error() {
    let orchestrator =
        orchestrator(FakeFonts::with(default_font()), FakeGenerator::failing("boom"));
    let designer = Designer::new(letter_template(), UiOptions::default());

    let err = orchestrator.generate_pdf(Some(&designer)).await.unwrap_err();

    assert!(err.to_string().contains("boom"));
    let alerts = orchestrator.notifier().alerts();
    assert_eq!(alerts, vec![format!("boom{GENERATION_ALERT_SUFFIX}")]);
    assert!(orchestrator.presenter().presented.lock().unwrap().is_empty());
    assert_eq!(orchestrator.state(), GenerationState::Failed);
}

#[tokio::test]
async fn test_font_failure_alerts_and_skips_generation() {
    let orchestrator = orchestrator(FakeFonts::failing(), FakeGenerator::ok());
    let designer = Designer::new(letter_template(), UiOptions::default());

    let err = orchestrator.generate_pdf(Some(&designer)).await.unwrap_err();

    assert!(matches!(err, StudioError::FontFetch { status: 404, .. }));
    let alerts = orchestrator.notifier().alerts();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("HTTP 404"));
    assert!(orchestrator.generator().requests.lock().unwrap().is_empty());
    assert_eq!(orchestrator.state(), GenerationState::Failed);
}

#[tokio::test]
async fn test_designer_inputs_come_from_the_template() {
    let orchestrator = orchestrator(FakeFonts::with(default_font()), FakeGenerator::ok());
    let designer = Designer::new(letter_template(), UiOptions::default());

    let path = orchestrator.generate_pdf(Some(&designer)).await.unwrap();
    assert_eq!(path, Some(PathBuf::from("/tmp/pdfme.pdf")));

    let requests = orchestrator.generator().requests.lock().unwrap();
    let request = &requests[0];
    assert_eq!(request.inputs, vec![record("Jane")]);
    assert_eq!(request.lang, "en");
    assert_eq!(request.title, "pdfme");
    assert_eq!(request.font, default_font());
    assert_eq!(request.plugins.len(), 18);
    assert_eq!(orchestrator.state(), GenerationState::Displaying);
}

#[tokio::test]
async fn test_form_inputs_and_lang_are_passed_through() {
    let orchestrator =
        orchestrator(FakeFonts::with(default_font()), FakeGenerator::ok()).with_title("letters");
    let records = vec![record("Ann"), record("Bo")];
    let form = Form::new(letter_template(), records, UiOptions::with_lang("ja"));

    orchestrator.generate_pdf(Some(&form)).await.unwrap();

    let requests = orchestrator.generator().requests.lock().unwrap();
    assert_eq!(requests[0].inputs, vec![record("Ann"), record("Bo")]);
    assert_eq!(requests[0].lang, "ja");

    let presented = orchestrator.presenter().presented.lock().unwrap();
    assert_eq!(presented.as_slice(), &[(b"%PDF-fake".to_vec(), "letters".to_string())]);
}

#[tokio::test]
async fn test_engine_generator_writes_a_pdf() {
    let dir = tempfile::tempdir().unwrap();
    let loader = FontLoader::with_client(common::client(), &StudioConfig::default());
    let orchestrator = GenerationOrchestrator::new(
        FakeFonts::with(dejavu_font()),
        EngineGenerator::new(loader),
        RecordingNotifier::default(),
        DirectoryPresenter::new(dir.path()),
    )
    .with_default_lang("th");
    let records = vec![record("Ann"), record("Bo")];
    let viewer = Viewer::new(letter_template(), records, UiOptions::default());

    let path = orchestrator.generate_pdf(Some(&viewer)).await.unwrap().unwrap();

    assert_eq!(path, dir.path().join("pdfme.pdf"));
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
    assert!(orchestrator.notifier().alerts().is_empty());
    assert_eq!(orchestrator.state(), GenerationState::Displaying);
}

#[tokio::test]
async fn test_engine_failure_is_reported_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let loader = FontLoader::with_client(common::client(), &StudioConfig::default());
    let orchestrator = GenerationOrchestrator::new(
        FakeFonts::with(dejavu_font()),
        EngineGenerator::new(loader),
        RecordingNotifier::default(),
        DirectoryPresenter::new(dir.path()),
    );
    let mut template = letter_template();
    template.schemas[0] = serde_json::from_value(json!([
        {"name": "chart", "type": "chart", "position": {"x": 0, "y": 0}, "width": 10, "height": 10}
    ]))
    .unwrap();
    let designer = Designer::new(template, UiOptions::default());

    let err = orchestrator.generate_pdf(Some(&designer)).await.unwrap_err();

    assert_eq!(err.to_string(), "Renderer for type chart not found");
    assert_eq!(
        orchestrator.notifier().alerts(),
        vec![format!("Renderer for type chart not found{GENERATION_ALERT_SUFFIX}")]
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

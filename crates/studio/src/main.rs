use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use template::{Inputs, Template};
use template_studio::{
    download_as_json_file, get_blank_template, parse_template_from_file, plugin_catalog,
    translations, Designer, Form, GenerationOrchestrator, SelectedFile, StderrNotifier,
    StudioConfig, TemplateCatalog, UiOptions, CONFIG_FILE_NAME,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "template-studio", version, about = "Load, check and render pdfme templates")]
struct Cli {
    /// Settings file
    #[arg(long, global = true, default_value = CONFIG_FILE_NAME)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a template to PDF
    Generate {
        template: PathBuf,
        /// JSON array of input records; derived from the template when omitted
        #[arg(long)]
        inputs: Option<PathBuf>,
        #[arg(long)]
        lang: Option<String>,
        /// Output directory, overriding the settings file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check a template file
    Validate { template: PathBuf },
    /// Write the blank A4 template as `<title>.json`
    Blank {
        #[arg(long, default_value = "template")]
        title: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Fetch a bundled template and save it as `<id>.json`
    Fetch {
        id: String,
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// List the field types
    Plugins,
    /// List the UI languages
    Languages,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = StudioConfig::load(&cli.config).await?;

    match cli.command {
        Command::Generate {
            template,
            inputs,
            lang,
            out,
        } => {
            let template = load_template(&template).await?;
            let inputs = match inputs {
                Some(path) => Some(load_inputs(&path).await?),
                None => None,
            };
            if let Some(out) = out {
                config.output_dir = out;
            }
            let options = match lang {
                Some(lang) => UiOptions::with_lang(&lang),
                None => UiOptions::default(),
            };

            let orchestrator = GenerationOrchestrator::from_config(&config, StderrNotifier);
            let path = match inputs {
                Some(inputs) => {
                    let form = Form::new(template, inputs, options);
                    orchestrator.generate_pdf(Some(&form)).await?
                }
                None => {
                    let designer = Designer::new(template, options);
                    orchestrator.generate_pdf(Some(&designer)).await?
                }
            };
            if let Some(path) = path {
                println!("{}", path.display());
            }
        }
        Command::Validate { template } => {
            // loading validates
            let template = load_template(&template).await?;
            let fields: usize = template.schemas.iter().map(|page| page.len()).sum();
            println!("ok: {} page(s), {} field(s)", template.schemas.len(), fields);
        }
        Command::Blank { title, dir } => {
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            let path = download_as_json_file(&get_blank_template(), &title, &dir)?;
            println!("{}", path.display());
        }
        Command::Fetch { id, dir } => {
            let catalog = TemplateCatalog::new(&config.asset_base_url);
            let template = catalog
                .get_template_by_id(&id)
                .await
                .with_context(|| format!("fetching template {id}"))?;
            let dir = dir.unwrap_or_else(|| config.download_dir.clone());
            let path = download_as_json_file(&template, &id, &dir)?;
            println!("{}", path.display());
        }
        Command::Plugins => {
            for (label, plugin) in plugin_catalog() {
                println!("{label}\t{}", plugin.kind.type_name());
            }
        }
        Command::Languages => {
            for translation in translations() {
                println!("{}\t{}", translation.value, translation.label);
            }
        }
    }

    Ok(())
}

async fn load_template(path: &Path) -> anyhow::Result<Template> {
    let file = SelectedFile::from_path(path);
    parse_template_from_file(&file)
        .await
        .with_context(|| format!("loading {}", path.display()))
}

async fn load_inputs(path: &Path) -> anyhow::Result<Vec<Inputs>> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    let inputs: Vec<Inputs> =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    if inputs.is_empty() {
        bail!("{} contains no input records", path.display());
    }
    Ok(inputs)
}

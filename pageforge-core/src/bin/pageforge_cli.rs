//! PageForge CLI
//!
//! Commands: industries, validate, resolve, preview, export, serve
//! Outputs JSON to stdout (preview prints HTML), logs to stderr
//! Returns 1 on usage/config errors, 2 on validation or export failure

use base64::Engine;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use url::Url;

use pageforge_core::{
    catalog::{Catalog, CatalogError},
    resolver::fingerprint,
    server::{self, AppState},
    BlueprintResolver, BuilderState, ExportPipeline, HttpFetcher, PipelineConfig, PreviewQuery,
    RenderedFrame, Renderer, SectionEntry,
};

#[derive(Parser)]
#[command(name = "pageforge-cli")]
#[command(about = "PageForge CLI - Landing Page Composer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Catalog directory (catalog.json, families/, industries/); built-in catalog when omitted
    #[arg(short, long, global = true)]
    catalog_dir: Option<PathBuf>,

    /// Export pipeline timing file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List industries
    Industries,

    /// Run the catalog validation pass
    Validate,

    /// Resolve an industry's section list
    Resolve {
        #[arg(short, long)]
        industry: String,
    },

    /// Render the preview page to stdout
    Preview {
        #[arg(short, long)]
        industry: String,

        #[arg(long)]
        header: Option<String>,

        #[arg(long)]
        fonts: Option<String>,

        #[arg(long)]
        colors: Option<String>,

        /// JSON array of {component, variant} entries
        #[arg(short, long)]
        blueprint: Option<String>,
    },

    /// Export a standalone HTML file
    Export {
        #[arg(short, long)]
        industry: String,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Preview server used for relative assets and the fallback fetch
        #[arg(long, default_value = "http://127.0.0.1:4000/")]
        preview_base: Url,

        /// Print the artifact as JSON (base64 body) instead of writing a file
        #[arg(long)]
        json: bool,
    },

    /// Serve the preview route
    Serve {
        #[arg(short, long, default_value = "127.0.0.1:4000")]
        addr: SocketAddr,
    },
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => println!(r#"{{"error": "Failed to encode output: {}"}}"#, e),
    }
}

fn fail(code: u8, error: impl std::fmt::Display) -> ExitCode {
    print_json(&serde_json::json!({ "success": false, "error": error.to_string() }));
    ExitCode::from(code)
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let Cli { command, catalog_dir, config } = Cli::parse();

    match command {
        // Reports an invalid catalog instead of refusing to start.
        Commands::Validate => validate(catalog_dir.as_deref()),
        command => {
            let catalog = match load_catalog(catalog_dir.as_deref()) {
                Ok(c) => Arc::new(c),
                Err(e) => return fail(1, format!("Failed to load catalog: {}", e)),
            };
            let renderer = match Renderer::new() {
                Ok(r) => Arc::new(r),
                Err(e) => return fail(1, e),
            };
            run(command, catalog, renderer, config).await
        }
    }
}

fn load_catalog(dir: Option<&Path>) -> Result<Catalog, CatalogError> {
    match dir {
        Some(dir) => Catalog::load_from_dir(dir),
        None => Catalog::builtin(),
    }
}

fn validate(dir: Option<&Path>) -> ExitCode {
    match load_catalog(dir) {
        Ok(catalog) => report_validation(&catalog.validation),
        Err(CatalogError::Invalid(result)) => report_validation(&result),
        Err(e) => fail(1, e),
    }
}

async fn run(command: Commands, catalog: Arc<Catalog>, renderer: Arc<Renderer>, config: Option<PathBuf>) -> ExitCode {
    match command {
        Commands::Validate => report_validation(&catalog.validation),

        Commands::Industries => {
            print_json(&serde_json::json!(catalog.industries.summaries()));
            ExitCode::SUCCESS
        }

        Commands::Resolve { industry } => {
            let resolver = BlueprintResolver::new(&catalog);
            match resolver.resolve(&industry) {
                Ok(sections) => {
                    let fp = fingerprint(&sections).unwrap_or_default();
                    print_json(&serde_json::json!({
                        "industry": industry,
                        "fingerprint": fp,
                        "sections": sections,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(1, e),
            }
        }

        Commands::Preview { industry, header, fonts, colors, blueprint } => {
            let blueprint = match blueprint.as_deref().map(serde_json::from_str::<Vec<SectionEntry>>).transpose() {
                Ok(b) => b,
                Err(e) => return fail(1, format!("Invalid blueprint: {}", e)),
            };
            let query = PreviewQuery { industry, header, fonts, colors, blueprint };
            match pageforge_core::preview::render_preview(&catalog, &renderer, &query) {
                Ok(html) => {
                    println!("{}", html);
                    ExitCode::SUCCESS
                }
                Err(e) => fail(1, e),
            }
        }

        Commands::Export { industry, out, preview_base, json } => {
            let config = match &config {
                Some(path) => match PipelineConfig::load(path) {
                    Ok(c) => c,
                    Err(e) => return fail(1, format!("Failed to load config: {}", e)),
                },
                None => PipelineConfig::default(),
            };

            let mut state = match BuilderState::new(catalog.clone(), &industry) {
                Ok(s) => s,
                Err(e) => return fail(1, e),
            };

            let client = reqwest::Client::new();
            let frame = match RenderedFrame::from_state(&state, &renderer, &config, client.clone(), Some(&preview_base)) {
                Ok(f) => f,
                Err(e) => return fail(1, e),
            };

            let pipeline = ExportPipeline::new(config, Box::new(HttpFetcher::new(client)));
            let artifact = match pipeline.export(&mut state, &frame, &preview_base).await {
                Ok(a) => a,
                Err(e) => return fail(2, e),
            };

            if json {
                let body = base64::engine::general_purpose::STANDARD.encode(artifact.html.as_bytes());
                print_json(&serde_json::json!({
                    "success": true,
                    "artifact": artifact,
                    "dataBase64": body,
                }));
                return ExitCode::SUCCESS;
            }

            match artifact.write_to(&out) {
                Ok(path) => {
                    print_json(&serde_json::json!({
                        "success": true,
                        "path": path,
                        "artifact": artifact,
                    }));
                    ExitCode::SUCCESS
                }
                Err(e) => fail(2, e),
            }
        }

        Commands::Serve { addr } => {
            let state = AppState { catalog, renderer };
            match server::serve(addr, state).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => fail(1, e),
            }
        }
    }
}

fn report_validation(result: &pageforge_core::ValidationResult) -> ExitCode {
    match serde_json::to_value(result) {
        Ok(v) => print_json(&v),
        Err(e) => return fail(1, e),
    }
    if result.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    }
}

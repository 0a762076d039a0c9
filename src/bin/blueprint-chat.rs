//! CLI binary for blueprint-chat.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServiceConfig` and runs the HTTP server.

use anyhow::{Context, Result};
use blueprint_chat::{serve, ServiceConfig};
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default port with Gemini
  export GEMINI_API_KEY=...
  blueprint-chat

  # Bind elsewhere, keep images in a scratch directory
  blueprint-chat --port 9000 --image-dir /tmp/blueprint-images

  # Use a specific provider and model
  blueprint-chat --provider openai --model gpt-4.1

  # Verbose request tracing
  blueprint-chat --verbose

ENDPOINTS:
  POST /api/upload               multipart PDF upload ("file" field)
  POST /api/chat                 {"message": ..., "document_id": ...}
  GET  /api/document/{id}/pages  per-page summaries
  GET  /api/health               liveness probe

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (preferred for drawings)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  PDFIUM_LIB_PATH         Path to an existing libpdfium

SETUP:
  1. Set an API key:   export GEMINI_API_KEY=...
  2. Serve:            blueprint-chat
  3. Upload a plan:    curl -F file=@plans.pdf localhost:8000/api/upload
"#;

/// Chat with construction-drawing PDFs over HTTP.
#[derive(Parser, Debug)]
#[command(
    name = "blueprint-chat",
    version,
    about = "Chat with construction-drawing PDFs using Vision LLMs",
    long_about = "Serve an HTTP API that ingests construction-drawing PDFs (floor plans, \
elevations, sections, details) and answers questions about them using a Vision Language \
Model. Supports Google Gemini, OpenAI, and Anthropic providers.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind.
    #[arg(long, env = "BLUEPRINT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on.
    #[arg(short, long, env = "BLUEPRINT_PORT", default_value_t = 8000)]
    port: u16,

    /// Directory for rendered page images.
    #[arg(long, env = "BLUEPRINT_IMAGE_DIR", default_value = "temp_images")]
    image_dir: PathBuf,

    /// Vision provider: gemini, openai, anthropic.
    #[arg(
        long,
        env = "BLUEPRINT_PROVIDER",
        long_help = "Vision provider. Auto-detected from API key env vars if not set;\n\
          GEMINI_API_KEY alone selects Gemini with the default model."
    )]
    provider: Option<String>,

    /// Vision model ID (e.g. gemini-2.0-flash, gpt-4.1).
    #[arg(long, env = "BLUEPRINT_MODEL")]
    model: Option<String>,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "BLUEPRINT_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max model output tokens per answer.
    #[arg(long, env = "BLUEPRINT_MAX_TOKENS", default_value_t = 2048)]
    max_tokens: usize,

    /// How many top-ranked pages to send to the model per question.
    #[arg(long, env = "BLUEPRINT_TOP_PAGES", default_value_t = 3)]
    top_pages: usize,

    /// Longest rendered image edge in pixels.
    #[arg(long, env = "BLUEPRINT_MAX_PIXELS", default_value_t = 2000)]
    max_pixels: u32,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "BLUEPRINT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "BLUEPRINT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = ServiceConfig::builder()
        .image_dir(&cli.image_dir)
        .max_rendered_pixels(cli.max_pixels)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .top_pages(cli.top_pages);

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = format!("{}:{}", cli.host, cli.port);
    serve(&addr, config)
        .await
        .with_context(|| format!("Server failed on {addr}"))
}

//! CLI binary for dsegen.
//!
//! A thin shim over the library crate: parses arguments, loads credentials,
//! wires the real generator and exporter, and maps errors to exit code 1.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dsegen::pipeline::llm::UnconfiguredGenerator;
use dsegen::{
    generate_to_file, server, ChromiumExporter, ContentGenerator, Credentials, DsegenError,
    OpenRouterClient, OutputKind,
};
use std::io::{self, BufRead, Write};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Store your OpenRouter API key and default model
  dsegen config

  # Generate a paper on a topic
  dsegen generate "Hong Kong Tourism Industry" paper.pdf

  # Keep the markdown instead
  dsegen generate "Climate change" paper.md

  # Re-render an existing markdown paper (no API call)
  dsegen generate paper.md paper.html

  # Run the HTTP service
  dsegen serve --port 8000

ENVIRONMENT VARIABLES:
  OPENROUTER_API_KEY        OpenRouter API key (overrides the keyring)
  OPENROUTER_DEFAULT_MODEL  Model ID, e.g. openai/gpt-4o-mini
  DSEGEN_WATERMARK          Path to a PNG replacing the built-in watermark

SETUP:
  1. Configure:  dsegen config
  2. Generate:   dsegen generate "Your topic" out.pdf

  PDF output launches a headless Chromium per job; Chrome or Chromium must
  be installed and discoverable on PATH.
"#;

/// Generate DSE English-speaking practice papers with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "dsegen",
    version,
    about = "Generate DSE English-speaking practice papers with an LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "DSEGEN_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "DSEGEN_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a paper for a topic (or re-render an existing .md file).
    #[command(visible_aliases = ["english-speaking", "es"])]
    Generate {
        /// Topic text, or the path to an existing .md paper.
        input: String,
        /// Output file; the extension (.md, .html, .pdf) selects the format.
        output: PathBuf,
    },

    /// Store the OpenRouter API key and default model.
    Config,

    /// Run the HTTP service.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1", env = "DSEGEN_HOST")]
        host: String,
        /// Port to listen on.
        #[arg(long, default_value_t = 8000, env = "DSEGEN_PORT")]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

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

    match cli.command {
        Command::Generate { input, output } => run_generate(&input, &output).await,
        Command::Config => run_config(),
        Command::Serve { host, port } => run_serve(&host, port).await,
    }
}

async fn run_generate(input: &str, output: &Path) -> Result<()> {
    // Fail fast on a bad sink extension and on missing credentials, in that
    // order, before any network call. An existing .md input needs no
    // credentials at all.
    OutputKind::from_path(output)?;

    // Extension-only check: a mistyped .md path should surface as a missing
    // input file from the dispatcher, not as a credentials complaint.
    let input_is_md_file = Path::new(input)
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("md"))
        .unwrap_or(false);

    // Markdown-file jobs never invoke the generator, so they run without
    // credentials; the unconfigured stand-in makes any stray call loud.
    let generator: Box<dyn ContentGenerator> = if input_is_md_file {
        Box::new(UnconfiguredGenerator)
    } else {
        let creds = Credentials::load()?.ok_or(DsegenError::MissingCredentials)?;
        Box::new(OpenRouterClient::new(creds))
    };

    let exporter = ChromiumExporter::new();
    generate_to_file(generator.as_ref(), &exporter, input, output).await?;

    println!(
        "English speaking paper generated and saved to {}",
        output.display()
    );
    Ok(())
}

fn run_config() -> Result<()> {
    let api_key = prompt_line("Enter your OpenRouter API key: ")?;
    let model = prompt_line("Enter your default model: ")?;

    let creds = Credentials { api_key, model };
    creds.save().context("Failed to store credentials")?;

    println!("Configuration updated");
    Ok(())
}

async fn run_serve(host: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?;

    let credentials = Credentials::load()?;
    if credentials.is_none() {
        eprintln!("Warning: no credentials found; 'plain' requests will fail until 'dsegen config' is run.");
    }

    let state = Arc::new(dsegen::AppState::from_credentials(credentials));
    server::serve(addr, state).await?;
    Ok(())
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush().context("Failed to flush stdout")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

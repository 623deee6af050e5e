//! OpenRouter connectivity check
//!
//! Verifies an OpenRouter setup with a plain and a streaming chat completion
//! and prints troubleshooting steps when something fails. Always exits
//! successfully; the outcome is reported on the console.

use anyhow::Result;
use clap::Parser;
use openrouter_check::config::{GuidanceMode, Settings};
use openrouter_check::utils::logging::init_logging;
use openrouter_check::{version_info, Console, OpenRouterProvider, Runner};
use std::path::PathBuf;
use tracing::{error, info};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "openrouter-check", version, about)]
struct Cli {
    /// Env file loaded before configuration is read
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Skip the reachability probe
    #[arg(long)]
    skip_probe: bool,

    /// Model for the non-streaming request
    #[arg(long)]
    model: Option<String>,

    /// Model for the streaming request
    #[arg(long)]
    stream_model: Option<String>,

    /// Classification rules applied to failures
    #[arg(long, value_enum)]
    guidance: Option<GuidanceMode>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    Settings::load_env_file(&cli.env_file);
    let settings = resolve_settings(&cli, |key| std::env::var(key).ok());

    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("{}", e);
    }
    info!("{}", version_info());

    let provider = match OpenRouterProvider::new(&settings.openrouter) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to set up provider: {}", e);
            eprintln!("🚨 Unexpected error: {}", e);
            return Ok(());
        }
    };

    let runner = Runner::new(settings, provider);
    let mut console = Console::stdio();

    if let Err(e) = runner.run(&mut console).await {
        error!("Console output failed: {}", e);
    }

    Ok(())
}

/// Read configuration once, then let command line flags take precedence
fn resolve_settings<F>(cli: &Cli, lookup: F) -> Settings
where
    F: Fn(&str) -> Option<String>,
{
    let mut settings = Settings::from_lookup(lookup);
    apply_overrides(&mut settings, cli);
    settings
}

fn apply_overrides(settings: &mut Settings, cli: &Cli) {
    if cli.skip_probe {
        settings.demo.probe_connectivity = false;
    }
    if let Some(model) = &cli.model {
        settings.demo.model = model.clone();
    }
    if let Some(model) = &cli.stream_model {
        settings.demo.stream_model = model.clone();
    }
    if let Some(mode) = cli.guidance {
        settings.demo.guidance = mode;
    }
}

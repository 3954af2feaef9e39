//! GDNSGDB CLI - inspect a configuration
//!
//! Commands: check, palettes, templates, summary
//! Outputs JSON to stdout, logs to stderr (RUST_LOG)
//! Exit codes: 0 ok, 1 unreadable file, 2 invalid configuration

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use gdnsgdb_core::{ConfigurationModel, ENGINE_VERSION};

#[derive(Parser)]
#[command(name = "gdnsgdb-cli")]
#[command(about = "GDNSGDB CLI - palette and meta template configuration")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the YAML configuration
    #[arg(short, long, default_value = "gdnsgdb.yaml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the configuration and report whether it is valid
    Check,

    /// Print every palette as slot -> #RRGGBB
    Palettes,

    /// Print every meta template descriptor
    Templates,

    /// Print the full model summary
    Summary,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let text = match std::fs::read_to_string(&cli.config) {
        Ok(t) => t,
        Err(e) => {
            let output = serde_json::json!({
                "valid": false,
                "error": format!("Failed to read {}: {}", cli.config.display(), e),
            });
            println!("{}", output);
            return ExitCode::FAILURE;
        }
    };

    let model = match ConfigurationModel::from_yaml(&text) {
        Ok(m) => m,
        Err(e) => {
            let output = serde_json::json!({
                "valid": false,
                "error": e.to_string(),
            });
            println!("{}", output);
            return ExitCode::from(2);
        }
    };

    let summary = model.summary();
    let output = match cli.command {
        Commands::Check => Ok(serde_json::json!({
            "valid": true,
            "engine_version": ENGINE_VERSION,
            "fingerprint": summary.fingerprint,
            "palettes": summary.palettes.len(),
            "meta_templates": summary.meta_templates.len(),
        })),
        Commands::Palettes => serde_json::to_value(&summary.palettes),
        Commands::Templates => serde_json::to_value(&summary.meta_templates),
        Commands::Summary => serde_json::to_value(&summary),
    };

    match output.and_then(|value| serde_json::to_string_pretty(&value)) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize output: {}", e);
            ExitCode::FAILURE
        }
    }
}

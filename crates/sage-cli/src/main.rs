//! Sage CLI — entry point.
//!
//! # Commands
//!
//! - `sage consult --task TASK [--code CODE | --file PATH] ...` — ask a persona
//! - `sage personas` — list the persona catalog
//! - `sage status` — show configuration and provider status

mod consult_cmd;
mod helpers;
mod personas_cmd;
mod status;

use anyhow::Result;
use clap::{Parser, Subcommand};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Sage — persona-driven code analysis over interchangeable LLM providers
#[derive(Parser)]
#[command(name = "sage", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a persona to analyse code or answer a question
    Consult(consult_cmd::ConsultArgs),

    /// List available personas
    Personas,

    /// Show configuration and provider status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Consult(args) => {
            init_logging(args.logs);
            consult_cmd::run(args).await
        }
        Commands::Personas => personas_cmd::run(),
        Commands::Status => status::run(),
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("sage=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! DeployScout CLI - deployment logs from a server-rendered hosting panel.
//!
//! # Examples
//!
//! ```bash
//! # List deployments of the first application found on the dashboard
//! deployscout https://panel.example.com
//!
//! # Same, with the URL taken from DEPLOYSCOUT_URL
//! deployscout deployments
//!
//! # Logs of the latest deployment
//! deployscout logs
//!
//! # Logs of specific deployments of an explicit application
//! deployscout logs p1/e1/a1 abcdefghijklmnopqrstuvwx
//!
//! # JSON output
//! deployscout discover --format json --pretty
//! ```

mod commands;
mod config;
mod output;
mod target;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{deployments, discover, login, logs, projects};
use target::{Command, Invocation};

// ============================================================================
// CLI Definition
// ============================================================================

/// DeployScout CLI - deployment logs from a hosting panel.
#[derive(Parser)]
#[command(name = "deployscout")]
#[command(about = "Fetch deployment logs from a server-rendered hosting panel")]
#[command(long_about = r#"
DeployScout logs in to a hosting panel with a form login, finds the
project, environment and application to inspect, and pulls deployment
logs out of the rendered pages.

Arguments are loose tokens in any order, except that a panel URL is only
recognised first:
  URL                            panel base URL (or DEPLOYSCOUT_URL, PANEL_URL, APP_URL)
  login | projects | discover    command (default: deployments)
  deployments | list | logs
  project/environment/application   skip discovery
  <24-character id>              deployment ids for 'logs'

Credentials come from DEPLOYSCOUT_EMAIL and DEPLOYSCOUT_PASSWORD
(or PANEL_EMAIL and PANEL_PASSWORD).

Each request times out after 30 seconds by default. Use --timeout SECS
(or timeout_secs in the config file) to change it; --timeout 0 waits
as long as the panel takes.

Examples:
  deployscout https://panel.example.com     # Deployments of the first application
  deployscout logs                          # Logs of the latest deployment
  deployscout logs p1/e1/a1 <id> <id>       # Logs of specific deployments
  deployscout projects --format json        # JSON output
"#)]
#[command(version)]
pub struct Cli {
    /// Positional tokens: [URL] [COMMAND] [project/environment/application] [DEPLOYMENT_ID...]
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Accept invalid TLS certificates (self-signed panels).
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (default 30, 0 disables it).
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    /// Print extracted logs in full instead of cutting them for display.
    #[arg(long, global = true)]
    pub full: bool,

    /// Deployment pages fetched at once by 'logs'.
    #[arg(long, value_name = "N", global = true)]
    pub concurrency: Option<usize>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// Configuration, login, discovery or transport failure.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("deployscout=debug,info")
    } else {
        EnvFilter::new("deployscout=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let code = match run(&cli).await {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {e:#}");
            }
            ExitCode::Error
        }
    };

    std::process::exit(code as i32);
}

async fn run(cli: &Cli) -> Result<()> {
    let invocation = Invocation::parse(cli.args.as_slice())?;

    match invocation.command {
        Command::Login => login::run(&invocation, cli).await,
        Command::Projects => projects::run(&invocation, cli).await,
        Command::Discover => discover::run(&invocation, cli).await,
        Command::Deployments => deployments::run(&invocation, cli).await,
        Command::Logs => logs::run(&invocation, cli).await,
    }
}

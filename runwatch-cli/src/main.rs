//! Runwatch CLI
//!
//! Command-line interface for watching and nudging Databricks job runs.

mod commands;
mod config;
mod output;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "runwatch")]
#[command(about = "Watch, start and repair Databricks job runs", long_about = None)]
struct Cli {
    /// Workspace URL
    #[arg(long, global = true, env = "DATABRICKS_HOST")]
    host: Option<String>,

    /// Personal access token
    #[arg(long, global = true, env = "DATABRICKS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Profile to read from the profiles file
    #[arg(long, global = true, env = "DATABRICKS_PROFILE")]
    profile: Option<String>,

    /// Profiles file (default: <config dir>/runwatch/profiles.toml)
    #[arg(long, global = true, env = "RUNWATCH_PROFILES")]
    profiles: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, command output to stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "runwatch_cli=info,runwatch_monitor=info,runwatch_client=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::load(cli.host, cli.token, cli.profile, cli.profiles)?;
    tracing::debug!("Using workspace {}", config.workspace.host);

    handle_command(cli.command, &config).await
}

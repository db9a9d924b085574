//! Run command handlers
//!
//! Listing, inspecting and repairing runs.

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use runwatch_client::DatabricksClient;
use runwatch_core::domain::job::JobId;
use runwatch_core::domain::run::{RunId, RunRecord};

use crate::config::Config;
use crate::output::{print_run_details, print_run_summary, sort_newest_first};

/// Run subcommands
#[derive(Subcommand)]
pub enum RunCommands {
    /// List the runs of a job, newest first
    List {
        /// Job ID
        job_id: i64,

        /// Only show runs that are RUNNING
        #[arg(long)]
        running: bool,
    },
    /// List active runs across the workspace
    Active {
        /// Only show runs created by this user
        #[arg(long)]
        user: Option<String>,
    },
    /// Get run details
    Get {
        /// Run ID
        run_id: i64,
    },
    /// Re-run every failed task of a run
    Repair {
        /// Run ID
        run_id: i64,
    },
}

/// Handle run commands
pub async fn handle_run_command(command: RunCommands, config: &Config) -> Result<()> {
    let client = DatabricksClient::new(&config.workspace)?;

    match command {
        RunCommands::List { job_id, running } => list_runs(&client, JobId(job_id), running).await,
        RunCommands::Active { user } => list_active_runs(&client, user.as_deref()).await,
        RunCommands::Get { run_id } => get_run(&client, RunId(run_id)).await,
        RunCommands::Repair { run_id } => repair_run(&client, RunId(run_id)).await,
    }
}

async fn list_runs(client: &DatabricksClient, job_id: JobId, running: bool) -> Result<()> {
    let runs = if running {
        client.list_running_runs(job_id).await?
    } else {
        client.list_runs(job_id).await?
    };

    print_runs(runs, &format!("for job {}", job_id));
    Ok(())
}

async fn list_active_runs(client: &DatabricksClient, user: Option<&str>) -> Result<()> {
    let runs = client.list_active_runs(user).await?;

    let scope = match user {
        Some(user) => format!("for {}", user),
        None => "in the workspace".to_string(),
    };
    print_runs(runs, &format!("active {}", scope));
    Ok(())
}

async fn get_run(client: &DatabricksClient, run_id: RunId) -> Result<()> {
    let run = client.get_run(run_id).await?;
    print_run_details(&run);
    Ok(())
}

async fn repair_run(client: &DatabricksClient, run_id: RunId) -> Result<()> {
    let repair_id = client.repair_run(run_id, true).await?;

    println!("{}", format!("✓ Repair of run {} submitted", run_id).green());
    if let Some(repair_id) = repair_id {
        println!("  Repair ID: {}", repair_id.to_string().cyan());
    }
    Ok(())
}

fn print_runs(mut runs: Vec<RunRecord>, scope: &str) {
    if runs.is_empty() {
        println!("{}", format!("No runs found {}.", scope).yellow());
        return;
    }

    sort_newest_first(&mut runs);

    println!("{}", format!("Found {} run(s) {}:", runs.len(), scope).bold());
    println!();
    for run in &runs {
        print_run_summary(run);
    }
}

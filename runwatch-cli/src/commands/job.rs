//! Job command handlers

use anyhow::{Context, Result};
use chrono::DateTime;
use clap::Subcommand;
use colored::*;
use runwatch_client::DatabricksClient;
use runwatch_core::domain::job::JobId;
use runwatch_core::dto::job::BaseJob;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// Show the ids of every job carrying a name
    Resolve {
        /// Job name
        name: String,
    },
    /// Show a job's settings and tasks
    Get {
        /// Job ID
        job_id: i64,
    },
    /// Trigger a new run of a job
    Start {
        /// Job ID
        job_id: i64,
    },
}

/// Handle job commands
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = DatabricksClient::new(&config.workspace)?;

    match command {
        JobCommands::Resolve { name } => resolve_job(&client, &name).await,
        JobCommands::Get { job_id } => get_job(&client, JobId(job_id)).await,
        JobCommands::Start { job_id } => start_job(&client, JobId(job_id)).await,
    }
}

async fn resolve_job(client: &DatabricksClient, name: &str) -> Result<()> {
    let jobs = client.list_jobs_by_name(name).await?;

    if jobs.is_empty() {
        println!("{}", format!("No job named '{}'.", name).yellow());
        return Ok(());
    }

    if jobs.len() > 1 {
        println!(
            "{}",
            format!("⚠ '{}' matches {} jobs; monitor needs a unique name.", name, jobs.len())
                .yellow()
        );
    }

    for job in jobs {
        println!(
            "  {} Job {}  {}",
            "▸".cyan(),
            job.job_id.to_string().bold(),
            job.creator_user_name.as_deref().unwrap_or("-").dimmed()
        );
    }

    Ok(())
}

async fn get_job(client: &DatabricksClient, job_id: JobId) -> Result<()> {
    let job = client
        .get_job(job_id)
        .await
        .with_context(|| format!("Failed to get job {}", job_id))?;

    print_job_details(&job);
    Ok(())
}

fn print_job_details(job: &BaseJob) {
    println!("{}", "Job Details:".bold());
    println!("  ID:          {}", job.job_id.to_string().cyan());
    println!("  Name:        {}", job.name().unwrap_or("-"));
    if let Some(user) = &job.creator_user_name {
        println!("  Creator:     {}", user.dimmed());
    }
    if let Some(created) = job.created_time.and_then(DateTime::from_timestamp_millis) {
        println!("  Created:     {}", created.format("%Y-%m-%d %H:%M:%S"));
    }

    if let Some(settings) = &job.settings {
        if let Some(max) = settings.max_concurrent_runs {
            println!("  Max runs:    {}", max);
        }
        if let Some(timeout) = settings.timeout_seconds.filter(|t| *t > 0) {
            println!("  Timeout:     {}s", timeout);
        }
    }

    let tasks = job.task_keys();
    if !tasks.is_empty() {
        println!("\n{} ({})", "Tasks:".bold(), tasks.len());
        for key in tasks {
            println!("  {} {}", "▸".cyan(), key);
        }
    }
}

async fn start_job(client: &DatabricksClient, job_id: JobId) -> Result<()> {
    let handle = client.start_run(job_id).await?;

    println!("{}", "✓ Run started".green());
    println!("  Job:    {}", job_id);
    println!("  Run ID: {}", handle.run_id.to_string().cyan());
    if let Some(number) = handle.number_in_job {
        println!("  Number: {}", number);
    }

    Ok(())
}

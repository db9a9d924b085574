//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod run;
mod watch;

pub use job::JobCommands;
pub use run::RunCommands;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Make sure a job's latest run progresses and wait for it to finish
    Monitor {
        /// Job name (must match exactly one job)
        #[arg(long)]
        job: String,

        /// User the job is monitored for
        #[arg(long, env = "RUNWATCH_USER", default_value = "anonymous")]
        user: String,

        /// Seconds between polls (default: RUNWATCH_POLL_INTERVAL or 60)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Wait a bounded time for one run to finish
    Wait {
        /// Run ID
        run_id: i64,

        /// Give up after this many seconds
        #[arg(long, default_value_t = 3600)]
        timeout: u64,

        /// Consecutive failed status fetches tolerated
        #[arg(long, default_value_t = 3)]
        retries: u32,

        /// Seconds between polls (default: RUNWATCH_POLL_INTERVAL or 60)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Job lookup and launch
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Run inspection and repair
    Run {
        #[command(subcommand)]
        command: RunCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Monitor {
            job,
            user,
            interval,
        } => watch::monitor_job(config, &job, &user, interval).await,
        Commands::Wait {
            run_id,
            timeout,
            retries,
            interval,
        } => watch::wait_for_run(config, run_id, timeout, retries, interval).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Run { command } => run::handle_run_command(command, config).await,
    }
}

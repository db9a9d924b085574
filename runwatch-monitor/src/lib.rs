//! Runwatch Monitor
//!
//! Watches job runs in a Databricks workspace and nudges them along.
//!
//! Architecture:
//! - Control: the job-service contract the monitor consumes ([`JobControl`])
//! - Monitor: resolve a job by name, start or repair its latest run, then
//!   poll until the run ends ([`JobRunMonitor::monitor`])
//! - Completion: time-bounded wait on one known run
//!   ([`JobRunMonitor::await_completion`])
//!
//! Everything runs as one sequential task: a remote call, an await, an
//! optional sleep, repeat. Nothing here coordinates with other monitors of
//! the same job.

pub mod completion;
pub mod config;
pub mod control;
pub mod error;
pub mod monitor;

#[cfg(test)]
mod testing;

pub use completion::Completion;
pub use config::MonitorConfig;
pub use control::{ControlError, JobControl};
pub use error::{MonitorError, Result};
pub use monitor::{JobRunMonitor, TerminalOutcome};

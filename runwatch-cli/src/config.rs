//! Configuration module
//!
//! Combines workspace settings (flags, environment, profiles file) with the
//! monitor's polling settings.

use anyhow::{Context, Result};
use runwatch_client::{ConfigSources, WorkspaceConfig};
use runwatch_monitor::MonitorConfig;
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace connection settings
    pub workspace: WorkspaceConfig,

    /// Polling settings for `monitor` and `wait`
    pub monitor: MonitorConfig,
}

impl Config {
    pub fn load(
        host: Option<String>,
        token: Option<String>,
        profile: Option<String>,
        profiles_path: Option<PathBuf>,
    ) -> Result<Self> {
        let workspace = WorkspaceConfig::resolve(ConfigSources {
            host,
            token,
            profile,
            profiles_path,
        })
        .context("Failed to load workspace configuration")?;

        let monitor = MonitorConfig::from_env().context("Invalid monitor settings")?;

        Ok(Self { workspace, monitor })
    }
}

//! Workspace configuration
//!
//! Host and token are passed to the client explicitly. They come from CLI
//! flags, the environment, or a named profile in a TOML profiles file:
//!
//! ```toml
//! [profiles.DEFAULT]
//! host = "https://adb-123.azuredatabricks.net"
//! token = "dapi..."
//!
//! [profiles.dev]
//! host = "https://dev.cloud.databricks.com"
//! token = "dapi..."
//! request_timeout_secs = 30
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Profile used when none is named
pub const DEFAULT_PROFILE: &str = "DEFAULT";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for one workspace
#[derive(Clone)]
pub struct WorkspaceConfig {
    /// Workspace URL (e.g., "https://adb-123.azuredatabricks.net")
    pub host: String,

    /// Personal access token
    pub token: String,

    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
}

impl fmt::Debug for WorkspaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceConfig")
            .field("host", &self.host)
            .field("token", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl WorkspaceConfig {
    /// Creates a configuration with the default request timeout
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            host: host.into().trim_end_matches('/').to_string(),
            token: token.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - DATABRICKS_HOST (required)
    /// - DATABRICKS_TOKEN (required)
    /// - DATABRICKS_REQUEST_TIMEOUT (optional, seconds, default: 60)
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("DATABRICKS_HOST").map_err(|_| {
            ClientError::ConfigError("DATABRICKS_HOST environment variable not set".to_string())
        })?;

        let token = std::env::var("DATABRICKS_TOKEN").map_err(|_| {
            ClientError::ConfigError("DATABRICKS_TOKEN environment variable not set".to_string())
        })?;

        let request_timeout = std::env::var("DATABRICKS_REQUEST_TIMEOUT")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let config = Self::new(host, token).with_request_timeout(request_timeout);
        config.validate()?;
        Ok(config)
    }

    /// Resolves a configuration from explicit values and a profiles file
    ///
    /// Explicit values win over the profile. An explicitly named profiles
    /// file must exist; the default location is optional.
    pub fn resolve(sources: ConfigSources) -> Result<Self> {
        let profile_name = sources
            .profile
            .clone()
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string());

        let profile = match &sources.profiles_path {
            Some(path) => ProfileFile::load(path)?.take(&profile_name),
            None => match ProfileFile::default_path() {
                Some(path) if path.exists() => ProfileFile::load(&path)?.take(&profile_name),
                _ => None,
            },
        };

        // A profile that was asked for by name has to exist
        if profile.is_none() && sources.profile.is_some() {
            return Err(ClientError::ConfigError(format!(
                "profile '{}' not found",
                profile_name
            )));
        }

        let profile = profile.unwrap_or_default();

        let host = sources.host.or(profile.host).ok_or_else(|| {
            ClientError::ConfigError(
                "workspace host not set (use --host, DATABRICKS_HOST or a profile)".to_string(),
            )
        })?;

        let token = sources.token.or(profile.token).ok_or_else(|| {
            ClientError::ConfigError(
                "access token not set (use --token, DATABRICKS_TOKEN or a profile)".to_string(),
            )
        })?;

        let request_timeout = profile
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        let config = Self::new(host, token).with_request_timeout(request_timeout);
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ClientError::ConfigError("host cannot be empty".to_string()));
        }

        if !self.host.starts_with("http://") && !self.host.starts_with("https://") {
            return Err(ClientError::ConfigError(
                "host must start with http:// or https://".to_string(),
            ));
        }

        if self.token.is_empty() {
            return Err(ClientError::ConfigError("token cannot be empty".to_string()));
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::ConfigError(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Inputs to [`WorkspaceConfig::resolve`]
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub host: Option<String>,
    pub token: Option<String>,
    pub profile: Option<String>,
    pub profiles_path: Option<PathBuf>,
}

/// One named entry of the profiles file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Profile {
    pub host: Option<String>,
    pub token: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

/// Parsed profiles file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileFile {
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl ProfileFile {
    /// `<config_dir>/runwatch/profiles.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("runwatch").join("profiles.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::ConfigError(format!(
                "failed to read profiles file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&content).map_err(|e| match e {
            ClientError::ConfigError(msg) => {
                ClientError::ConfigError(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ClientError::ConfigError(e.to_string()))
    }

    pub fn profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    fn take(mut self, name: &str) -> Option<Profile> {
        self.profiles.remove(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PROFILES: &str = r#"
[profiles.DEFAULT]
host = "https://default.cloud.databricks.com/"
token = "dapi-default"

[profiles.dev]
host = "https://dev.cloud.databricks.com"
token = "dapi-dev"
request_timeout_secs = 5
"#;

    fn profiles_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(PROFILES.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = WorkspaceConfig::new("https://example.com/", "t");
        assert_eq!(config.host, "https://example.com");
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    #[test]
    fn test_config_validation() {
        let mut config = WorkspaceConfig::new("https://example.com", "token");
        assert!(config.validate().is_ok());

        config.host = "example.com".to_string();
        assert!(config.validate().is_err());

        config.host = "https://example.com".to_string();
        config.token = String::new();
        assert!(config.validate().is_err());

        config.token = "token".to_string();
        config.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = WorkspaceConfig::new("https://example.com", "dapi-secret");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("dapi-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_parse_profiles() {
        let file = ProfileFile::parse(PROFILES).unwrap();
        let dev = file.profile("dev").unwrap();
        assert_eq!(dev.host.as_deref(), Some("https://dev.cloud.databricks.com"));
        assert_eq!(dev.request_timeout_secs, Some(5));
        assert!(file.profile("prod").is_none());
    }

    #[test]
    fn test_parse_rejects_malformed_file() {
        assert!(ProfileFile::parse("[profiles.dev\nhost = 1").is_err());
    }

    #[test]
    fn test_resolve_named_profile() {
        let file = profiles_file();
        let config = WorkspaceConfig::resolve(ConfigSources {
            profile: Some("dev".to_string()),
            profiles_path: Some(file.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.host, "https://dev.cloud.databricks.com");
        assert_eq!(config.token, "dapi-dev");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_resolve_defaults_to_default_profile() {
        let file = profiles_file();
        let config = WorkspaceConfig::resolve(ConfigSources {
            profiles_path: Some(file.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.host, "https://default.cloud.databricks.com");
        assert_eq!(config.token, "dapi-default");
    }

    #[test]
    fn test_explicit_values_override_profile() {
        let file = profiles_file();
        let config = WorkspaceConfig::resolve(ConfigSources {
            host: Some("https://override.example.com".to_string()),
            profile: Some("dev".to_string()),
            profiles_path: Some(file.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(config.host, "https://override.example.com");
        assert_eq!(config.token, "dapi-dev");
    }

    #[test]
    fn test_resolve_unknown_profile_fails() {
        let file = profiles_file();
        let err = WorkspaceConfig::resolve(ConfigSources {
            profile: Some("prod".to_string()),
            profiles_path: Some(file.path().to_path_buf()),
            ..Default::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("profile 'prod' not found"));
    }

    #[test]
    fn test_resolve_missing_explicit_file_fails() {
        let err = WorkspaceConfig::resolve(ConfigSources {
            host: Some("https://example.com".to_string()),
            token: Some("t".to_string()),
            profiles_path: Some(PathBuf::from("/nonexistent/runwatch/profiles.toml")),
            ..Default::default()
        })
        .unwrap_err();

        assert!(matches!(err, ClientError::ConfigError(_)));
    }

    #[test]
    fn test_resolve_without_token_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profiles.toml");
        std::fs::write(&path, "[profiles.DEFAULT]\nhost = \"https://example.com\"\n").unwrap();

        let err = WorkspaceConfig::resolve(ConfigSources {
            profiles_path: Some(path),
            ..Default::default()
        })
        .unwrap_err();

        assert!(err.to_string().contains("access token not set"));
    }
}

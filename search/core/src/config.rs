//! TOML Configuration File Support
//!
//! Centralized configuration loading for the search client, supporting a TOML
//! file at `~/.config/neurosearch/client.toml`.
//!
//! # Configuration Priority
//!
//! Values are applied with the following priority (highest first):
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoint]
//! base_url = "http://localhost:5000"
//! request_timeout_ms = 30000
//!
//! [disclosure]
//! policy = "shared"   # or "per-turn"
//! ```
//!
//! # Environment Variables
//!
//! - `NEUROSEARCH_ENDPOINT`: backend base URL
//! - `NEUROSEARCH_TIMEOUT_MS`: request timeout in milliseconds
//! - `NEUROSEARCH_DISCLOSURE`: `shared` or `per-turn`

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::disclosure::DisclosurePolicy;
use crate::endpoint::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

/// Environment variable for the backend base URL
pub const ENV_ENDPOINT: &str = "NEUROSEARCH_ENDPOINT";
/// Environment variable for the request timeout
pub const ENV_TIMEOUT_MS: &str = "NEUROSEARCH_TIMEOUT_MS";
/// Environment variable for the disclosure policy
pub const ENV_DISCLOSURE: &str = "NEUROSEARCH_DISCLOSURE";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Endpoint section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointToml {
    /// Backend base URL
    pub base_url: Option<String>,

    /// Request timeout in milliseconds
    pub request_timeout_ms: Option<u64>,
}

/// Disclosure section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisclosureToml {
    /// `shared` or `per-turn`
    pub policy: Option<String>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchToml {
    /// Endpoint configuration section
    pub endpoint: EndpointToml,

    /// Disclosure configuration section
    pub disclosure: DisclosureToml,
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Where and how to reach the search backend
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointSettings {
    /// Backend base URL (`/search` is appended)
    pub base_url: String,
    /// Per-request timeout; expiry counts as a failed search
    pub request_timeout: Duration,
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Fully resolved client configuration
#[derive(Clone, Debug)]
pub struct SearchConfig {
    /// Search backend settings
    pub endpoint: EndpointSettings,

    /// Disclosure policy for new sessions
    pub disclosure_policy: DisclosurePolicy,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Highest-priority source that contributed a value
    source: ConfigSource,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: EndpointSettings::default(),
            disclosure_policy: DisclosurePolicy::default(),
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl SearchConfig {
    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Check values that parse but make no sense
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a non-http(s) base URL or a
    /// zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.endpoint.base_url).map_err(|e| {
            ConfigError::ValidationError(format!(
                "endpoint base_url '{}' is not a valid URL: {e}",
                self.endpoint.base_url
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::ValidationError(format!(
                "endpoint base_url must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.endpoint.request_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "request timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Values supplied on the command line
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Backend base URL
    pub endpoint: Option<String>,
    /// Request timeout in milliseconds
    pub timeout_ms: Option<u64>,
    /// Disclosure policy
    pub disclosure: Option<DisclosurePolicy>,
}

impl ConfigOverrides {
    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none() && self.timeout_ms.is_none() && self.disclosure.is_none()
    }

    /// Apply these overrides on top of a loaded configuration
    ///
    /// # Errors
    ///
    /// Returns a validation error if the result is invalid.
    pub fn apply(&self, config: &mut SearchConfig) -> Result<(), ConfigError> {
        if self.is_empty() {
            return Ok(());
        }
        if let Some(ref endpoint) = self.endpoint {
            config.endpoint.base_url.clone_from(endpoint);
        }
        if let Some(ms) = self.timeout_ms {
            config.endpoint.request_timeout = Duration::from_millis(ms);
        }
        if let Some(policy) = self.disclosure {
            config.disclosure_policy = policy;
        }
        config.source = ConfigSource::Cli;
        config.validate()
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/neurosearch/client.toml` or
/// `~/.config/neurosearch/client.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("neurosearch").join("client.toml"))
}

/// Load configuration from the default file and the process environment
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if the
/// resulting values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<SearchConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path and the process environment
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the resulting
/// values are invalid.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<SearchConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration using a custom environment lookup
///
/// # Errors
///
/// See [`load_config_from_path`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<SearchConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = SearchConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: SearchToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env)?;
    config.validate()?;

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut SearchConfig, toml: &SearchToml) -> Result<(), ConfigError> {
    if let Some(ref base_url) = toml.endpoint.base_url {
        config.endpoint.base_url.clone_from(base_url);
    }
    if let Some(ms) = toml.endpoint.request_timeout_ms {
        config.endpoint.request_timeout = Duration::from_millis(ms);
    }
    if let Some(ref policy) = toml.disclosure.policy {
        config.disclosure_policy = policy
            .parse()
            .map_err(ConfigError::ValidationError)?;
    }
    Ok(())
}

/// Apply environment variables (overrides file values)
fn apply_env_config<F>(config: &mut SearchConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut touched = false;

    if let Some(base_url) = env(ENV_ENDPOINT) {
        config.endpoint.base_url = base_url;
        touched = true;
    }

    if let Some(raw) = env(ENV_TIMEOUT_MS) {
        let ms: u64 = raw.trim().parse().map_err(|_| {
            ConfigError::ValidationError(format!("{ENV_TIMEOUT_MS} must be an integer, got '{raw}'"))
        })?;
        config.endpoint.request_timeout = Duration::from_millis(ms);
        touched = true;
    }

    if let Some(raw) = env(ENV_DISCLOSURE) {
        config.disclosure_policy = raw.parse().map_err(ConfigError::ValidationError)?;
        touched = true;
    }

    if touched {
        config.source = ConfigSource::Env;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = load_config_with_env(None, no_env).unwrap();
        assert_eq!(config.endpoint.base_url, "http://localhost:5000");
        assert_eq!(config.endpoint.request_timeout, Duration::from_secs(30));
        assert_eq!(config.disclosure_policy, DisclosurePolicy::Shared);
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = PathBuf::from("/nonexistent/neurosearch/client.toml");
        let config = load_config_with_env(Some(path), no_env).unwrap();
        assert!(config.config_file_path.is_none());
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_file_values() {
        let file = write_config(
            r#"
            [endpoint]
            base_url = "https://search.internal"
            request_timeout_ms = 2500

            [disclosure]
            policy = "per-turn"
            "#,
        );

        let config = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap();
        assert_eq!(config.endpoint.base_url, "https://search.internal");
        assert_eq!(config.endpoint.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.disclosure_policy, DisclosurePolicy::PerTurn);
        assert_eq!(config.source(), ConfigSource::File);
        assert_eq!(config.config_file_path.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_config("[endpoint]\nbase_url = \"http://from-file:5000\"\n");
        let env: HashMap<&str, &str> = [
            (ENV_ENDPOINT, "http://from-env:9000"),
            (ENV_DISCLOSURE, "per-turn"),
        ]
        .into_iter()
        .collect();

        let config = load_config_with_env(Some(file.path().to_path_buf()), |k| {
            env.get(k).map(|v| (*v).to_string())
        })
        .unwrap();

        assert_eq!(config.endpoint.base_url, "http://from-env:9000");
        assert_eq!(config.disclosure_policy, DisclosurePolicy::PerTurn);
        assert_eq!(config.source(), ConfigSource::Env);
    }

    #[test]
    fn test_cli_overrides_env() {
        let mut config = load_config_with_env(None, |k| {
            (k == ENV_TIMEOUT_MS).then(|| "1000".to_string())
        })
        .unwrap();

        let overrides = ConfigOverrides {
            timeout_ms: Some(4000),
            disclosure: Some(DisclosurePolicy::PerTurn),
            ..Default::default()
        };
        overrides.apply(&mut config).unwrap();

        assert_eq!(config.endpoint.request_timeout, Duration::from_millis(4000));
        assert_eq!(config.disclosure_policy, DisclosurePolicy::PerTurn);
        assert_eq!(config.source(), ConfigSource::Cli);
    }

    #[test]
    fn test_empty_overrides_keep_source() {
        let mut config = SearchConfig::default();
        ConfigOverrides::default().apply(&mut config).unwrap();
        assert_eq!(config.source(), ConfigSource::Default);
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[endpoint\nbase_url = ");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_invalid_values() {
        let file = write_config("[disclosure]\npolicy = \"sometimes\"\n");
        let err = load_config_with_env(Some(file.path().to_path_buf()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = load_config_with_env(None, |k| {
            (k == ENV_TIMEOUT_MS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = load_config_with_env(None, |k| {
            (k == ENV_TIMEOUT_MS).then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("greater than zero"));

        let err = load_config_with_env(None, |k| {
            (k == ENV_ENDPOINT).then(|| "ftp://nope".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }
}

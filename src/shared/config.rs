use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::Deserialize;

use super::dirs;
use super::env_var::EnvVars;

/// Top-level configuration for issue-archiver.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Organization whose repositories are searched.
    pub org: String,

    /// Login of the user whose involvement is archived.
    pub user: String,

    /// Access token. Falls back to GITHUB_TOKEN, then `gh auth token`.
    #[serde(default)]
    pub token: Option<String>,

    /// Logins whose comments are dropped. Issues they authored are skipped
    /// unless someone else commented.
    #[serde(default)]
    pub ignore_users: Vec<String>,

    /// Output root directory (default: "./output").
    #[serde(default = "default_output")]
    #[schemars(default = "default_output")]
    pub output: PathBuf,

    /// Only archive issues created after this date ("2021-03-01") or
    /// timestamp ("2021-03-01T12:00:00Z").
    #[serde(default)]
    pub start_date: Option<String>,

    /// GitHub Enterprise API root (default: https://api.github.com).
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Rate-limit backoff settings.
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Directory for JSON-lines log files. Unset disables file logging.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

/// Rate-limit backoff configuration.
#[derive(Debug, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    /// Seconds to sleep after a rate-limit error (default: 900).
    #[serde(default = "default_cooldown_secs")]
    #[schemars(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,

    /// Total attempts per operation. Unset retries until the limit clears.
    #[serde(default)]
    pub max_attempts: Option<u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            cooldown_secs: default_cooldown_secs(),
            max_attempts: None,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("./output")
}

fn default_cooldown_secs() -> u64 {
    15 * 60
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No config file at any of the searched locations
    #[error("No config file found (searched: {})", format_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    /// Failed to read config file (permission error, etc.)
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    /// YAML parse error
    #[error("Invalid config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    /// Well-formed YAML with unusable values
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Candidate config file paths, in lookup order.
///
/// An explicit path (from `--config`) wins, then `ISSUE_ARCHIVER_CONFIG`,
/// then `config.yaml` / `config.yml` under `~/.config/issue-archiver`.
pub fn config_candidates(explicit: Option<&Path>, env: &EnvVars) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.to_path_buf()];
    }
    if let Some(path) = &env.config_path {
        return vec![PathBuf::from(path)];
    }
    match dirs::app_config_dir() {
        Some(dir) => candidates_in_dir(&dir),
        None => Vec::new(),
    }
}

fn candidates_in_dir(dir: &Path) -> Vec<PathBuf> {
    ["config.yaml", "config.yml"]
        .iter()
        .map(|name| dir.join(name))
        .collect()
}

/// Load configuration from the first existing candidate path.
pub fn load_config(explicit: Option<&Path>, env: &EnvVars) -> anyhow::Result<Config> {
    load_config_from_candidates(&config_candidates(explicit, env))
}

/// Load configuration from a specific directory.
/// Searches for config.yaml, then config.yml in the given directory.
#[cfg(test)]
pub fn load_config_from_dir(dir: &Path) -> anyhow::Result<Config> {
    load_config_from_candidates(&candidates_in_dir(dir))
}

fn load_config_from_candidates(candidates: &[PathBuf]) -> anyhow::Result<Config> {
    for path in candidates {
        match std::fs::read_to_string(path) {
            Ok(content) => return parse_config(&content, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(ConfigError::ReadError {
                    path: path.clone(),
                    source: e,
                }
                .into());
            }
        }
    }

    Err(ConfigError::NotFound {
        searched: candidates.to_vec(),
    }
    .into())
}

/// Parse YAML content into Config and check required values.
fn parse_config(content: &str, path: &Path) -> anyhow::Result<Config> {
    let config: Config = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.org.trim().is_empty() {
        return Err(ConfigError::Invalid("org must not be empty".to_string()));
    }
    if config.user.trim().is_empty() {
        return Err(ConfigError::Invalid("user must not be empty".to_string()));
    }
    if config.rate_limit.max_attempts == Some(0) {
        return Err(ConfigError::Invalid(
            "rate_limit.max_attempts must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Generate JSON Schema for the Config struct.
pub fn generate_schema() -> schemars::Schema {
    schemars::schema_for!(Config)
}

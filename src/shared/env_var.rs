//! Centralized reader for the environment variables the archiver honours.
//!
//! Environment variable names are defined as private constants here;
//! external code accesses values through the `EnvVars` struct.

const CONFIG_PATH: &str = "ISSUE_ARCHIVER_CONFIG";
const LOG_FILTER: &str = "ISSUE_ARCHIVER_LOG";
const GITHUB_TOKEN: &str = "GITHUB_TOKEN";

/// Snapshot of the relevant environment variables at load time.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EnvVars {
    /// Path of the configuration file, overriding the XDG location.
    pub config_path: Option<String>,

    /// `EnvFilter` directives for stderr logging (e.g. "info", "issue_archiver=debug").
    pub log_filter: Option<String>,

    /// Access token used when the configuration file does not set one.
    pub github_token: Option<String>,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    /// Read the environment variables from the current process.
    pub fn load() -> Self {
        Self {
            config_path: non_empty_var(CONFIG_PATH),
            log_filter: non_empty_var(LOG_FILTER),
            github_token: non_empty_var(GITHUB_TOKEN),
        }
    }
}

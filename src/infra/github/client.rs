//! GitHub API client implementation using octocrab.

use std::process::Command;

use super::error::{GitHubError, Result};

/// Production implementation using octocrab.
pub struct OctocrabClient {
    pub(crate) client: octocrab::Octocrab,
}

impl OctocrabClient {
    /// Create a client for api.github.com, or for a GitHub Enterprise API
    /// root when `base_url` is given.
    pub fn new(token: String, base_url: Option<&str>) -> Result<Self> {
        let mut builder = octocrab::Octocrab::builder();
        if let Some(base_url) = base_url {
            builder = builder.base_uri(base_url).map_err(|e| {
                GitHubError::TokenError(format!("Invalid API base URL {base_url}: {e}"))
            })?;
        }
        let client = builder.personal_token(token).build().map_err(|e| {
            GitHubError::TokenError(format!("Failed to build octocrab client: {e}"))
        })?;
        Ok(Self { client })
    }

    /// Create a client that talks to an arbitrary base URL (mock servers).
    #[cfg(test)]
    pub fn with_base_url(base_url: &str, token: &str) -> Result<Self> {
        Self::new(token.to_string(), Some(base_url))
    }
}

/// Pick the access token: explicit configuration first, then the
/// `GITHUB_TOKEN` environment variable, then `gh auth token`.
pub fn resolve_token(configured: Option<&str>, from_env: Option<&str>) -> Result<String> {
    if let Some(token) = configured.filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }
    if let Some(token) = from_env.filter(|t| !t.trim().is_empty()) {
        return Ok(token.trim().to_string());
    }
    get_gh_token()
}

/// Get GitHub token from `gh auth token` command.
/// This reuses the authentication from GitHub CLI.
fn get_gh_token() -> Result<String> {
    let output = Command::new("gh")
        .args(["auth", "token"])
        .output()
        .map_err(|e| GitHubError::TokenError(format!("Failed to run gh auth token: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitHubError::TokenError(format!(
            "gh auth token failed: {stderr}"
        )));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(GitHubError::TokenError(
            "gh auth token returned empty token".to_string(),
        ));
    }

    Ok(token)
}

//! GitHub API error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("Failed to get GitHub token: {0}")]
    TokenError(String),

    #[error("GitHub rate limit exceeded: {message}")]
    RateLimited { message: String },

    #[error("{}", format_octocrab_error(.0))]
    ApiError(#[from] octocrab::Error),

    #[error("Unexpected response from GitHub: {0}")]
    UnexpectedResponse(String),
}

impl GitHubError {
    /// Whether this error is a (primary or secondary) rate-limit rejection.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Classify an octocrab error, separating rate-limit rejections from
    /// every other API failure.
    pub fn from_octocrab(err: octocrab::Error) -> Self {
        if let octocrab::Error::GitHub { source, .. } = &err
            && is_rate_limit_response(source.status_code.as_u16(), &source.message)
        {
            return Self::RateLimited {
                message: source.message.clone(),
            };
        }
        Self::ApiError(err)
    }
}

/// GitHub answers rate-limited requests with 429, or with 403 and a message
/// naming the limit ("API rate limit exceeded", "secondary rate limit").
fn is_rate_limit_response(status: u16, message: &str) -> bool {
    match status {
        429 => true,
        403 => message.to_lowercase().contains("rate limit"),
        _ => false,
    }
}

/// Format octocrab::Error to extract detailed error information from GitHub API responses.
fn format_octocrab_error(err: &octocrab::Error) -> String {
    match err {
        octocrab::Error::GitHub { source, .. } => {
            let mut msg = format!(
                "GitHub API error: {} (HTTP {})",
                source.message,
                source.status_code.as_u16()
            );

            if let Some(errors) = &source.errors {
                msg.push_str(&format_error_details(errors));
            }

            msg
        }
        _ => format!("GitHub API error: {err}"),
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

/// Format error details from GitHub API errors array.
/// Returns a formatted string like "[field1 is code1, field2 is code2]" or empty string.
fn format_error_details(errors: &[serde_json::Value]) -> String {
    let error_details: Vec<String> = errors
        .iter()
        .filter_map(|e| {
            let field = e.get("field").and_then(|v| v.as_str());
            let code = e.get("code").and_then(|v| v.as_str());
            match (field, code) {
                (Some(f), Some(c)) => Some(format!("{f} is {c}")),
                (Some(f), None) => Some(f.to_string()),
                (None, Some(c)) => Some(c.to_string()),
                (None, None) => None,
            }
        })
        .collect();

    if error_details.is_empty() {
        String::new()
    } else {
        format!(" [{}]", error_details.join(", "))
    }
}

use thiserror::Error;

use super::storage::StorageError;
use crate::infra::github::GitHubError;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Unexpected search result: {0}")]
    InvalidIssue(String),
}

impl ArchiveError {
    /// The only recoverable condition: the upstream rate limit.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::GitHub(e) if e.is_rate_limited())
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;

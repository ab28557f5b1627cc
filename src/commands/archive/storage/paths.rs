use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::StorageError;

/// Full name of a repository, as `owner/name`.
///
/// Both components become directories of the archive, so they are checked
/// to be plain, non-empty path segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName {
    pub owner: String,
    pub name: String,
}

impl RepositoryName {
    /// Extract the repository from an API URL such as
    /// `https://api.github.com/repos/owner/name`.
    ///
    /// Everything after the last `/repos/` segment is the full name, which
    /// also covers Enterprise hosts (`https://host/api/v3/repos/owner/name`).
    pub fn from_api_url(url: &str) -> Result<Self, StorageError> {
        let (_, full_name) = url
            .rsplit_once("/repos/")
            .ok_or_else(|| StorageError::InvalidRepository(url.to_string()))?;
        full_name.trim_end_matches('/').parse()
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\'])
}

impl FromStr for RepositoryName {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_once('/')
            .filter(|(owner, name)| is_plain_segment(owner) && is_plain_segment(name))
            .map(|(owner, name)| RepositoryName {
                owner: owner.to_string(),
                name: name.to_string(),
            })
            .ok_or_else(|| StorageError::InvalidRepository(s.to_string()))
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Returns the directory path for a specific issue.
/// Format: <output_root>/<owner>/<repo>/<issue_number>
pub fn get_issue_dir(output_root: &Path, repo: &RepositoryName, issue_number: u64) -> PathBuf {
    output_root
        .join(&repo.owner)
        .join(&repo.name)
        .join(issue_number.to_string())
}

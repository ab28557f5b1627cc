mod error;
mod json;
mod paths;

pub use error::{Result, StorageError};
pub use json::to_json;
pub use paths::{RepositoryName, get_issue_dir};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;

pub const ISSUE_FILE: &str = "issue.json";
pub const COMMENTS_FILE: &str = "comments.json";

/// Archive location for a single issue.
///
/// Directory structure:
/// ```text
/// <output_root>/<owner>/<repo>/<issue_number>/
/// ├── issue.json
/// └── comments.json   (only when non-ignored comments exist)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueArchive {
    dir: PathBuf,
}

impl IssueArchive {
    pub fn new(output_root: &Path, repo: &RepositoryName, issue_number: u64) -> Self {
        Self {
            dir: get_issue_dir(output_root, repo, issue_number),
        }
    }

    /// Returns the directory path for this issue.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the raw issue document to issue.json.
    pub fn write_issue(&self, issue: &Value) -> Result<PathBuf> {
        self.write_document(ISSUE_FILE, issue)
    }

    /// Write the comment documents, as one JSON array, to comments.json.
    pub fn write_comments(&self, comments: &[Value]) -> Result<PathBuf> {
        self.write_document(COMMENTS_FILE, &Value::Array(comments.to_vec()))
    }

    /// Replace `filename` atomically: write a sibling temp file, then rename.
    /// Existing files are overwritten.
    fn write_document(&self, filename: &str, value: &Value) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let content = to_json(value)?;

        let write_err = |source| StorageError::Write {
            path: path.clone(),
            source,
        };
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.persist(&path).map_err(|e| write_err(e.error))?;

        Ok(path)
    }
}

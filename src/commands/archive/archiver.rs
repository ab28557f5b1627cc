//! Archiving of a single issue: fetch comments, filter, write files.

use std::path::Path;

use super::error::Result;
use super::models::{IgnoreList, IssueSummary, exclude_ignored};
use super::storage::IssueArchive;
use crate::infra::github::IssueSearchClient;

/// What happened to an issue handed to `archive_issue`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// issue.json was written, plus comments.json when `comments > 0`.
    Archived { comments: usize },
    /// Authored by an ignored user and nobody else commented.
    Skipped,
}

/// Fetch the comments of `issue` and write its archive directory.
///
/// Nothing is written for an issue whose author is ignored when no
/// comment survives filtering.
pub async fn archive_issue<C: IssueSearchClient + ?Sized>(
    client: &C,
    issue: &IssueSummary,
    ignore: &IgnoreList,
    output_root: &Path,
) -> Result<ArchiveOutcome> {
    let comments = client
        .list_issue_comments(&issue.repository.owner, &issue.repository.name, issue.number)
        .await?;
    let comments = exclude_ignored(comments, ignore);

    if ignore.contains(issue.author.as_deref()) && comments.is_empty() {
        tracing::debug!(
            repo = %issue.repository,
            number = issue.number,
            "skipping issue by ignored author without other comments"
        );
        return Ok(ArchiveOutcome::Skipped);
    }

    let archive = IssueArchive::new(output_root, &issue.repository, issue.number);
    archive.write_issue(&issue.raw)?;
    if !comments.is_empty() {
        archive.write_comments(&comments)?;
    }

    tracing::debug!(
        repo = %issue.repository,
        number = issue.number,
        comments = comments.len(),
        dir = %archive.dir().display(),
        "archived issue"
    );
    Ok(ArchiveOutcome::Archived {
        comments: comments.len(),
    })
}

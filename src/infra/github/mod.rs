//! GitHub API client module using octocrab.
//!
//! Provides `OctocrabClient` and the `IssueSearchClient` trait the archiver
//! depends on, with authentication via configuration, `GITHUB_TOKEN`, or
//! `gh auth token`.

mod client;
pub(crate) mod error;
#[cfg(test)]
pub mod mock;
mod search;

pub use client::{OctocrabClient, resolve_token};
pub use error::GitHubError;
pub use search::{IssueSearchClient, SearchIssuesParams, SearchPage};

//! Issue search and comment listing.
//!
//! Both endpoints are read as raw JSON so that archived documents keep every
//! field GitHub returned, not only the ones this crate models.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::client::OctocrabClient;
use super::error::{GitHubError, Result};

/// Page size used for comment listing (the API maximum).
pub const COMMENTS_PER_PAGE: u8 = 100;

/// Query parameters for `GET /search/issues`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchIssuesParams {
    pub q: String,
    pub sort: &'static str,
    pub order: &'static str,
    pub per_page: u8,
    pub page: u32,
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPage {
    pub total_count: u64,
    #[serde(default)]
    pub incomplete_results: bool,
    pub items: Vec<Value>,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// Trait for the read-only search operations the archiver needs.
#[async_trait::async_trait]
pub trait IssueSearchClient: Send + Sync {
    /// Fetch one page of issue search results.
    async fn search_issues(&self, params: &SearchIssuesParams) -> Result<SearchPage>;

    /// Fetch every comment of an issue, oldest first, as raw documents.
    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Value>>;
}

#[async_trait::async_trait]
impl IssueSearchClient for OctocrabClient {
    async fn search_issues(&self, params: &SearchIssuesParams) -> Result<SearchPage> {
        let value: Value = self
            .client
            .get("/search/issues", Some(params))
            .await
            .map_err(GitHubError::from_octocrab)?;

        serde_json::from_value(value).map_err(|e| {
            GitHubError::UnexpectedResponse(format!("malformed search response: {e}"))
        })
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Value>> {
        let route = format!("/repos/{owner}/{repo}/issues/{issue_number}/comments");
        let mut comments = Vec::new();
        let mut page = 1;

        loop {
            let params = PageParams {
                per_page: COMMENTS_PER_PAGE,
                page,
            };
            let value: Value = self
                .client
                .get(&route, Some(&params))
                .await
                .map_err(GitHubError::from_octocrab)?;

            let Value::Array(items) = value else {
                return Err(GitHubError::UnexpectedResponse(format!(
                    "expected a comment array from {route}"
                )));
            };

            let fetched = items.len();
            comments.extend(items);
            if fetched < usize::from(COMMENTS_PER_PAGE) {
                break;
            }
            page += 1;
        }

        Ok(comments)
    }
}

//! Test doubles for the archive command.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::query::LowerBound;
use super::retry::CooldownNotice;
use crate::infra::github::error::Result;
use crate::infra::github::{GitHubError, IssueSearchClient, SearchIssuesParams, SearchPage};

pub mod factories {
    //! Raw documents and parsed issues with sensible defaults.

    use chrono::{DateTime, Utc};
    use serde_json::{Value, json};

    use crate::commands::archive::models::IssueSummary;
    use crate::infra::github::mock::{mock_issue, mock_user};

    const API_BASE: &str = "https://api.github.com";

    /// A search item for `owner/repo#number`. It reports one comment.
    pub fn issue_json(owner: &str, repo: &str, number: u64, author: &str, created_at: &str) -> Value {
        mock_issue(API_BASE, owner, repo, number, author, created_at)
    }

    pub fn issue(owner: &str, repo: &str, number: u64, author: &str, created_at: &str) -> IssueSummary {
        IssueSummary::from_raw(issue_json(owner, repo, number, author, created_at)).unwrap()
    }

    pub fn comment_json(id: u64, author: &str) -> Value {
        json!({
            "id": id,
            "node_id": format!("IC_{id}"),
            "user": mock_user(author),
            "body": format!("Comment {id} by {author}"),
            "author_association": "MEMBER",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-01-01T00:00:00Z"
        })
    }

    pub fn timestamp(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().to_utc()
    }
}

/// Remembers the attempt number of every cooldown it is told about.
#[derive(Default)]
pub struct CooldownLog(Mutex<Vec<u32>>);

impl CooldownLog {
    pub fn attempts(&self) -> Vec<u32> {
        self.0.lock().unwrap().clone()
    }
}

impl CooldownNotice for CooldownLog {
    fn cooling_down(&self, attempt: u32, _cooldown: Duration) {
        self.0.lock().unwrap().push(attempt);
    }
}

type IssueKey = (String, String, u64);

#[derive(Default)]
struct Calls {
    searches: Vec<SearchIssuesParams>,
    comment_requests: Vec<u64>,
    search_rate_limits: u32,
    comment_rate_limits: HashMap<u64, u32>,
}

/// In-memory search API.
///
/// Search results honour the `created:>` qualifier and the result window,
/// and are paged by `page`/`per_page` like the real endpoint. Every call is
/// recorded before any injected failure is returned.
pub struct MockSearchClient {
    issues: Vec<Value>,
    comments: HashMap<IssueKey, Vec<Value>>,
    comment_failures: Vec<u64>,
    result_window: usize,
    phantom_total_count: Option<u64>,
    calls: Mutex<Calls>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            comments: HashMap::new(),
            comment_failures: Vec::new(),
            result_window: 1000,
            phantom_total_count: None,
            calls: Mutex::new(Calls::default()),
        }
    }

    pub fn with_issue(
        mut self,
        owner: &str,
        repo: &str,
        number: u64,
        author: &str,
        created_at: &str,
    ) -> Self {
        self.issues
            .push(factories::issue_json(owner, repo, number, author, created_at));
        self
    }

    pub fn with_comment(mut self, owner: &str, repo: &str, number: u64, comment: Value) -> Self {
        self.comments
            .entry((owner.to_string(), repo.to_string(), number))
            .or_default()
            .push(comment);
        self
    }

    /// Cap how many results a single query can page through.
    pub fn with_result_window(mut self, window: usize) -> Self {
        self.result_window = window;
        self
    }

    /// Reject the next `count` search requests as rate limited.
    pub fn with_search_rate_limits(self, count: u32) -> Self {
        self.calls.lock().unwrap().search_rate_limits = count;
        self
    }

    /// Reject the next `count` comment requests for issue `number` as rate limited.
    pub fn with_comment_rate_limits(self, number: u64, count: u32) -> Self {
        self.calls
            .lock()
            .unwrap()
            .comment_rate_limits
            .insert(number, count);
        self
    }

    /// Fail every comment request for issue `number` with a non-retryable error.
    pub fn with_comment_failure(mut self, number: u64) -> Self {
        self.comment_failures.push(number);
        self
    }

    /// Report `total_count` matches but return no items.
    pub fn with_phantom_total_count(mut self, total_count: u64) -> Self {
        self.phantom_total_count = Some(total_count);
        self
    }

    pub fn searches(&self) -> Vec<SearchIssuesParams> {
        self.calls.lock().unwrap().searches.clone()
    }

    /// Issue numbers whose comments were requested, in request order.
    pub fn comment_requests(&self) -> Vec<u64> {
        self.calls.lock().unwrap().comment_requests.clone()
    }

    pub fn issue_documents(&self) -> Vec<Value> {
        self.issues.clone()
    }

    fn matching(&self, q: &str) -> Vec<Value> {
        let bound = q
            .split_once(" created:>")
            .map(|(_, b)| b.parse::<LowerBound>().unwrap());
        let mut matching: Vec<Value> = self
            .issues
            .iter()
            .filter(|issue| {
                let created_at = factories::timestamp(issue["created_at"].as_str().unwrap());
                bound.is_none_or(|b| b.admits(created_at))
            })
            .cloned()
            .collect();
        matching.sort_by_key(|issue| factories::timestamp(issue["created_at"].as_str().unwrap()));
        matching
    }
}

#[async_trait::async_trait]
impl IssueSearchClient for MockSearchClient {
    async fn search_issues(&self, params: &SearchIssuesParams) -> Result<SearchPage> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.searches.push(params.clone());
            if calls.search_rate_limits > 0 {
                calls.search_rate_limits -= 1;
                return Err(GitHubError::RateLimited {
                    message: "API rate limit exceeded".to_string(),
                });
            }
        }

        if let Some(total_count) = self.phantom_total_count {
            return Ok(SearchPage {
                total_count,
                incomplete_results: false,
                items: Vec::new(),
            });
        }

        let matching = self.matching(&params.q);
        let total_count = matching.len() as u64;
        let reachable = matching.len().min(self.result_window);
        let per_page = usize::from(params.per_page);
        let start = (params.page as usize - 1) * per_page;
        let end = (start + per_page).min(reachable);
        let items = if start < end {
            matching[start..end].to_vec()
        } else {
            Vec::new()
        };

        Ok(SearchPage {
            total_count,
            incomplete_results: false,
            items,
        })
    }

    async fn list_issue_comments(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
    ) -> Result<Vec<Value>> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.comment_requests.push(issue_number);
            if let Some(remaining) = calls.comment_rate_limits.get_mut(&issue_number)
                && *remaining > 0
            {
                *remaining -= 1;
                return Err(GitHubError::RateLimited {
                    message: "You have exceeded a secondary rate limit".to_string(),
                });
            }
        }

        if self.comment_failures.contains(&issue_number) {
            return Err(GitHubError::UnexpectedResponse(format!(
                "comments for {owner}/{repo}#{issue_number} unavailable"
            )));
        }

        Ok(self
            .comments
            .get(&(owner.to_string(), repo.to_string(), issue_number))
            .cloned()
            .unwrap_or_default())
    }
}

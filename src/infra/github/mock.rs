//! wiremock-based GitHub mock server for testing.
//!
//! Provides `GitHubMockServer` for HTTP-level mocking of the search and
//! comment endpoints.
//!
//! # Usage
//!
//! ```ignore
//! let mock = GitHubMockServer::start().await;
//!
//! // Search operations
//! mock.search("involves:alice org:acme")
//!     .total_count(1)
//!     .issue("acme", "widgets", 1, "2024-01-01T00:00:00Z")
//!     .respond()
//!     .await;
//! mock.search_rate_limited().await;
//!
//! // Comment operations
//! mock.repo("acme", "widgets").comments(1, &[]).await;
//! ```

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::client::OctocrabClient;

/// Create a mock user JSON object.
pub fn mock_user(login: &str) -> serde_json::Value {
    json!({
        "login": login,
        "id": 1,
        "node_id": "U_test",
        "avatar_url": "https://avatars.githubusercontent.com/u/1",
        "url": format!("https://api.github.com/users/{}", login),
        "html_url": format!("https://github.com/{}", login),
        "type": "User",
        "site_admin": false
    })
}

/// Create a mock issue JSON object as returned by the search endpoint.
pub fn mock_issue(
    base_url: &str,
    owner: &str,
    repo: &str,
    issue_number: u64,
    author: &str,
    created_at: &str,
) -> serde_json::Value {
    json!({
        "id": issue_number,
        "node_id": "I_test",
        "url": format!("{}/repos/{}/{}/issues/{}", base_url, owner, repo, issue_number),
        "repository_url": format!("{}/repos/{}/{}", base_url, owner, repo),
        "comments_url": format!("{}/repos/{}/{}/issues/{}/comments", base_url, owner, repo, issue_number),
        "html_url": format!("https://github.com/{}/{}/issues/{}", owner, repo, issue_number),
        "number": issue_number,
        "state": "open",
        "title": format!("Issue {}", issue_number),
        "body": "Test body",
        "user": mock_user(author),
        "labels": [],
        "assignees": [],
        "locked": false,
        "comments": 1,
        "created_at": created_at,
        "updated_at": created_at,
        "score": 1.0
    })
}

/// Create a mock comment JSON object.
fn mock_comment(
    owner: &str,
    repo: &str,
    issue_number: u64,
    comment_id: u64,
    author: &str,
    body: &str,
) -> serde_json::Value {
    json!({
        "id": comment_id,
        "node_id": "IC_test",
        "url": format!("https://api.github.com/repos/{}/{}/issues/comments/{}", owner, repo, comment_id),
        "html_url": format!("https://github.com/{}/{}/issues/{}#issuecomment-{}", owner, repo, issue_number, comment_id),
        "body": body,
        "author_association": "MEMBER",
        "user": mock_user(author),
        "created_at": "2024-01-02T00:00:00Z",
        "updated_at": "2024-01-02T00:00:00Z"
    })
}

/// Remote comment definition for test setup.
#[derive(Clone)]
pub struct RemoteComment<'a> {
    pub id: u64,
    pub author: &'a str,
    pub body: &'a str,
}

/// wiremock-based GitHub mock server for testing.
pub struct GitHubMockServer {
    server: MockServer,
}

impl GitHubMockServer {
    /// Start a new mock server.
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL of the mock server.
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Get an OctocrabClient configured to use this mock server.
    pub fn client(&self) -> OctocrabClient {
        OctocrabClient::with_base_url(&self.server.uri(), "test-token").unwrap()
    }

    /// Create a search mock builder matching the given `q` parameter.
    pub fn search<'a>(&'a self, q: &'a str) -> MockSearchBuilder<'a> {
        MockSearchBuilder {
            server: &self.server,
            q,
            page: 1,
            total_count: None,
            items: Vec::new(),
        }
    }

    /// Mock GET /search/issues answering with a primary rate-limit rejection.
    pub async fn search_rate_limited(&self) {
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded for user ID 1.",
                "documentation_url": "https://docs.github.com/rest/overview/resources-in-the-rest-api#rate-limiting"
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock GET /search/issues answering with a validation failure.
    pub async fn search_validation_failed(&self) {
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "message": "Validation Failed",
                "errors": [{"field": "q", "code": "invalid"}],
                "documentation_url": "https://docs.github.com/v3/search"
            })))
            .mount(&self.server)
            .await;
    }

    /// Create a repository context for building comment mocks.
    pub fn repo<'a>(&'a self, owner: &'a str, repo: &'a str) -> MockRepoContext<'a> {
        MockRepoContext {
            server: &self.server,
            owner,
            repo,
        }
    }
}

/// Builder for a single page of search results.
pub struct MockSearchBuilder<'a> {
    server: &'a MockServer,
    q: &'a str,
    page: u32,
    total_count: Option<u64>,
    items: Vec<serde_json::Value>,
}

impl<'a> MockSearchBuilder<'a> {
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Reported total count (defaults to the number of items on the page).
    pub fn total_count(mut self, total_count: u64) -> Self {
        self.total_count = Some(total_count);
        self
    }

    /// Add an issue authored by "testuser".
    pub fn issue(self, owner: &str, repo: &str, number: u64, created_at: &str) -> Self {
        self.issue_by(owner, repo, number, "testuser", created_at)
    }

    pub fn issue_by(
        mut self,
        owner: &str,
        repo: &str,
        number: u64,
        author: &str,
        created_at: &str,
    ) -> Self {
        let item = mock_issue(&self.server.uri(), owner, repo, number, author, created_at);
        self.items.push(item);
        self
    }

    /// Mount the mock for GET /search/issues, oldest-first pages only.
    pub async fn respond(self) {
        let total_count = self.total_count.unwrap_or(self.items.len() as u64);
        Mock::given(method("GET"))
            .and(path("/search/issues"))
            .and(query_param("q", self.q))
            .and(query_param("sort", "created"))
            .and(query_param("order", "asc"))
            .and(query_param("page", self.page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "total_count": total_count,
                "incomplete_results": false,
                "items": self.items
            })))
            .mount(self.server)
            .await;
    }
}

/// Repository context for building mocks.
pub struct MockRepoContext<'a> {
    server: &'a MockServer,
    owner: &'a str,
    repo: &'a str,
}

impl<'a> MockRepoContext<'a> {
    /// Mock GET /repos/{owner}/{repo}/issues/{number}/comments (single page).
    pub async fn comments(&self, issue_number: u64, comments: &[RemoteComment<'_>]) {
        self.comments_page(issue_number, 1, comments).await;
    }

    /// Mock one page of the comment listing.
    pub async fn comments_page(&self, issue_number: u64, page: u32, comments: &[RemoteComment<'_>]) {
        let body: Vec<serde_json::Value> = comments
            .iter()
            .map(|c| mock_comment(self.owner, self.repo, issue_number, c.id, c.author, c.body))
            .collect();

        Mock::given(method("GET"))
            .and(path(format!(
                "/repos/{}/{}/issues/{}/comments",
                self.owner, self.repo, issue_number
            )))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(self.server)
            .await;
    }
}

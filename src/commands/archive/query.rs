//! Search query construction and the paginated issue sequence.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::error::{ArchiveError, Result};
use super::models::IssueSummary;
use super::retry::{CooldownNotice, RetryPolicy};
use crate::infra::github::{IssueSearchClient, SearchIssuesParams};

/// Lower bound on issue creation time for a search.
///
/// The bound is exclusive: only issues created strictly after it match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerBound {
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
}

impl LowerBound {
    /// Whether an issue created at `created_at` falls after this bound, the
    /// way the search API evaluates `created:>`.
    #[cfg(test)]
    pub fn admits(&self, created_at: DateTime<Utc>) -> bool {
        match self {
            Self::Date(date) => created_at.date_naive() > *date,
            Self::Timestamp(ts) => created_at > *ts,
        }
    }
}

impl fmt::Display for LowerBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::Secs, true)),
        }
    }
}

impl FromStr for LowerBound {
    type Err = String;

    /// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS` (read as UTC)
    /// and plain `YYYY-MM-DD` dates.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Timestamp(ts.to_utc()));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
            return Ok(Self::Timestamp(naive.and_utc()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self::Date)
            .map_err(|_| format!("expected a date (YYYY-MM-DD) or RFC 3339 timestamp, got {s:?}"))
    }
}

/// Page size and result window of the search API.
///
/// GitHub serves at most the first 1000 results of any search, which is
/// why the driver re-issues queries with an advancing lower bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub per_page: u8,
    pub max_results: u64,
}

impl Default for SearchWindow {
    fn default() -> Self {
        Self {
            per_page: 100,
            max_results: 1000,
        }
    }
}

/// Issues in an organization that involve a user, oldest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub user: String,
    pub org: String,
}

impl SearchQuery {
    /// The `q` string: empty free text plus qualifiers.
    pub fn q(&self, bound: Option<&LowerBound>) -> String {
        let mut q = format!("involves:{} org:{}", self.user, self.org);
        if let Some(bound) = bound {
            q.push_str(&format!(" created:>{bound}"));
        }
        q
    }

    fn params(&self, bound: Option<&LowerBound>, window: SearchWindow, page: u32) -> SearchIssuesParams {
        SearchIssuesParams {
            q: self.q(bound),
            sort: "created",
            order: "asc",
            per_page: window.per_page,
            page,
        }
    }
}

/// A lazily paged search result sequence.
///
/// `start` materializes the first page before anything else happens, so
/// `total_count` is always read from a page whose items were already
/// delivered. The search API's count is unreliable before that point.
pub struct IssueSearch<'a, C: IssueSearchClient + ?Sized> {
    client: &'a C,
    retry: &'a RetryPolicy,
    notice: &'a dyn CooldownNotice,
    params: SearchIssuesParams,
    window: SearchWindow,
    total_count: u64,
    buffer: VecDeque<Value>,
    fetched: u64,
    exhausted: bool,
}

impl<'a, C: IssueSearchClient + ?Sized> IssueSearch<'a, C> {
    /// Issue the query and fetch its first page.
    pub async fn start(
        client: &'a C,
        retry: &'a RetryPolicy,
        notice: &'a dyn CooldownNotice,
        query: &SearchQuery,
        bound: Option<&LowerBound>,
        window: SearchWindow,
    ) -> Result<Self> {
        let params = query.params(bound, window, 1);
        tracing::info!(q = %params.q, "issuing search query");

        let mut search = Self {
            client,
            retry,
            notice,
            params,
            window,
            total_count: 0,
            buffer: VecDeque::new(),
            fetched: 0,
            exhausted: false,
        };
        search.fetch_page().await?;
        Ok(search)
    }

    /// Number of issues the query matched, which may exceed what a single
    /// query can page through.
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Next issue in creation order, fetching further pages as needed.
    pub async fn next(&mut self) -> Result<Option<IssueSummary>> {
        if self.buffer.is_empty() && !self.exhausted {
            self.params.page += 1;
            self.fetch_page().await?;
        }
        match self.buffer.pop_front() {
            Some(raw) => IssueSummary::from_raw(raw).map(Some),
            None => Ok(None),
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let client = self.client;
        let params = &self.params;
        let page = self
            .retry
            .run(self.notice, || async move {
                client.search_issues(params).await.map_err(ArchiveError::from)
            })
            .await?;

        if page.incomplete_results {
            tracing::warn!(page = params.page, "search results reported as incomplete");
        }
        tracing::debug!(
            page = params.page,
            items = page.items.len(),
            total_count = page.total_count,
            "fetched search page"
        );

        let received = page.items.len() as u64;
        self.total_count = page.total_count;
        self.fetched += received;
        self.buffer.extend(page.items);

        let reachable = self.total_count.min(self.window.max_results);
        self.exhausted = received < u64::from(self.window.per_page) || self.fetched >= reachable;
        Ok(())
    }
}

//! The re-query loop.
//!
//! A single search can only page through the first 1000 results, so the
//! driver works through the query window, then searches again with the
//! creation time of the last issue seen as an exclusive lower bound. It
//! stops once a query matches nothing.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use super::archiver::{ArchiveOutcome, archive_issue};
use super::error::Result;
use super::models::IssueSummary;
use super::progress::Progress;
use super::query::{IssueSearch, LowerBound};
use super::settings::ArchiveSettings;
use crate::infra::github::IssueSearchClient;

/// Result of a complete run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Issues whose files were written.
    pub archived: u64,
    /// Issues left out by the ignore policy.
    pub skipped: u64,
    /// Search queries issued, including the final empty one.
    pub queries: u64,
    /// Creation time of the first issue seen.
    pub oldest: Option<DateTime<Utc>>,
    /// Creation time of the most recent issue seen.
    pub latest: Option<DateTime<Utc>>,
}

impl ArchiveSummary {
    fn record(&mut self, issue: &IssueSummary, outcome: ArchiveOutcome) {
        match outcome {
            ArchiveOutcome::Archived { .. } => self.archived += 1,
            ArchiveOutcome::Skipped => self.skipped += 1,
        }
        self.oldest.get_or_insert(issue.created_at);
        self.latest = Some(issue.created_at);
    }
}

impl fmt::Display for ArchiveSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.oldest, self.latest) {
            (Some(oldest), Some(latest)) => {
                write!(
                    f,
                    "Download complete: {} downloaded from {} to {}.",
                    self.archived,
                    oldest.to_rfc3339_opts(SecondsFormat::Secs, true),
                    latest.to_rfc3339_opts(SecondsFormat::Secs, true)
                )
            }
            _ => write!(f, "No issues found."),
        }
    }
}

enum State<'a, C: IssueSearchClient + ?Sized> {
    Query(Option<LowerBound>),
    Iterate(IssueSearch<'a, C>),
    CheckExhausted { total_count: u64, seen: u64 },
    Done,
}

/// Sequential archive driver.
pub struct Driver<'a, C: IssueSearchClient + ?Sized> {
    client: &'a C,
    settings: &'a ArchiveSettings,
    progress: Progress,
}

impl<'a, C: IssueSearchClient + ?Sized> Driver<'a, C> {
    pub fn new(client: &'a C, settings: &'a ArchiveSettings, progress: Progress) -> Self {
        Self {
            client,
            settings,
            progress,
        }
    }

    #[cfg(test)]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub async fn run(&self) -> Result<ArchiveSummary> {
        let mut summary = ArchiveSummary::default();
        let mut state: State<'_, C> = State::Query(self.settings.start_date);

        loop {
            state = match state {
                State::Query(bound) => {
                    let search = IssueSearch::start(
                        self.client,
                        &self.settings.retry,
                        &self.progress,
                        &self.settings.query,
                        bound.as_ref(),
                        self.settings.window,
                    )
                    .await?;
                    summary.queries += 1;

                    if summary.queries == 1 {
                        self.progress
                            .status(&format!("Downloading {} issues.", search.total_count()));
                    } else {
                        self.progress
                            .status(&format!("Issues remaining: {}", search.total_count()));
                    }
                    State::Iterate(search)
                }
                State::Iterate(mut search) => {
                    let total_count = search.total_count();
                    let mut seen = 0;
                    while let Some(issue) = search.next().await? {
                        let outcome = self.archive_with_retry(&issue).await?;
                        if matches!(outcome, ArchiveOutcome::Archived { .. }) {
                            self.progress.inc();
                        }
                        summary.record(&issue, outcome);
                        seen += 1;
                    }
                    State::CheckExhausted { total_count, seen }
                }
                State::CheckExhausted { total_count, seen } => {
                    match summary.latest {
                        _ if total_count == 0 => State::Done,
                        Some(latest) if seen > 0 => {
                            self.progress.status(&format!(
                                "Issues created before {} downloaded.",
                                latest.to_rfc3339_opts(SecondsFormat::Secs, true)
                            ));
                            State::Query(Some(LowerBound::Timestamp(latest)))
                        }
                        _ => {
                            tracing::warn!(
                                total_count,
                                "search reported matches but returned none; stopping"
                            );
                            State::Done
                        }
                    }
                }
                State::Done => {
                    self.progress.finish();
                    tracing::info!(
                        archived = summary.archived,
                        skipped = summary.skipped,
                        queries = summary.queries,
                        "archive run finished"
                    );
                    return Ok(summary);
                }
            };
        }
    }

    async fn archive_with_retry(&self, issue: &IssueSummary) -> Result<ArchiveOutcome> {
        let client = self.client;
        let ignore = &self.settings.ignore;
        let output_root = self.settings.output_root.as_path();
        self.settings
            .retry
            .run(&self.progress, || archive_issue(client, issue, ignore, output_root))
            .await
    }
}

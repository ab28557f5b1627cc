use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::error::{ArchiveError, Result};
use super::storage::RepositoryName;

#[derive(Debug, Deserialize)]
struct UserRef {
    login: String,
}

/// The fields of a search item the archiver relies on.
#[derive(Debug, Deserialize)]
struct IssueFields {
    number: u64,
    created_at: DateTime<Utc>,
    user: Option<UserRef>,
    repository_url: String,
}

/// An issue as returned by the search API.
///
/// `raw` is the untouched document; the other fields are read from it once.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueSummary {
    pub number: u64,
    pub created_at: DateTime<Utc>,
    /// None for issues whose author account was deleted.
    pub author: Option<String>,
    pub repository: RepositoryName,
    pub raw: Value,
}

impl IssueSummary {
    pub fn from_raw(raw: Value) -> Result<Self> {
        let fields = IssueFields::deserialize(&raw)
            .map_err(|e| ArchiveError::InvalidIssue(e.to_string()))?;
        let repository = RepositoryName::from_api_url(&fields.repository_url)?;

        Ok(Self {
            number: fields.number,
            created_at: fields.created_at,
            author: fields.user.map(|u| u.login),
            repository,
            raw,
        })
    }
}

/// Login of a raw comment document's author, if any.
pub fn comment_author(comment: &Value) -> Option<&str> {
    comment.get("user")?.get("login")?.as_str()
}

/// Set of logins whose activity is left out of the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreList(HashSet<String>);

impl IgnoreList {
    /// Whether `login` is ignored. Missing authors never are.
    pub fn contains(&self, login: Option<&str>) -> bool {
        login.is_some_and(|l| self.0.contains(l))
    }
}

impl<S: Into<String>> FromIterator<S> for IgnoreList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Drop comments written by ignored users, keeping the original order.
pub fn exclude_ignored(comments: Vec<Value>, ignore: &IgnoreList) -> Vec<Value> {
    comments
        .into_iter()
        .filter(|c| !ignore.contains(comment_author(c)))
        .collect()
}

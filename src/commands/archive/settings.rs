use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use super::models::IgnoreList;
use super::query::{LowerBound, SearchQuery, SearchWindow};
use super::retry::{RetryLimit, RetryPolicy};
use crate::shared::config::{Config, ConfigError};

/// Everything the driver needs, resolved from the configuration file.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveSettings {
    pub query: SearchQuery,
    pub ignore: IgnoreList,
    pub output_root: PathBuf,
    pub start_date: Option<LowerBound>,
    pub retry: RetryPolicy,
    pub window: SearchWindow,
}

impl ArchiveSettings {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let start_date = config
            .start_date
            .as_deref()
            .map(str::parse::<LowerBound>)
            .transpose()
            .map_err(|e| ConfigError::Invalid(format!("start_date: {e}")))?;

        let limit = match config.rate_limit.max_attempts {
            None => RetryLimit::Unbounded,
            Some(n) => RetryLimit::Attempts(NonZeroU32::new(n).ok_or_else(|| {
                ConfigError::Invalid("rate_limit.max_attempts must be at least 1".to_string())
            })?),
        };

        Ok(Self {
            query: SearchQuery {
                user: config.user.trim().to_string(),
                org: config.org.trim().to_string(),
            },
            ignore: config.ignore_users.iter().map(|u| u.trim()).collect(),
            output_root: config.output.clone(),
            start_date,
            retry: RetryPolicy::new(Duration::from_secs(config.rate_limit.cooldown_secs), limit),
            window: SearchWindow::default(),
        })
    }
}

//! `issue-archiver run`: archive every issue in an organization that
//! involves a user, with the user's and everyone else's comments.

mod archiver;
mod driver;
mod error;
mod models;
mod progress;
mod query;
mod retry;
mod settings;
mod storage;
#[cfg(test)]
pub mod testing;

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::infra::github::{OctocrabClient, resolve_token};
use crate::shared::config::load_config;
use crate::shared::env_var::EnvVars;
use crate::shared::logging;
use driver::Driver;
use progress::Progress;
use settings::ArchiveSettings;

#[derive(Args, Clone, PartialEq, Eq)]
pub struct RunArgs {
    /// Path to the configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
pub async fn run(args: &RunArgs) -> anyhow::Result<()> {
    let env = EnvVars::load();
    let config = load_config(args.config.as_deref(), &env)?;
    let settings = ArchiveSettings::from_config(&config)?;
    let _log_guard = logging::init(env.log_filter.as_deref(), config.log_dir.as_deref())
        .context("failed to initialize logging")?;

    tracing::info!(
        org = %settings.query.org,
        user = %settings.query.user,
        output = %settings.output_root.display(),
        "starting archive run"
    );

    let token = resolve_token(config.token.as_deref(), env.github_token.as_deref())?;
    let client = OctocrabClient::new(token, config.api_base_url.as_deref())?;

    let summary = Driver::new(&client, &settings, Progress::stderr()).run().await?;
    println!("{summary}");
    Ok(())
}

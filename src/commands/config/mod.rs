use std::path::{Path, PathBuf};

use clap::Subcommand;

use crate::shared::config::{config_candidates, generate_schema};
use crate::shared::env_var::EnvVars;

/// Configuration management commands.
#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print JSON Schema for the configuration file
    Schema,

    /// Show where the configuration file is looked up
    Path {
        /// Explicit configuration file path, as passed to `run --config`
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

impl ConfigCommands {
    pub fn run(&self) -> anyhow::Result<()> {
        match self {
            Self::Schema => {
                let json = serde_json::to_string_pretty(&generate_schema())?;
                println!("{json}");
                Ok(())
            }
            Self::Path { config } => {
                let candidates = config_candidates(config.as_deref(), &EnvVars::load());
                for line in describe_candidates(&candidates) {
                    println!("{line}");
                }
                Ok(())
            }
        }
    }
}

/// The file that would be loaded, or every searched path when none exists.
fn describe_candidates(candidates: &[PathBuf]) -> Vec<String> {
    match candidates.iter().find(|p| p.is_file()) {
        Some(found) => vec![found.display().to_string()],
        None => candidates.iter().map(|p| not_found(p)).collect(),
    }
}

fn not_found(path: &Path) -> String {
    format!("{} (not found)", path.display())
}

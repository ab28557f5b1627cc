use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::archive::RunArgs;
use crate::commands::config::ConfigCommands;

#[derive(Parser)]
#[command(
    name = "issue-archiver",
    version,
    about,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Archive every issue in the organization that involves the user
    Run(RunArgs),

    /// Configuration file tools
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

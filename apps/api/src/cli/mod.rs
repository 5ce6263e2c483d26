use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "review-api", version, about = "Review records service")]
pub struct Cli {
    /// Overrides DATA_DIR; the export directory moves along with it unless PDF_DIR is set.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default).
    Serve,
    /// Create the data directories and seed any missing tables.
    Setup,
    /// Replace the token table with fresh manager and HR tokens.
    IssueTokens,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.cmd.unwrap_or(Command::Serve)
    }

    /// Applies command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.data_dir {
            if std::env::var_os("PDF_DIR").is_none() {
                config.pdf_dir = dir.join("pdf_export");
            }
            config.data_dir = dir.clone();
        }
        config
    }
}

//! CLI for imgedit.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use imgedit_core::config;
use std::path::PathBuf;

use commands::{run_edit, run_login, run_resolve, run_scan};

/// Top-level CLI for imgedit.
#[derive(Debug, Parser)]
#[command(name = "imgedit")]
#[command(about = "imgedit: replace site images in place and commit them to the source repository", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the repository path an image reference resolves to.
    Resolve {
        /// Displayed reference: absolute URL, site-relative URL or repository path.
        reference: String,
    },

    /// List the editable surfaces of a page snapshot.
    Scan {
        /// Path to the page snapshot (JSON).
        snapshot: PathBuf,
    },

    /// Replace one element's image and commit it.
    Edit {
        /// Path to the page snapshot (JSON).
        snapshot: PathBuf,

        /// `id` attribute of the element to edit.
        #[arg(long, value_name = "ID")]
        element: String,

        /// Replacement image file.
        #[arg(long, value_name = "PATH")]
        file: PathBuf,

        /// Save the previewed snapshot back to SNAPSHOT.
        #[arg(long)]
        write: bool,
    },

    /// Store repository credentials.
    Login {
        /// Repository owner (user or organization).
        #[arg(long)]
        owner: String,

        /// Repository name.
        #[arg(long)]
        repo: String,

        /// Access token with contents write permission.
        #[arg(long, env = "IMGEDIT_TOKEN", hide_env_values = true)]
        token: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Resolve { reference } => run_resolve(&cfg, &reference)?,
            CliCommand::Scan { snapshot } => run_scan(&cfg, &snapshot)?,
            CliCommand::Edit {
                snapshot,
                element,
                file,
                write,
            } => run_edit(&cfg, &snapshot, &element, &file, write).await?,
            CliCommand::Login { owner, repo, token } => run_login(&owner, &repo, &token)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;

//! CLI argument definitions and parsing.

use crate::AccountId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Account and database arguments shared between storage-backed commands
#[derive(Debug, Args)]
pub struct StorageArgs {
    /// Account ID (or set `LEAGUE_SCHEDULER_ACCOUNT_ID` env var).
    #[clap(long, short)]
    pub account_id: Option<AccountId>,

    /// SQLite database path (or set `LEAGUE_SCHEDULER_DB` env var).
    #[clap(long)]
    pub db: Option<PathBuf>,
}

#[derive(Debug, Parser)]
#[clap(
    name = "league-scheduler",
    about = "Schedule league games onto fields, times, and umpires"
)]
pub struct LeagueScheduler {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Solve one or more problem files and print the proposals.
    ///
    /// Files are solved in parallel; each run is independent.
    Solve {
        /// Problem JSON files.
        #[clap(required = true)]
        problems: Vec<PathBuf>,

        /// Account ID (or set `LEAGUE_SCHEDULER_ACCOUNT_ID` env var).
        #[clap(long, short)]
        account_id: Option<AccountId>,

        /// Write each result to `<DIR>/<runId>.json`.
        #[clap(long)]
        out: Option<PathBuf>,

        /// Output results as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Re-validate a proposal against the database and commit what still fits.
    Apply {
        /// Apply request JSON file.
        request: PathBuf,

        #[clap(flatten)]
        storage: StorageArgs,

        /// Only apply games in this season.
        #[clap(long)]
        season_id: Option<String>,

        /// Output the result as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },

    /// Load fields and games from a seed file into the database.
    Import {
        /// Seed JSON file with `fields` and `games`.
        seed: PathBuf,

        #[clap(flatten)]
        storage: StorageArgs,
    },

    /// List persisted games and their assignments.
    Games {
        #[clap(flatten)]
        storage: StorageArgs,

        /// Only list games in this season.
        #[clap(long)]
        season_id: Option<String>,

        /// Output games as JSON instead of text lines.
        #[clap(long)]
        json: bool,
    },
}

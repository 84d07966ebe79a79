//! League Game Scheduler Library
//!
//! Assigns league games to fields, time slots, and umpires under hard
//! operational constraints, and commits a previously computed proposal
//! against live, possibly changed, persisted state.
//!
//! ## Features
//!
//! - **Validation**: Structural checks with one typed error per broken rule
//! - **Greedy Solver**: Deterministic single forward pass, explainable failures
//! - **Run Identity**: Stable run ids from problem content or idempotency keys
//! - **Apply Pipeline**: Per-assignment re-validation against storage with
//!   itemized skip reasons and idempotent no-op writes
//! - **SQLite Storage**: Bundled repository for fields and games
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use league_scheduler::{scheduling::solve, AccountId, SchedulingProblem};
//!
//! # fn example() -> league_scheduler::Result<()> {
//! let problem: SchedulingProblem = serde_json::from_str(&std::fs::read_to_string("problem.json")?)?;
//! let result = solve(&AccountId::new("acme"), &problem)?;
//! println!("{} of {} games scheduled", result.metrics.scheduled_games, result.metrics.total_games);
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export LEAGUE_SCHEDULER_ACCOUNT_ID=acme
//! export LEAGUE_SCHEDULER_DB=/var/lib/league/schedule.db
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod model;
pub mod scheduling;
pub mod storage;

// Re-export commonly used types
pub use error::{Result, SchedulerError, ValidationError};
pub use model::{
    AccountId, ApplyContext, ApplyMode, ApplyRequest, ApplyResult, ApplyStatus, Assignment,
    RunId, SchedulingProblem, SolveResult, SolveStatus,
};
pub use storage::{ScheduleDatabase, ScheduleRepository};

pub const ACCOUNT_ID_ENV_VAR: &str = "LEAGUE_SCHEDULER_ACCOUNT_ID";
pub const DB_PATH_ENV_VAR: &str = "LEAGUE_SCHEDULER_DB";

//! Scheduling core: validation, the greedy solver, and the apply pipeline
//!
//! - `validation`: Structural checks on a problem before any search
//! - `constraints`: Effective hard constraints and rejection reasons
//! - `run_id`: Deterministic run identifiers
//! - `solver`: Greedy single-pass assignment of games to slots and umpires
//! - `apply`: Re-validate and commit a proposal against live storage

pub mod apply;
pub mod constraints;
pub mod run_id;
pub mod solver;
pub mod validation;

pub use apply::{apply_proposal, SkipReason};
pub use constraints::{Conflict, HardConstraints, DEFAULT_GAME_DURATION_MINUTES};
pub use run_id::resolve_run_id;
pub use solver::{solve, solve_all};
pub use validation::{validate_problem, PreparedProblem};

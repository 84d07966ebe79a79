//! Solve results, proposals, and apply requests/results.

use super::ids::{FieldId, GameId, RunId, UmpireId};
use super::problem::ConstraintOverrides;
use serde::{Deserialize, Serialize};

/// One game placed on a field at a time with its umpires.
///
/// Times are kept as strings so hand-built proposals with bad values reach the
/// apply pipeline and are skipped there instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub game_id: GameId,
    pub field_id: FieldId,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub umpire_ids: Vec<UmpireId>,
}

impl Assignment {
    pub fn new(game_id: &str, field_id: &str, start_time: &str, end_time: &str) -> Self {
        Self {
            game_id: game_id.to_string(),
            field_id: field_id.to_string(),
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            umpire_ids: Vec::new(),
        }
    }

    pub fn with_umpires(mut self, umpire_ids: &[&str]) -> Self {
        self.umpire_ids = umpire_ids.iter().map(|id| id.to_string()).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduledReason {
    pub game_id: GameId,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolveStatus {
    Completed,
    Partial,
    Infeasible,
}

impl SolveStatus {
    pub fn from_counts(scheduled: usize, total: usize) -> Self {
        if scheduled == total {
            SolveStatus::Completed
        } else if scheduled == 0 {
            SolveStatus::Infeasible
        } else {
            SolveStatus::Partial
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveMetrics {
    pub total_games: usize,
    pub scheduled_games: usize,
    pub unscheduled_games: usize,
    /// Number of scheduled games; coverage is the only objective.
    pub objective_value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveResult {
    pub run_id: RunId,
    pub status: SolveStatus,
    pub metrics: SolveMetrics,
    pub assignments: Vec<Assignment>,
    pub unscheduled: Vec<UnscheduledReason>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyMode {
    #[default]
    All,
    Subset,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub run_id: String,
    #[serde(default)]
    pub mode: ApplyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_ids: Option<Vec<GameId>>,
    #[serde(default)]
    pub hard_constraints: ConstraintOverrides,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl ApplyRequest {
    /// Request applying every assignment of a proposal.
    pub fn all(run_id: &str, assignments: Vec<Assignment>) -> Self {
        Self {
            run_id: run_id.to_string(),
            mode: ApplyMode::All,
            game_ids: None,
            hard_constraints: ConstraintOverrides::default(),
            assignments,
        }
    }

    /// Request applying only the assignments for `game_ids`.
    pub fn subset(run_id: &str, game_ids: &[&str], assignments: Vec<Assignment>) -> Self {
        Self {
            run_id: run_id.to_string(),
            mode: ApplyMode::Subset,
            game_ids: Some(game_ids.iter().map(|id| id.to_string()).collect()),
            hard_constraints: ConstraintOverrides::default(),
            assignments,
        }
    }

    pub fn with_constraints(mut self, hard_constraints: ConstraintOverrides) -> Self {
        self.hard_constraints = hard_constraints;
        self
    }
}

/// Optional scoping for an apply call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyContext {
    #[serde(default)]
    pub season_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplyStatus {
    Applied,
    Partial,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedAssignment {
    pub game_id: GameId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResult {
    pub run_id: String,
    pub status: ApplyStatus,
    pub applied_game_ids: Vec<GameId>,
    pub skipped: Vec<SkippedAssignment>,
}

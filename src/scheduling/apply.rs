//! Optimistic commit of a proposal against live storage.
//!
//! Assignments are handled one at a time in the order supplied. Each is
//! re-validated against the repository right before its write, so a stale
//! proposal can only be skipped, never written over a conflicting change.
//! Writes from earlier assignments in the same call are visible to later
//! ones; the first of two competing assignments wins.
//!
//! Validation and write are not one transaction. Callers must serialize
//! apply calls per account.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use super::constraints::{limit_reached, Conflict, HardConstraints};
use crate::error::{Result, SchedulerError};
use crate::model::{
    AccountId, ApplyContext, ApplyMode, ApplyRequest, ApplyResult, ApplyStatus, Assignment,
    GameId, Interval, SkippedAssignment,
};
use crate::storage::{GameAssignmentUpdate, ScheduleRepository, UMPIRE_SLOTS};

/// Why an assignment was not written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoAssignmentProvided,
    InvalidTimeWindow,
    TooManyUmpires,
    DuplicateUmpire { umpire_id: String },
    GameNotFound,
    WrongSeason,
    FieldNotFound { field_id: String },
    Conflict(Conflict),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoAssignmentProvided => {
                write!(f, "No assignment provided for requested gameId")
            }
            SkipReason::InvalidTimeWindow => write!(f, "Assignment has an invalid time window"),
            SkipReason::TooManyUmpires => write!(
                f,
                "Too many umpires for one game (max {})",
                UMPIRE_SLOTS
            ),
            SkipReason::DuplicateUmpire { umpire_id } => {
                write!(f, "Umpire {} is listed more than once", umpire_id)
            }
            SkipReason::GameNotFound => write!(f, "Game not found"),
            SkipReason::WrongSeason => write!(f, "Game is not in the requested season"),
            SkipReason::FieldNotFound { field_id } => write!(f, "Field {} not found", field_id),
            SkipReason::Conflict(conflict) => write!(f, "{}", conflict),
        }
    }
}

impl From<Conflict> for SkipReason {
    fn from(conflict: Conflict) -> Self {
        SkipReason::Conflict(conflict)
    }
}

/// What happened to one attempted assignment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Outcome {
    Written,
    AlreadyApplied,
    Skipped(SkipReason),
}

/// Apply `request` for `account_id` against `repo`.
///
/// Skips are reported in the result; only storage failures and malformed
/// requests (subset mode without `gameIds`, an invalid lights rule) are
/// returned as errors.
pub fn apply_proposal<R: ScheduleRepository + ?Sized>(
    repo: &mut R,
    account_id: &AccountId,
    request: &ApplyRequest,
    context: Option<&ApplyContext>,
) -> Result<ApplyResult> {
    let constraints = HardConstraints::resolve(&request.hard_constraints)?;
    let season_id = context.and_then(|c| c.season_id.as_deref());

    let (attempts, mut skipped) = select_assignments(request)?;
    let mut applied_game_ids = Vec::new();

    for assignment in attempts {
        let outcome = apply_assignment(repo, account_id, assignment, &constraints, season_id)?;
        match outcome {
            Outcome::Written => applied_game_ids.push(assignment.game_id.clone()),
            Outcome::AlreadyApplied => {
                debug!(game_id = %assignment.game_id, "assignment already persisted");
                applied_game_ids.push(assignment.game_id.clone());
            }
            Outcome::Skipped(reason) => {
                debug!(game_id = %assignment.game_id, %reason, "assignment skipped");
                skipped.push(SkippedAssignment {
                    game_id: assignment.game_id.clone(),
                    reason: reason.to_string(),
                });
            }
        }
    }

    let status = apply_status(applied_game_ids.len(), skipped.len());
    info!(
        run_id = %request.run_id,
        account_id = %account_id,
        applied = applied_game_ids.len(),
        skipped = skipped.len(),
        ?status,
        "apply finished"
    );

    Ok(ApplyResult {
        run_id: request.run_id.clone(),
        status,
        applied_game_ids,
        skipped,
    })
}

/// `applied` with no skips, `failed` with nothing applied, else `partial`.
pub fn apply_status(applied: usize, skipped: usize) -> ApplyStatus {
    if skipped == 0 {
        ApplyStatus::Applied
    } else if applied == 0 {
        ApplyStatus::Failed
    } else {
        ApplyStatus::Partial
    }
}

/// Assignments to attempt, plus skips for requested games without one.
fn select_assignments(
    request: &ApplyRequest,
) -> Result<(Vec<&Assignment>, Vec<SkippedAssignment>)> {
    match request.mode {
        ApplyMode::All => Ok((request.assignments.iter().collect(), Vec::new())),
        ApplyMode::Subset => {
            let game_ids = request
                .game_ids
                .as_ref()
                .ok_or_else(|| SchedulerError::InvalidRequest {
                    message: "subset mode requires gameIds".to_string(),
                })?;

            let provided: HashSet<&str> = request
                .assignments
                .iter()
                .map(|a| a.game_id.as_str())
                .collect();
            let skipped = game_ids
                .iter()
                .filter(|id| !provided.contains(id.as_str()))
                .map(|id| SkippedAssignment {
                    game_id: id.clone(),
                    reason: SkipReason::NoAssignmentProvided.to_string(),
                })
                .collect();

            let requested: HashSet<&GameId> = game_ids.iter().collect();
            let attempts = request
                .assignments
                .iter()
                .filter(|a| requested.contains(&a.game_id))
                .collect();

            Ok((attempts, skipped))
        }
    }
}

fn apply_assignment<R: ScheduleRepository + ?Sized>(
    repo: &mut R,
    account_id: &AccountId,
    assignment: &Assignment,
    constraints: &HardConstraints,
    season_id: Option<&str>,
) -> Result<Outcome> {
    let game_id = assignment.game_id.as_str();

    // Shape checks need no storage round trip
    let Some(window) = Interval::parse(&assignment.start_time, &assignment.end_time) else {
        return Ok(Outcome::Skipped(SkipReason::InvalidTimeWindow));
    };
    let Some(update) =
        GameAssignmentUpdate::new(&assignment.field_id, window, &assignment.umpire_ids)
    else {
        return Ok(Outcome::Skipped(SkipReason::TooManyUmpires));
    };
    let mut seen = HashSet::new();
    if let Some(umpire_id) = assignment
        .umpire_ids
        .iter()
        .find(|id| !seen.insert(id.as_str()))
    {
        return Ok(Outcome::Skipped(SkipReason::DuplicateUmpire {
            umpire_id: umpire_id.clone(),
        }));
    }

    let Some(game) = repo.find_game(account_id, game_id)? else {
        return Ok(Outcome::Skipped(SkipReason::GameNotFound));
    };
    if season_id.is_some_and(|season| season != game.season_id) {
        return Ok(Outcome::Skipped(SkipReason::WrongSeason));
    }

    let Some(field) = repo.find_field(account_id, &assignment.field_id)? else {
        return Ok(Outcome::Skipped(SkipReason::FieldNotFound {
            field_id: assignment.field_id.clone(),
        }));
    };

    let teams = [
        game.home_team_season_id.as_str(),
        game.visitor_team_season_id.as_str(),
    ];
    if let Some(conflict) = check_live_constraints(
        repo,
        account_id,
        game_id,
        &teams,
        &update,
        field.has_lights,
        field.capacity(),
        &assignment.umpire_ids,
        constraints,
    )? {
        return Ok(Outcome::Skipped(conflict.into()));
    }

    if game.matches(&assignment.field_id, &window, &assignment.umpire_ids) {
        return Ok(Outcome::AlreadyApplied);
    }

    repo.update_game_assignment(account_id, game_id, &update)?;
    Ok(Outcome::Written)
}

/// The solver's hard constraints, answered by storage queries instead of
/// in-memory bookings. Returns the first violation found.
#[allow(clippy::too_many_arguments)]
fn check_live_constraints<R: ScheduleRepository + ?Sized>(
    repo: &R,
    account_id: &AccountId,
    game_id: &str,
    teams: &[&str; 2],
    update: &GameAssignmentUpdate,
    has_lights: bool,
    capacity: u32,
    umpire_ids: &[String],
    constraints: &HardConstraints,
) -> Result<Option<Conflict>> {
    let window = &update.window;

    if let Some(conflict) = constraints.lights_violation(window.start, has_lights) {
        return Ok(Some(conflict));
    }

    if constraints.no_field_overlap
        && repo.count_field_bookings(account_id, &update.field_id, window, game_id)? >= capacity
    {
        return Ok(Some(Conflict::FieldBooked));
    }

    if constraints.no_team_overlap {
        for team in teams {
            if repo.count_team_bookings(account_id, team, window, game_id)? > 0 {
                return Ok(Some(Conflict::TeamBooked {
                    team_season_id: team.to_string(),
                }));
            }
        }
    }

    if constraints.no_umpire_overlap {
        for umpire in umpire_ids {
            if repo.count_umpire_bookings(account_id, umpire, window, game_id)? > 0 {
                return Ok(Some(Conflict::UmpireBooked {
                    umpire_id: umpire.clone(),
                }));
            }
        }
    }

    let day = window.utc_day();

    if constraints.max_games_per_team_per_day.is_some() {
        for team in teams {
            let played = repo.count_team_games_in_range(account_id, team, &day, game_id)?;
            if limit_reached(played, constraints.max_games_per_team_per_day) {
                return Ok(Some(Conflict::TeamDailyLimit {
                    team_season_id: team.to_string(),
                }));
            }
        }
    }

    if constraints.max_games_per_umpire_per_day.is_some() {
        for umpire in umpire_ids {
            let worked = repo.count_umpire_games_in_range(account_id, umpire, &day, game_id)?;
            if limit_reached(worked, constraints.max_games_per_umpire_per_day) {
                return Ok(Some(Conflict::UmpireDailyLimit {
                    umpire_id: umpire.clone(),
                }));
            }
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests;

//! Input validation for scheduling problems.
//!
//! Runs before any search and stops at the first broken rule, in this order:
//! 1. Season present, games and field slots non-empty
//! 2. Every date/time string parses
//! 3. Season bounds ordered, game windows ordered, every slot, blackout, and
//!    availability window non-empty, durations positive
//! 4. No duplicate identifiers (all duplicates reported together, sorted)
//! 5. Every reference resolves, and no game pits a team against itself
//!
//! On success the parsed instants are handed to the solver in a
//! [`PreparedProblem`] so nothing is parsed twice.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::model::time::parse_instant;
use crate::model::{Field, FieldSlot, GameRequest, Interval, SchedulingProblem, Season, Umpire};

/// A problem whose strings have been parsed and whose references all resolve.
#[derive(Debug, Clone)]
pub struct PreparedProblem<'a> {
    pub season: PreparedSeason<'a>,
    pub fields: &'a [Field],
    pub umpires: &'a [Umpire],
    pub games: Vec<PreparedGame<'a>>,
    pub field_slots: Vec<PreparedSlot<'a>>,
    pub team_blackouts: Vec<(&'a str, Interval)>,
    pub umpire_availability: Vec<(&'a str, Interval)>,
}

#[derive(Debug, Clone, Copy)]
pub struct PreparedSeason<'a> {
    pub season: &'a Season,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
pub struct PreparedGame<'a> {
    pub request: &'a GameRequest,
    pub earliest_start: Option<DateTime<Utc>>,
    pub latest_end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy)]
pub struct PreparedSlot<'a> {
    pub slot: &'a FieldSlot,
    pub window: Interval,
}

/// Validate `problem` and return its parsed form.
pub fn validate_problem(
    problem: &SchedulingProblem,
) -> Result<PreparedProblem<'_>, ValidationError> {
    // 1. presence
    let season = problem.season.as_ref().ok_or(ValidationError::MissingSeason)?;
    if problem.games.is_empty() {
        return Err(ValidationError::NoGames);
    }
    if problem.field_slots.is_empty() {
        return Err(ValidationError::NoFieldSlots);
    }

    // 2. parse every instant
    let season_start = parse_field("season startDate", &season.start_date)?;
    let season_end = parse_field("season endDate", &season.end_date)?;

    let mut games = Vec::with_capacity(problem.games.len());
    for game in &problem.games {
        let earliest_start = parse_optional(
            &format!("game {} earliestStart", game.id),
            game.earliest_start.as_deref(),
        )?;
        let latest_end = parse_optional(
            &format!("game {} latestEnd", game.id),
            game.latest_end.as_deref(),
        )?;
        games.push(PreparedGame {
            request: game,
            earliest_start,
            latest_end,
        });
    }

    let slot_bounds = problem
        .field_slots
        .iter()
        .map(|slot| {
            parse_bounds(
                &format!("field slot {}", slot.id),
                &slot.start_time,
                &slot.end_time,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let blackout_bounds = problem
        .team_blackouts
        .iter()
        .map(|b| {
            parse_bounds(
                &format!("blackout for team {}", b.team_season_id),
                &b.start_time,
                &b.end_time,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;
    let availability_bounds = problem
        .umpire_availability
        .iter()
        .map(|a| {
            parse_bounds(
                &format!("availability for umpire {}", a.umpire_id),
                &a.start_time,
                &a.end_time,
            )
        })
        .collect::<Result<Vec<_>, _>>()?;

    // 3. ordering of bounds
    if season_start > season_end {
        return Err(ValidationError::SeasonBoundsInverted);
    }
    for game in &games {
        if let (Some(earliest), Some(latest)) = (game.earliest_start, game.latest_end) {
            if earliest > latest {
                return Err(ValidationError::GameWindowInverted {
                    game_id: game.request.id.clone(),
                });
            }
        }
        if game.request.duration_minutes == Some(0) {
            return Err(ValidationError::InvalidDuration {
                game_id: game.request.id.clone(),
            });
        }
    }

    let field_slots = problem
        .field_slots
        .iter()
        .zip(slot_bounds)
        .map(|(slot, (start, end))| {
            Interval::new(start, end)
                .map(|window| PreparedSlot { slot, window })
                .ok_or_else(|| ValidationError::EmptyInterval {
                    kind: "Field slot".to_string(),
                    id: slot.id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let team_blackouts = problem
        .team_blackouts
        .iter()
        .zip(blackout_bounds)
        .map(|(b, (start, end))| {
            Interval::new(start, end)
                .map(|window| (b.team_season_id.as_str(), window))
                .ok_or_else(|| ValidationError::EmptyInterval {
                    kind: "Team blackout".to_string(),
                    id: b.team_season_id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let umpire_availability = problem
        .umpire_availability
        .iter()
        .zip(availability_bounds)
        .map(|(a, (start, end))| {
            Interval::new(start, end)
                .map(|window| (a.umpire_id.as_str(), window))
                .ok_or_else(|| ValidationError::EmptyInterval {
                    kind: "Umpire availability".to_string(),
                    id: a.umpire_id.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // 4. duplicate identifiers
    let mut duplicates = BTreeSet::new();
    collect_duplicates("team season", problem.team_seasons.iter(), &mut duplicates);
    collect_duplicates("field", problem.fields.iter().map(|f| &f.id), &mut duplicates);
    collect_duplicates("umpire", problem.umpires.iter().map(|u| &u.id), &mut duplicates);
    collect_duplicates("game", problem.games.iter().map(|g| &g.id), &mut duplicates);
    collect_duplicates(
        "field slot",
        problem.field_slots.iter().map(|s| &s.id),
        &mut duplicates,
    );
    if !duplicates.is_empty() {
        return Err(ValidationError::DuplicateIds {
            ids: duplicates.into_iter().collect(),
        });
    }

    // 5. referential integrity
    let team_ids: HashSet<&str> = problem.team_seasons.iter().map(String::as_str).collect();
    let field_ids: HashSet<&str> = problem.fields.iter().map(|f| f.id.as_str()).collect();
    let umpire_ids: HashSet<&str> = problem.umpires.iter().map(|u| u.id.as_str()).collect();

    for game in &problem.games {
        let owner = format!("Game {}", game.id);
        for team in [&game.home_team_season_id, &game.visitor_team_season_id] {
            if !team_ids.contains(team.as_str()) {
                return Err(ValidationError::UnknownTeamSeason {
                    owner,
                    team_season_id: team.clone(),
                });
            }
        }
        if game.home_team_season_id == game.visitor_team_season_id {
            return Err(ValidationError::SameTeams {
                game_id: game.id.clone(),
            });
        }
        if let Some(field_id) = game
            .preferred_field_ids
            .iter()
            .find(|id| !field_ids.contains(id.as_str()))
        {
            return Err(ValidationError::UnknownField {
                owner,
                field_id: field_id.clone(),
            });
        }
    }
    for slot in &problem.field_slots {
        if !field_ids.contains(slot.field_id.as_str()) {
            return Err(ValidationError::UnknownField {
                owner: format!("Field slot {}", slot.id),
                field_id: slot.field_id.clone(),
            });
        }
    }
    for blackout in &problem.team_blackouts {
        if !team_ids.contains(blackout.team_season_id.as_str()) {
            return Err(ValidationError::UnknownTeamSeason {
                owner: "Team blackout".to_string(),
                team_season_id: blackout.team_season_id.clone(),
            });
        }
    }
    for availability in &problem.umpire_availability {
        if !umpire_ids.contains(availability.umpire_id.as_str()) {
            return Err(ValidationError::UnknownUmpire {
                umpire_id: availability.umpire_id.clone(),
            });
        }
    }

    Ok(PreparedProblem {
        season: PreparedSeason {
            season,
            start: season_start,
            end: season_end,
        },
        fields: &problem.fields,
        umpires: &problem.umpires,
        games,
        field_slots,
        team_blackouts,
        umpire_availability,
    })
}

fn parse_field(field: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_instant(value).ok_or_else(|| ValidationError::InvalidDateTime {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn parse_optional(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, ValidationError> {
    value.map(|v| parse_field(field, v)).transpose()
}

fn parse_bounds(
    owner: &str,
    start: &str,
    end: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), ValidationError> {
    Ok((
        parse_field(&format!("{} startTime", owner), start)?,
        parse_field(&format!("{} endTime", owner), end)?,
    ))
}

fn collect_duplicates<'a>(
    kind: &str,
    ids: impl Iterator<Item = &'a String>,
    duplicates: &mut BTreeSet<String>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            duplicates.insert(format!("{}:{}", kind, id));
        }
    }
}

#[cfg(test)]
mod tests;

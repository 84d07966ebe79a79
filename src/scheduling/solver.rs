//! Greedy single-pass game scheduler.
//!
//! # Algorithm
//!
//! 1. Resolve hard constraints (caller overrides over engine defaults).
//! 2. Sort games by `earliestStart` (unset sorts as the Unix epoch), then by
//!    game id. Sort field slots by start time, then field id, then slot id.
//! 3. For each game, walk the slots on its preferred fields first and the
//!    remaining slots after, taking the first slot where the game fits and
//!    every enabled hard constraint holds, including a full umpire crew.
//! 4. Book the accepted placement so later games see it. Earlier decisions
//!    are never revisited.
//!
//! The sort keys are the only source of ordering; no hash-map iteration order
//! ever reaches the output, so equal inputs give equal schedules.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use tracing::{debug, info};

use super::constraints::{
    limit_reached, Conflict, HardConstraints, DEFAULT_GAME_DURATION_MINUTES,
};
use super::run_id::resolve_run_id;
use super::validation::{validate_problem, PreparedGame, PreparedProblem, PreparedSlot};
use crate::error::Result;
use crate::model::time::{format_instant, is_weekend, utc_date};
use crate::model::{
    AccountId, Assignment, Field, GameRequest, Interval, SchedulingProblem, Season, SolveMetrics,
    SolveResult, SolveStatus, UnscheduledReason,
};

/// Validate and solve one problem.
///
/// Fails only on structural problems; games that cannot be placed come back
/// in `unscheduled` with a reason.
pub fn solve(account_id: &AccountId, problem: &SchedulingProblem) -> Result<SolveResult> {
    let prepared = validate_problem(problem)?;
    let constraints = HardConstraints::resolve(&problem.hard_constraints)?;
    let run_id = resolve_run_id(account_id, problem)?;

    let (assignments, unscheduled) = GreedySolver::new(&prepared, &constraints).run();

    let total_games = prepared.games.len();
    let scheduled_games = assignments.len();
    let status = SolveStatus::from_counts(scheduled_games, total_games);

    info!(
        run_id = %run_id,
        account_id = %account_id,
        scheduled = scheduled_games,
        unscheduled = unscheduled.len(),
        ?status,
        "solve finished"
    );

    Ok(SolveResult {
        run_id,
        status,
        metrics: SolveMetrics {
            total_games,
            scheduled_games,
            unscheduled_games: total_games - scheduled_games,
            objective_value: scheduled_games,
        },
        assignments,
        unscheduled,
    })
}

/// Solve independent problems in parallel. Results keep the input order.
pub fn solve_all(
    account_id: &AccountId,
    problems: &[SchedulingProblem],
) -> Vec<Result<SolveResult>> {
    problems
        .par_iter()
        .map(|problem| solve(account_id, problem))
        .collect()
}

/// Minutes a game lasts when it starts at `start`.
///
/// An explicit game duration wins, then the season's weekday/weekend length
/// (weekend judged on the UTC calendar), then the season default, then 60.
pub fn game_duration(season: &Season, request: &GameRequest, start: DateTime<Utc>) -> u32 {
    let by_day = if is_weekend(start) {
        season.weekend_game_duration_minutes
    } else {
        season.weekday_game_duration_minutes
    };
    request
        .duration_minutes
        .or(by_day)
        .or(season.default_game_duration_minutes)
        .unwrap_or(DEFAULT_GAME_DURATION_MINUTES)
}

/// A candidate that passed every check
struct Placement<'a> {
    window: Interval,
    umpire_ids: Vec<&'a str>,
}

/// Committed bookings of the run so far
#[derive(Debug, Default)]
struct Bookings<'a> {
    by_field: HashMap<&'a str, Vec<Interval>>,
    by_team: HashMap<&'a str, Vec<Interval>>,
    by_umpire: HashMap<&'a str, Vec<Interval>>,
    team_days: HashMap<(&'a str, NaiveDate), u32>,
    umpire_days: HashMap<(&'a str, NaiveDate), u32>,
}

impl<'a> Bookings<'a> {
    fn overlapping(map: &HashMap<&'a str, Vec<Interval>>, key: &str, window: &Interval) -> u32 {
        map.get(key).map_or(0, |booked| {
            booked.iter().filter(|b| b.overlaps(window)).count() as u32
        })
    }

    fn day_count(map: &HashMap<(&'a str, NaiveDate), u32>, key: &'a str, day: NaiveDate) -> u32 {
        map.get(&(key, day)).copied().unwrap_or(0)
    }
}

struct GreedySolver<'a> {
    problem: &'a PreparedProblem<'a>,
    constraints: &'a HardConstraints,
    fields: HashMap<&'a str, &'a Field>,
    blackouts: HashMap<&'a str, Vec<Interval>>,
    availability: HashMap<&'a str, Vec<Interval>>,
    bookings: Bookings<'a>,
}

impl<'a> GreedySolver<'a> {
    fn new(problem: &'a PreparedProblem<'a>, constraints: &'a HardConstraints) -> Self {
        let fields = problem.fields.iter().map(|f| (f.id.as_str(), f)).collect();

        let mut blackouts: HashMap<&'a str, Vec<Interval>> = HashMap::new();
        for (team, window) in &problem.team_blackouts {
            blackouts.entry(*team).or_default().push(*window);
        }

        let mut availability: HashMap<&'a str, Vec<Interval>> = HashMap::new();
        for (umpire, window) in &problem.umpire_availability {
            availability.entry(*umpire).or_default().push(*window);
        }

        Self {
            problem,
            constraints,
            fields,
            blackouts,
            availability,
            bookings: Bookings::default(),
        }
    }

    fn run(mut self) -> (Vec<Assignment>, Vec<UnscheduledReason>) {
        let problem = self.problem;

        let mut games: Vec<&'a PreparedGame<'a>> = problem.games.iter().collect();
        games.sort_by(|a, b| {
            let a_start = a.earliest_start.unwrap_or(DateTime::UNIX_EPOCH);
            let b_start = b.earliest_start.unwrap_or(DateTime::UNIX_EPOCH);
            a_start
                .cmp(&b_start)
                .then_with(|| a.request.id.cmp(&b.request.id))
        });

        let mut slots: Vec<&'a PreparedSlot<'a>> = problem.field_slots.iter().collect();
        slots.sort_by(|a, b| {
            a.window
                .start
                .cmp(&b.window.start)
                .then_with(|| a.slot.field_id.cmp(&b.slot.field_id))
                .then_with(|| a.slot.id.cmp(&b.slot.id))
        });

        let mut assignments = Vec::new();
        let mut unscheduled = Vec::new();
        for game in games {
            match self.place(game, &slots) {
                Ok(assignment) => assignments.push(assignment),
                Err(reason) => {
                    debug!(game_id = %game.request.id, %reason, "game left unscheduled");
                    unscheduled.push(UnscheduledReason {
                        game_id: game.request.id.clone(),
                        reason,
                    });
                }
            }
        }
        (assignments, unscheduled)
    }

    fn place(
        &mut self,
        game: &PreparedGame<'a>,
        slots: &[&'a PreparedSlot<'a>],
    ) -> std::result::Result<Assignment, String> {
        let preferred = &game.request.preferred_field_ids;
        let is_preferred = |slot: &&&'a PreparedSlot<'a>| preferred.contains(&slot.slot.field_id);

        // Preferred fields first, then the rest; both passes keep slot order.
        let candidates = slots
            .iter()
            .filter(is_preferred)
            .chain(slots.iter().filter(|slot| !is_preferred(slot)));

        let mut rejections: BTreeMap<String, usize> = BTreeMap::new();
        let mut checked = 0usize;
        for slot in candidates {
            checked += 1;
            match self.evaluate(game, slot) {
                Ok(placement) => {
                    self.commit(game.request, slot, &placement);
                    return Ok(Assignment {
                        game_id: game.request.id.clone(),
                        field_id: slot.slot.field_id.clone(),
                        start_time: format_instant(placement.window.start),
                        end_time: format_instant(placement.window.end),
                        umpire_ids: placement
                            .umpire_ids
                            .iter()
                            .map(|id| id.to_string())
                            .collect(),
                    });
                }
                Err(conflict) => *rejections.entry(conflict.to_string()).or_default() += 1,
            }
        }

        Err(describe_failure(checked, &rejections))
    }

    fn evaluate(
        &self,
        game: &PreparedGame<'a>,
        slot: &PreparedSlot<'a>,
    ) -> std::result::Result<Placement<'a>, Conflict> {
        let request = game.request;
        let constraints = self.constraints;
        let start = slot.window.start;

        let minutes = game_duration(self.problem.season.season, request, start);
        let window =
            Interval::starting_at(start, minutes).ok_or(Conflict::DurationExceedsSlot)?;
        if constraints.respect_field_slots && window.end > slot.window.end {
            return Err(Conflict::DurationExceedsSlot);
        }

        if game.earliest_start.is_some_and(|earliest| window.start < earliest)
            || game.latest_end.is_some_and(|latest| window.end > latest)
        {
            return Err(Conflict::OutsideGameWindow);
        }

        let teams = [
            request.home_team_season_id.as_str(),
            request.visitor_team_season_id.as_str(),
        ];

        if constraints.respect_team_blackouts {
            for team in teams {
                let blacked_out = self
                    .blackouts
                    .get(team)
                    .is_some_and(|windows| windows.iter().any(|w| w.overlaps(&window)));
                if blacked_out {
                    return Err(Conflict::TeamBlackout {
                        team_season_id: team.to_string(),
                    });
                }
            }
        }

        let field_id = slot.slot.field_id.as_str();
        let field = self.fields.get(field_id);
        let has_lights = field.is_some_and(|f| f.has_lights);
        let capacity = field.map_or(1, |f| f.capacity());

        if let Some(conflict) = constraints.lights_violation(window.start, has_lights) {
            return Err(conflict);
        }

        if constraints.no_field_overlap
            && Bookings::overlapping(&self.bookings.by_field, field_id, &window) >= capacity
        {
            return Err(Conflict::FieldBooked);
        }

        if constraints.no_team_overlap {
            for team in teams {
                if Bookings::overlapping(&self.bookings.by_team, team, &window) > 0 {
                    return Err(Conflict::TeamBooked {
                        team_season_id: team.to_string(),
                    });
                }
            }
        }

        let umpire_ids = self.select_umpires(request.umpires_needed(), &window)?;

        let day = utc_date(window.start);
        for team in teams {
            let played = Bookings::day_count(&self.bookings.team_days, team, day);
            if limit_reached(played, constraints.max_games_per_team_per_day) {
                return Err(Conflict::TeamDailyLimit {
                    team_season_id: team.to_string(),
                });
            }
        }

        Ok(Placement { window, umpire_ids })
    }

    /// First `needed` umpires, in declaration order, free for `window`.
    fn select_umpires(
        &self,
        needed: usize,
        window: &Interval,
    ) -> std::result::Result<Vec<&'a str>, Conflict> {
        let mut chosen = Vec::with_capacity(needed);
        if needed == 0 {
            return Ok(chosen);
        }

        let day = utc_date(window.start);
        for umpire in self.problem.umpires {
            let id = umpire.id.as_str();

            if self.constraints.respect_umpire_availability {
                let available = self
                    .availability
                    .get(id)
                    .is_some_and(|windows| windows.iter().any(|w| w.contains(window)));
                if !available {
                    continue;
                }
            }

            if self.constraints.no_umpire_overlap
                && Bookings::overlapping(&self.bookings.by_umpire, id, window) > 0
            {
                continue;
            }

            let worked = Bookings::day_count(&self.bookings.umpire_days, id, day);
            let cap = self.constraints.umpire_daily_cap(umpire.max_games_per_day);
            if limit_reached(worked, cap) {
                continue;
            }

            chosen.push(id);
            if chosen.len() == needed {
                return Ok(chosen);
            }
        }

        Err(Conflict::UmpiresUnavailable {
            required: needed,
            available: chosen.len(),
        })
    }

    fn commit(
        &mut self,
        request: &'a GameRequest,
        slot: &PreparedSlot<'a>,
        placement: &Placement<'a>,
    ) {
        let window = placement.window;
        let day = utc_date(window.start);
        let bookings = &mut self.bookings;

        bookings
            .by_field
            .entry(slot.slot.field_id.as_str())
            .or_default()
            .push(window);

        for team in [
            request.home_team_season_id.as_str(),
            request.visitor_team_season_id.as_str(),
        ] {
            bookings.by_team.entry(team).or_default().push(window);
            *bookings.team_days.entry((team, day)).or_default() += 1;
        }

        for &umpire in &placement.umpire_ids {
            bookings.by_umpire.entry(umpire).or_default().push(window);
            *bookings.umpire_days.entry((umpire, day)).or_default() += 1;
        }
    }
}

/// Explain an unplaced game by its most frequent rejection.
fn describe_failure(checked: usize, rejections: &BTreeMap<String, usize>) -> String {
    // Ties go to the alphabetically first reason.
    let most_common = rejections
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)));

    match most_common {
        Some((reason, count)) => format!(
            "No feasible field slot among {} candidates; most common rejection ({} slots): {}",
            checked, count, reason
        ),
        None => "No field slots available".to_string(),
    }
}

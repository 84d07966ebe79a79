//! Unit tests for problem validation

use super::*;
use crate::model::{TeamBlackout, UmpireAvailability};

fn valid_problem() -> SchedulingProblem {
    SchedulingProblem {
        season: Some(Season {
            start_date: "2025-05-01".to_string(),
            end_date: "2025-06-30".to_string(),
            ..Season::default()
        }),
        team_seasons: vec!["t1".to_string(), "t2".to_string()],
        fields: vec![Field::new("f1")],
        umpires: vec![Umpire::new("u1")],
        games: vec![GameRequest::new("g1", "t1", "t2")],
        field_slots: vec![FieldSlot::new(
            "s1",
            "f1",
            "2025-05-05T09:00:00Z",
            "2025-05-05T11:00:00Z",
        )],
        ..SchedulingProblem::default()
    }
}

fn error_of(problem: &SchedulingProblem) -> ValidationError {
    validate_problem(problem).expect_err("problem should be rejected")
}

#[test]
fn test_valid_problem_is_prepared() {
    let problem = valid_problem();
    let prepared = validate_problem(&problem).unwrap();

    assert_eq!(prepared.games.len(), 1);
    assert!(prepared.games[0].earliest_start.is_none());
    assert_eq!(prepared.field_slots[0].window.start.to_rfc3339(), "2025-05-05T09:00:00+00:00");
    assert!(prepared.season.start < prepared.season.end);
}

#[test]
fn test_presence_checks() {
    let mut problem = valid_problem();
    problem.season = None;
    assert_eq!(error_of(&problem), ValidationError::MissingSeason);

    let mut problem = valid_problem();
    problem.games.clear();
    assert_eq!(error_of(&problem), ValidationError::NoGames);

    let mut problem = valid_problem();
    problem.field_slots.clear();
    assert_eq!(error_of(&problem), ValidationError::NoFieldSlots);
}

#[test]
fn test_presence_checked_before_dates() {
    let mut problem = valid_problem();
    problem.games.clear();
    problem.field_slots[0].start_time = "garbage".to_string();
    assert_eq!(error_of(&problem), ValidationError::NoGames);
}

#[test]
fn test_unparseable_dates() {
    let mut problem = valid_problem();
    problem.games[0].earliest_start = Some("next tuesday".to_string());
    assert_eq!(
        error_of(&problem),
        ValidationError::InvalidDateTime {
            field: "game g1 earliestStart".to_string(),
            value: "next tuesday".to_string(),
        }
    );

    let mut problem = valid_problem();
    problem.team_blackouts.push(TeamBlackout {
        team_season_id: "t1".to_string(),
        start_time: "2025-05-05T09:00:00Z".to_string(),
        end_time: "2025-02-30".to_string(),
    });
    assert!(matches!(
        error_of(&problem),
        ValidationError::InvalidDateTime { field, .. } if field == "blackout for team t1 endTime"
    ));
}

#[test]
fn test_dates_checked_before_ordering() {
    let mut problem = valid_problem();
    problem.season.as_mut().unwrap().end_date = "2025-01-01".to_string();
    problem.field_slots[0].end_time = "not a date".to_string();
    assert!(matches!(
        error_of(&problem),
        ValidationError::InvalidDateTime { .. }
    ));
}

#[test]
fn test_ordering_checks() {
    let mut problem = valid_problem();
    problem.season.as_mut().unwrap().end_date = "2025-04-01".to_string();
    assert_eq!(error_of(&problem), ValidationError::SeasonBoundsInverted);

    // A single-day season is fine
    let mut problem = valid_problem();
    problem.season.as_mut().unwrap().end_date = "2025-05-01".to_string();
    assert!(validate_problem(&problem).is_ok());

    let mut problem = valid_problem();
    problem.games[0] = GameRequest::new("g1", "t1", "t2")
        .with_window("2025-05-06T00:00:00Z", "2025-05-05T00:00:00Z");
    assert_eq!(
        error_of(&problem),
        ValidationError::GameWindowInverted {
            game_id: "g1".to_string()
        }
    );

    let mut problem = valid_problem();
    problem.field_slots[0].end_time = problem.field_slots[0].start_time.clone();
    assert_eq!(
        error_of(&problem),
        ValidationError::EmptyInterval {
            kind: "Field slot".to_string(),
            id: "s1".to_string(),
        }
    );

    let mut problem = valid_problem();
    problem.umpire_availability.push(UmpireAvailability {
        umpire_id: "u1".to_string(),
        start_time: "2025-05-05T12:00:00Z".to_string(),
        end_time: "2025-05-05T08:00:00Z".to_string(),
    });
    assert_eq!(
        error_of(&problem),
        ValidationError::EmptyInterval {
            kind: "Umpire availability".to_string(),
            id: "u1".to_string(),
        }
    );
}

#[test]
fn test_zero_duration_rejected() {
    let mut problem = valid_problem();
    problem.games[0] = GameRequest::new("g1", "t1", "t2").with_duration(0);
    assert_eq!(
        error_of(&problem),
        ValidationError::InvalidDuration {
            game_id: "g1".to_string()
        }
    );
}

#[test]
fn test_duplicates_collected_and_sorted() {
    let mut problem = valid_problem();
    problem.team_seasons.push("t2".to_string());
    problem.fields.push(Field::new("f1"));
    problem.umpires.push(Umpire::new("u1"));
    problem.umpires.push(Umpire::new("u1"));

    let err = error_of(&problem);
    assert_eq!(
        err,
        ValidationError::DuplicateIds {
            ids: vec![
                "field:f1".to_string(),
                "team season:t2".to_string(),
                "umpire:u1".to_string(),
            ]
        }
    );
    assert_eq!(
        err.to_string(),
        "Duplicate identifiers: field:f1, team season:t2, umpire:u1"
    );
}

#[test]
fn test_duplicate_games_and_slots() {
    let mut problem = valid_problem();
    problem.games.push(GameRequest::new("g1", "t2", "t1"));
    problem.field_slots.push(problem.field_slots[0].clone());

    assert_eq!(
        error_of(&problem),
        ValidationError::DuplicateIds {
            ids: vec!["field slot:s1".to_string(), "game:g1".to_string()]
        }
    );
}

#[test]
fn test_unknown_references() {
    let mut problem = valid_problem();
    problem.games[0] = GameRequest::new("g1", "t1", "t9");
    assert_eq!(
        error_of(&problem),
        ValidationError::UnknownTeamSeason {
            owner: "Game g1".to_string(),
            team_season_id: "t9".to_string(),
        }
    );

    let mut problem = valid_problem();
    problem.games[0] = GameRequest::new("g1", "t1", "t2").with_preferred_fields(&["f9"]);
    assert_eq!(
        error_of(&problem),
        ValidationError::UnknownField {
            owner: "Game g1".to_string(),
            field_id: "f9".to_string(),
        }
    );

    let mut problem = valid_problem();
    problem.field_slots[0].field_id = "f9".to_string();
    assert_eq!(
        error_of(&problem).to_string(),
        "Field slot s1 references unknown field f9"
    );

    let mut problem = valid_problem();
    problem.team_blackouts.push(TeamBlackout {
        team_season_id: "t9".to_string(),
        start_time: "2025-05-05T09:00:00Z".to_string(),
        end_time: "2025-05-05T10:00:00Z".to_string(),
    });
    assert_eq!(
        error_of(&problem).to_string(),
        "Team blackout references unknown team season t9"
    );

    let mut problem = valid_problem();
    problem.umpire_availability.push(UmpireAvailability {
        umpire_id: "u9".to_string(),
        start_time: "2025-05-05T09:00:00Z".to_string(),
        end_time: "2025-05-05T10:00:00Z".to_string(),
    });
    assert_eq!(
        error_of(&problem),
        ValidationError::UnknownUmpire {
            umpire_id: "u9".to_string()
        }
    );
}

#[test]
fn test_team_cannot_play_itself() {
    let mut problem = valid_problem();
    problem.games[0] = GameRequest::new("g1", "t1", "t1");
    assert_eq!(
        error_of(&problem),
        ValidationError::SameTeams {
            game_id: "g1".to_string()
        }
    );
}

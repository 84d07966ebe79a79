//! Unit tests for the apply pipeline

use super::*;
use crate::model::time::parse_instant;
use crate::model::{ConstraintOverrides, LightsRequirement};
use crate::storage::{FieldRecord, GameRecord, ScheduleDatabase};

/// Delegates to a SQLite database and counts writes
struct CountingRepository {
    inner: ScheduleDatabase,
    writes: usize,
}

impl ScheduleRepository for CountingRepository {
    fn find_game(&self, account_id: &AccountId, game_id: &str) -> Result<Option<GameRecord>> {
        self.inner.find_game(account_id, game_id)
    }

    fn find_field(&self, account_id: &AccountId, field_id: &str) -> Result<Option<FieldRecord>> {
        self.inner.find_field(account_id, field_id)
    }

    fn count_field_bookings(
        &self,
        account_id: &AccountId,
        field_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.inner
            .count_field_bookings(account_id, field_id, window, exclude_game_id)
    }

    fn count_team_bookings(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.inner
            .count_team_bookings(account_id, team_season_id, window, exclude_game_id)
    }

    fn count_umpire_bookings(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.inner
            .count_umpire_bookings(account_id, umpire_id, window, exclude_game_id)
    }

    fn count_team_games_in_range(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.inner
            .count_team_games_in_range(account_id, team_season_id, range, exclude_game_id)
    }

    fn count_umpire_games_in_range(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.inner
            .count_umpire_games_in_range(account_id, umpire_id, range, exclude_game_id)
    }

    fn update_game_assignment(
        &mut self,
        account_id: &AccountId,
        game_id: &str,
        update: &GameAssignmentUpdate,
    ) -> Result<GameRecord> {
        self.writes += 1;
        self.inner.update_game_assignment(account_id, game_id, update)
    }
}

fn acme() -> AccountId {
    AccountId::new("acme")
}

fn field(id: &str, has_lights: bool) -> FieldRecord {
    FieldRecord {
        field_id: id.to_string(),
        name: None,
        has_lights,
        max_parallel_games: 1,
    }
}

fn game(id: &str, home: &str, visitor: &str) -> GameRecord {
    GameRecord {
        game_id: id.to_string(),
        season_id: "spring".to_string(),
        home_team_season_id: home.to_string(),
        visitor_team_season_id: visitor.to_string(),
        field_id: None,
        start_time: None,
        end_time: None,
        umpire_ids: Vec::new(),
        updated_at: 0,
    }
}

fn placed(
    id: &str,
    home: &str,
    visitor: &str,
    field_id: &str,
    start: &str,
    end: &str,
    umpires: &[&str],
) -> GameRecord {
    GameRecord {
        field_id: Some(field_id.to_string()),
        start_time: parse_instant(start),
        end_time: parse_instant(end),
        umpire_ids: umpires.iter().map(|u| u.to_string()).collect(),
        ..game(id, home, visitor)
    }
}

/// Fields f1 (unlit) and f2 (lit); unscheduled games g1..g3 plus g9 already
/// on f1 Monday 09:00-10:00 with umpire u9.
fn repository() -> CountingRepository {
    let mut db = ScheduleDatabase::new_in_memory().unwrap();
    let account = acme();
    db.upsert_field(&account, &field("f1", false)).unwrap();
    db.upsert_field(&account, &field("f2", true)).unwrap();
    db.upsert_game(&account, &game("g1", "t1", "t2")).unwrap();
    db.upsert_game(&account, &game("g2", "t3", "t4")).unwrap();
    db.upsert_game(&account, &game("g3", "t1", "t5")).unwrap();
    db.upsert_game(
        &account,
        &placed(
            "g9",
            "t7",
            "t8",
            "f1",
            "2025-05-05T09:00:00Z",
            "2025-05-05T10:00:00Z",
            &["u9"],
        ),
    )
    .unwrap();
    CountingRepository {
        inner: db,
        writes: 0,
    }
}

fn assignment(game_id: &str, field_id: &str, start: &str, end: &str) -> Assignment {
    Assignment::new(game_id, field_id, start, end)
}

fn apply(repo: &mut CountingRepository, request: &ApplyRequest) -> ApplyResult {
    apply_proposal(repo, &acme(), request, None).unwrap()
}

fn skip_reason<'a>(result: &'a ApplyResult, game_id: &str) -> &'a str {
    &result
        .skipped
        .iter()
        .find(|s| s.game_id == game_id)
        .unwrap_or_else(|| panic!("{} was not skipped", game_id))
        .reason
}

#[test]
fn test_apply_all_writes_assignments() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")
                .with_umpires(&["u1"]),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Applied);
    assert_eq!(result.run_id, "run-1");
    assert_eq!(result.applied_game_ids, vec!["g1"]);
    assert_eq!(repo.writes, 1);

    let stored = repo.find_game(&acme(), "g1").unwrap().unwrap();
    assert_eq!(stored.field_id.as_deref(), Some("f2"));
    assert_eq!(stored.umpire_ids, vec!["u1"]);
}

#[test]
fn test_partial_application_on_field_conflict() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z"),
            assignment("g2", "f1", "2025-05-05T09:30:00Z", "2025-05-05T10:30:00Z"),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Partial);
    assert_eq!(result.applied_game_ids, vec!["g1"]);
    assert_eq!(
        skip_reason(&result, "g2"),
        "Field is already booked for this date and time"
    );
    assert_eq!(repo.writes, 1);
}

#[test]
fn test_earlier_assignment_in_batch_wins() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g2", "f2", "2025-05-05T12:00:00Z", "2025-05-05T13:00:00Z"),
            assignment("g1", "f2", "2025-05-05T12:00:00Z", "2025-05-05T13:00:00Z"),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.applied_game_ids, vec!["g2"]);
    assert_eq!(
        skip_reason(&result, "g1"),
        "Field is already booked for this date and time"
    );
}

#[test]
fn test_subset_mode_missing_assignment() {
    let mut repo = repository();
    let request = ApplyRequest::subset(
        "run-1",
        &["g1", "g2"],
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z"),
            assignment("g3", "f2", "2025-05-05T11:00:00Z", "2025-05-05T12:00:00Z"),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Partial);
    assert_eq!(result.applied_game_ids, vec!["g1"]);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(
        skip_reason(&result, "g2"),
        "No assignment provided for requested gameId"
    );
    // g3 was not requested, so it was never attempted
    assert!(repo.find_game(&acme(), "g3").unwrap().unwrap().field_id.is_none());
}

#[test]
fn test_subset_mode_requires_game_ids() {
    let mut repo = repository();
    let mut request = ApplyRequest::all("run-1", Vec::new());
    request.mode = ApplyMode::Subset;

    match apply_proposal(&mut repo, &acme(), &request, None) {
        Err(SchedulerError::InvalidRequest { message }) => assert!(message.contains("gameIds")),
        other => panic!("Expected InvalidRequest error, got {:?}", other),
    }
}

#[test]
fn test_lights_requirement() {
    let mut repo = repository();
    let lights = ConstraintOverrides {
        require_lights_after: Some(LightsRequirement::after(18, "America/New_York")),
        ..ConstraintOverrides::default()
    };
    // 22:30Z is 18:30 in New York
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f1", "2025-05-05T22:30:00Z", "2025-05-05T23:30:00Z"),
            assignment("g2", "f2", "2025-05-05T22:30:00Z", "2025-05-05T23:30:00Z"),
        ],
    )
    .with_constraints(lights);

    let result = apply(&mut repo, &request);
    assert_eq!(result.applied_game_ids, vec!["g2"]);
    assert_eq!(
        skip_reason(&result, "g1"),
        "Field has no lights for games starting at or after 18:00 local time"
    );
}

#[test]
fn test_team_daily_limit() {
    let mut repo = repository();
    repo.inner
        .upsert_game(
            &acme(),
            &placed(
                "d1",
                "t1",
                "t6",
                "f2",
                "2025-05-06T09:00:00Z",
                "2025-05-06T10:00:00Z",
                &[],
            ),
        )
        .unwrap();
    repo.inner
        .upsert_game(
            &acme(),
            &placed(
                "d2",
                "t6",
                "t1",
                "f2",
                "2025-05-06T11:00:00Z",
                "2025-05-06T12:00:00Z",
                &[],
            ),
        )
        .unwrap();

    let request = ApplyRequest::all(
        "run-1",
        vec![assignment("g1", "f2", "2025-05-06T14:00:00Z", "2025-05-06T15:00:00Z")],
    )
    .with_constraints(ConstraintOverrides {
        max_games_per_team_per_day: Some(2),
        ..ConstraintOverrides::default()
    });

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Failed);
    assert_eq!(
        skip_reason(&result, "g1"),
        "Team t1 has reached the maximum games per day"
    );

    // The next UTC day starts a fresh count
    let next_day = ApplyRequest::all(
        "run-1",
        vec![assignment("g1", "f2", "2025-05-07T14:00:00Z", "2025-05-07T15:00:00Z")],
    )
    .with_constraints(request.hard_constraints.clone());
    assert_eq!(apply(&mut repo, &next_day).status, ApplyStatus::Applied);
}

#[test]
fn test_umpire_daily_limit() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T11:00:00Z", "2025-05-05T12:00:00Z")
                .with_umpires(&["u9"]),
            assignment("g2", "f2", "2025-05-05T13:00:00Z", "2025-05-05T14:00:00Z")
                .with_umpires(&["u9"]),
        ],
    )
    .with_constraints(ConstraintOverrides {
        max_games_per_umpire_per_day: Some(2),
        ..ConstraintOverrides::default()
    });

    // u9 already works g9 that day, so only one more game fits
    let result = apply(&mut repo, &request);
    assert_eq!(result.applied_game_ids, vec!["g1"]);
    assert_eq!(
        skip_reason(&result, "g2"),
        "Umpire u9 has reached the maximum games per day"
    );
}

#[test]
fn test_team_and_umpire_overlap() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z"),
            assignment("g3", "f2", "2025-05-05T09:30:00Z", "2025-05-05T10:30:00Z"),
            assignment("g2", "f2", "2025-05-05T11:00:00Z", "2025-05-05T12:00:00Z"),
        ],
    );
    let result = apply(&mut repo, &request);
    assert_eq!(
        skip_reason(&result, "g3"),
        "Field is already booked for this date and time"
    );

    let mut repo = repository();
    let roomy = FieldRecord {
        max_parallel_games: 2,
        ..field("f2", true)
    };
    repo.inner.upsert_field(&acme(), &roomy).unwrap();
    let result = apply(&mut repo, &request);
    assert_eq!(
        skip_reason(&result, "g3"),
        "Team t1 already has a game at this date and time"
    );

    let umpire_clash = ApplyRequest::all(
        "run-2",
        vec![
            assignment("g2", "f2", "2025-05-05T09:15:00Z", "2025-05-05T10:15:00Z")
                .with_umpires(&["u9"]),
        ],
    );
    let result = apply(&mut repo, &umpire_clash);
    assert_eq!(
        skip_reason(&result, "g2"),
        "Umpire u9 already has a game at this date and time"
    );
}

#[test]
fn test_disabled_overlap_checks() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![assignment("g1", "f1", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")],
    )
    .with_constraints(ConstraintOverrides {
        no_field_overlap: Some(false),
        ..ConstraintOverrides::default()
    });

    assert_eq!(apply(&mut repo, &request).status, ApplyStatus::Applied);
}

#[test]
fn test_season_mismatch_fails_without_write() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")],
    );
    let context = ApplyContext {
        season_id: Some("fall".to_string()),
    };

    let result = apply_proposal(&mut repo, &acme(), &request, Some(&context)).unwrap();
    assert_eq!(result.status, ApplyStatus::Failed);
    assert_eq!(
        skip_reason(&result, "g1"),
        "Game is not in the requested season"
    );
    assert_eq!(repo.writes, 0);

    let context = ApplyContext {
        season_id: Some("spring".to_string()),
    };
    let result = apply_proposal(&mut repo, &acme(), &request, Some(&context)).unwrap();
    assert_eq!(result.status, ApplyStatus::Applied);
}

#[test]
fn test_subsecond_assignment_is_idempotent() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00.500Z", "2025-05-05T10:00:00Z")
                .with_umpires(&["u1"]),
        ],
    );

    let first = apply(&mut repo, &request);
    let second = apply(&mut repo, &request);

    assert_eq!(first.status, ApplyStatus::Applied);
    assert_eq!(second.status, ApplyStatus::Applied);
    assert_eq!(repo.writes, 1);

    let stored = repo.find_game(&acme(), "g1").unwrap().unwrap();
    assert_eq!(stored.start_time, parse_instant("2025-05-05T09:00:00.500Z"));
}

#[test]
fn test_apply_is_idempotent() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")
                .with_umpires(&["u1", "u2"]),
        ],
    );

    let first = apply(&mut repo, &request);
    let second = apply(&mut repo, &request);

    assert_eq!(first.status, ApplyStatus::Applied);
    assert_eq!(second.status, ApplyStatus::Applied);
    assert_eq!(second.applied_game_ids, vec!["g1"]);
    assert_eq!(repo.writes, 1);
}

#[test]
fn test_moving_a_game_ignores_its_own_booking() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g9", "f1", "2025-05-05T09:30:00Z", "2025-05-05T10:30:00Z")
                .with_umpires(&["u9"]),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Applied);
    assert_eq!(repo.writes, 1);
}

#[test]
fn test_missing_entities_are_skipped() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("nope", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z"),
            assignment("g1", "f9", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z"),
            assignment("g2", "f2", "2025-05-05T12:00:00Z", "2025-05-05T13:00:00Z"),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Partial);
    assert_eq!(skip_reason(&result, "nope"), "Game not found");
    assert_eq!(skip_reason(&result, "g1"), "Field f9 not found");
    assert_eq!(result.applied_game_ids, vec!["g2"]);
}

#[test]
fn test_malformed_assignments_are_skipped() {
    let mut repo = repository();
    let request = ApplyRequest::all(
        "run-1",
        vec![
            assignment("g1", "f2", "yesterday", "2025-05-05T10:00:00Z"),
            assignment("g2", "f2", "2025-05-05T10:00:00Z", "2025-05-05T09:00:00Z"),
            assignment("g3", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")
                .with_umpires(&["u1", "u2", "u3", "u4", "u5"]),
            assignment("g9", "f1", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")
                .with_umpires(&["u1", "u1"]),
        ],
    );

    let result = apply(&mut repo, &request);
    assert_eq!(result.status, ApplyStatus::Failed);
    assert_eq!(skip_reason(&result, "g1"), "Assignment has an invalid time window");
    assert_eq!(skip_reason(&result, "g2"), "Assignment has an invalid time window");
    assert_eq!(
        skip_reason(&result, "g3"),
        "Too many umpires for one game (max 4)"
    );
    assert_eq!(
        skip_reason(&result, "g9"),
        "Umpire u1 is listed more than once"
    );
    assert_eq!(repo.writes, 0);
}

#[test]
fn test_empty_batch_is_applied() {
    let mut repo = repository();
    let result = apply(&mut repo, &ApplyRequest::all("run-1", Vec::new()));
    assert_eq!(result.status, ApplyStatus::Applied);
    assert!(result.applied_game_ids.is_empty());
}

#[test]
fn test_apply_status() {
    assert_eq!(apply_status(3, 0), ApplyStatus::Applied);
    assert_eq!(apply_status(0, 0), ApplyStatus::Applied);
    assert_eq!(apply_status(0, 2), ApplyStatus::Failed);
    assert_eq!(apply_status(1, 2), ApplyStatus::Partial);
}

#[test]
fn test_storage_errors_propagate() {
    struct BrokenRepository;

    impl ScheduleRepository for BrokenRepository {
        fn find_game(&self, _: &AccountId, _: &str) -> Result<Option<GameRecord>> {
            Err(SchedulerError::Database {
                message: "connection lost".to_string(),
            })
        }
        fn find_field(&self, _: &AccountId, _: &str) -> Result<Option<FieldRecord>> {
            unreachable!()
        }
        fn count_field_bookings(&self, _: &AccountId, _: &str, _: &Interval, _: &str) -> Result<u32> {
            unreachable!()
        }
        fn count_team_bookings(&self, _: &AccountId, _: &str, _: &Interval, _: &str) -> Result<u32> {
            unreachable!()
        }
        fn count_umpire_bookings(&self, _: &AccountId, _: &str, _: &Interval, _: &str) -> Result<u32> {
            unreachable!()
        }
        fn count_team_games_in_range(&self, _: &AccountId, _: &str, _: &Interval, _: &str) -> Result<u32> {
            unreachable!()
        }
        fn count_umpire_games_in_range(&self, _: &AccountId, _: &str, _: &Interval, _: &str) -> Result<u32> {
            unreachable!()
        }
        fn update_game_assignment(
            &mut self,
            _: &AccountId,
            _: &str,
            _: &GameAssignmentUpdate,
        ) -> Result<GameRecord> {
            unreachable!()
        }
    }

    let request = ApplyRequest::all(
        "run-1",
        vec![assignment("g1", "f2", "2025-05-05T09:00:00Z", "2025-05-05T10:00:00Z")],
    );
    let err = apply_proposal(&mut BrokenRepository, &acme(), &request, None).unwrap_err();
    assert!(matches!(err, SchedulerError::Database { .. }));
}

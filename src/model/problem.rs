//! Problem specification consumed by the solver.
//!
//! Date/time values stay as strings here; `scheduling::validation` parses them
//! and rejects anything malformed before the search starts.

use super::ids::{FieldId, GameId, TeamSeasonId, UmpireId};
use serde::{Deserialize, Serialize};

/// Calendar bounds and default game lengths for one season
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub default_game_duration_minutes: Option<u32>,
    #[serde(default)]
    pub weekday_game_duration_minutes: Option<u32>,
    #[serde(default)]
    pub weekend_game_duration_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    #[serde(default)]
    pub has_lights: bool,
    #[serde(default = "default_parallel_games")]
    pub max_parallel_games: u32,
}

fn default_parallel_games() -> u32 {
    1
}

impl Field {
    pub fn new(id: impl Into<FieldId>) -> Self {
        Self {
            id: id.into(),
            has_lights: false,
            max_parallel_games: 1,
        }
    }

    pub fn with_lights(mut self) -> Self {
        self.has_lights = true;
        self
    }

    pub fn with_capacity(mut self, max_parallel_games: u32) -> Self {
        self.max_parallel_games = max_parallel_games;
        self
    }

    /// Parallel game capacity, never below one.
    pub fn capacity(&self) -> u32 {
        self.max_parallel_games.max(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Umpire {
    pub id: UmpireId,
    #[serde(default)]
    pub max_games_per_day: Option<u32>,
}

impl Umpire {
    pub fn new(id: impl Into<UmpireId>) -> Self {
        Self {
            id: id.into(),
            max_games_per_day: None,
        }
    }

    pub fn with_max_games_per_day(mut self, max: u32) -> Self {
        self.max_games_per_day = Some(max);
        self
    }
}

/// A game waiting for a field, a start time, and umpires
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRequest {
    pub id: GameId,
    pub home_team_season_id: TeamSeasonId,
    pub visitor_team_season_id: TeamSeasonId,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub earliest_start: Option<String>,
    #[serde(default)]
    pub latest_end: Option<String>,
    #[serde(default)]
    pub preferred_field_ids: Vec<FieldId>,
    #[serde(default)]
    pub required_umpires: Option<u32>,
}

impl GameRequest {
    pub fn new(
        id: impl Into<GameId>,
        home: impl Into<TeamSeasonId>,
        visitor: impl Into<TeamSeasonId>,
    ) -> Self {
        Self {
            id: id.into(),
            home_team_season_id: home.into(),
            visitor_team_season_id: visitor.into(),
            duration_minutes: None,
            earliest_start: None,
            latest_end: None,
            preferred_field_ids: Vec::new(),
            required_umpires: None,
        }
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    pub fn with_window(mut self, earliest_start: &str, latest_end: &str) -> Self {
        self.earliest_start = Some(earliest_start.to_string());
        self.latest_end = Some(latest_end.to_string());
        self
    }

    pub fn with_preferred_fields(mut self, field_ids: &[&str]) -> Self {
        self.preferred_field_ids = field_ids.iter().map(|id| id.to_string()).collect();
        self
    }

    pub fn with_required_umpires(mut self, count: u32) -> Self {
        self.required_umpires = Some(count);
        self
    }

    /// Umpires needed for this game (one unless stated otherwise).
    pub fn umpires_needed(&self) -> usize {
        self.required_umpires.unwrap_or(1) as usize
    }
}

/// A bookable window on one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSlot {
    pub id: String,
    pub field_id: FieldId,
    pub start_time: String,
    pub end_time: String,
}

impl FieldSlot {
    pub fn new(id: impl Into<String>, field_id: impl Into<FieldId>, start: &str, end: &str) -> Self {
        Self {
            id: id.into(),
            field_id: field_id.into(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBlackout {
    pub team_season_id: TeamSeasonId,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UmpireAvailability {
    pub umpire_id: UmpireId,
    pub start_time: String,
    pub end_time: String,
}

/// Fields without lights may not host games starting at or after
/// `start_hour_local` on the wall clock of `time_zone`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightsRequirement {
    #[serde(default)]
    pub enabled: bool,
    pub start_hour_local: u32,
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

fn default_time_zone() -> String {
    "UTC".to_string()
}

impl LightsRequirement {
    pub fn after(start_hour_local: u32, time_zone: &str) -> Self {
        Self {
            enabled: true,
            start_hour_local,
            time_zone: time_zone.to_string(),
        }
    }
}

/// Caller-supplied hard constraint switches.
///
/// Every field is optional; unset fields fall back to the engine defaults when
/// resolved into `scheduling::HardConstraints`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_field_slots: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_team_blackouts: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_umpire_availability: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_field_overlap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_team_overlap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_umpire_overlap: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_games_per_team_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_games_per_umpire_per_day: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_lights_after: Option<LightsRequirement>,
}

/// Everything the solver needs for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingProblem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    #[serde(default)]
    pub season: Option<Season>,
    #[serde(default)]
    pub team_seasons: Vec<TeamSeasonId>,
    #[serde(default)]
    pub fields: Vec<Field>,
    #[serde(default)]
    pub umpires: Vec<Umpire>,
    #[serde(default)]
    pub games: Vec<GameRequest>,
    #[serde(default)]
    pub field_slots: Vec<FieldSlot>,
    #[serde(default)]
    pub team_blackouts: Vec<TeamBlackout>,
    #[serde(default)]
    pub umpire_availability: Vec<UmpireAvailability>,
    #[serde(default)]
    pub hard_constraints: ConstraintOverrides,
}

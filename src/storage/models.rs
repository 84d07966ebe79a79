//! Data models for the storage layer

use crate::model::{FieldId, GameId, Interval, TeamSeasonId, UmpireId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Umpire columns on a persisted game
pub const UMPIRE_SLOTS: usize = 4;

/// Field information stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRecord {
    pub field_id: FieldId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub has_lights: bool,
    #[serde(default = "default_parallel_games")]
    pub max_parallel_games: u32,
}

fn default_parallel_games() -> u32 {
    1
}

impl FieldRecord {
    /// Parallel game capacity, never below one.
    pub fn capacity(&self) -> u32 {
        self.max_parallel_games.max(1)
    }
}

/// A game row, scheduled or not
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub game_id: GameId,
    pub season_id: String,
    pub home_team_season_id: TeamSeasonId,
    pub visitor_team_season_id: TeamSeasonId,
    #[serde(default)]
    pub field_id: Option<FieldId>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// Filled umpire slots, in slot order.
    #[serde(default)]
    pub umpire_ids: Vec<UmpireId>,
    #[serde(default)]
    pub updated_at: i64,
}

impl GameRecord {
    /// `true` when the row already holds exactly this field, window, and crew.
    pub fn matches(&self, field_id: &str, window: &Interval, umpire_ids: &[String]) -> bool {
        self.field_id.as_deref() == Some(field_id)
            && self.start_time == Some(window.start)
            && self.end_time == Some(window.end)
            && self.umpire_ids == umpire_ids
    }
}

/// New placement for one game
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameAssignmentUpdate {
    pub field_id: FieldId,
    pub window: Interval,
    /// Unused slots are `None` and get cleared.
    pub umpire_slots: [Option<UmpireId>; UMPIRE_SLOTS],
}

impl GameAssignmentUpdate {
    /// Returns `None` when the crew does not fit in the umpire slots.
    pub fn new(field_id: &str, window: Interval, umpire_ids: &[String]) -> Option<Self> {
        if umpire_ids.len() > UMPIRE_SLOTS {
            return None;
        }
        let mut umpire_slots: [Option<UmpireId>; UMPIRE_SLOTS] = Default::default();
        for (slot, umpire) in umpire_slots.iter_mut().zip(umpire_ids) {
            *slot = Some(umpire.clone());
        }
        Some(Self {
            field_id: field_id.to_string(),
            window,
            umpire_slots,
        })
    }
}

/// Fields and games loaded by `league-scheduler import`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    #[serde(default)]
    pub fields: Vec<FieldRecord>,
    #[serde(default)]
    pub games: Vec<GameRecord>,
}

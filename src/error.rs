//! Error types for the league scheduler

use thiserror::Error;


pub type Result<T> = std::result::Result<T, SchedulerError>;

#[derive(Error, Debug)]
pub enum SchedulerError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Account ID not provided and {env_var} environment variable not set")]
    MissingAccountId { env_var: String },

    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

/// Structural problems found in a scheduling problem before any search runs.
///
/// Each variant names the rule that was violated so callers can react to the
/// kind of mistake rather than parse a message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Season is required")]
    MissingSeason,

    #[error("At least one game is required")]
    NoGames,

    #[error("At least one field slot is required")]
    NoFieldSlots,

    #[error("Invalid date/time for {field}: {value:?}")]
    InvalidDateTime { field: String, value: String },

    #[error("Season start must not be after season end")]
    SeasonBoundsInverted,

    #[error("Game {game_id}: earliestStart must not be after latestEnd")]
    GameWindowInverted { game_id: String },

    #[error("{kind} {id}: start must be before end")]
    EmptyInterval { kind: String, id: String },

    #[error("Game {game_id}: durationMinutes must be positive")]
    InvalidDuration { game_id: String },

    #[error("Duplicate identifiers: {}", ids.join(", "))]
    DuplicateIds { ids: Vec<String> },

    #[error("{owner} references unknown team season {team_season_id}")]
    UnknownTeamSeason {
        owner: String,
        team_season_id: String,
    },

    #[error("{owner} references unknown field {field_id}")]
    UnknownField { owner: String, field_id: String },

    #[error("Availability references unknown umpire {umpire_id}")]
    UnknownUmpire { umpire_id: String },

    #[error("Game {game_id}: home and visitor team season must differ")]
    SameTeams { game_id: String },

    #[error("Unknown time zone: {zone}")]
    InvalidTimeZone { zone: String },

    #[error("Lights start hour must be between 0 and 23, got {hour}")]
    InvalidLightsHour { hour: u32 },
}

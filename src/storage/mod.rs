//! Storage layer for persisted games and fields
//!
//! The apply pipeline only talks to storage through [`ScheduleRepository`],
//! so an owning service can plug in its own datastore. The bundled
//! implementation is a SQLite database:
//! - `models`: Persisted records and the assignment update
//! - `schema`: Database connection and schema management
//! - `queries`: Repository queries and seeding helpers

pub mod models;
pub mod queries;
pub mod schema;


use crate::error::Result;
use crate::model::{AccountId, Interval};

// Re-export the main types and database struct for easy access
pub use models::*;
pub use schema::ScheduleDatabase;

/// Reads and writes the apply pipeline needs from persisted state.
///
/// Every call is scoped to an account. Booking counts take the exact window
/// being validated and leave out `exclude_game_id`, so a game never
/// conflicts with its own earlier placement.
pub trait ScheduleRepository {
    /// Game by id, or `None` when the account has no such game.
    fn find_game(&self, account_id: &AccountId, game_id: &str) -> Result<Option<GameRecord>>;

    /// Field metadata (lights, parallel capacity) by id.
    fn find_field(&self, account_id: &AccountId, field_id: &str) -> Result<Option<FieldRecord>>;

    /// Games on `field_id` overlapping `window`.
    fn count_field_bookings(
        &self,
        account_id: &AccountId,
        field_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32>;

    /// Games involving `team_season_id` (home or visitor) overlapping `window`.
    fn count_team_bookings(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32>;

    /// Games with `umpire_id` in any umpire slot overlapping `window`.
    fn count_umpire_bookings(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32>;

    /// Games involving `team_season_id` starting inside `range`.
    fn count_team_games_in_range(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32>;

    /// Games officiated by `umpire_id` starting inside `range`.
    fn count_umpire_games_in_range(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32>;

    /// Write field, time, and umpire slots of one game; returns the new record.
    fn update_game_assignment(
        &mut self,
        account_id: &AccountId,
        game_id: &str,
        update: &GameAssignmentUpdate,
    ) -> Result<GameRecord>;
}

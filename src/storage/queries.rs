//! Repository queries over the SQLite database

use super::{models::*, schema::ScheduleDatabase, ScheduleRepository};
use crate::error::Result;
use crate::model::{AccountId, Interval};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

const GAME_COLUMNS: &str = "game_id, season_id, home_team_season_id, visitor_team_season_id,
     field_id, start_time, end_time, umpire1, umpire2, umpire3, umpire4, updated_at";

/// Overlap with `[?start, ?end)` for rows that have a placement
const OVERLAPS_WINDOW: &str = "start_time IS NOT NULL AND end_time IS NOT NULL
     AND start_time < ?5 AND end_time > ?4";

impl ScheduleDatabase {
    /// Insert or update a field
    pub fn upsert_field(&mut self, account_id: &AccountId, field: &FieldRecord) -> Result<()> {
        write_field(&self.conn, account_id, field)
    }

    /// Insert or replace a game, including any placement it already has
    pub fn upsert_game(&mut self, account_id: &AccountId, game: &GameRecord) -> Result<()> {
        write_game(&self.conn, account_id, game)
    }

    /// Load fields and games from a seed file into `account_id`
    pub fn import_seed(&mut self, account_id: &AccountId, seed: &SeedData) -> Result<()> {
        let tx = self.conn.transaction()?;
        for field in &seed.fields {
            write_field(&tx, account_id, field)?;
        }
        for game in &seed.games {
            write_game(&tx, account_id, game)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Games of an account, scheduled ones first in start order
    pub fn list_games(
        &self,
        account_id: &AccountId,
        season_id: Option<&str>,
    ) -> Result<Vec<GameRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GAME_COLUMNS}
             FROM games
             WHERE account_id = ?1 AND (?2 IS NULL OR season_id = ?2)
             ORDER BY start_time IS NULL, start_time, game_id"
        ))?;

        let rows = stmt.query_map(params![account_id.as_str(), season_id], row_to_game)?;

        let mut games = Vec::new();
        for row in rows {
            games.push(row?);
        }
        Ok(games)
    }

    fn count(&self, sql: &str, params: impl rusqlite::Params) -> Result<u32> {
        let count: i64 = self.conn.query_row(sql, params, |row| row.get(0))?;
        Ok(count.max(0) as u32)
    }
}

impl ScheduleRepository for ScheduleDatabase {
    fn find_game(&self, account_id: &AccountId, game_id: &str) -> Result<Option<GameRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GAME_COLUMNS}
             FROM games
             WHERE account_id = ? AND game_id = ?"
        ))?;

        match stmt.query_row(params![account_id.as_str(), game_id], row_to_game) {
            Ok(game) => Ok(Some(game)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn find_field(&self, account_id: &AccountId, field_id: &str) -> Result<Option<FieldRecord>> {
        let result = self.conn.query_row(
            "SELECT field_id, name, has_lights, max_parallel_games
             FROM fields
             WHERE account_id = ? AND field_id = ?",
            params![account_id.as_str(), field_id],
            |row| {
                Ok(FieldRecord {
                    field_id: row.get(0)?,
                    name: row.get(1)?,
                    has_lights: row.get(2)?,
                    max_parallel_games: row.get(3)?,
                })
            },
        );

        match result {
            Ok(field) => Ok(Some(field)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn count_field_bookings(
        &self,
        account_id: &AccountId,
        field_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.count(
            &format!(
                "SELECT COUNT(*) FROM games
                 WHERE account_id = ?1 AND field_id = ?2 AND game_id <> ?3
                 AND {OVERLAPS_WINDOW}"
            ),
            params![
                account_id.as_str(),
                field_id,
                exclude_game_id,
                window.start.timestamp_millis(),
                window.end.timestamp_millis()
            ],
        )
    }

    fn count_team_bookings(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.count(
            &format!(
                "SELECT COUNT(*) FROM games
                 WHERE account_id = ?1 AND game_id <> ?3
                 AND (home_team_season_id = ?2 OR visitor_team_season_id = ?2)
                 AND {OVERLAPS_WINDOW}"
            ),
            params![
                account_id.as_str(),
                team_season_id,
                exclude_game_id,
                window.start.timestamp_millis(),
                window.end.timestamp_millis()
            ],
        )
    }

    fn count_umpire_bookings(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        window: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.count(
            &format!(
                "SELECT COUNT(*) FROM games
                 WHERE account_id = ?1 AND game_id <> ?3
                 AND ?2 IN (umpire1, umpire2, umpire3, umpire4)
                 AND {OVERLAPS_WINDOW}"
            ),
            params![
                account_id.as_str(),
                umpire_id,
                exclude_game_id,
                window.start.timestamp_millis(),
                window.end.timestamp_millis()
            ],
        )
    }

    fn count_team_games_in_range(
        &self,
        account_id: &AccountId,
        team_season_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.count(
            "SELECT COUNT(*) FROM games
             WHERE account_id = ?1 AND game_id <> ?3
             AND (home_team_season_id = ?2 OR visitor_team_season_id = ?2)
             AND start_time >= ?4 AND start_time < ?5",
            params![
                account_id.as_str(),
                team_season_id,
                exclude_game_id,
                range.start.timestamp_millis(),
                range.end.timestamp_millis()
            ],
        )
    }

    fn count_umpire_games_in_range(
        &self,
        account_id: &AccountId,
        umpire_id: &str,
        range: &Interval,
        exclude_game_id: &str,
    ) -> Result<u32> {
        self.count(
            "SELECT COUNT(*) FROM games
             WHERE account_id = ?1 AND game_id <> ?3
             AND ?2 IN (umpire1, umpire2, umpire3, umpire4)
             AND start_time >= ?4 AND start_time < ?5",
            params![
                account_id.as_str(),
                umpire_id,
                exclude_game_id,
                range.start.timestamp_millis(),
                range.end.timestamp_millis()
            ],
        )
    }

    fn update_game_assignment(
        &mut self,
        account_id: &AccountId,
        game_id: &str,
        update: &GameAssignmentUpdate,
    ) -> Result<GameRecord> {
        let [umpire1, umpire2, umpire3, umpire4] = &update.umpire_slots;
        let rows_affected = self.conn.execute(
            "UPDATE games
             SET field_id = ?, start_time = ?, end_time = ?,
                 umpire1 = ?, umpire2 = ?, umpire3 = ?, umpire4 = ?,
                 updated_at = ?
             WHERE account_id = ? AND game_id = ?",
            params![
                update.field_id,
                update.window.start.timestamp_millis(),
                update.window.end.timestamp_millis(),
                umpire1,
                umpire2,
                umpire3,
                umpire4,
                Utc::now().timestamp(),
                account_id.as_str(),
                game_id
            ],
        )?;

        if rows_affected == 0 {
            return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }

        self.find_game(account_id, game_id)?
            .ok_or_else(|| rusqlite::Error::QueryReturnedNoRows.into())
    }
}

fn write_field(conn: &Connection, account_id: &AccountId, field: &FieldRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO fields (account_id, field_id, name, has_lights, max_parallel_games)
         VALUES (?, ?, ?, ?, ?)",
        params![
            account_id.as_str(),
            field.field_id,
            field.name,
            field.has_lights,
            field.max_parallel_games
        ],
    )?;
    Ok(())
}

fn write_game(conn: &Connection, account_id: &AccountId, game: &GameRecord) -> Result<()> {
    let umpire = |i: usize| game.umpire_ids.get(i).cloned();
    conn.execute(
        "INSERT OR REPLACE INTO games
         (account_id, game_id, season_id, home_team_season_id, visitor_team_season_id,
          field_id, start_time, end_time, umpire1, umpire2, umpire3, umpire4, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            account_id.as_str(),
            game.game_id,
            game.season_id,
            game.home_team_season_id,
            game.visitor_team_season_id,
            game.field_id,
            game.start_time.map(|t| t.timestamp_millis()),
            game.end_time.map(|t| t.timestamp_millis()),
            umpire(0),
            umpire(1),
            umpire(2),
            umpire(3),
            game.updated_at
        ],
    )?;
    Ok(())
}

/// Convert a `GAME_COLUMNS` row to a GameRecord
fn row_to_game(row: &Row) -> rusqlite::Result<GameRecord> {
    let mut umpire_ids = Vec::with_capacity(UMPIRE_SLOTS);
    for idx in 7..7 + UMPIRE_SLOTS {
        if let Some(umpire) = row.get::<_, Option<String>>(idx)? {
            umpire_ids.push(umpire);
        }
    }

    Ok(GameRecord {
        game_id: row.get(0)?,
        season_id: row.get(1)?,
        home_team_season_id: row.get(2)?,
        visitor_team_season_id: row.get(3)?,
        field_id: row.get(4)?,
        start_time: optional_timestamp(row, 5)?,
        end_time: optional_timestamp(row, 6)?,
        umpire_ids,
        updated_at: row.get(11)?,
    })
}

fn optional_timestamp(row: &Row, idx: usize) -> rusqlite::Result<Option<DateTime<Utc>>> {
    row.get::<_, Option<i64>>(idx)?
        .map(|millis| {
            DateTime::from_timestamp_millis(millis)
                .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, millis))
        })
        .transpose()
}

//! Database schema and connection management

use crate::error::{Result, SchedulerError};
use crate::DB_PATH_ENV_VAR;
use dirs::data_dir;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Database connection manager for fields and games
pub struct ScheduleDatabase {
    pub(crate) conn: Connection,
}

impl ScheduleDatabase {
    /// Open the default database and ensure tables exist
    pub fn new() -> Result<Self> {
        Self::open(&Self::database_path()?)
    }

    /// Open (or create) a database file at `path` and ensure tables exist
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure the data directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// In-memory database, mainly for tests
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Database path from `LEAGUE_SCHEDULER_DB`, else the platform data directory
    pub fn database_path() -> Result<PathBuf> {
        if let Some(path) = std::env::var_os(DB_PATH_ENV_VAR).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let data_dir = data_dir().ok_or_else(|| SchedulerError::Database {
            message: "Could not determine data directory".to_string(),
        })?;
        Ok(data_dir.join("league-scheduler").join("schedule.db"))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS fields (
                account_id TEXT NOT NULL,
                field_id TEXT NOT NULL,
                name TEXT,
                has_lights INTEGER NOT NULL DEFAULT 0,
                max_parallel_games INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (account_id, field_id)
            )",
            [],
        )?;

        // Times are UTC unix milliseconds; unscheduled games keep them NULL
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS games (
                account_id TEXT NOT NULL,
                game_id TEXT NOT NULL,
                season_id TEXT NOT NULL,
                home_team_season_id TEXT NOT NULL,
                visitor_team_season_id TEXT NOT NULL,
                field_id TEXT,
                start_time INTEGER,
                end_time INTEGER,
                umpire1 TEXT,
                umpire2 TEXT,
                umpire3 TEXT,
                umpire4 TEXT,
                updated_at INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (account_id, game_id)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_field_time
             ON games(account_id, field_id, start_time)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_games_time
             ON games(account_id, start_time)",
            [],
        )?;

        Ok(())
    }
}

//! Command implementations for the league scheduler CLI

pub mod apply;
pub mod games;
pub mod import;
pub mod solve;


use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::{error::SchedulerError, AccountId, Result, ScheduleDatabase, ACCOUNT_ID_ENV_VAR};

/// Resolve account ID from CLI argument or environment variable
pub fn resolve_account_id(account_id: Option<AccountId>) -> Result<AccountId> {
    account_id
        .or_else(|| {
            std::env::var(ACCOUNT_ID_ENV_VAR)
                .ok()
                .and_then(|s| s.parse::<AccountId>().ok())
        })
        .ok_or_else(|| SchedulerError::MissingAccountId {
            env_var: ACCOUNT_ID_ENV_VAR.to_string(),
        })
}

/// Open the database at `db`, or the configured default location
pub fn open_database(db: Option<&Path>) -> Result<ScheduleDatabase> {
    let path: PathBuf = match db {
        Some(path) => path.to_path_buf(),
        None => ScheduleDatabase::database_path()?,
    };
    ScheduleDatabase::open(&path)
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

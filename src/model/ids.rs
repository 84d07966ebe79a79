//! Identifier types for accounts and scheduling runs.

use crate::error::{Result, SchedulerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type GameId = String;
pub type FieldId = String;
pub type TeamSeasonId = String;
pub type UmpireId = String;

/// Type-safe wrapper for the account (tenant) that owns fields and games.
///
/// Every storage lookup is scoped by an account, and generated run ids carry
/// the account as a prefix.
///
/// # Examples
///
/// ```rust
/// use league_scheduler::AccountId;
///
/// let account = AccountId::new("acme");
/// assert_eq!(account.as_str(), "acme");
/// assert_eq!(account.to_string(), "acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(SchedulerError::InvalidRequest {
                message: "account id must not be empty".to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Stable identifier for one scheduling attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

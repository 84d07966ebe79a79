//! Effective hard constraints and the rejection reasons they produce.
//!
//! The solver and the apply pipeline enforce the same rules, one against the
//! in-memory booking state and one against live storage. Both report a
//! violation through [`Conflict`] so the wording stays identical.

use std::fmt;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::error::ValidationError;
use crate::model::time::local_hour;
use crate::model::ConstraintOverrides;

/// Used when neither the game nor the season names a duration.
pub const DEFAULT_GAME_DURATION_MINUTES: u32 = 60;

/// Hard constraints after caller overrides are laid over engine defaults.
///
/// Availability, field-slot, and overlap checks are on by default; daily
/// limits and the lights rule are off unless the caller sets them.
#[derive(Debug, Clone, PartialEq)]
pub struct HardConstraints {
    pub respect_field_slots: bool,
    pub respect_team_blackouts: bool,
    pub respect_umpire_availability: bool,
    pub no_field_overlap: bool,
    pub no_team_overlap: bool,
    pub no_umpire_overlap: bool,
    pub max_games_per_team_per_day: Option<u32>,
    pub max_games_per_umpire_per_day: Option<u32>,
    pub lights: Option<LightsRule>,
}

impl Default for HardConstraints {
    fn default() -> Self {
        Self {
            respect_field_slots: true,
            respect_team_blackouts: true,
            respect_umpire_availability: true,
            no_field_overlap: true,
            no_team_overlap: true,
            no_umpire_overlap: true,
            max_games_per_team_per_day: None,
            max_games_per_umpire_per_day: None,
            lights: None,
        }
    }
}

impl HardConstraints {
    /// Overlay `overrides` onto the defaults.
    ///
    /// Fails when an enabled lights rule names an unknown time zone or an
    /// hour outside 0-23.
    pub fn resolve(overrides: &ConstraintOverrides) -> Result<Self, ValidationError> {
        let defaults = Self::default();

        let lights = match &overrides.require_lights_after {
            Some(req) if req.enabled => {
                if req.start_hour_local > 23 {
                    return Err(ValidationError::InvalidLightsHour {
                        hour: req.start_hour_local,
                    });
                }
                let time_zone: Tz =
                    req.time_zone
                        .parse()
                        .map_err(|_| ValidationError::InvalidTimeZone {
                            zone: req.time_zone.clone(),
                        })?;
                Some(LightsRule {
                    start_hour_local: req.start_hour_local,
                    time_zone,
                })
            }
            _ => None,
        };

        Ok(Self {
            respect_field_slots: overrides
                .respect_field_slots
                .unwrap_or(defaults.respect_field_slots),
            respect_team_blackouts: overrides
                .respect_team_blackouts
                .unwrap_or(defaults.respect_team_blackouts),
            respect_umpire_availability: overrides
                .respect_umpire_availability
                .unwrap_or(defaults.respect_umpire_availability),
            no_field_overlap: overrides
                .no_field_overlap
                .unwrap_or(defaults.no_field_overlap),
            no_team_overlap: overrides.no_team_overlap.unwrap_or(defaults.no_team_overlap),
            no_umpire_overlap: overrides
                .no_umpire_overlap
                .unwrap_or(defaults.no_umpire_overlap),
            max_games_per_team_per_day: overrides.max_games_per_team_per_day,
            max_games_per_umpire_per_day: overrides.max_games_per_umpire_per_day,
            lights,
        })
    }

    /// Daily cap for one umpire: the tighter of its own cap and the global one.
    pub fn umpire_daily_cap(&self, own_cap: Option<u32>) -> Option<u32> {
        match (own_cap, self.max_games_per_umpire_per_day) {
            (Some(own), Some(global)) => Some(own.min(global)),
            (own, global) => own.or(global),
        }
    }

    /// The lights rule, if it applies to a game starting at `start` on a
    /// field without lights.
    pub fn lights_violation(&self, start: DateTime<Utc>, has_lights: bool) -> Option<Conflict> {
        let rule = self.lights.as_ref()?;
        (!has_lights && rule.requires_lights(start)).then(|| Conflict::LightsRequired {
            start_hour_local: rule.start_hour_local,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightsRule {
    pub start_hour_local: u32,
    pub time_zone: Tz,
}

impl LightsRule {
    pub fn requires_lights(&self, start: DateTime<Utc>) -> bool {
        local_hour(start, self.time_zone) >= self.start_hour_local
    }
}

/// `true` once `count` existing games reach `limit`.
pub fn limit_reached(count: u32, limit: Option<u32>) -> bool {
    limit.is_some_and(|limit| count >= limit)
}

/// Why a candidate placement (solver) or an assignment (apply) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Conflict {
    DurationExceedsSlot,
    OutsideGameWindow,
    TeamBlackout { team_season_id: String },
    LightsRequired { start_hour_local: u32 },
    FieldBooked,
    TeamBooked { team_season_id: String },
    UmpiresUnavailable { required: usize, available: usize },
    UmpireBooked { umpire_id: String },
    TeamDailyLimit { team_season_id: String },
    UmpireDailyLimit { umpire_id: String },
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::DurationExceedsSlot => write!(f, "Game does not fit in the field slot"),
            Conflict::OutsideGameWindow => {
                write!(f, "Slot is outside the game's allowed time window")
            }
            Conflict::TeamBlackout { team_season_id } => {
                write!(f, "Team {} is blacked out at this time", team_season_id)
            }
            Conflict::LightsRequired { start_hour_local } => write!(
                f,
                "Field has no lights for games starting at or after {:02}:00 local time",
                start_hour_local
            ),
            Conflict::FieldBooked => write!(f, "Field is already booked for this date and time"),
            Conflict::TeamBooked { team_season_id } => write!(
                f,
                "Team {} already has a game at this date and time",
                team_season_id
            ),
            Conflict::UmpiresUnavailable {
                required,
                available,
            } => write!(
                f,
                "Only {} of {} required umpires are available",
                available, required
            ),
            Conflict::UmpireBooked { umpire_id } => write!(
                f,
                "Umpire {} already has a game at this date and time",
                umpire_id
            ),
            Conflict::TeamDailyLimit { team_season_id } => write!(
                f,
                "Team {} has reached the maximum games per day",
                team_season_id
            ),
            Conflict::UmpireDailyLimit { umpire_id } => write!(
                f,
                "Umpire {} has reached the maximum games per day",
                umpire_id
            ),
        }
    }
}

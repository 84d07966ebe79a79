//! Data model for scheduling problems, proposals, and apply requests
//!
//! All types serialize as camelCase JSON so problem files and proposals can be
//! exchanged with the owning service unchanged.
//! - `ids`: Account and run identifiers
//! - `time`: Instant parsing and half-open intervals
//! - `problem`: Problem specification (season, fields, games, slots, constraints)
//! - `proposal`: Solve and apply results

pub mod ids;
pub mod problem;
pub mod proposal;
pub mod time;


pub use ids::*;
pub use problem::*;
pub use proposal::*;
pub use time::Interval;

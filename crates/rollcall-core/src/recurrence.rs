//! # Recurrence Configuration
//!
//! Defines when the signup window opens and closes. Days, hours, and
//! minutes are expressed on a week-local clock (`0 = Sunday`) in the
//! configured IANA timezone. The window may **wrap** the week boundary:
//! an end time numerically before the start time means the window crosses
//! into the next week (e.g. open Friday evening through Monday morning).

use serde::{Deserialize, Serialize};

use crate::error::RollcallError;

/// Which occurrence of the start weekday a monthly window anchors to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Occurrence {
    /// The 1st occurrence of the weekday in the month.
    First,
    /// The 2nd occurrence.
    Second,
    /// The 3rd occurrence.
    Third,
    /// The 4th occurrence.
    Fourth,
    /// The last occurrence, whether 4th or 5th.
    Last,
}

impl Occurrence {
    /// 1-based index for the fixed occurrences; `None` for `Last`.
    pub fn index(&self) -> Option<u8> {
        match self {
            Self::First => Some(1),
            Self::Second => Some(2),
            Self::Third => Some(3),
            Self::Fourth => Some(4),
            Self::Last => None,
        }
    }
}

/// Recurrence cadence for the access window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Cadence {
    /// Every week, anchored to the literal weekday.
    #[default]
    Weekly,
    /// Once a month, anchored to the n-th (or last) occurrence of the
    /// start weekday within the month.
    Monthly {
        /// Which occurrence of the start weekday to anchor to.
        occurrence: Occurrence,
    },
}

/// The recurring access-window configuration for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecurrenceConfig {
    /// When false, signups are always open and rollover never runs.
    pub enabled: bool,
    /// Window start weekday, `0 = Sunday .. 6 = Saturday`.
    pub start_day: u8,
    /// Window start hour, `0..=23`.
    pub start_hour: u8,
    /// Window start minute, `0..=59`.
    pub start_minute: u8,
    /// Window end weekday, `0 = Sunday .. 6 = Saturday`.
    pub end_day: u8,
    /// Window end hour, `0..=23`.
    pub end_hour: u8,
    /// Window end minute, `0..=59`.
    pub end_minute: u8,
    /// IANA timezone name, e.g. `"America/Chicago"`.
    pub timezone: String,
    /// Weekly or monthly cadence. Defaults to weekly.
    #[serde(default)]
    pub cadence: Cadence,
}

impl RecurrenceConfig {
    /// A disabled configuration: always open, never rolls over.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            start_day: 0,
            start_hour: 0,
            start_minute: 0,
            end_day: 0,
            end_hour: 0,
            end_minute: 0,
            timezone: "UTC".to_string(),
            cadence: Cadence::Weekly,
        }
    }

    /// Validate field ranges. Timezone resolution happens in the
    /// schedule crate, which owns the tz database dependency.
    pub fn validate(&self) -> Result<(), RollcallError> {
        if self.start_day > 6 || self.end_day > 6 {
            return Err(RollcallError::validation("day must be 0..=6 (0 = Sunday)"));
        }
        if self.start_hour > 23 || self.end_hour > 23 {
            return Err(RollcallError::validation("hour must be 0..=23"));
        }
        if self.start_minute > 59 || self.end_minute > 59 {
            return Err(RollcallError::validation("minute must be 0..=59"));
        }
        if self.timezone.trim().is_empty() {
            return Err(RollcallError::validation("timezone must not be empty"));
        }
        Ok(())
    }

    /// Whether the window wraps the week boundary (end before start on
    /// the week-local clock).
    pub fn wraps_week(&self) -> bool {
        self.end_minute_of_week() < self.start_minute_of_week()
    }

    /// Start of the window in minutes since the start of the local week.
    pub fn start_minute_of_week(&self) -> u32 {
        minute_of_week(self.start_day, self.start_hour, self.start_minute)
    }

    /// End of the window in minutes since the start of the local week.
    pub fn end_minute_of_week(&self) -> u32 {
        minute_of_week(self.end_day, self.end_hour, self.end_minute)
    }
}

/// `day*1440 + hour*60 + minute` on the 0 = Sunday week-local clock.
pub fn minute_of_week(day: u8, hour: u8, minute: u8) -> u32 {
    u32::from(day) * 1440 + u32::from(hour) * 60 + u32::from(minute)
}

//! # Recurrence Period Identifier
//!
//! Produces the short string identifying "the current cycle". The token
//! changes exactly once per recurrence cycle and is stable across calls
//! within the same cycle; it is used purely as an equality key and never
//! parsed back into a date.
//!
//! Weekly cadence uses the ISO week of the local date (`YYYY-Www`, ISO
//! week-year). Monthly cadence uses the local year-month (`YYYY-MM`) —
//! the configured occurrence is constant per organization, so the month
//! alone discriminates cycles.

use chrono::{DateTime, Datelike, Utc};
use chrono_tz::Tz;

use rollcall_core::recurrence::{Cadence, RecurrenceConfig};

use crate::window::ScheduleError;

/// The stable identifier of the cycle containing `now`.
pub fn period_id(config: &RecurrenceConfig, now: DateTime<Utc>) -> Result<String, ScheduleError> {
    let tz: Tz = config
        .timezone
        .parse()
        .map_err(|_| ScheduleError::UnknownTimezone(config.timezone.clone()))?;
    let local = now.with_timezone(&tz).date_naive();
    Ok(match config.cadence {
        Cadence::Weekly => {
            let iso = local.iso_week();
            format!("{}-W{:02}", iso.year(), iso.week())
        }
        Cadence::Monthly { .. } => format!("{:04}-{:02}", local.year(), local.month()),
    })
}

//! # Email-Due Check
//!
//! Decides whether the roster email for the just-closed window should
//! go out now. Exactly one email per period: the check is gated on the
//! stored "last emailed period" marker, so it is safe to call at any
//! frequency from any trigger.
//!
//! The grace window tolerates coarse trigger cadences (an hourly tick
//! still falls within the default 70 minutes of a close). It is a
//! configuration parameter, not a constant buried in the logic.

use chrono::{DateTime, Utc};

use rollcall_core::{OrgSettings, RecurrenceConfig};
use rollcall_schedule::window::{evaluate, minutes_since_close, ScheduleError};
use rollcall_schedule::period_id;

/// Whether the roster email for the current period is due at `now`.
pub fn email_due(
    settings: &OrgSettings,
    config: &RecurrenceConfig,
    emailed_period: Option<&str>,
    now: DateTime<Utc>,
) -> Result<bool, ScheduleError> {
    if !settings.email_enabled || !config.enabled {
        return Ok(false);
    }
    if evaluate(config, now)?.is_open {
        return Ok(false);
    }
    let since_close = minutes_since_close(config, now)?;
    if since_close > settings.email_grace_minutes {
        return Ok(false);
    }
    let current = period_id(config, now)?;
    Ok(emailed_period != Some(current.as_str()))
}

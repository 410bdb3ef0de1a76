//! # Time-Window Evaluator
//!
//! Converts the current instant to the configured timezone's local
//! wall-clock, reduces it to minutes since the start of the local week
//! (`day*1440 + hour*60 + minute`), and compares against the configured
//! window. Non-wrapping windows are open on `[start, end)`; wrapping
//! windows (end numerically before start) are open when
//! `current >= start || current < end`.
//!
//! Monthly cadence first resolves "the n-th start-weekday of this month"
//! (or the last occurrence) into a concrete date, then applies the same
//! minute-level math between that date's start and the end landing
//! `(end_day - start_day) mod 7` days later.

use chrono::{
    DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;
use thiserror::Error;

use rollcall_core::recurrence::{minute_of_week, Cadence, Occurrence, RecurrenceConfig};

/// Minutes in one week on the week-local clock.
const WEEK_MINUTES: i64 = 7 * 1440;

/// Error evaluating a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// The configured timezone is not a known IANA zone name.
    #[error("unknown timezone: {0}")]
    UnknownTimezone(String),

    /// Config fields are out of range or internally inconsistent.
    #[error("invalid recurrence configuration: {0}")]
    InvalidConfig(String),
}

/// Result of evaluating the access window at an instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessStatus {
    /// Whether signups are currently allowed.
    pub is_open: bool,
    /// Human message when closed, e.g.
    /// `"RSVP is closed. Opens Thursday at 12:00 PM"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Next instant the window opens; computed only when closed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_open: Option<DateTime<Utc>>,
}

impl AccessStatus {
    /// An unconditionally open status (recurrence disabled).
    pub fn open() -> Self {
        Self {
            is_open: true,
            message: None,
            next_open: None,
        }
    }
}

// ---------------------------------------------------------------------------
// WeekTime — normalized week-local clock arithmetic
// ---------------------------------------------------------------------------

/// A point on the week-local clock: `0 = Sunday`, hour, minute.
///
/// `plus_minutes` normalizes every overflow in sequence: minute into
/// hour, hour into day, and day `6` wrapping to day `0`. Deriving a
/// window edge from an offset ("open one minute after the game ends at
/// 23:59") lands on hour `0` of the next day, not hour `24`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekTime {
    /// Weekday, `0 = Sunday .. 6 = Saturday`.
    pub day: u8,
    /// Hour, `0..=23`.
    pub hour: u8,
    /// Minute, `0..=59`.
    pub minute: u8,
}

impl WeekTime {
    /// Build from parts. Fields out of range are an `InvalidConfig` error.
    pub fn new(day: u8, hour: u8, minute: u8) -> Result<Self, ScheduleError> {
        if day > 6 || hour > 23 || minute > 59 {
            return Err(ScheduleError::InvalidConfig(format!(
                "week time out of range: day {day}, hour {hour}, minute {minute}"
            )));
        }
        Ok(Self { day, hour, minute })
    }

    /// Minutes since the start of the local week.
    pub fn minute_of_week(&self) -> u32 {
        minute_of_week(self.day, self.hour, self.minute)
    }

    /// Shift by a signed number of minutes, wrapping around the week.
    pub fn plus_minutes(self, delta: i64) -> Self {
        let total = (i64::from(self.minute_of_week()) + delta).rem_euclid(WEEK_MINUTES);
        Self {
            day: (total / 1440) as u8,
            hour: ((total % 1440) / 60) as u8,
            minute: (total % 60) as u8,
        }
    }
}

// ---------------------------------------------------------------------------
// Public evaluation API
// ---------------------------------------------------------------------------

/// Evaluate the access window at `now`.
///
/// Disabled recurrence is always open. When closed, the status carries
/// the human message and the next-open instant.
pub fn evaluate(config: &RecurrenceConfig, now: DateTime<Utc>) -> Result<AccessStatus, ScheduleError> {
    if !config.enabled {
        return Ok(AccessStatus::open());
    }
    check_config(config)?;
    let tz = parse_tz(config)?;

    if is_open_at(config, tz, now)? {
        return Ok(AccessStatus::open());
    }

    let opens = next_open_with_tz(config, tz, now)?;
    let message = closed_message(config);
    tracing::debug!(next_open = %opens, "access window closed");
    Ok(AccessStatus {
        is_open: false,
        message: Some(message),
        next_open: Some(opens),
    })
}

/// The next instant the window opens at or after `now`.
///
/// Weekly cadence: smallest non-negative number of days forward to the
/// start weekday, `+7` when today's start time has already passed.
pub fn next_open(config: &RecurrenceConfig, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    check_config(config)?;
    let tz = parse_tz(config)?;
    next_open_with_tz(config, tz, now)
}

/// The most recent instant the window closed, at or before `now`.
///
/// Needed by the email-due check: the roster email goes out shortly
/// after close, and "shortly" is measured from this instant.
pub fn last_close(config: &RecurrenceConfig, now: DateTime<Utc>) -> Result<DateTime<Utc>, ScheduleError> {
    check_config(config)?;
    let tz = parse_tz(config)?;
    match config.cadence {
        Cadence::Weekly => weekly_last_close(config, tz, now),
        Cadence::Monthly { occurrence } => monthly_last_close(config, tz, now, occurrence),
    }
}

/// Minutes elapsed since the window last closed. Always non-negative:
/// an enabled recurrence always has some completed close in the past.
pub fn minutes_since_close(
    config: &RecurrenceConfig,
    now: DateTime<Utc>,
) -> Result<i64, ScheduleError> {
    let closed_at = last_close(config, now)?;
    Ok((now - closed_at).num_minutes())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

fn check_config(config: &RecurrenceConfig) -> Result<(), ScheduleError> {
    config
        .validate()
        .map_err(|e| ScheduleError::InvalidConfig(e.to_string()))
}

fn parse_tz(config: &RecurrenceConfig) -> Result<Tz, ScheduleError> {
    config
        .timezone
        .parse::<Tz>()
        .map_err(|_| ScheduleError::UnknownTimezone(config.timezone.clone()))
}

fn start_time(config: &RecurrenceConfig) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::from_hms_opt(config.start_hour.into(), config.start_minute.into(), 0)
        .ok_or_else(|| ScheduleError::InvalidConfig("start time out of range".into()))
}

fn end_time(config: &RecurrenceConfig) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::from_hms_opt(config.end_hour.into(), config.end_minute.into(), 0)
        .ok_or_else(|| ScheduleError::InvalidConfig("end time out of range".into()))
}

fn weekday0(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Resolve a local wall-clock time to an absolute instant.
///
/// DST-ambiguous local times take the earliest mapping; local times
/// skipped by a DST gap roll forward an hour until they exist.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..3 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return dt.with_timezone(&Utc);
            }
            LocalResult::None => candidate += Duration::hours(1),
        }
    }
    Utc.from_utc_datetime(&naive)
}

fn is_open_at(config: &RecurrenceConfig, tz: Tz, now: DateTime<Utc>) -> Result<bool, ScheduleError> {
    match config.cadence {
        Cadence::Weekly => Ok(weekly_is_open(config, tz, now)),
        Cadence::Monthly { occurrence } => monthly_is_open(config, tz, now, occurrence),
    }
}

fn closed_message(config: &RecurrenceConfig) -> String {
    format!(
        "RSVP is closed. Opens {} at {}",
        weekday_name(config.start_day),
        clock_12h(config.start_hour, config.start_minute)
    )
}

fn weekday_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

fn clock_12h(hour: u8, minute: u8) -> String {
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {meridiem}")
}

// ---------------------------------------------------------------------------
// Weekly cadence
// ---------------------------------------------------------------------------

fn weekly_is_open(config: &RecurrenceConfig, tz: Tz, now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&tz).naive_local();
    let current = minute_of_week(
        weekday0(local.date()),
        local.time().hour() as u8,
        local.time().minute() as u8,
    );
    let start = config.start_minute_of_week();
    let end = config.end_minute_of_week();
    if start <= end {
        current >= start && current < end
    } else {
        current >= start || current < end
    }
}

fn next_open_with_tz(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    match config.cadence {
        Cadence::Weekly => weekly_next_open(config, tz, now),
        Cadence::Monthly { occurrence } => monthly_next_open(config, tz, now, occurrence),
    }
}

fn weekly_next_open(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let local = now.with_timezone(&tz).naive_local();
    let today = weekday0(local.date());
    let days_ahead = (i64::from(config.start_day) - i64::from(today)).rem_euclid(7);
    let mut target = local.date() + Duration::days(days_ahead);
    let open_time = start_time(config)?;
    // Today's start time already passed: push a full week forward.
    if target.and_time(open_time) <= local {
        target += Duration::days(7);
    }
    Ok(resolve_local(tz, target.and_time(open_time)))
}

fn weekly_last_close(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ScheduleError> {
    let local = now.with_timezone(&tz).naive_local();
    let today = weekday0(local.date());
    let days_back = (i64::from(today) - i64::from(config.end_day)).rem_euclid(7);
    let mut target = local.date() - Duration::days(days_back);
    let close_time = end_time(config)?;
    if target.and_time(close_time) > local {
        target -= Duration::days(7);
    }
    Ok(resolve_local(tz, target.and_time(close_time)))
}

// ---------------------------------------------------------------------------
// Monthly cadence
// ---------------------------------------------------------------------------

/// Resolve the configured occurrence of `weekday` within a month into a
/// concrete date. The 1st..4th occurrences always exist; `Last` is the
/// 4th or 5th depending on the month.
fn occurrence_date(
    year: i32,
    month: u32,
    weekday: u8,
    occurrence: Occurrence,
) -> Result<NaiveDate, ScheduleError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::InvalidConfig(format!("invalid month {year}-{month:02}")))?;
    match occurrence.index() {
        Some(nth) => {
            let offset = (i64::from(weekday) - i64::from(weekday0(first))).rem_euclid(7);
            Ok(first + Duration::days(offset + 7 * i64::from(nth - 1)))
        }
        None => {
            let last = last_day_of_month(year, month)?;
            let back = (i64::from(weekday0(last)) - i64::from(weekday)).rem_euclid(7);
            Ok(last - Duration::days(back))
        }
    }
}

fn last_day_of_month(year: i32, month: u32) -> Result<NaiveDate, ScheduleError> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_of_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or_else(|| ScheduleError::InvalidConfig(format!("invalid month {year}-{month:02}")))?;
    Ok(first_of_next - Duration::days(1))
}

/// The concrete `[start, end)` window for the occurrence in one month.
fn month_window(
    config: &RecurrenceConfig,
    year: i32,
    month: u32,
    occurrence: Occurrence,
) -> Result<(NaiveDateTime, NaiveDateTime), ScheduleError> {
    let start_date = occurrence_date(year, month, config.start_day, occurrence)?;
    let open_time = start_time(config)?;
    let close_time = end_time(config)?;
    let mut day_delta = (i64::from(config.end_day) - i64::from(config.start_day)).rem_euclid(7);
    // Same-weekday window with the end at or before the start spans a
    // full seven days.
    if day_delta == 0 && close_time <= open_time {
        day_delta = 7;
    }
    let start = start_date.and_time(open_time);
    let end = (start_date + Duration::days(day_delta)).and_time(close_time);
    Ok((start, end))
}

fn prev_month(year: i32, month: u32) -> (i32, u32) {
    if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn monthly_is_open(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
    occurrence: Occurrence,
) -> Result<bool, ScheduleError> {
    let local = now.with_timezone(&tz).naive_local();
    let (year, month) = (local.date().year(), local.date().month());
    // The previous month's window can wrap into the first days of this
    // month, so both candidates are checked.
    let (py, pm) = prev_month(year, month);
    for (y, m) in [(year, month), (py, pm)] {
        let (start, end) = month_window(config, y, m, occurrence)?;
        if local >= start && local < end {
            return Ok(true);
        }
    }
    Ok(false)
}

fn monthly_next_open(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
    occurrence: Occurrence,
) -> Result<DateTime<Utc>, ScheduleError> {
    let local = now.with_timezone(&tz).naive_local();
    let (year, month) = (local.date().year(), local.date().month());
    let (start, _) = month_window(config, year, month, occurrence)?;
    let opens = if local < start {
        start
    } else {
        let (ny, nm) = next_month(year, month);
        month_window(config, ny, nm, occurrence)?.0
    };
    Ok(resolve_local(tz, opens))
}

fn monthly_last_close(
    config: &RecurrenceConfig,
    tz: Tz,
    now: DateTime<Utc>,
    occurrence: Occurrence,
) -> Result<DateTime<Utc>, ScheduleError> {
    let local = now.with_timezone(&tz).naive_local();
    let (mut year, mut month) = (local.date().year(), local.date().month());
    for _ in 0..3 {
        let (_, end) = month_window(config, year, month, occurrence)?;
        if end <= local {
            return Ok(resolve_local(tz, end));
        }
        let (py, pm) = prev_month(year, month);
        year = py;
        month = pm;
    }
    // Three months is always enough to find a completed window.
    let (_, end) = month_window(config, year, month, occurrence)?;
    Ok(resolve_local(tz, end))
}

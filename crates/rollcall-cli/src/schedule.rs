//! # Window Subcommand
//!
//! Evaluates a recurrence configuration from the command line: whether
//! the window is open at a given instant, the next open instant, and
//! the period identifier. Useful when debugging an organizer's schedule
//! without touching any stored state.

use anyhow::{ensure, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};

use rollcall_core::{Cadence, Occurrence, RecurrenceConfig};
use rollcall_schedule::{evaluate, next_open, period_id, WeekTime};

/// Monthly occurrence choice on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OccurrenceArg {
    First,
    Second,
    Third,
    Fourth,
    Last,
}

impl From<OccurrenceArg> for Occurrence {
    fn from(arg: OccurrenceArg) -> Self {
        match arg {
            OccurrenceArg::First => Occurrence::First,
            OccurrenceArg::Second => Occurrence::Second,
            OccurrenceArg::Third => Occurrence::Third,
            OccurrenceArg::Fourth => Occurrence::Fourth,
            OccurrenceArg::Last => Occurrence::Last,
        }
    }
}

/// Arguments for the `rollcall window` subcommand.
#[derive(Args, Debug)]
pub struct WindowArgs {
    /// Window start weekday, 0 = Sunday .. 6 = Saturday.
    #[arg(long)]
    pub start_day: u8,

    /// Window start hour, 0..=23.
    #[arg(long)]
    pub start_hour: u8,

    /// Window start minute, 0..=59.
    #[arg(long, default_value_t = 0)]
    pub start_minute: u8,

    /// Window end weekday, 0 = Sunday .. 6 = Saturday.
    #[arg(long, required_unless_present = "duration", conflicts_with = "duration")]
    pub end_day: Option<u8>,

    /// Window end hour, 0..=23.
    #[arg(long, required_unless_present = "duration", conflicts_with = "duration")]
    pub end_hour: Option<u8>,

    /// Window end minute, 0..=59.
    #[arg(long, conflicts_with = "duration")]
    pub end_minute: Option<u8>,

    /// Window length in minutes; derives the end edge from the start,
    /// rolling overflow through midnight and the week boundary.
    #[arg(long)]
    pub duration: Option<i64>,

    /// IANA timezone name, e.g. America/Chicago.
    #[arg(long, default_value = "UTC")]
    pub timezone: String,

    /// Monthly cadence anchored to this occurrence of the start weekday.
    /// Omit for a weekly cadence.
    #[arg(long, value_enum)]
    pub monthly: Option<OccurrenceArg>,

    /// Instant to evaluate at (RFC 3339). Defaults to now.
    #[arg(long)]
    pub at: Option<String>,
}

impl WindowArgs {
    /// Build the recurrence configuration these arguments describe.
    pub fn to_config(&self) -> Result<RecurrenceConfig> {
        let cadence = match self.monthly {
            Some(occurrence) => Cadence::Monthly {
                occurrence: occurrence.into(),
            },
            None => Cadence::Weekly,
        };
        let (end_day, end_hour, end_minute) = match self.duration {
            Some(minutes) => {
                ensure!(minutes > 0, "--duration must be at least one minute");
                let start = WeekTime::new(self.start_day, self.start_hour, self.start_minute)
                    .context("invalid window configuration")?;
                let end = start.plus_minutes(minutes);
                (end.day, end.hour, end.minute)
            }
            None => (
                self.end_day
                    .context("--end-day is required without --duration")?,
                self.end_hour
                    .context("--end-hour is required without --duration")?,
                self.end_minute.unwrap_or(0),
            ),
        };
        let config = RecurrenceConfig {
            enabled: true,
            start_day: self.start_day,
            start_hour: self.start_hour,
            start_minute: self.start_minute,
            end_day,
            end_hour,
            end_minute,
            timezone: self.timezone.clone(),
            cadence,
        };
        config.validate().context("invalid window configuration")?;
        Ok(config)
    }

    /// Resolve the evaluation instant.
    pub fn instant(&self) -> Result<DateTime<Utc>> {
        match &self.at {
            Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
                .with_context(|| format!("could not parse instant {raw:?}"))?
                .with_timezone(&Utc)),
            None => Ok(Utc::now()),
        }
    }
}

/// Execute the window subcommand. Exit code 0 when the window is open,
/// 1 when closed, so the command composes in shell scripts.
pub fn run_window(args: &WindowArgs) -> Result<u8> {
    let config = args.to_config()?;
    let now = args.instant()?;

    let status = evaluate(&config, now)?;
    let period = period_id(&config, now)?;

    if status.is_open {
        println!("open at {now}");
    } else {
        println!("closed at {now}");
        if let Some(message) = &status.message {
            println!("  {message}");
        }
    }
    let opens = next_open(&config, now)?;
    println!("next open: {opens}");
    println!("period: {period}");

    Ok(if status.is_open { 0 } else { 1 })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> WindowArgs {
        WindowArgs {
            start_day: 5,
            start_hour: 18,
            start_minute: 0,
            end_day: Some(1),
            end_hour: Some(9),
            end_minute: Some(0),
            duration: None,
            timezone: "UTC".into(),
            monthly: None,
            at: Some("2026-01-17T12:00:00Z".into()),
        }
    }

    #[test]
    fn args_build_a_weekly_config() {
        let config = args().to_config().unwrap();
        assert!(config.enabled);
        assert_eq!(config.cadence, Cadence::Weekly);
        assert!(config.wraps_week());
    }

    #[test]
    fn monthly_flag_switches_cadence() {
        let config = WindowArgs {
            monthly: Some(OccurrenceArg::Last),
            ..args()
        }
        .to_config()
        .unwrap();
        assert_eq!(
            config.cadence,
            Cadence::Monthly {
                occurrence: Occurrence::Last
            }
        );
    }

    #[test]
    fn out_of_range_day_is_rejected() {
        let err = WindowArgs {
            start_day: 7,
            ..args()
        }
        .to_config()
        .unwrap_err();
        assert!(err.to_string().contains("invalid window configuration"));
    }

    #[test]
    fn exit_code_tracks_window_state() {
        // Saturday mid-window.
        assert_eq!(run_window(&args()).unwrap(), 0);
        // Tuesday, closed.
        let closed = WindowArgs {
            at: Some("2026-01-20T10:00:00Z".into()),
            ..args()
        };
        assert_eq!(run_window(&closed).unwrap(), 1);
    }

    #[test]
    fn duration_derives_the_end_edge() {
        // Friday 18:00 plus 63 hours ends Monday 09:00.
        let config = WindowArgs {
            end_day: None,
            end_hour: None,
            end_minute: None,
            duration: Some(63 * 60),
            ..args()
        }
        .to_config()
        .unwrap();
        assert_eq!(
            (config.end_day, config.end_hour, config.end_minute),
            (1, 9, 0)
        );
    }

    #[test]
    fn duration_rolls_overflow_past_midnight_and_the_week() {
        // Saturday 23:59 plus two minutes lands Sunday 00:01.
        let config = WindowArgs {
            start_day: 6,
            start_hour: 23,
            start_minute: 59,
            end_day: None,
            end_hour: None,
            end_minute: None,
            duration: Some(2),
            ..args()
        }
        .to_config()
        .unwrap();
        assert_eq!(
            (config.end_day, config.end_hour, config.end_minute),
            (0, 0, 1)
        );
    }

    #[test]
    fn duration_must_be_positive() {
        let err = WindowArgs {
            end_day: None,
            end_hour: None,
            end_minute: None,
            duration: Some(0),
            ..args()
        }
        .to_config()
        .unwrap_err();
        assert!(err.to_string().contains("at least one minute"));
    }

    #[test]
    fn bad_instant_is_an_error() {
        let bad = WindowArgs {
            at: Some("yesterday".into()),
            ..args()
        };
        assert!(bad.instant().is_err());
    }
}

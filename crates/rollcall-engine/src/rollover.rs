//! # Rollover and Archival Engine
//!
//! Invoked at the start of every state read. Exactly one rollover per
//! period, triggered lazily on the first read while the window is open.
//! The marker comparison makes concurrent or duplicate reads within the
//! same period a no-op, so the trigger mechanism (timer or
//! request-driven) is irrelevant to correctness.
//!
//! This is the only place participants are dropped outright rather than
//! moved.

use chrono::{DateTime, Utc};

use rollcall_core::archive::push_capped;
use rollcall_core::{ArchiveEntry, RecurrenceConfig, Roster, SnoozeRecord};

/// The mutable per-organization state the rollover may rewrite.
#[derive(Debug, Clone)]
pub struct RolloverState {
    /// Current lists.
    pub roster: Roster,
    /// Current period's snooze record.
    pub snooze: SnoozeRecord,
    /// Archived periods, newest last.
    pub archive: Vec<ArchiveEntry>,
    /// Last period for which rollover executed, if any.
    pub marker: Option<String>,
}

/// Outcome of a rollover check.
#[derive(Debug, Clone)]
pub struct RolloverOutcome {
    /// The (possibly rewritten) state.
    pub state: RolloverState,
    /// Whether a rollover actually executed.
    pub rolled: bool,
}

/// Run the idempotent rollover check.
///
/// No-op when recurrence is disabled, when the marker already equals
/// `current_period`, or when the window is closed (rollover happens at
/// window-open transitions, not at arbitrary polling).
pub fn run_rollover(
    state: RolloverState,
    config: &RecurrenceConfig,
    window_open: bool,
    current_period: &str,
    now: DateTime<Utc>,
) -> RolloverOutcome {
    if !config.enabled
        || state.marker.as_deref() == Some(current_period)
        || !window_open
    {
        return RolloverOutcome {
            state,
            rolled: false,
        };
    }

    let mut state = state;
    if !state.roster.is_empty() {
        let previous = state
            .marker
            .clone()
            .unwrap_or_else(|| "unknown".to_string());
        push_capped(
            &mut state.archive,
            ArchiveEntry {
                period_id: previous,
                archived_at: now,
                main_list: state.roster.main_list.clone(),
                waitlist: state.roster.waitlist.clone(),
            },
        );
    }

    // Privileged participants roll forward; regulars and the entire old
    // waitlist are dropped.
    let carried: Vec<_> = state
        .roster
        .main_list
        .iter()
        .filter(|p| p.is_whitelisted)
        .cloned()
        .collect();
    tracing::info!(
        period = current_period,
        carried = carried.len(),
        dropped = state.roster.len() - carried.len(),
        "rollover"
    );
    state.roster = Roster {
        main_list: carried,
        waitlist: Vec::new(),
    };
    state.snooze = SnoozeRecord::empty(current_period);
    state.marker = Some(current_period.to_string());

    RolloverOutcome {
        state,
        rolled: true,
    }
}

//! # Signup and Withdrawal Engine
//!
//! Applies an addition or removal to the two lists, funneling through
//! the rebalancer, and computes the resulting position and message.

use chrono::{DateTime, Utc};
use serde::Serialize;

use rollcall_core::{whitelist, Participant, ParticipantId, RollcallError, Roster, WhitelistEntry};
use rollcall_schedule::AccessStatus;

use crate::rebalance::rebalance;

/// Which list a participant landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    /// The bounded main list.
    Main,
    /// The overflow waitlist.
    Waitlist,
}

/// Result of a successful signup.
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    /// The rebalanced roster to persist.
    pub roster: Roster,
    /// The newly created participant.
    pub person: Participant,
    /// The list the participant landed on.
    pub list_type: ListType,
    /// 1-based position within that list.
    pub position: usize,
    /// Canned user-facing message.
    pub message: String,
}

/// Sign a participant up.
///
/// Rejections, in order: missing/blank input, window closed, duplicate
/// device, duplicate case-insensitive name. New participants are tagged
/// privileged when a whitelist entry matches by case-insensitive name
/// or exact device id.
pub fn signup(
    roster: &Roster,
    entries: &[WhitelistEntry],
    access: &AccessStatus,
    capacity: usize,
    name: &str,
    device_id: &str,
    now: DateTime<Utc>,
) -> Result<SignupOutcome, RollcallError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RollcallError::validation("name is required"));
    }
    if device_id.is_empty() {
        return Err(RollcallError::validation("deviceId is required"));
    }
    if !access.is_open {
        return Err(access_closed(access));
    }
    if roster.contains_device(device_id) {
        return Err(RollcallError::DuplicateDevice);
    }
    if roster.contains_name(name) {
        return Err(RollcallError::DuplicateName);
    }

    let privileged = whitelist::find_match(entries, name, device_id).is_some();
    let person = Participant::new(name, device_id, now).whitelisted(privileged);

    let mut main = roster.main_list.clone();
    main.push(person.clone());
    let rebalanced = rebalance(main, roster.waitlist.clone(), capacity);

    let (list_type, position) = locate(&rebalanced, &person.id).ok_or_else(|| {
        // Unreachable: the rebalancer never drops a participant.
        RollcallError::NotFound
    })?;
    let message = placement_message(list_type, position);
    tracing::info!(name, list = ?list_type, position, "signup");

    Ok(SignupOutcome {
        roster: rebalanced,
        person,
        list_type,
        position,
        message,
    })
}

/// Find a participant's list and 1-based position after a rebalance.
pub fn locate(roster: &Roster, id: &ParticipantId) -> Option<(ListType, usize)> {
    if let Some(idx) = roster.main_list.iter().position(|p| &p.id == id) {
        return Some((ListType::Main, idx + 1));
    }
    roster
        .waitlist
        .iter()
        .position(|p| &p.id == id)
        .map(|idx| (ListType::Waitlist, idx + 1))
}

/// The canned placement message for signup and unsnooze results.
pub fn placement_message(list_type: ListType, position: usize) -> String {
    match list_type {
        ListType::Main => format!("You're in! Spot #{position}"),
        ListType::Waitlist => format!("Main list full. You're #{position} on the waitlist"),
    }
}

fn access_closed(access: &AccessStatus) -> RollcallError {
    RollcallError::AccessClosed {
        message: access
            .message
            .clone()
            .unwrap_or_else(|| "RSVP is closed".to_string()),
        next_open: access.next_open,
    }
}

/// Gating decision for withdrawal, computed by the service layer.
///
/// With email delivery enabled, withdrawal is blocked only once the
/// current period's roster has been emailed, regardless of the window.
/// With email disabled, it is blocked by window-closed exactly like
/// signup.
#[derive(Debug, Clone)]
pub enum WithdrawGate {
    /// Withdrawal allowed.
    Open,
    /// Withdrawal blocked; carries the message for `AccessClosed`.
    Closed {
        /// User-facing reason.
        message: String,
        /// Next open instant when the block comes from the window.
        next_open: Option<DateTime<Utc>>,
    },
}

/// Result of a successful withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawOutcome {
    /// The updated roster to persist.
    pub roster: Roster,
    /// The participant who left.
    pub removed: Participant,
    /// The waitlisted participant promoted into the freed slot, if any.
    pub promoted_person: Option<Participant>,
    /// Canned user-facing message.
    pub message: String,
}

/// Withdraw a participant from the indicated list.
///
/// Ownership of a signup is only ever its original device. Removal from
/// a sorted list needs no re-sort, and promoting the earliest waitlisted
/// entry preserves sort order.
pub fn withdraw(
    roster: &Roster,
    id: &ParticipantId,
    device_id: &str,
    from_waitlist: bool,
    gate: &WithdrawGate,
) -> Result<WithdrawOutcome, RollcallError> {
    let list = if from_waitlist {
        &roster.waitlist
    } else {
        &roster.main_list
    };
    let found = list
        .iter()
        .find(|p| &p.id == id)
        .ok_or(RollcallError::NotFound)?;
    if found.device_id != device_id {
        return Err(RollcallError::Forbidden);
    }
    if let WithdrawGate::Closed { message, next_open } = gate {
        return Err(RollcallError::AccessClosed {
            message: message.clone(),
            next_open: *next_open,
        });
    }

    let mut updated = roster.clone();
    let removed = if from_waitlist {
        updated.remove_from_waitlist(id)
    } else {
        updated.remove_from_main(id)
    }
    .ok_or(RollcallError::NotFound)?;

    let mut promoted_person = None;
    if !from_waitlist && !updated.waitlist.is_empty() {
        let promoted = updated.waitlist.remove(0);
        updated.main_list.push(promoted.clone());
        promoted_person = Some(promoted);
    }
    tracing::info!(name = %removed.name, from_waitlist, promoted = promoted_person.is_some(), "withdrawal");

    Ok(WithdrawOutcome {
        roster: updated,
        removed,
        promoted_person,
        message: "You're off the list".to_string(),
    })
}

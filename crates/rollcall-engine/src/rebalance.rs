//! # Priority Rebalancer
//!
//! The single source of truth for list order. Concatenates both lists,
//! stable-sorts by the priority comparator, and splits at the capacity
//! limit. Whitelisted participants always sort before non-whitelisted
//! ones regardless of signup time; within the same tier, earlier signup
//! sorts first.
//!
//! Pure and idempotent: rebalancing its own output yields the same
//! result, so callers always persist the rebalanced roster rather than
//! diffing against the stored one.

use std::cmp::Ordering;

use rollcall_core::{Participant, Roster};

/// Merge, sort, and re-split the two lists at `capacity`.
pub fn rebalance(main: Vec<Participant>, waitlist: Vec<Participant>, capacity: usize) -> Roster {
    let mut pool = main;
    pool.extend(waitlist);
    pool.sort_by(priority);
    let overflow = pool.split_off(capacity.min(pool.len()));
    Roster {
        main_list: pool,
        waitlist: overflow,
    }
}

/// Whitelisted before regular, then earliest signup first. Equal keys
/// keep their input order (the sort is stable).
fn priority(a: &Participant, b: &Participant) -> Ordering {
    b.is_whitelisted
        .cmp(&a.is_whitelisted)
        .then(a.timestamp.cmp(&b.timestamp))
}

/// The effect of rebalancing under a new capacity limit.
#[derive(Debug, Clone)]
pub struct CapacityChange {
    /// Participants who moved from the waitlist onto the main list.
    pub promoted: Vec<Participant>,
    /// Participants who moved from the main list onto the waitlist.
    pub demoted: Vec<Participant>,
    /// The rebalanced roster.
    pub roster: Roster,
}

/// Re-run the rebalancer with a new limit and report who moved.
///
/// Promotion and demotion fall out of the rebalance itself; there is no
/// separate insertion logic for an administrator capacity change.
pub fn change_capacity(roster: Roster, new_capacity: usize) -> CapacityChange {
    let was_main: Vec<_> = roster.main_list.iter().map(|p| p.id.clone()).collect();
    let was_wait: Vec<_> = roster.waitlist.iter().map(|p| p.id.clone()).collect();
    let rebalanced = rebalance(roster.main_list, roster.waitlist, new_capacity);
    let promoted = rebalanced
        .main_list
        .iter()
        .filter(|p| was_wait.contains(&p.id))
        .cloned()
        .collect();
    let demoted = rebalanced
        .waitlist
        .iter()
        .filter(|p| was_main.contains(&p.id))
        .cloned()
        .collect();
    CapacityChange {
        promoted,
        demoted,
        roster: rebalanced,
    }
}

//! # Roster — Main List plus Waitlist
//!
//! The two ordered lists for the current period. Ordering is owned by the
//! rebalancer in `rollcall-engine`; this type only stores and queries.
//!
//! ## Invariants (after any rebalance)
//!
//! - `main_list.len() <= capacity`
//! - no participant id appears in both lists
//! - no duplicate `device_id` and no duplicate case-insensitive name
//!   among active signups

use serde::{Deserialize, Serialize};

use crate::participant::{Participant, ParticipantId};

/// The bounded main list and its overflow waitlist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    /// Confirmed participants for the current period, priority order.
    #[serde(default)]
    pub main_list: Vec<Participant>,
    /// Overflow queue beyond capacity, same priority ordering.
    #[serde(default)]
    pub waitlist: Vec<Participant>,
}

impl Roster {
    /// An empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total active signups across both lists.
    pub fn len(&self) -> usize {
        self.main_list.len() + self.waitlist.len()
    }

    /// Whether both lists are empty.
    pub fn is_empty(&self) -> bool {
        self.main_list.is_empty() && self.waitlist.is_empty()
    }

    /// Iterate over all active participants, main list first.
    pub fn iter(&self) -> impl Iterator<Item = &Participant> {
        self.main_list.iter().chain(self.waitlist.iter())
    }

    /// Whether any active participant signed up from this device.
    pub fn contains_device(&self, device_id: &str) -> bool {
        self.iter().any(|p| p.device_id == device_id)
    }

    /// Whether any active participant has this name, case-insensitively.
    pub fn contains_name(&self, name: &str) -> bool {
        let key = crate::name_key(name);
        self.iter().any(|p| p.name_key() == key)
    }

    /// Find an active participant by id across both lists.
    pub fn find(&self, id: &ParticipantId) -> Option<&Participant> {
        self.iter().find(|p| &p.id == id)
    }

    /// Find a main-list participant by case-insensitive name.
    pub fn find_on_main_by_name(&self, name: &str) -> Option<&Participant> {
        let key = crate::name_key(name);
        self.main_list.iter().find(|p| p.name_key() == key)
    }

    /// Remove a participant from the main list by id.
    pub fn remove_from_main(&mut self, id: &ParticipantId) -> Option<Participant> {
        let idx = self.main_list.iter().position(|p| &p.id == id)?;
        Some(self.main_list.remove(idx))
    }

    /// Remove a participant from the waitlist by id.
    pub fn remove_from_waitlist(&mut self, id: &ParticipantId) -> Option<Participant> {
        let idx = self.waitlist.iter().position(|p| &p.id == id)?;
        Some(self.waitlist.remove(idx))
    }
}

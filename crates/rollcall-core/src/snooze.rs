//! # Snooze Records
//!
//! A snooze is a privileged member's temporary, restorable opt-out for
//! the current period. The record stores a full snapshot of the
//! participant as it existed at removal time so it can be reinserted
//! into the correct priority position later.
//!
//! ## Legacy Format Migration
//!
//! The hosted service's oldest documents stored snoozed members as bare
//! lowercased name strings. Those are migrated to snapshot entries on
//! first read: the synthesized snapshot keeps the name, carries no device
//! identity, and gets the epoch timestamp so a restored legacy member
//! sorts at the head of the whitelist tier. There is no string-or-object
//! branching anywhere past deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::{Participant, ParticipantId};

/// One snoozed member: the lookup key plus the restorable snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozeEntry {
    /// Lowercased, trimmed member name.
    pub name_key: String,
    /// The participant exactly as it existed at removal time.
    pub snapshot: Participant,
}

impl SnoozeEntry {
    /// Snapshot a participant being snoozed.
    pub fn from_participant(p: &Participant) -> Self {
        Self {
            name_key: p.name_key(),
            snapshot: p.clone(),
        }
    }
}

/// Wire shape: either the modern object or a legacy bare name string.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireSnoozeEntry {
    Modern {
        #[serde(rename = "nameKey")]
        name_key: String,
        snapshot: Participant,
    },
    Legacy(String),
}

impl<'de> Deserialize<'de> for SnoozeEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        match WireSnoozeEntry::deserialize(deserializer)? {
            WireSnoozeEntry::Modern { name_key, snapshot } => Ok(Self { name_key, snapshot }),
            WireSnoozeEntry::Legacy(name) => Ok(Self::migrate_legacy(&name)),
        }
    }
}

impl SnoozeEntry {
    /// Migrate a legacy bare-name entry into the snapshot format.
    ///
    /// Legacy entries predate device identity; the epoch timestamp puts a
    /// restored legacy member at the head of the whitelist tier rather
    /// than inventing a signup time it never had.
    fn migrate_legacy(name: &str) -> Self {
        let key = crate::name_key(name);
        Self {
            name_key: key.clone(),
            snapshot: Participant {
                id: ParticipantId(format!("legacy:{key}")),
                name: name.trim().to_string(),
                device_id: String::new(),
                timestamp: DateTime::<Utc>::UNIX_EPOCH,
                is_whitelisted: true,
            },
        }
    }
}

/// Per-period snooze state for one organization.
///
/// Reset to empty whenever the observed period id differs from the
/// stored one — lazily on snooze, and again at rollover. Both resets
/// compute the period id the same way, so they agree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozeRecord {
    /// The period these entries belong to.
    #[serde(default)]
    pub period_id: String,
    /// Snoozed members, one entry per name key.
    #[serde(default)]
    pub entries: Vec<SnoozeEntry>,
}

impl SnoozeRecord {
    /// An empty record for the given period.
    pub fn empty(period_id: impl Into<String>) -> Self {
        Self {
            period_id: period_id.into(),
            entries: Vec::new(),
        }
    }

    /// Reset to empty if the record belongs to a different period.
    /// Returns whether a reset happened.
    pub fn reset_if_stale(&mut self, current_period: &str) -> bool {
        if self.period_id != current_period {
            *self = Self::empty(current_period);
            true
        } else {
            false
        }
    }

    /// Look up an entry by member name (case-insensitive).
    pub fn find(&self, name: &str) -> Option<&SnoozeEntry> {
        let key = crate::name_key(name);
        self.entries.iter().find(|e| e.name_key == key)
    }

    /// Append a snapshot unless one already exists for that name.
    pub fn add(&mut self, entry: SnoozeEntry) {
        if self.find(&entry.name_key).is_none() {
            self.entries.push(entry);
        }
    }

    /// Remove and return the entry for a member name, if present.
    pub fn remove(&mut self, name: &str) -> Option<SnoozeEntry> {
        let key = crate::name_key(name);
        let idx = self.entries.iter().position(|e| e.name_key == key)?;
        Some(self.entries.remove(idx))
    }

    /// Names currently snoozed, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name_key.clone()).collect()
    }
}

//! # Period Archives
//!
//! At rollover, the previous period's lists are snapshotted into an
//! append-only archive capped at the most recent entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::participant::Participant;

/// How many archived periods are retained; the oldest is evicted first.
pub const ARCHIVE_RETENTION: usize = 12;

/// Snapshot of one completed period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveEntry {
    /// The period the lists belonged to, or `"unknown"` for state that
    /// predates rollover markers.
    pub period_id: String,
    /// When the archive entry was written.
    pub archived_at: DateTime<Utc>,
    /// Main list as it stood at rollover.
    pub main_list: Vec<Participant>,
    /// Waitlist as it stood at rollover.
    pub waitlist: Vec<Participant>,
}

/// Append an entry and trim to the retention cap, evicting oldest first.
pub fn push_capped(archive: &mut Vec<ArchiveEntry>, entry: ArchiveEntry) {
    archive.push(entry);
    if archive.len() > ARCHIVE_RETENTION {
        let excess = archive.len() - ARCHIVE_RETENTION;
        archive.drain(..excess);
    }
}

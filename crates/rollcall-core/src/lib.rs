//! # rollcall-core — Foundational Types for Rollcall
//!
//! Rollcall runs recurring signup events: a bounded main list plus an
//! overflow waitlist per organization, opened and closed on a recurring
//! timezone-aware schedule, with pre-approved ("whitelisted") members
//! sorting ahead of everyone else.
//!
//! This crate defines the persistent domain types and the error taxonomy.
//! Every other crate in the workspace depends on `rollcall-core`; it
//! depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `ParticipantId` and
//!    `OrgId` are newtypes, not bare strings.
//!
//! 2. **Wire-stable serialization.** Persisted documents use camelCase
//!    field names so stored JSON reads like the documents the hosted
//!    service has always written.
//!
//! 3. **One error taxonomy.** Every rejected precondition maps to exactly
//!    one `RollcallError` variant so callers can map deterministically to
//!    user-facing messages.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `rollcall-*` crates (leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All persisted types derive `Debug`, `Clone`, `Serialize`, `Deserialize`.

pub mod archive;
pub mod error;
pub mod participant;
pub mod recurrence;
pub mod roster;
pub mod settings;
pub mod snooze;
pub mod whitelist;

// Re-export primary types for ergonomic imports.
pub use archive::{ArchiveEntry, ARCHIVE_RETENTION};
pub use error::RollcallError;
pub use participant::{OrgId, Participant, ParticipantId};
pub use recurrence::{Cadence, Occurrence, RecurrenceConfig};
pub use roster::Roster;
pub use settings::OrgSettings;
pub use snooze::{SnoozeEntry, SnoozeRecord};
pub use whitelist::WhitelistEntry;

/// Normalize a display name into the case-insensitive key used for
/// duplicate checks, whitelist matching, and snooze entries.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

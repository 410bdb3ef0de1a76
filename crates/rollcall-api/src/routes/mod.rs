//! # API Route Modules
//!
//! - `events` — the participant-facing surface: public state, signup,
//!   withdrawal, snooze, and unsnooze.
//! - `admin` — organizer document writes (capacity, recurrence,
//!   settings, whitelist), the archive read, and the email-check
//!   trigger.

pub mod admin;
pub mod events;

//! # Error Types — Domain Error Taxonomy
//!
//! One variant per rejected precondition. All errors are local,
//! synchronous, and non-retryable; the engine never retries an operation
//! itself. Storage I/O failures are deliberately *not* part of this
//! taxonomy — they propagate as a separate store error to the calling
//! layer, which decides on 5xx behavior.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Domain error for every operation the engine exposes.
///
/// Each variant corresponds to exactly one precondition so that callers
/// can map errors deterministically to user-facing messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollcallError {
    /// Missing or empty required input. Recoverable by correcting input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The access window is closed for this operation.
    ///
    /// Carries the human-readable message and, when computable, the next
    /// instant the window opens.
    #[error("{message}")]
    AccessClosed {
        /// Message suitable for direct display, e.g.
        /// `"RSVP is closed. Opens Thursday at 12:00 PM"`.
        message: String,
        /// Next instant the window opens, if the schedule permits one.
        next_open: Option<DateTime<Utc>>,
    },

    /// An active signup from this device already exists.
    #[error("a signup from this device already exists")]
    DuplicateDevice,

    /// An active signup with this name (case-insensitive) already exists.
    #[error("that name is already on the list")]
    DuplicateName,

    /// No participant with the given id exists in the indicated list.
    #[error("participant not found")]
    NotFound,

    /// The caller's device does not own the signup it tried to modify.
    #[error("a signup can only be removed from the device that created it")]
    Forbidden,

    /// A non-whitelisted participant attempted a privileged action.
    #[error("only whitelisted members can do that")]
    NotPrivileged,

    /// The member is not currently on the main list.
    #[error("member is not on the main list")]
    NotOnMainList,

    /// No snoozed entry exists for the member in the current period.
    #[error("no snoozed entry for that member this period")]
    NotSnoozed,

    /// A snooze code or password was supplied but did not match.
    #[error("invalid snooze code or password")]
    Authentication,
}

impl RollcallError {
    /// Convenience constructor for validation failures.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short machine-readable code for this variant, stable across
    /// message wording changes. Used by the HTTP adapter's error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::AccessClosed { .. } => "access_closed",
            Self::DuplicateDevice => "duplicate_device",
            Self::DuplicateName => "duplicate_name",
            Self::NotFound => "not_found",
            Self::Forbidden => "forbidden",
            Self::NotPrivileged => "not_privileged",
            Self::NotOnMainList => "not_on_main_list",
            Self::NotSnoozed => "not_snoozed",
            Self::Authentication => "authentication",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_closed_displays_its_message() {
        let err = RollcallError::AccessClosed {
            message: "RSVP is closed. Opens Thursday at 12:00 PM".into(),
            next_open: None,
        };
        assert_eq!(err.to_string(), "RSVP is closed. Opens Thursday at 12:00 PM");
    }

    #[test]
    fn codes_are_distinct() {
        let errors = [
            RollcallError::validation("x"),
            RollcallError::AccessClosed {
                message: "closed".into(),
                next_open: None,
            },
            RollcallError::DuplicateDevice,
            RollcallError::DuplicateName,
            RollcallError::NotFound,
            RollcallError::Forbidden,
            RollcallError::NotPrivileged,
            RollcallError::NotOnMainList,
            RollcallError::NotSnoozed,
            RollcallError::Authentication,
        ];
        let mut codes: Vec<_> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}

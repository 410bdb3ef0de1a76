//! # Organization Settings
//!
//! Capacity and email behavior for one organization. The email grace
//! window used to be a hard-coded 70 minutes baked into business logic;
//! it is a configuration field here so the deployment cadence assumption
//! lives in configuration, not code.

use serde::{Deserialize, Serialize};

use crate::error::RollcallError;

/// Default main-list capacity for newly seen organizations.
pub const DEFAULT_CAPACITY: usize = 18;

/// Default minutes after window close within which the roster email
/// should go out. Sized to tolerate hourly trigger ticks.
pub const DEFAULT_EMAIL_GRACE_MINUTES: i64 = 70;

/// Per-organization operational settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrgSettings {
    /// Maximum main-list size; overflow goes to the waitlist.
    pub capacity: usize,
    /// Whether the roster is emailed after the window closes. Changes
    /// the withdrawal gating rule: once the current period's roster has
    /// been sent, withdrawals are blocked regardless of the window.
    #[serde(default)]
    pub email_enabled: bool,
    /// Minutes after window close within which the email is considered
    /// due. Exactly one email is sent per period either way.
    #[serde(default = "default_grace")]
    pub email_grace_minutes: i64,
    /// Shared legacy snooze password. Superseded by per-member snooze
    /// codes; kept for members who never rotated onto codes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_snooze_password: Option<String>,
}

fn default_grace() -> i64 {
    DEFAULT_EMAIL_GRACE_MINUTES
}

impl Default for OrgSettings {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            email_enabled: false,
            email_grace_minutes: DEFAULT_EMAIL_GRACE_MINUTES,
            legacy_snooze_password: None,
        }
    }
}

impl OrgSettings {
    /// Validate settings supplied by an organizer.
    pub fn validate(&self) -> Result<(), RollcallError> {
        if self.capacity == 0 {
            return Err(RollcallError::validation("capacity must be at least 1"));
        }
        if self.email_grace_minutes <= 0 {
            return Err(RollcallError::validation(
                "emailGraceMinutes must be positive",
            ));
        }
        Ok(())
    }
}

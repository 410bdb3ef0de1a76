//! # Participant and Identity Newtypes
//!
//! A participant is immutable once created except for relocation between
//! the main list and the waitlist. Identity for "is this me" checks is
//! the client-supplied `device_id`, never the display name.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque participant identifier.
///
/// Monotonic-ish: derived from the epoch-millisecond timestamp at signup.
/// Not guaranteed unique under concurrent writes — the storage layer is
/// last-write-wins per key, and the original service accepted the same
/// limitation. Used only for lookup within one organization's roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    /// Derive an id token from the signup instant.
    pub fn from_instant(at: DateTime<Utc>) -> Self {
        Self(at.timestamp_millis().to_string())
    }

    /// Access the inner token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Organization identifier (URL slug). Validation of slugs belongs to the
/// organization CRUD layer; here it is an opaque key component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrgId(pub String);

impl OrgId {
    /// Access the inner slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed-up participant on either list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Opaque id token, unique within the roster.
    pub id: ParticipantId,
    /// Display name as entered at signup.
    pub name: String,
    /// Client-supplied device identity; ownership key for withdrawal.
    pub device_id: String,
    /// Instant of the *original* signup. Preserved across snooze/unsnooze
    /// so priority ordering is unaffected by a temporary opt-out.
    pub timestamp: DateTime<Utc>,
    /// True only when backed by a whitelist entry at signup time.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_whitelisted: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Participant {
    /// Build a new participant stamped with the given instant.
    pub fn new(name: impl Into<String>, device_id: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            id: ParticipantId::from_instant(at),
            name: name.into(),
            device_id: device_id.into(),
            timestamp: at,
            is_whitelisted: false,
        }
    }

    /// Builder: mark this participant as whitelisted.
    pub fn whitelisted(mut self, flag: bool) -> Self {
        self.is_whitelisted = flag;
        self
    }

    /// Case-insensitive key for duplicate and snooze lookups.
    pub fn name_key(&self) -> String {
        crate::name_key(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn id_token_is_epoch_millis() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let id = ParticipantId::from_instant(at);
        assert_eq!(id.as_str(), at.timestamp_millis().to_string());
    }

    #[test]
    fn whitelist_flag_absent_from_wire_when_false() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let p = Participant::new("Alice", "dA", at);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("isWhitelisted").is_none());
        assert_eq!(json["deviceId"], "dA");
    }

    #[test]
    fn whitelist_flag_present_when_true() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let p = Participant::new("Alice", "dA", at).whitelisted(true);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["isWhitelisted"], true);
    }

    #[test]
    fn wire_roundtrip() {
        let at = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
        let p = Participant::new("Alice", "dA", at).whitelisted(true);
        let json = serde_json::to_string(&p).unwrap();
        let back: Participant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn missing_whitelist_field_defaults_false() {
        let json = r#"{"id":"1700000000000","name":"Bob","deviceId":"dB","timestamp":"2026-01-15T12:00:00Z"}"#;
        let p: Participant = serde_json::from_str(json).unwrap();
        assert!(!p.is_whitelisted);
    }
}

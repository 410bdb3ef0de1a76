//! # Whitelist Entries
//!
//! Pre-approved members who sort ahead of everyone else and may snooze.
//! Entries are created and removed only by organizer-facing actions; the
//! signup engine reads them solely to tag new participants as privileged.

use serde::{Deserialize, Serialize};

/// One pre-approved member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WhitelistEntry {
    /// Member name; matched case-insensitively against signups.
    pub name: String,
    /// Known device identity; matched exactly when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
    /// Per-member rotating 6-character snooze authentication token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snooze_code: Option<String>,
    /// Contact address for roster email, if on file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl WhitelistEntry {
    /// Whether a signup with this name/device is backed by this entry.
    ///
    /// Matches by case-insensitive name or by exact device id.
    pub fn matches(&self, name: &str, device_id: &str) -> bool {
        if crate::name_key(&self.name) == crate::name_key(name) {
            return true;
        }
        self.device_id.as_deref() == Some(device_id)
    }
}

/// Find the entry backing a signup, if any.
pub fn find_match<'a>(
    entries: &'a [WhitelistEntry],
    name: &str,
    device_id: &str,
) -> Option<&'a WhitelistEntry> {
    entries.iter().find(|e| e.matches(name, device_id))
}

/// Find the entry whose snooze code equals the supplied token.
pub fn find_by_code<'a>(entries: &'a [WhitelistEntry], code: &str) -> Option<&'a WhitelistEntry> {
    entries
        .iter()
        .find(|e| e.snooze_code.as_deref() == Some(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries() -> Vec<WhitelistEntry> {
        vec![
            WhitelistEntry {
                name: "Alice Smith".into(),
                device_id: Some("dA".into()),
                snooze_code: Some("ABC123".into()),
                email: Some("alice@example.com".into()),
            },
            WhitelistEntry {
                name: "Bob".into(),
                device_id: None,
                snooze_code: None,
                email: None,
            },
        ]
    }

    #[test]
    fn matches_by_case_insensitive_name() {
        let list = entries();
        assert!(find_match(&list, "alice smith", "unknown-device").is_some());
        assert!(find_match(&list, "BOB", "unknown-device").is_some());
    }

    #[test]
    fn matches_by_exact_device() {
        let list = entries();
        let hit = find_match(&list, "Completely Different Name", "dA").unwrap();
        assert_eq!(hit.name, "Alice Smith");
        assert!(find_match(&list, "Completely Different Name", "da").is_none());
    }

    #[test]
    fn no_match_for_strangers() {
        assert!(find_match(&entries(), "Carol", "dC").is_none());
    }

    #[test]
    fn lookup_by_code() {
        let list = entries();
        assert_eq!(find_by_code(&list, "ABC123").unwrap().name, "Alice Smith");
        assert!(find_by_code(&list, "XYZ789").is_none());
    }

    #[test]
    fn optional_fields_absent_from_wire() {
        let json = serde_json::to_value(&entries()[1]).unwrap();
        assert!(json.get("deviceId").is_none());
        assert!(json.get("snoozeCode").is_none());
        assert!(json.get("email").is_none());
    }
}

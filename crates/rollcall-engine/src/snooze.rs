//! # Snooze and Unsnooze Engine
//!
//! Per-participant state machine, scoped to the current recurrence
//! period: Active (on the main list) ⇄ Snoozed (removed, snapshot kept).
//! The snapshot preserves the original signup timestamp, so priority
//! ordering is unaffected by a temporary opt-out.
//!
//! Snoozing is never window-gated; unsnoozing requires the window open.

use rollcall_core::{
    whitelist, OrgSettings, Participant, ParticipantId, RollcallError, Roster, SnoozeEntry,
    SnoozeRecord, WhitelistEntry,
};
use rollcall_schedule::AccessStatus;

use crate::rebalance::rebalance;
use crate::signup::{locate, placement_message, ListType};

/// How the caller authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnoozeCredential {
    /// Per-member rotating snooze code (preferred).
    Code(String),
    /// Shared legacy password (back-compatibility path).
    LegacyPassword(String),
}

/// Parse exactly one credential from the request fields.
///
/// An absent code/password is a validation failure; supplying both is
/// too — the caller must pick one path.
pub fn parse_credential(
    code: Option<&str>,
    password: Option<&str>,
) -> Result<SnoozeCredential, RollcallError> {
    let code = code.map(str::trim).filter(|s| !s.is_empty());
    let password = password.map(str::trim).filter(|s| !s.is_empty());
    match (code, password) {
        (Some(code), None) => Ok(SnoozeCredential::Code(code.to_string())),
        (None, Some(password)) => Ok(SnoozeCredential::LegacyPassword(password.to_string())),
        (None, None) => Err(RollcallError::validation(
            "a snooze code or password is required",
        )),
        (Some(_), Some(_)) => Err(RollcallError::validation(
            "supply either a snooze code or a password, not both",
        )),
    }
}

/// Check a credential against the whitelist and settings.
///
/// A valid code identifies its member and returns the matching entry; a
/// valid legacy password authorizes without identifying anyone.
pub fn authenticate<'a>(
    entries: &'a [WhitelistEntry],
    settings: &OrgSettings,
    credential: &SnoozeCredential,
) -> Result<Option<&'a WhitelistEntry>, RollcallError> {
    match credential {
        SnoozeCredential::Code(code) => whitelist::find_by_code(entries, code)
            .map(Some)
            .ok_or(RollcallError::Authentication),
        SnoozeCredential::LegacyPassword(password) => {
            match settings.legacy_snooze_password.as_deref() {
                Some(expected) if expected == password => Ok(None),
                _ => Err(RollcallError::Authentication),
            }
        }
    }
}

/// Who is being snoozed.
#[derive(Debug, Clone)]
pub enum SnoozeTarget<'a> {
    /// Lookup by participant id.
    ById(&'a ParticipantId),
    /// Lookup by the authenticated member's name.
    ByName(&'a str),
}

/// Result of a successful snooze.
#[derive(Debug, Clone)]
pub struct SnoozeOutcome {
    /// The rebalanced roster to persist (a waitlisted participant may
    /// have been auto-promoted into the freed slot).
    pub roster: Roster,
    /// The updated snooze record to persist.
    pub record: SnoozeRecord,
    /// The participant who was removed.
    pub snoozed: Participant,
}

/// Snooze a privileged main-list participant.
///
/// If the stored record belongs to an earlier period it is reset first;
/// this lazy clearing computes the period id the same way the rollover
/// engine does, so the two resets agree.
pub fn snooze(
    roster: &Roster,
    record: &SnoozeRecord,
    current_period: &str,
    capacity: usize,
    target: SnoozeTarget<'_>,
) -> Result<SnoozeOutcome, RollcallError> {
    let found = match target {
        SnoozeTarget::ById(id) => roster.main_list.iter().find(|p| &p.id == id),
        SnoozeTarget::ByName(name) => roster.find_on_main_by_name(name),
    }
    .ok_or(RollcallError::NotOnMainList)?;
    if !found.is_whitelisted {
        return Err(RollcallError::NotPrivileged);
    }
    let snoozed = found.clone();

    let mut record = record.clone();
    record.reset_if_stale(current_period);
    record.add(SnoozeEntry::from_participant(&snoozed));

    let mut main = roster.main_list.clone();
    main.retain(|p| p.id != snoozed.id);
    let rebalanced = rebalance(main, roster.waitlist.clone(), capacity);
    tracing::info!(name = %snoozed.name, period = current_period, "snooze");

    Ok(SnoozeOutcome {
        roster: rebalanced,
        record,
        snoozed,
    })
}

/// Result of a successful unsnooze.
#[derive(Debug, Clone)]
pub struct UnsnoozeOutcome {
    /// The rebalanced roster to persist.
    pub roster: Roster,
    /// The updated snooze record to persist.
    pub record: SnoozeRecord,
    /// The restored participant.
    pub person: Participant,
    /// The list the restored participant landed on.
    pub list_type: ListType,
    /// 1-based position within that list.
    pub position: usize,
    /// Canned user-facing message, as for signup.
    pub message: String,
}

/// Restore a snoozed member's snapshot through the rebalancer.
pub fn unsnooze(
    roster: &Roster,
    record: &SnoozeRecord,
    current_period: &str,
    access: &AccessStatus,
    capacity: usize,
    name: &str,
) -> Result<UnsnoozeOutcome, RollcallError> {
    // Entries from an earlier period no longer exist for this one.
    if record.period_id != current_period || record.find(name).is_none() {
        return Err(RollcallError::NotSnoozed);
    }
    if !access.is_open {
        return Err(RollcallError::AccessClosed {
            message: access
                .message
                .clone()
                .unwrap_or_else(|| "RSVP is closed".to_string()),
            next_open: access.next_open,
        });
    }

    let mut record = record.clone();
    let entry = record.remove(name).ok_or(RollcallError::NotSnoozed)?;
    let person = entry.snapshot;

    let mut main = roster.main_list.clone();
    main.push(person.clone());
    let rebalanced = rebalance(main, roster.waitlist.clone(), capacity);

    let (list_type, position) = locate(&rebalanced, &person.id).ok_or(RollcallError::NotFound)?;
    let message = placement_message(list_type, position);
    tracing::info!(name = %person.name, period = current_period, "unsnooze");

    Ok(UnsnoozeOutcome {
        roster: rebalanced,
        record,
        person,
        list_type,
        position,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap() + Duration::seconds(secs)
    }

    fn person(name: &str, secs: i64, whitelisted: bool) -> Participant {
        Participant::new(name, format!("d-{name}"), at(secs)).whitelisted(whitelisted)
    }

    fn open() -> AccessStatus {
        AccessStatus::open()
    }

    fn entry(name: &str, code: Option<&str>) -> WhitelistEntry {
        WhitelistEntry {
            name: name.into(),
            device_id: None,
            snooze_code: code.map(Into::into),
            email: None,
        }
    }

    // ---- credentials ----

    #[test]
    fn exactly_one_credential_required() {
        assert!(matches!(
            parse_credential(None, None),
            Err(RollcallError::Validation(_))
        ));
        assert!(matches!(
            parse_credential(Some("ABC123"), Some("pw")),
            Err(RollcallError::Validation(_))
        ));
        assert_eq!(
            parse_credential(Some("ABC123"), None).unwrap(),
            SnoozeCredential::Code("ABC123".into())
        );
        assert_eq!(
            parse_credential(None, Some("pw")).unwrap(),
            SnoozeCredential::LegacyPassword("pw".into())
        );
    }

    #[test]
    fn blank_credential_counts_as_absent() {
        assert!(matches!(
            parse_credential(Some("  "), None),
            Err(RollcallError::Validation(_))
        ));
    }

    #[test]
    fn code_authenticates_and_identifies() {
        let entries = vec![entry("Alice", Some("ABC123")), entry("Bob", None)];
        let settings = OrgSettings::default();
        let hit = authenticate(&entries, &settings, &SnoozeCredential::Code("ABC123".into()))
            .unwrap()
            .unwrap();
        assert_eq!(hit.name, "Alice");
        assert_eq!(
            authenticate(&entries, &settings, &SnoozeCredential::Code("WRONG1".into())),
            Err(RollcallError::Authentication)
        );
    }

    #[test]
    fn legacy_password_authorizes_without_identity() {
        let entries = vec![entry("Alice", Some("ABC123"))];
        let settings = OrgSettings {
            legacy_snooze_password: Some("hunter2".into()),
            ..OrgSettings::default()
        };
        let identity = authenticate(
            &entries,
            &settings,
            &SnoozeCredential::LegacyPassword("hunter2".into()),
        )
        .unwrap();
        assert!(identity.is_none());
        assert_eq!(
            authenticate(
                &entries,
                &settings,
                &SnoozeCredential::LegacyPassword("wrong".into())
            ),
            Err(RollcallError::Authentication)
        );
        // No password configured at all: always an authentication error.
        assert_eq!(
            authenticate(
                &entries,
                &OrgSettings::default(),
                &SnoozeCredential::LegacyPassword("hunter2".into())
            ),
            Err(RollcallError::Authentication)
        );
    }

    // ---- snooze ----

    #[test]
    fn snooze_removes_and_promotes() {
        let member = person("Alice", 0, true);
        let roster = Roster {
            main_list: vec![member.clone()],
            waitlist: vec![person("Bob", 1, false)],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let outcome = snooze(
            &roster,
            &record,
            "2026-W03",
            1,
            SnoozeTarget::ById(&member.id),
        )
        .unwrap();
        assert_eq!(outcome.roster.main_list[0].name, "Bob");
        assert!(outcome.roster.waitlist.is_empty());
        assert_eq!(outcome.record.entries.len(), 1);
        assert_eq!(outcome.record.entries[0].name_key, "alice");
    }

    #[test]
    fn snooze_rejects_regulars() {
        let regular = person("Alice", 0, false);
        let roster = Roster {
            main_list: vec![regular.clone()],
            waitlist: vec![],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let err = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ById(&regular.id),
        )
        .unwrap_err();
        assert_eq!(err, RollcallError::NotPrivileged);
    }

    #[test]
    fn snooze_rejects_waitlisted_members() {
        let member = person("Alice", 0, true);
        let roster = Roster {
            main_list: vec![],
            waitlist: vec![member.clone()],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let err = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ById(&member.id),
        )
        .unwrap_err();
        assert_eq!(err, RollcallError::NotOnMainList);
    }

    #[test]
    fn snooze_resets_stale_record_first() {
        let member = person("Alice", 0, true);
        let roster = Roster {
            main_list: vec![member.clone()],
            waitlist: vec![],
        };
        let mut stale = SnoozeRecord::empty("2026-W02");
        stale.add(SnoozeEntry::from_participant(&person("Old", 5, true)));
        let outcome = snooze(
            &roster,
            &stale,
            "2026-W03",
            5,
            SnoozeTarget::ById(&member.id),
        )
        .unwrap();
        assert_eq!(outcome.record.period_id, "2026-W03");
        assert_eq!(outcome.record.names(), vec!["alice"]);
    }

    #[test]
    fn snooze_by_name_is_case_insensitive() {
        let member = person("Alice Smith", 0, true);
        let roster = Roster {
            main_list: vec![member],
            waitlist: vec![],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let outcome = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ByName("ALICE SMITH"),
        )
        .unwrap();
        assert_eq!(outcome.snoozed.name, "Alice Smith");
    }

    // ---- unsnooze ----

    #[test]
    fn snooze_unsnooze_round_trip_preserves_timestamp_and_position() {
        let early_member = person("Alice", 0, true);
        let late_member = person("Carol", 50, true);
        let regular = person("Bob", 10, false);
        let roster = rebalance(
            vec![early_member.clone(), late_member, regular],
            vec![],
            5,
        );
        let record = SnoozeRecord::empty("2026-W03");

        let snoozed = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ById(&early_member.id),
        )
        .unwrap();
        let restored = unsnooze(
            &snoozed.roster,
            &snoozed.record,
            "2026-W03",
            &open(),
            5,
            "alice",
        )
        .unwrap();

        assert_eq!(restored.person.timestamp, early_member.timestamp);
        // Back at the head of the member tier, same as before.
        assert_eq!(restored.list_type, ListType::Main);
        assert_eq!(restored.position, 1);
        assert_eq!(restored.roster.main_list[0].name, "Alice");
        assert!(restored.record.entries.is_empty());
    }

    #[test]
    fn unsnooze_requires_open_window() {
        let member = person("Alice", 0, true);
        let roster = Roster {
            main_list: vec![member.clone()],
            waitlist: vec![],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let snoozed = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ById(&member.id),
        )
        .unwrap();

        let closed = AccessStatus {
            is_open: false,
            message: Some("RSVP is closed. Opens Friday at 6:00 PM".into()),
            next_open: None,
        };
        let err = unsnooze(
            &snoozed.roster,
            &snoozed.record,
            "2026-W03",
            &closed,
            5,
            "Alice",
        )
        .unwrap_err();
        assert!(matches!(err, RollcallError::AccessClosed { .. }));
    }

    #[test]
    fn unsnooze_unknown_member_not_snoozed() {
        let record = SnoozeRecord::empty("2026-W03");
        let err = unsnooze(&Roster::new(), &record, "2026-W03", &open(), 5, "Nobody").unwrap_err();
        assert_eq!(err, RollcallError::NotSnoozed);
    }

    #[test]
    fn unsnooze_entries_do_not_survive_a_period_change() {
        let member = person("Alice", 0, true);
        let roster = Roster {
            main_list: vec![member.clone()],
            waitlist: vec![],
        };
        let record = SnoozeRecord::empty("2026-W03");
        let snoozed = snooze(
            &roster,
            &record,
            "2026-W03",
            5,
            SnoozeTarget::ById(&member.id),
        )
        .unwrap();
        let err = unsnooze(
            &snoozed.roster,
            &snoozed.record,
            "2026-W04",
            &open(),
            5,
            "Alice",
        )
        .unwrap_err();
        assert_eq!(err, RollcallError::NotSnoozed);
    }
}

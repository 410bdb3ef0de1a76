//! # Per-Organization Key Layout
//!
//! Each organization's roster, settings, recurrence config, whitelist,
//! snooze record, archive, and markers are independent documents under
//! distinct keys. There is no cross-organization interaction.

/// Key builder for one organization's documents.
#[derive(Debug, Clone)]
pub struct OrgKeys {
    org: String,
}

impl OrgKeys {
    /// Keys for the given organization slug.
    pub fn new(org: impl Into<String>) -> Self {
        Self { org: org.into() }
    }

    /// The roster document (main list + waitlist).
    pub fn roster(&self) -> String {
        self.key("roster")
    }

    /// Capacity and email settings.
    pub fn settings(&self) -> String {
        self.key("settings")
    }

    /// The recurring access-window configuration.
    pub fn recurrence(&self) -> String {
        self.key("recurrence")
    }

    /// The whitelist entries.
    pub fn whitelist(&self) -> String {
        self.key("whitelist")
    }

    /// The current period's snooze record.
    pub fn snooze(&self) -> String {
        self.key("snooze")
    }

    /// The archive of completed periods.
    pub fn archive(&self) -> String {
        self.key("archive")
    }

    /// The rollover marker: last period for which rollover executed.
    pub fn rollover(&self) -> String {
        self.key("rollover")
    }

    /// The email marker: last period for which the roster was sent.
    pub fn emailed(&self) -> String {
        self.key("emailed")
    }

    fn key(&self, suffix: &str) -> String {
        format!("org:{}:{}", self.org, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_namespaced_by_org() {
        let keys = OrgKeys::new("thursday-hockey");
        assert_eq!(keys.roster(), "org:thursday-hockey:roster");
        assert_eq!(keys.rollover(), "org:thursday-hockey:rollover");
        assert_eq!(keys.emailed(), "org:thursday-hockey:emailed");
    }

    #[test]
    fn distinct_orgs_never_collide() {
        let a = OrgKeys::new("a");
        let b = OrgKeys::new("b");
        assert_ne!(a.roster(), b.roster());
    }
}

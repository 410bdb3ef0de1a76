//! # Event Service
//!
//! The orchestrator exposed to adapters (HTTP, CLI). Each operation is
//! one storage read of the organization's documents, pure computation,
//! and one complete-replacement write of whatever changed.
//!
//! Every state read runs the rollover check first, then evaluates the
//! access window, then normalizes list order through the rebalancer.
//! Concurrent requests can race on the last-write-wins store; every
//! transition here is idempotent, so a lost write costs at most one
//! repeated (identical) rollover or rebalance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use rollcall_core::{
    ArchiveEntry, OrgId, OrgSettings, Participant, ParticipantId, RecurrenceConfig, RollcallError,
    Roster, SnoozeRecord, WhitelistEntry,
};
use rollcall_schedule::window::ScheduleError;
use rollcall_schedule::{evaluate, period_id, AccessStatus, Clock};
use rollcall_store::{read_doc, write_doc, OrgKeys, StateStore, StoreError};

use crate::email::email_due;
use crate::rebalance::{change_capacity, rebalance};
use crate::rollover::{run_rollover, RolloverState};
use crate::signup::{self, ListType, WithdrawGate};
use crate::snooze::{self, SnoozeTarget};

/// Error surface of the service layer: the domain taxonomy, storage
/// failures passed through unchanged, and schedule configuration errors.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A rejected domain precondition.
    #[error(transparent)]
    Domain(#[from] RollcallError),

    /// A storage failure, propagated as-is.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A broken recurrence configuration or unknown timezone.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Public state of one organization's event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicState {
    /// The main list in priority order.
    pub main_list: Vec<Participant>,
    /// The waitlist in priority order.
    pub waitlist: Vec<Participant>,
    /// Main-list capacity.
    pub capacity: usize,
    /// Current access-window status.
    pub access_status: AccessStatus,
    /// Names snoozed in the current period.
    pub snoozed_names: Vec<String>,
}

/// Result of a signup.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    /// The list the participant landed on.
    pub list_type: ListType,
    /// 1-based position within that list.
    pub position: usize,
    /// Canned user-facing message.
    pub message: String,
    /// The created participant.
    pub person: Participant,
}

/// Result of a withdrawal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    /// Canned user-facing message.
    pub message: String,
    /// The waitlisted participant promoted into the freed slot, if any.
    pub promoted_person: Option<Participant>,
}

/// Result of a snooze.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnoozeResponse {
    /// Canned user-facing message.
    pub message: String,
    /// Names snoozed in the current period after this operation.
    pub snoozed_names: Vec<String>,
}

/// Result of a capacity change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityResponse {
    /// Participants promoted onto the main list.
    pub promoted: Vec<Participant>,
    /// Participants demoted onto the waitlist.
    pub demoted: Vec<Participant>,
    /// The rebalanced main list.
    pub main_list: Vec<Participant>,
    /// The rebalanced waitlist.
    pub waitlist: Vec<Participant>,
}

/// One organization's documents, read together at operation start.
struct OrgState {
    keys: OrgKeys,
    settings: OrgSettings,
    config: RecurrenceConfig,
    roster: Roster,
    whitelist: Vec<WhitelistEntry>,
    snooze: SnoozeRecord,
    archive: Vec<ArchiveEntry>,
    marker: Option<String>,
    emailed: Option<String>,
}

/// Access status and period id computed once per operation, after the
/// rollover check has run.
struct Checkpoint {
    access: AccessStatus,
    period: Option<String>,
}

/// The event service: storage port + clock port.
pub struct EventService {
    store: Arc<dyn StateStore>,
    clock: Arc<dyn Clock>,
}

impl EventService {
    /// Build a service over the given ports.
    pub fn new(store: Arc<dyn StateStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Read the public state. Runs the rollover check, evaluates the
    /// window, and persists the normalized (rebalanced) roster.
    pub async fn get_public_state(&self, org: &OrgId) -> Result<PublicState, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        let checkpoint = self.checkpoint(&mut state, now).await?;

        let rebalanced = rebalance(
            state.roster.main_list,
            state.roster.waitlist,
            state.settings.capacity,
        );
        write_doc(self.store.as_ref(), &state.keys.roster(), &rebalanced).await?;

        let snoozed_names = match &checkpoint.period {
            Some(period) if state.snooze.period_id == *period => state.snooze.names(),
            _ => Vec::new(),
        };
        Ok(PublicState {
            main_list: rebalanced.main_list,
            waitlist: rebalanced.waitlist,
            capacity: state.settings.capacity,
            access_status: checkpoint.access,
            snoozed_names,
        })
    }

    /// Sign a participant up.
    pub async fn signup(
        &self,
        org: &OrgId,
        name: &str,
        device_id: &str,
    ) -> Result<SignupResponse, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        let checkpoint = self.checkpoint(&mut state, now).await?;

        let outcome = signup::signup(
            &state.roster,
            &state.whitelist,
            &checkpoint.access,
            state.settings.capacity,
            name,
            device_id,
            now,
        )?;
        write_doc(self.store.as_ref(), &state.keys.roster(), &outcome.roster).await?;
        Ok(SignupResponse {
            list_type: outcome.list_type,
            position: outcome.position,
            message: outcome.message,
            person: outcome.person,
        })
    }

    /// Withdraw a participant from the indicated list.
    pub async fn withdraw(
        &self,
        org: &OrgId,
        participant_id: &ParticipantId,
        device_id: &str,
        from_waitlist: bool,
    ) -> Result<WithdrawResponse, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        let checkpoint = self.checkpoint(&mut state, now).await?;

        let gate = withdraw_gate(&state, &checkpoint);
        let outcome = signup::withdraw(
            &state.roster,
            participant_id,
            device_id,
            from_waitlist,
            &gate,
        )?;
        write_doc(self.store.as_ref(), &state.keys.roster(), &outcome.roster).await?;
        Ok(WithdrawResponse {
            message: outcome.message,
            promoted_person: outcome.promoted_person,
        })
    }

    /// Snooze a privileged main-list member for the current period.
    ///
    /// Never window-gated. The caller supplies either a per-member
    /// snooze code (which also identifies the member) or the legacy
    /// shared password plus a participant id.
    pub async fn snooze(
        &self,
        org: &OrgId,
        participant_id: Option<&ParticipantId>,
        code: Option<&str>,
        password: Option<&str>,
    ) -> Result<SnoozeResponse, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        let checkpoint = self.checkpoint(&mut state, now).await?;
        let period = require_period(&checkpoint)?;

        let credential = snooze::parse_credential(code, password)?;
        let identity = snooze::authenticate(&state.whitelist, &state.settings, &credential)?;

        let target = match (participant_id, identity) {
            (Some(id), _) => SnoozeTarget::ById(id),
            (None, Some(entry)) => SnoozeTarget::ByName(&entry.name),
            (None, None) => {
                return Err(RollcallError::validation(
                    "participantId is required with the legacy password",
                )
                .into())
            }
        };
        let outcome = snooze::snooze(
            &state.roster,
            &state.snooze,
            period,
            state.settings.capacity,
            target,
        )?;
        write_doc(self.store.as_ref(), &state.keys.roster(), &outcome.roster).await?;
        write_doc(self.store.as_ref(), &state.keys.snooze(), &outcome.record).await?;
        Ok(SnoozeResponse {
            message: format!("{} is snoozed for this period", outcome.snoozed.name),
            snoozed_names: outcome.record.names(),
        })
    }

    /// Restore a snoozed member. Requires the window to be open.
    pub async fn unsnooze(
        &self,
        org: &OrgId,
        person_name: Option<&str>,
        code: Option<&str>,
        password: Option<&str>,
    ) -> Result<SignupResponse, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        let checkpoint = self.checkpoint(&mut state, now).await?;
        let period = require_period(&checkpoint)?;

        let credential = snooze::parse_credential(code, password)?;
        let identity = snooze::authenticate(&state.whitelist, &state.settings, &credential)?;
        let name = match (person_name, identity) {
            (Some(name), _) => name,
            (None, Some(entry)) => entry.name.as_str(),
            (None, None) => {
                return Err(RollcallError::validation(
                    "personName is required with the legacy password",
                )
                .into())
            }
        };

        let outcome = snooze::unsnooze(
            &state.roster,
            &state.snooze,
            period,
            &checkpoint.access,
            state.settings.capacity,
            name,
        )?;
        write_doc(self.store.as_ref(), &state.keys.roster(), &outcome.roster).await?;
        write_doc(self.store.as_ref(), &state.keys.snooze(), &outcome.record).await?;
        Ok(SignupResponse {
            list_type: outcome.list_type,
            position: outcome.position,
            message: outcome.message,
            person: outcome.person,
        })
    }

    /// Change the capacity limit and rebalance immediately, reporting
    /// who moved.
    pub async fn update_capacity(
        &self,
        org: &OrgId,
        new_limit: usize,
    ) -> Result<CapacityResponse, ServiceError> {
        if new_limit == 0 {
            return Err(RollcallError::validation("capacity must be at least 1").into());
        }
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        self.checkpoint(&mut state, now).await?;

        let change = change_capacity(state.roster, new_limit);
        state.settings.capacity = new_limit;
        write_doc(self.store.as_ref(), &state.keys.settings(), &state.settings).await?;
        write_doc(self.store.as_ref(), &state.keys.roster(), &change.roster).await?;
        tracing::info!(org = %org, new_limit, promoted = change.promoted.len(), demoted = change.demoted.len(), "capacity change");
        Ok(CapacityResponse {
            promoted: change.promoted,
            demoted: change.demoted,
            main_list: change.roster.main_list,
            waitlist: change.roster.waitlist,
        })
    }

    /// Run the email-due check; when the roster email for the current
    /// period is due, mark the period as sent and return its id for the
    /// external mailer. Safe to call at any frequency.
    pub async fn run_email_check(&self, org: &OrgId) -> Result<Option<String>, ServiceError> {
        let now = self.clock.now();
        let mut state = self.load(org).await?;
        self.checkpoint(&mut state, now).await?;

        if !email_due(&state.settings, &state.config, state.emailed.as_deref(), now)? {
            return Ok(None);
        }
        let period = period_id(&state.config, now)?;
        write_doc(self.store.as_ref(), &state.keys.emailed(), &period).await?;
        tracing::info!(org = %org, period = %period, "roster email due; period marked sent");
        Ok(Some(period))
    }

    // ── Organizer-facing document writes ────────────────────────────

    /// Replace the recurrence configuration.
    pub async fn set_recurrence(
        &self,
        org: &OrgId,
        config: &RecurrenceConfig,
    ) -> Result<(), ServiceError> {
        config.validate().map_err(ServiceError::Domain)?;
        // Reject unknown timezones up front rather than at first read.
        evaluate(config, self.clock.now())
            .map_err(|err| ServiceError::Domain(RollcallError::validation(err.to_string())))?;
        let keys = OrgKeys::new(org.as_str());
        write_doc(self.store.as_ref(), &keys.recurrence(), config).await?;
        Ok(())
    }

    /// Replace the organization settings.
    pub async fn set_settings(
        &self,
        org: &OrgId,
        settings: &OrgSettings,
    ) -> Result<(), ServiceError> {
        settings.validate().map_err(ServiceError::Domain)?;
        let keys = OrgKeys::new(org.as_str());
        write_doc(self.store.as_ref(), &keys.settings(), settings).await?;
        Ok(())
    }

    /// Replace the whitelist.
    pub async fn set_whitelist(
        &self,
        org: &OrgId,
        entries: &[WhitelistEntry],
    ) -> Result<(), ServiceError> {
        let keys = OrgKeys::new(org.as_str());
        write_doc(self.store.as_ref(), &keys.whitelist(), &entries.to_vec()).await?;
        Ok(())
    }

    /// Read the archive of completed periods, newest last.
    pub async fn get_archive(&self, org: &OrgId) -> Result<Vec<ArchiveEntry>, ServiceError> {
        let keys = OrgKeys::new(org.as_str());
        Ok(read_doc(self.store.as_ref(), &keys.archive())
            .await?
            .unwrap_or_default())
    }

    // ── Internal plumbing ───────────────────────────────────────────

    async fn load(&self, org: &OrgId) -> Result<OrgState, ServiceError> {
        let store = self.store.as_ref();
        let keys = OrgKeys::new(org.as_str());
        Ok(OrgState {
            settings: read_doc(store, &keys.settings()).await?.unwrap_or_default(),
            config: read_doc(store, &keys.recurrence())
                .await?
                .unwrap_or_else(RecurrenceConfig::disabled),
            roster: read_doc(store, &keys.roster()).await?.unwrap_or_default(),
            whitelist: read_doc(store, &keys.whitelist()).await?.unwrap_or_default(),
            snooze: read_doc(store, &keys.snooze()).await?.unwrap_or_default(),
            archive: read_doc(store, &keys.archive()).await?.unwrap_or_default(),
            marker: read_doc(store, &keys.rollover()).await?,
            emailed: read_doc(store, &keys.emailed()).await?,
            keys,
        })
    }

    /// Run the rollover check and compute the window status and period
    /// id once for the whole operation. Persists rollover effects.
    async fn checkpoint(
        &self,
        state: &mut OrgState,
        now: DateTime<Utc>,
    ) -> Result<Checkpoint, ServiceError> {
        let access = evaluate(&state.config, now)?;
        if !state.config.enabled {
            return Ok(Checkpoint {
                access,
                period: None,
            });
        }
        let period = period_id(&state.config, now)?;

        let outcome = run_rollover(
            RolloverState {
                roster: state.roster.clone(),
                snooze: state.snooze.clone(),
                archive: state.archive.clone(),
                marker: state.marker.clone(),
            },
            &state.config,
            access.is_open,
            &period,
            now,
        );
        if outcome.rolled {
            let store = self.store.as_ref();
            write_doc(store, &state.keys.roster(), &outcome.state.roster).await?;
            write_doc(store, &state.keys.snooze(), &outcome.state.snooze).await?;
            write_doc(store, &state.keys.archive(), &outcome.state.archive).await?;
            write_doc(store, &state.keys.rollover(), &period).await?;
            state.roster = outcome.state.roster;
            state.snooze = outcome.state.snooze;
            state.archive = outcome.state.archive;
            state.marker = outcome.state.marker;
        }
        Ok(Checkpoint {
            access,
            period: Some(period),
        })
    }
}

fn require_period(checkpoint: &Checkpoint) -> Result<&str, ServiceError> {
    checkpoint
        .period
        .as_deref()
        .ok_or_else(|| RollcallError::validation("snoozing requires a recurring schedule").into())
}

/// Compute the withdrawal gate.
///
/// Email enabled: blocked only once the current period's roster has
/// been emailed, regardless of the window. Email disabled: blocked when
/// the window is closed, exactly like signup.
fn withdraw_gate(state: &OrgState, checkpoint: &Checkpoint) -> WithdrawGate {
    if !state.config.enabled {
        return WithdrawGate::Open;
    }
    if state.settings.email_enabled {
        match (&checkpoint.period, &state.emailed) {
            (Some(period), Some(emailed)) if period == emailed => WithdrawGate::Closed {
                message: "The roster for this period has already been emailed".to_string(),
                next_open: None,
            },
            _ => WithdrawGate::Open,
        }
    } else if checkpoint.access.is_open {
        WithdrawGate::Open
    } else {
        WithdrawGate::Closed {
            message: checkpoint
                .access
                .message
                .clone()
                .unwrap_or_else(|| "RSVP is closed".to_string()),
            next_open: checkpoint.access.next_open,
        }
    }
}

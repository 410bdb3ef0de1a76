//! # rollcall-engine — List Engines and Event Service
//!
//! The algorithmic core of Rollcall. Every module here is pure
//! computation over the types in `rollcall-core`; the one exception is
//! `service`, which brackets each operation with a storage read and a
//! storage write through the `rollcall-store` port.
//!
//! ## Modules
//!
//! - **rebalance** — the single source of truth for list order: merge,
//!   stable-sort by (whitelisted first, earliest signup first), split at
//!   capacity. Pure and idempotent.
//! - **signup** — signup and withdrawal, with duplicate guards, window
//!   gating, position reporting, and waitlist promotion.
//! - **snooze** — per-period restorable opt-out for privileged members,
//!   with snooze-code / legacy-password authentication.
//! - **rollover** — the lazy, idempotent once-per-period archive and
//!   reset, run at the start of every state read.
//! - **email** — the post-close email-due check.
//! - **service** — the `EventService` orchestrator exposed to adapters.
//!
//! ## Control Flow
//!
//! On every read of an event's public state the rollover engine runs
//! first (idempotently), then the window evaluator computes access
//! status, then the rebalancer normalizes list order. Every mutation
//! funnels back through the rebalancer; there is no ad-hoc insertion.

pub mod email;
pub mod rebalance;
pub mod rollover;
pub mod service;
pub mod signup;
pub mod snooze;

pub use email::email_due;
pub use rebalance::{change_capacity, rebalance, CapacityChange};
pub use rollover::{run_rollover, RolloverOutcome, RolloverState};
pub use service::{
    CapacityResponse, EventService, PublicState, ServiceError, SignupResponse, SnoozeResponse,
    WithdrawResponse,
};
pub use signup::{signup, withdraw, ListType, SignupOutcome, WithdrawGate, WithdrawOutcome};
pub use snooze::{
    authenticate, parse_credential, snooze, unsnooze, SnoozeCredential, SnoozeOutcome,
    SnoozeTarget, UnsnoozeOutcome,
};

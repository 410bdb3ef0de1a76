//! # rollcall-schedule — Access-Window Evaluation
//!
//! Decides whether signups are currently allowed under a recurring,
//! timezone-aware, possibly week-wrapping schedule, and computes the
//! instants the window next opens and last closed.
//!
//! ## Modules
//!
//! - **window** — minute-of-week math, weekly and monthly window
//!   evaluation, next-open / last-close resolution, human messages.
//! - **period** — stable per-cycle string identifiers (ISO week tokens
//!   for weekly cadence, year-month tokens for monthly cadence).
//! - **clock** — the `Clock` port so every caller can be driven by a
//!   fixed clock in tests.
//!
//! ## Design
//!
//! All wall-clock work happens on the configured IANA zone's local
//! clock. Conversions from local wall-clock back to absolute instants go
//! through one resolver that takes the earliest mapping for
//! DST-ambiguous times and rolls forward through DST gaps.

pub mod clock;
pub mod period;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use period::period_id;
pub use window::{evaluate, last_close, next_open, AccessStatus, ScheduleError, WeekTime};

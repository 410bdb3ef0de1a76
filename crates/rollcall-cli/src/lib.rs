//! # rollcall-cli — Operator Tools
//!
//! Subcommand handlers for the `rollcall` binary:
//!
//! - `window` — evaluate an access window at an instant and print the
//!   period identifier.
//! - `spec` — dump the generated OpenAPI document.

pub mod schedule;
pub mod spec;

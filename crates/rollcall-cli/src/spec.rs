//! # Spec Subcommand
//!
//! Prints the generated OpenAPI document, for piping into client
//! generators and diffing in CI.

use anyhow::{Context, Result};
use clap::Args;
use utoipa::OpenApi;

use rollcall_api::openapi::ApiDoc;

/// Arguments for the `rollcall spec` subcommand.
#[derive(Args, Debug)]
pub struct SpecArgs {
    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,
}

/// Execute the spec subcommand.
pub fn run_spec(args: &SpecArgs) -> Result<u8> {
    let spec = ApiDoc::openapi();
    let rendered = if args.pretty {
        serde_json::to_string_pretty(&spec)
    } else {
        serde_json::to_string(&spec)
    }
    .context("could not serialize the OpenAPI document")?;
    println!("{rendered}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_renders_as_json() {
        assert_eq!(run_spec(&SpecArgs { pretty: false }).unwrap(), 0);
        assert_eq!(run_spec(&SpecArgs { pretty: true }).unwrap(), 0);
    }
}

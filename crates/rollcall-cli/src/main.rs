//! # rollcall CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// Rollcall CLI — recurring signup event toolchain.
///
/// Evaluates access windows, computes period identifiers, and dumps the
/// API's OpenAPI document.
#[derive(Parser, Debug)]
#[command(name = "rollcall", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Evaluate an access window at an instant.
    Window(rollcall_cli::schedule::WindowArgs),
    /// Print the generated OpenAPI document.
    Spec(rollcall_cli::spec::SpecArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Window(args) => rollcall_cli::schedule::run_window(&args)?,
        Commands::Spec(args) => rollcall_cli::spec::run_spec(&args)?,
    };
    std::process::exit(i32::from(code));
}

//! Relay: keep AI assistant instructions, prompts, agents and skills in sync.
//!
//! # Usage
//!
//! ```text
//! relay sync     [PATH] [--force] [--dry-run] [--only CAT..] [--exclude CAT..]
//!                [--target TOOL..] [--repo OWNER/REPO] [--branch B] [--templates DIR] [--json]
//! relay diff     [PATH] [--target TOOL..] [--templates DIR]
//! relay verify   [PATH] [--restore] [--only CAT..] [--exclude CAT..] [--templates DIR] [--json]
//! relay validate [PATH] [--strict | --ci] [--json]
//! ```

mod commands;
mod report;

use clap::{Parser, Subcommand};

use commands::{diff::DiffArgs, sync::SyncArgs, validate::ValidateArgs, verify::VerifyArgs};
use report::OutputMode;

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "relay",
    version,
    about = "Distribute AI assistant templates into a project and detect drift",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Install templates into a project and record them in the manifest.
    Sync(SyncArgs),

    /// Show a unified diff of what `sync --force` would write.
    Diff(DiffArgs),

    /// Compare installed files against the manifest checksums.
    Verify(VerifyArgs),

    /// Read-only compliance check, suitable for CI.
    Validate(ValidateArgs),
}

impl Commands {
    fn output_mode(&self) -> OutputMode {
        let json = match self {
            Commands::Sync(args) => args.json,
            Commands::Diff(_) => false,
            Commands::Verify(args) => args.json,
            Commands::Validate(args) => args.json,
        };
        OutputMode::from_flag(json)
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let mode = cli.command.output_mode();
    let outcome = match cli.command {
        Commands::Sync(args) => args.run(mode),
        Commands::Diff(args) => args.run(),
        Commands::Verify(args) => args.run(mode),
        Commands::Validate(args) => args.run(mode),
    };
    let code = match outcome {
        Ok(code) => code,
        Err(err) => {
            report::fatal(mode, &err);
            1
        }
    };
    std::process::exit(code);
}

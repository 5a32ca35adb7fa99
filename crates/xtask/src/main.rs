//! Xtask - Project-specific automation tasks for the message catalog.
//!
//! This crate provides development automation tasks that can be run via:
//! ```bash
//! cargo xtask <command>
//! ```
//!
//! Available commands:
//! - `audit`: Check the catalog data and the sources that use message ids
//! - `log-reference`: Write the log message reference (DocBook or text)
//! - `verify`: Run full project verification (build + tests + audit)

mod audit;
mod log_reference;
mod verify;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Project-specific automation tasks for the message catalog.
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation tasks for the message catalog")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Audit the message catalog.
    ///
    /// Reports malformed keys and templates and duplicate ids in
    /// message_catalog.json, and message ids built from integer literals
    /// in the Rust sources.
    Audit {
        /// Show verbose output including all files checked.
        #[arg(short, long)]
        verbose: bool,

        /// Only show errors, no progress or summary.
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write the log message reference.
    LogReference {
        #[arg(long, value_enum, default_value_t = log_reference::Format::Docbook)]
        format: log_reference::Format,

        /// Document every severity instead of only severe and fatal errors.
        #[arg(long)]
        all: bool,

        /// Output directory (docbook) or file (text). Defaults to stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Registry configuration file (TOML).
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run full project verification.
    ///
    /// 1. Build all crates (cargo build --workspace)
    /// 2. Run all tests (cargo nextest run --workspace, then doctests)
    /// 3. Audit the message catalog
    ///
    /// Use this before committing to ensure nothing is broken.
    Verify {
        #[arg(long)]
        skip_build: bool,

        #[arg(long)]
        skip_tests: bool,

        #[arg(long)]
        skip_audit: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xtask=info,message_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Audit { verbose, quiet } => audit::run(&audit::AuditConfig { verbose, quiet }),
        Command::LogReference {
            format,
            all,
            output,
            config,
        } => log_reference::run(&log_reference::LogReferenceConfig {
            format,
            all,
            output,
            config,
        }),
        Command::Verify {
            skip_build,
            skip_tests,
            skip_audit,
        } => verify::run(&verify::VerifyConfig {
            skip_build,
            skip_tests,
            skip_audit,
        }),
    }
}

//! cli
//!
//! Command-line interface layer for storetree.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Install the tracing subscriber
//! - Delegate to command handlers
//!
//! The CLI only inspects definitions. It builds a [`crate::store::Store`]
//! exactly as library callers do, so any definition error it reports is the
//! one a program would get.

pub mod args;
pub mod commands;

pub use args::{Cli, Command, Shell};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use crate::ui::output::Verbosity;

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "STREE_LOG";

/// Flags shared by every command.
#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub verbosity: Verbosity,
}

/// Install a stderr tracing subscriber.
///
/// `--debug` forces the `debug` level. Otherwise `STREE_LOG` is used,
/// falling back to `warn` (or `error` when quiet).
pub fn init_tracing(verbosity: Verbosity) {
    let filter = match verbosity {
        Verbosity::Debug => EnvFilter::new("debug"),
        Verbosity::Quiet => {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("error"))
        }
        Verbosity::Normal => {
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
        }
    };

    // Keep an already-installed global subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .try_init();
}

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    let ctx = Context {
        verbosity: Verbosity::from_flags(cli.quiet, cli.debug),
    };
    init_tracing(ctx.verbosity);

    commands::dispatch(cli.command, &ctx)
}

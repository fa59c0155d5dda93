//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// stree - inspect module-tree store definitions
#[derive(Parser, Debug)]
#[command(name = "stree")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output; suppresses warnings
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the module tree of a definition file
    #[command(
        name = "tree",
        long_about = "Print the module tree built from a definition file.\n\n\
            Each line is one module, indented under its parent, in registration \
            order. Namespaced modules are marked.",
        after_help = "\
EXAMPLES:
    # Show the tree
    stree tree store.toml

    # Machine-readable, one entry per module in registration order
    stree tree store.json --json"
    )]
    Tree {
        /// Definition file (.toml or .json)
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the composed initial state of a definition file
    #[command(
        name = "state",
        long_about = "Print the state a store built from a definition file starts with.\n\n\
            By default this is the composed state: the root module's own keys plus \
            one nested key per child module. With --path, only that module's local \
            state is printed.",
        after_help = "\
EXAMPLES:
    # Whole composed state
    stree state store.toml

    # Local state of a nested module
    stree state store.toml --path user/prefs"
    )]
    State {
        /// Definition file (.toml or .json)
        file: PathBuf,

        /// Module path such as `a/c`; prints that module's local state
        #[arg(long)]
        path: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(name = "completion")]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_state_with_path() {
        let cli = Cli::try_parse_from(["stree", "state", "s.toml", "--path", "a/c"]).unwrap();
        match cli.command {
            Command::State { file, path } => {
                assert_eq!(file, PathBuf::from("s.toml"));
                assert_eq!(path.as_deref(), Some("a/c"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["stree", "tree", "s.json", "--json", "--debug"]).unwrap();
        assert!(cli.debug);
        assert!(matches!(cli.command, Command::Tree { json: true, .. }));
    }
}

//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! Each handler loads the definition file, builds the store, and formats
//! what it finds. Handlers never write to the definition file.

mod completion;
mod state;
mod tree;

pub use completion::completion;
pub use state::state;
pub use tree::tree;

use std::path::Path;

use anyhow::{Context as _, Result};

use super::args::Command;
use super::Context;
use crate::core::config::load_definition;
use crate::store::Store;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Tree { file, json } => tree(ctx, &file, json),
        Command::State { file, path } => state(ctx, &file, path.as_deref()),
        Command::Completion { shell } => completion(shell),
    }
}

/// Load `file` and build a store from it.
fn open_store(file: &Path) -> Result<Store> {
    let def = load_definition(file)?;
    Store::new(def).with_context(|| format!("invalid store definition in '{}'", file.display()))
}

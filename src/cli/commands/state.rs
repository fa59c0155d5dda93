//! state command - Display the composed initial state

use std::path::Path;

use anyhow::{anyhow, Context as _, Result};

use super::open_store;
use crate::cli::Context;
use crate::core::types::ModulePath;
use crate::ui::output;

/// Print the composed state of `file`, or one module's local state.
pub fn state(ctx: &Context, file: &Path, path: Option<&str>) -> Result<()> {
    let store = open_store(file)?;
    let view = store.state();

    let rendered = match path {
        None => serde_json::to_string_pretty(&view)?,
        Some(raw) => {
            let path = raw.parse::<ModulePath>().context("invalid --path")?;
            let local = view
                .get(&path)
                .ok_or_else(|| anyhow!("no module at path '{}'", path))?;
            serde_json::to_string_pretty(local)?
        }
    };

    output::print(rendered, ctx.verbosity);
    Ok(())
}

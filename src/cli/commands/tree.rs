//! tree command - Display the registered module tree

use std::path::Path;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use super::open_store;
use crate::cli::Context;
use crate::store::Store;
use crate::ui::output;

/// One module in `--json` output.
#[derive(Debug, Serialize)]
struct TreeEntry {
    path: String,
    namespace: String,
    namespaced: bool,
    children: Vec<String>,
    /// Local state only
    state: Value,
}

fn entries(store: &Store) -> Vec<TreeEntry> {
    let modules = store.modules();
    modules
        .walk()
        .into_iter()
        .map(|(path, module)| TreeEntry {
            path: if path.is_root() {
                String::new()
            } else {
                path.to_string()
            },
            namespace: modules.namespace(&path),
            namespaced: module.namespaced(),
            children: module
                .child_names()
                .map(|n| n.as_str().to_string())
                .collect(),
            state: module.state().clone(),
        })
        .collect()
}

/// Print the module tree of `file`.
pub fn tree(ctx: &Context, file: &Path, json: bool) -> Result<()> {
    let store = open_store(file)?;

    if json {
        output::print(serde_json::to_string_pretty(&entries(&store))?, ctx.verbosity);
    } else {
        output::print(output::format_tree(store.modules()), ctx.verbosity);
    }
    Ok(())
}

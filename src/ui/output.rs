//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Errors are
//! always shown on stderr.

use std::fmt::{Display, Write as _};

use crate::core::collection::ModuleCollection;
use crate::core::module::Module;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - minimal output
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Render the module tree, one module per line.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use storetree::core::collection::ModuleCollection;
/// use storetree::core::module::ModuleDef;
/// use storetree::ui::output::format_tree;
///
/// let def = ModuleDef::new(json!({}))
///     .module("a", ModuleDef::new(json!({})).module("c", ModuleDef::default()))
///     .module("b", ModuleDef::default().namespaced(true));
/// let tree = ModuleCollection::new(def).unwrap();
///
/// assert_eq!(
///     format_tree(&tree),
///     "<root>\n├── a\n│   └── c\n└── b (namespaced)"
/// );
/// ```
pub fn format_tree(modules: &ModuleCollection) -> String {
    let mut out = String::from("<root>");
    write_children(&mut out, modules.root(), "");
    out
}

fn write_children(out: &mut String, module: &Module, prefix: &str) {
    let count = module.child_names().count();
    for (i, (name, child)) in module.children().enumerate() {
        let last = i + 1 == count;
        let branch = if last { "└── " } else { "├── " };
        let marker = if child.namespaced() { " (namespaced)" } else { "" };
        let _ = write!(out, "\n{prefix}{branch}{name}{marker}");

        let nested = format!("{prefix}{}", if last { "    " } else { "│   " });
        write_children(out, child, &nested);
    }
}

//! storetree - a module-tree state container
//!
//! A store is described as a tree of nested modules, each with its own
//! state, mutations, actions, getters and sub-modules. The tree is flattened
//! into a single store with `commit`/`dispatch` entry points and cached
//! getters.
//!
//! # Architecture
//!
//! - [`core`] - Module tree construction, path types, definition files
//! - [`store`] - Handler binding, composed state, reactive host seam
//! - [`cli`] - The `stree` inspection binary
//! - [`ui`] - Output formatting for the binary
//!
//! # Correctness Invariants
//!
//! 1. Modules are registered in pre-order; a parent exists before its children
//! 2. Every module is reachable by exactly one path of names
//! 3. Definition errors surface when the store is built
//! 4. Module state changes only through committed mutations or `replace_state`

pub mod cli;
pub mod core;
pub mod store;
pub mod ui;

pub use crate::core::collection::{ConfigurationError, ModuleCollection};
pub use crate::core::module::{Module, ModuleDef};
pub use crate::core::types::{ModuleName, ModulePath};
pub use crate::store::{Store, StoreError};

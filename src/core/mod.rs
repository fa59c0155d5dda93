//! core
//!
//! The module registration tree and its supporting types.
//!
//! # Modules
//!
//! - [`types`] - Strong types: ModuleName, ModulePath
//! - [`module`] - Raw definitions and tree nodes
//! - [`collection`] - Building the tree from a nested definition
//! - [`config`] - Loading definitions from TOML or JSON files
//!
//! # Design Principles
//!
//! - The tree shape is fixed once built; only module state changes later
//! - Malformed definitions fail at construction, never on first access
//! - The tree knows nothing about reactivity

pub mod collection;
pub mod config;
pub mod module;
pub mod types;

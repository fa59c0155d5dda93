//! ui
//!
//! User-facing output for the `stree` binary.
//!
//! # Modules
//!
//! - [`output`] - Verbosity handling and tree rendering

pub mod output;

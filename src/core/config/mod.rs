//! core::config
//!
//! Loading module definitions from files.
//!
//! # Overview
//!
//! A definition file describes module structure and initial state. Handlers
//! are code and cannot be written in a file; attach them with
//! [`ModuleDef::module_mut`] after loading.
//!
//! # Formats
//!
//! Chosen by file extension:
//! - `.toml` - TOML document
//! - `.json` - JSON document
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use storetree::core::config::load_definition;
//! use storetree::store::Store;
//!
//! let def = load_definition(Path::new("store.toml")).unwrap();
//! let store = Store::new(def).unwrap();
//! println!("{}", serde_json::to_string_pretty(&store.state()).unwrap());
//! ```

pub mod schema;

pub use schema::ModuleDoc;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::module::ModuleDef;

/// Errors from loading a definition file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read definition file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse definition file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("unsupported definition format for '{path}' (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },
}

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionFormat {
    Toml,
    Json,
}

impl DefinitionFormat {
    /// Pick a format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Parse a document in this format.
    pub fn parse(self, contents: &str) -> Result<ModuleDoc, String> {
        match self {
            Self::Toml => toml::from_str(contents).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(contents).map_err(|e| e.to_string()),
        }
    }
}

/// Read and parse a definition file.
///
/// # Errors
///
/// Returns an error if the extension is not recognised, the file cannot be
/// read, or its contents do not match the schema.
pub fn load_definition(path: &Path) -> Result<ModuleDef, ConfigError> {
    let format = DefinitionFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let doc = format
        .parse(&contents)
        .map_err(|message| ConfigError::ParseError {
            path: path.to_path_buf(),
            message,
        })?;

    tracing::debug!(path = %path.display(), ?format, "loaded definition file");
    Ok(ModuleDef::from(doc))
}

//! core::types
//!
//! Strong types for addressing modules in the tree.
//!
//! # Types
//!
//! - [`ModuleName`] - Validated name of one module at one level
//! - [`ModulePath`] - Ordered sequence of names from the root (exclusive)
//!
//! # Examples
//!
//! ```
//! use storetree::core::types::{ModuleName, ModulePath};
//!
//! let path: ModulePath = "cart/items".parse().unwrap();
//! assert_eq!(path.len(), 2);
//! assert_eq!(path.last().map(ModuleName::as_str), Some("items"));
//!
//! assert!(ModuleName::new("has space").is_err());
//! assert!(ModulePath::root().is_root());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid module name: {0}")]
    InvalidModuleName(String),

    #[error("invalid module path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

/// A validated module name.
///
/// Module names become path segments and namespace prefixes, so they:
/// - Cannot be empty
/// - Cannot contain `/` (the path separator)
/// - Cannot contain whitespace or control characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ModuleName(String);

impl ModuleName {
    /// Create a new validated module name.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidModuleName` if the name is empty or contains
    /// a separator, whitespace, or a control character.
    pub fn new(name: impl Into<String>) -> Result<Self, TypeError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), TypeError> {
        if name.is_empty() {
            return Err(TypeError::InvalidModuleName(
                "module name cannot be empty".into(),
            ));
        }
        if name.contains('/') {
            return Err(TypeError::InvalidModuleName(format!(
                "module name cannot contain '/': {name}"
            )));
        }
        if name.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TypeError::InvalidModuleName(format!(
                "module name cannot contain whitespace or control characters: {name:?}"
            )));
        }
        Ok(())
    }

    /// Get the module name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ModuleName {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ModuleName {
    type Error = TypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ModuleName> for String {
    fn from(name: ModuleName) -> Self {
        name.0
    }
}

impl AsRef<str> for ModuleName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Location of a module relative to the root.
///
/// The empty path denotes the root module itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModulePath(Vec<ModuleName>);

impl ModulePath {
    /// The path of the root module.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from already-validated segments.
    pub fn from_segments(segments: impl IntoIterator<Item = ModuleName>) -> Self {
        Self(segments.into_iter().collect())
    }

    /// Whether this path points at the root.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Same as [`ModulePath::is_root`].
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn segments(&self) -> &[ModuleName] {
        &self.0
    }

    /// The final segment, or `None` for the root.
    pub fn last(&self) -> Option<&ModuleName> {
        self.0.last()
    }

    /// All segments except the last one.
    ///
    /// For the root and for top-level modules this is empty.
    pub fn parent_segments(&self) -> &[ModuleName] {
        match self.0.split_last() {
            Some((_, init)) => init,
            None => &[],
        }
    }

    /// The path with one more segment appended.
    pub fn join(&self, name: ModuleName) -> Self {
        let mut segments = self.0.clone();
        segments.push(name);
        Self(segments)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ModuleName> {
        self.0.iter()
    }
}

impl FromStr for ModulePath {
    type Err = TypeError;

    /// Parse `a/b/c`. The empty string and `/` both parse to the root.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        trimmed
            .split('/')
            .map(|segment| {
                ModuleName::new(segment).map_err(|e| TypeError::InvalidPath {
                    path: s.to_string(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::from_segments)
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ModulePath {
    type Item = &'a ModuleName;
    type IntoIter = std::slice::Iter<'a, ModuleName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

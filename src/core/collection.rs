//! core::collection
//!
//! Builds the module tree from a nested definition.
//!
//! # Architecture
//!
//! Registration is a depth-first pre-order walk. Each node is attached to
//! its parent before any of its own children are registered, and the parent
//! is found by walking from the root along the path. The tree shape is
//! fixed once [`ModuleCollection::new`] returns.
//!
//! # Invariants
//!
//! - Every non-root node is reachable by exactly one path of child names
//! - A node's children are exactly the entries of its definition's `modules`
//! - A child's `registered_at` is greater than its parent's
//! - A module with children has object state
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use storetree::core::collection::ModuleCollection;
//! use storetree::core::module::ModuleDef;
//!
//! let a = ModuleDef::new(json!({ "a": 1 })).module("c", ModuleDef::new(json!({ "c": 3 })));
//! let def = ModuleDef::new(json!({ "root": true }))
//!     .module("a", a)
//!     .module("b", ModuleDef::new(json!({ "b": 2 })));
//!
//! let tree = ModuleCollection::new(def).unwrap();
//! let c = tree.root().get_child("a").and_then(|a| a.get_child("c")).unwrap();
//! assert_eq!(c.state(), &json!({ "c": 3 }));
//! assert!(tree.root().get_child("a").unwrap().get_child("b").is_none());
//! ```

use std::rc::Rc;

use thiserror::Error;

use super::module::{Module, ModuleDef};
use super::types::{ModuleName, ModulePath};

/// Errors raised while building a store from its definition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("invalid module name '{name}' under {parent}: {reason}")]
    InvalidModuleName {
        parent: ModulePath,
        name: String,
        reason: String,
    },

    #[error("cannot register {path}: parent segment '{missing}' is not registered")]
    UnknownParentPath {
        path: ModulePath,
        missing: ModuleName,
    },

    #[error("duplicate module: {path} is already registered")]
    DuplicateModule { path: ModulePath },

    #[error("module {path} has nested modules but its state is not an object")]
    StateNotObject { path: ModulePath },

    #[error("duplicate getter key: {key}")]
    DuplicateGetter { key: String },
}

/// The registered module tree.
#[derive(Debug, Clone)]
pub struct ModuleCollection {
    root: Module,
    len: usize,
}

impl ModuleCollection {
    /// Register `def` as the root and its nested modules beneath it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] for an invalid or duplicated module
    /// name, or for a module with children whose state is not an object.
    pub fn new(def: impl Into<Rc<ModuleDef>>) -> Result<Self, ConfigurationError> {
        let raw = def.into();
        let mut collection = Self {
            root: Module::new(Rc::clone(&raw), 0),
            len: 1,
        };
        tracing::debug!(path = %ModulePath::root(), "registered module");
        collection.register_children(&ModulePath::root(), &raw)?;
        Ok(collection)
    }

    /// Register one module at `path`, then its nested modules.
    ///
    /// The empty path is taken by the root during construction, so
    /// registering it again is a duplicate.
    fn register(&mut self, path: ModulePath, raw: Rc<ModuleDef>) -> Result<(), ConfigurationError> {
        let Some(name) = path.last().cloned() else {
            return Err(ConfigurationError::DuplicateModule { path });
        };

        let node = Module::new(Rc::clone(&raw), self.len);
        let parent = self.resolve_parent_mut(&path)?;
        if parent.get_child(name.as_str()).is_some() {
            return Err(ConfigurationError::DuplicateModule { path });
        }
        parent.add_child(name, node);
        self.len += 1;
        tracing::debug!(path = %path, namespaced = raw.namespaced, "registered module");

        self.register_children(&path, &raw)
    }

    fn register_children(
        &mut self,
        path: &ModulePath,
        raw: &ModuleDef,
    ) -> Result<(), ConfigurationError> {
        if raw.modules.is_empty() {
            return Ok(());
        }
        if !raw.state.is_object() {
            return Err(ConfigurationError::StateNotObject { path: path.clone() });
        }

        for (child_name, child_raw) in &raw.modules {
            let name = ModuleName::new(child_name.as_str()).map_err(|e| {
                ConfigurationError::InvalidModuleName {
                    parent: path.clone(),
                    name: child_name.clone(),
                    reason: e.to_string(),
                }
            })?;
            self.register(path.join(name), Rc::clone(child_raw))?;
        }
        Ok(())
    }

    /// Walk from the root to the parent of `path`.
    fn resolve_parent_mut(&mut self, path: &ModulePath) -> Result<&mut Module, ConfigurationError> {
        let mut current = &mut self.root;
        for segment in path.parent_segments() {
            current = current.get_child_mut(segment.as_str()).ok_or_else(|| {
                ConfigurationError::UnknownParentPath {
                    path: path.clone(),
                    missing: segment.clone(),
                }
            })?;
        }
        Ok(current)
    }

    pub fn root(&self) -> &Module {
        &self.root
    }

    /// The module at `path`, or `None` if any segment is missing.
    pub fn get(&self, path: &ModulePath) -> Option<&Module> {
        path.iter()
            .try_fold(&self.root, |module, segment| module.get_child(segment.as_str()))
    }

    pub(crate) fn get_mut(&mut self, path: &ModulePath) -> Option<&mut Module> {
        let mut current = &mut self.root;
        for segment in path {
            current = current.get_child_mut(segment.as_str())?;
        }
        Some(current)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Module {
        &mut self.root
    }

    /// Total number of modules, root included.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: a collection has at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// All modules with their paths, in registration (pre-order) order.
    pub fn walk(&self) -> Vec<(ModulePath, &Module)> {
        fn visit<'a>(
            path: ModulePath,
            module: &'a Module,
            out: &mut Vec<(ModulePath, &'a Module)>,
        ) {
            out.push((path.clone(), module));
            for (name, child) in module.children() {
                visit(path.join(name.clone()), child, out);
            }
        }

        let mut out = Vec::with_capacity(self.len);
        visit(ModulePath::root(), &self.root, &mut out);
        out
    }

    /// Handler-type prefix for the module at `path`.
    ///
    /// Each namespaced module along the path contributes `name/`. Missing
    /// segments contribute nothing.
    pub fn namespace(&self, path: &ModulePath) -> String {
        let mut namespace = String::new();
        let mut current = &self.root;
        for segment in path {
            match current.get_child(segment.as_str()) {
                Some(child) => {
                    if child.namespaced() {
                        namespace.push_str(segment.as_str());
                        namespace.push('/');
                    }
                    current = child;
                }
                None => break,
            }
        }
        namespace
    }
}

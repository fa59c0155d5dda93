//! store::context
//!
//! Contexts handed to action and getter handlers.
//!
//! Both are scoped to the module the handler was defined in. Types passed to
//! `commit`, `dispatch` and `getter` are resolved within that module's
//! namespace, while the `*_root` variants use the type as given.

use serde_json::Value;

use super::state::StateView;
use super::{Store, StoreError, NULL_STATE};
use crate::core::module::Module;
use crate::core::types::ModulePath;

/// Store access for a running action.
pub struct ActionContext<'a> {
    store: &'a mut Store,
    path: &'a ModulePath,
    namespace: &'a str,
}

impl<'a> ActionContext<'a> {
    pub(crate) fn new(store: &'a mut Store, path: &'a ModulePath, namespace: &'a str) -> Self {
        Self {
            store,
            path,
            namespace,
        }
    }

    /// Path of the module that defined this action.
    pub fn path(&self) -> &ModulePath {
        self.path
    }

    pub fn namespace(&self) -> &str {
        self.namespace
    }

    /// The defining module's local state.
    pub fn state(&self) -> &Value {
        self.store
            .modules()
            .get(self.path)
            .map(Module::state)
            .unwrap_or(&NULL_STATE)
    }

    pub fn root_state(&self) -> StateView<'_> {
        self.store.state()
    }

    /// Commit a mutation type relative to this module's namespace.
    pub fn commit(&mut self, kind: &str, payload: impl Into<Value>) -> Result<(), StoreError> {
        let kind = format!("{}{}", self.namespace, kind);
        self.store.commit(&kind, payload)
    }

    pub fn commit_root(&mut self, kind: &str, payload: impl Into<Value>) -> Result<(), StoreError> {
        self.store.commit(kind, payload)
    }

    /// Dispatch an action type relative to this module's namespace.
    pub fn dispatch(&mut self, kind: &str, payload: impl Into<Value>) -> Result<Value, StoreError> {
        let kind = format!("{}{}", self.namespace, kind);
        self.store.dispatch(&kind, payload)
    }

    pub fn dispatch_root(
        &mut self,
        kind: &str,
        payload: impl Into<Value>,
    ) -> Result<Value, StoreError> {
        self.store.dispatch(kind, payload)
    }

    /// Read a getter relative to this module's namespace.
    pub fn getter(&self, name: &str) -> Result<Value, StoreError> {
        self.store.getter(&format!("{}{}", self.namespace, name))
    }

    pub fn root_getter(&self, name: &str) -> Result<Value, StoreError> {
        self.store.getter(name)
    }
}

/// Store access for a getter being computed.
pub struct GetterContext<'a> {
    store: &'a Store,
    namespace: &'a str,
}

impl<'a> GetterContext<'a> {
    pub(crate) fn new(store: &'a Store, namespace: &'a str) -> Self {
        Self { store, namespace }
    }

    pub fn root_state(&self) -> StateView<'a> {
        self.store.state()
    }

    /// Another getter in the same namespace.
    pub fn getter(&self, name: &str) -> Result<Value, StoreError> {
        self.store.getter(&format!("{}{}", self.namespace, name))
    }

    pub fn root_getter(&self, name: &str) -> Result<Value, StoreError> {
        self.store.getter(name)
    }
}

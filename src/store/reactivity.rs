//! store::reactivity
//!
//! The reactive host the store talks to.
//!
//! The store needs two things from a reactive framework: an observable
//! holder over the state tree, and cached derived properties defined on that
//! holder. [`Reactivity`] names those capabilities. [`MemoHost`] is the
//! in-process implementation. It keeps a version per holder and reuses a
//! cached value until the store reports a change.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::state::StateView;

/// Opaque reference to an observable holder created by a [`Reactivity`] host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservableHandle(usize);

impl ObservableHandle {
    /// Wrap a host-assigned id. Hosts other than [`MemoHost`] mint their
    /// handles with this.
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn id(&self) -> usize {
        self.0
    }
}

/// Capabilities the store requires from a reactive framework.
pub trait Reactivity {
    /// Create an observable holder over the composed state tree.
    fn make_observable(&mut self, state: &StateView<'_>) -> ObservableHandle;

    /// Declare a cached derived property named `key` on `handle`.
    fn define_cached(&mut self, handle: ObservableHandle, key: &str);

    /// Report that state behind `handle` has changed.
    fn notify(&mut self, handle: ObservableHandle);

    /// Read the cached property `key`, computing it with `compute` when stale.
    ///
    /// Returns `None` if `key` was never defined on `handle`.
    fn cached(
        &self,
        handle: ObservableHandle,
        key: &str,
        compute: &dyn Fn() -> Value,
    ) -> Option<Value>;
}

#[derive(Debug, Default)]
struct Holder {
    version: u64,
    /// `None` until first read.
    cells: RefCell<HashMap<String, Option<(u64, Value)>>>,
}

/// Version-counting memo host.
///
/// A cached value is reused while its holder's version is unchanged.
/// `compute` may read other cached keys re-entrantly.
#[derive(Debug, Default)]
pub struct MemoHost {
    holders: Vec<Holder>,
}

impl MemoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current version of a holder, or `None` for an unknown handle.
    pub fn version(&self, handle: ObservableHandle) -> Option<u64> {
        self.holders.get(handle.id()).map(|h| h.version)
    }
}

impl Reactivity for MemoHost {
    fn make_observable(&mut self, state: &StateView<'_>) -> ObservableHandle {
        let handle = ObservableHandle::new(self.holders.len());
        self.holders.push(Holder::default());
        tracing::debug!(
            handle = handle.id(),
            modules = state.modules().len(),
            "observing state tree"
        );
        handle
    }

    fn define_cached(&mut self, handle: ObservableHandle, key: &str) {
        if let Some(holder) = self.holders.get_mut(handle.id()) {
            holder.cells.get_mut().insert(key.to_string(), None);
        }
    }

    fn notify(&mut self, handle: ObservableHandle) {
        if let Some(holder) = self.holders.get_mut(handle.id()) {
            holder.version += 1;
        }
    }

    fn cached(
        &self,
        handle: ObservableHandle,
        key: &str,
        compute: &dyn Fn() -> Value,
    ) -> Option<Value> {
        let holder = self.holders.get(handle.id())?;
        {
            let cells = holder.cells.borrow();
            if let Some((version, value)) = cells.get(key)? {
                if *version == holder.version {
                    return Some(value.clone());
                }
            }
        }

        // The borrow is released so `compute` can read other keys.
        let value = compute();
        holder
            .cells
            .borrow_mut()
            .insert(key.to_string(), Some((holder.version, value.clone())));
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collection::ModuleCollection;
    use crate::core::module::ModuleDef;
    use serde_json::json;
    use std::cell::Cell;

    fn host_with(key: &str) -> (MemoHost, ObservableHandle) {
        let tree = ModuleCollection::new(ModuleDef::default()).unwrap();
        let mut host = MemoHost::new();
        let handle = host.make_observable(&StateView::new(&tree));
        host.define_cached(handle, key);
        (host, handle)
    }

    #[test]
    fn undefined_key_is_none() {
        let (host, handle) = host_with("defined");
        assert!(host.cached(handle, "other", &|| json!(1)).is_none());
    }

    #[test]
    fn unknown_handle_is_none() {
        let (host, _) = host_with("k");
        assert!(host
            .cached(ObservableHandle::new(99), "k", &|| json!(1))
            .is_none());
    }

    #[test]
    fn value_is_computed_once_until_notified() {
        let (mut host, handle) = host_with("k");
        let calls = Cell::new(0);
        let compute = || {
            calls.set(calls.get() + 1);
            json!(calls.get())
        };

        assert_eq!(host.cached(handle, "k", &compute), Some(json!(1)));
        assert_eq!(host.cached(handle, "k", &compute), Some(json!(1)));
        assert_eq!(calls.get(), 1);

        host.notify(handle);
        assert_eq!(host.cached(handle, "k", &compute), Some(json!(2)));
        assert_eq!(calls.get(), 2);
        assert_eq!(host.version(handle), Some(1));
    }

    #[test]
    fn compute_may_read_other_keys() {
        let (mut host, handle) = host_with("outer");
        host.define_cached(handle, "inner");

        let host_ref = &host;
        let outer = || {
            let inner = host_ref.cached(handle, "inner", &|| json!(20)).unwrap();
            json!(inner.as_i64().unwrap() + 1)
        };
        assert_eq!(host.cached(handle, "outer", &outer), Some(json!(21)));
    }
}

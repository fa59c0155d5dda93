//! store
//!
//! The public store surface built over the module tree.
//!
//! # Modules
//!
//! - [`state`] - Composed, borrowed view of the state tree
//! - [`context`] - Contexts passed to action and getter handlers
//! - [`reactivity`] - Reactive host capability and the default memo host
//!
//! # Binding
//!
//! At construction the module tree is walked in registration order. Every
//! handler is bound under its module's namespace plus its own name:
//!
//! - Mutations and actions may share a type across modules. A commit or
//!   dispatch runs every handler bound to the type, in registration order,
//!   each against its own module.
//! - Getter keys are unique. A second getter under the same key fails
//!   construction.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use storetree::core::module::ModuleDef;
//! use storetree::store::Store;
//!
//! let def = ModuleDef::new(json!({ "count": 0 })).module(
//!     "cart",
//!     ModuleDef::new(json!({ "items": [] })).mutation("add", |state, payload| {
//!         if let Some(items) = state["items"].as_array_mut() {
//!             items.push(payload.clone());
//!         }
//!     }),
//! );
//!
//! let mut store = Store::new(def).unwrap();
//! store.commit("add", "x").unwrap();
//! assert_eq!(store.state().compose(), json!({ "count": 0, "cart": { "items": ["x"] } }));
//! ```

pub mod context;
pub mod reactivity;
pub mod state;

pub use context::{ActionContext, GetterContext};
pub use reactivity::{MemoHost, ObservableHandle, Reactivity};
pub use state::StateView;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;
use thiserror::Error;

use crate::core::collection::{ConfigurationError, ModuleCollection};
use crate::core::module::{Action, Getter, Module, ModuleDef, Mutation};
use crate::core::types::ModulePath;

pub(crate) static NULL_STATE: Value = Value::Null;

/// Errors from using a constructed store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown mutation type: {0}")]
    UnknownMutation(String),

    #[error("unknown action type: {0}")]
    UnknownAction(String),

    #[error("unknown getter: {0}")]
    UnknownGetter(String),

    #[error("state of {path} must be an object because it has nested modules")]
    InvalidState { path: ModulePath },

    #[error("action failed: {0}")]
    Action(String),
}

impl StoreError {
    /// Convenience for handlers reporting their own failure.
    pub fn action(message: impl Into<String>) -> Self {
        StoreError::Action(message.into())
    }
}

/// A committed mutation, as seen by subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    /// Fully namespaced mutation type.
    pub kind: String,
    pub payload: Value,
}

/// Identifies a subscriber for [`Store::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Rc<dyn Fn(&MutationRecord, &StateView<'_>)>;

/// A handler bound to the module that defined it.
#[derive(Clone)]
struct Binding<H> {
    path: ModulePath,
    namespace: String,
    handler: H,
}

/// Handler table keyed by type, remembering first-registration order.
struct Registry<H> {
    order: Vec<String>,
    entries: HashMap<String, Vec<Binding<H>>>,
}

impl<H> Default for Registry<H> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }
}

impl<H> Registry<H> {
    fn push(&mut self, kind: String, binding: Binding<H>) {
        match self.entries.get_mut(&kind) {
            Some(bindings) => bindings.push(binding),
            None => {
                self.order.push(kind.clone());
                self.entries.insert(kind, vec![binding]);
            }
        }
    }

    fn get(&self, kind: &str) -> Option<&[Binding<H>]> {
        self.entries.get(kind).map(Vec::as_slice)
    }

    fn contains(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }

    fn kinds(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

/// The state container.
pub struct Store {
    modules: ModuleCollection,
    mutations: Registry<Mutation>,
    actions: Registry<Action>,
    getters: Registry<Getter>,
    reactivity: Box<dyn Reactivity>,
    handle: ObservableHandle,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl Store {
    /// Build a store backed by a [`MemoHost`].
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] if the module tree is malformed or
    /// two getters share a key.
    pub fn new(def: impl Into<Rc<ModuleDef>>) -> Result<Self, ConfigurationError> {
        Self::with_reactivity(def, Box::new(MemoHost::new()))
    }

    /// Build a store on a caller-supplied reactive host.
    pub fn with_reactivity(
        def: impl Into<Rc<ModuleDef>>,
        mut reactivity: Box<dyn Reactivity>,
    ) -> Result<Self, ConfigurationError> {
        let modules = ModuleCollection::new(def)?;
        let handle = reactivity.make_observable(&StateView::new(&modules));

        let mut mutations = Registry::default();
        let mut actions = Registry::default();
        let mut getters = Registry::default();

        for (path, module) in modules.walk() {
            let namespace = modules.namespace(&path);
            let raw = module.raw();

            for (name, handler) in &raw.mutations {
                let kind = format!("{namespace}{name}");
                tracing::debug!(module = %path, kind = %kind, "bound mutation");
                mutations.push(kind, bind(&path, &namespace, handler));
            }

            for (name, handler) in &raw.actions {
                let kind = format!("{namespace}{name}");
                tracing::debug!(module = %path, kind = %kind, "bound action");
                actions.push(kind, bind(&path, &namespace, handler));
            }

            for (name, handler) in &raw.getters {
                let key = format!("{namespace}{name}");
                if getters.contains(&key) {
                    return Err(ConfigurationError::DuplicateGetter { key });
                }
                tracing::debug!(module = %path, key = %key, "bound getter");
                reactivity.define_cached(handle, &key);
                getters.push(key, bind(&path, &namespace, handler));
            }
        }

        Ok(Self {
            modules,
            mutations,
            actions,
            getters,
            reactivity,
            handle,
            subscribers: Vec::new(),
            next_subscription: 0,
        })
    }

    /// The underlying module tree.
    pub fn modules(&self) -> &ModuleCollection {
        &self.modules
    }

    /// Composed view of every module's state.
    pub fn state(&self) -> StateView<'_> {
        StateView::new(&self.modules)
    }

    /// Run every mutation bound to `kind` with `payload`.
    ///
    /// Handlers run on copies of their module's state. The copies replace
    /// the live state only once every handler ran and each module with
    /// nested modules still holds an object. Cached getters are then
    /// invalidated and subscribers are notified once.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownMutation` if nothing is bound to `kind`,
    /// or `StoreError::InvalidState` if a handler left a module with nested
    /// modules holding a non-object. Nothing is changed in either case.
    pub fn commit(&mut self, kind: &str, payload: impl Into<Value>) -> Result<(), StoreError> {
        let payload = payload.into();
        let bindings = self
            .mutations
            .get(kind)
            .ok_or_else(|| StoreError::UnknownMutation(kind.to_string()))?;

        tracing::trace!(kind, handlers = bindings.len(), "commit");
        let mut staged: Vec<(ModulePath, Value)> = Vec::new();
        for binding in bindings {
            let slot = match staged.iter().position(|(path, _)| *path == binding.path) {
                Some(i) => i,
                None => {
                    let Some(module) = self.modules.get(&binding.path) else {
                        continue;
                    };
                    staged.push((binding.path.clone(), module.state().clone()));
                    staged.len() - 1
                }
            };
            (binding.handler)(&mut staged[slot].1, &payload);
        }

        for (path, state) in &staged {
            let nested = self.modules.get(path).map_or(false, Module::has_children);
            if nested && !state.is_object() {
                tracing::warn!(kind, module = %path, "mutation left non-object state");
                return Err(StoreError::InvalidState { path: path.clone() });
            }
        }
        for (path, state) in staged {
            if let Some(module) = self.modules.get_mut(&path) {
                *module.state_mut() = state;
            }
        }
        self.reactivity.notify(self.handle);

        if !self.subscribers.is_empty() {
            let record = MutationRecord {
                kind: kind.to_string(),
                payload,
            };
            let view = StateView::new(&self.modules);
            for (_, subscriber) in &self.subscribers {
                subscriber(&record, &view);
            }
        }
        Ok(())
    }

    /// Run every action bound to `kind` with `payload`.
    ///
    /// With a single handler its result is returned as-is. Several handlers
    /// produce an array of their results in registration order. The first
    /// failing handler stops the dispatch.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownAction` if nothing is bound to `kind`, or
    /// the first error a handler returns.
    pub fn dispatch(&mut self, kind: &str, payload: impl Into<Value>) -> Result<Value, StoreError> {
        let payload = payload.into();
        let bindings = self
            .actions
            .get(kind)
            .ok_or_else(|| StoreError::UnknownAction(kind.to_string()))?
            .to_vec();

        tracing::trace!(kind, handlers = bindings.len(), "dispatch");
        let mut results = Vec::with_capacity(bindings.len());
        for binding in &bindings {
            let mut ctx = ActionContext::new(self, &binding.path, &binding.namespace);
            results.push((binding.handler)(&mut ctx, &payload)?);
        }

        if results.len() == 1 {
            Ok(results.remove(0))
        } else {
            Ok(Value::Array(results))
        }
    }

    /// Current value of getter `key`, recomputed only after a state change.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownGetter` if no getter is bound to `key`.
    pub fn getter(&self, key: &str) -> Result<Value, StoreError> {
        let unknown = || StoreError::UnknownGetter(key.to_string());
        let binding = self
            .getters
            .get(key)
            .and_then(<[Binding<Getter>]>::first)
            .ok_or_else(unknown)?;

        let compute = || {
            let local = self
                .modules
                .get(&binding.path)
                .map(Module::state)
                .unwrap_or(&NULL_STATE);
            let ctx = GetterContext::new(self, &binding.namespace);
            (binding.handler)(local, &ctx)
        };

        self.reactivity
            .cached(self.handle, key, &compute)
            .ok_or_else(unknown)
    }

    /// Register a callback run after every commit.
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: Fn(&MutationRecord, &StateView<'_>) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Rc::new(subscriber)));
        id
    }

    /// Remove a subscriber. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    /// Replace every module's local state from a composed snapshot.
    ///
    /// `snapshot` has the shape produced by [`StateView::compose`]. Modules
    /// whose key is absent keep their current state. Nothing is replaced if
    /// the snapshot is malformed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidState` if a module with children is given
    /// a non-object value.
    pub fn replace_state(&mut self, snapshot: Value) -> Result<(), StoreError> {
        check_snapshot(&ModulePath::root(), self.modules.root(), &snapshot)?;
        apply_snapshot(self.modules.root_mut(), snapshot);
        self.reactivity.notify(self.handle);
        tracing::debug!(modules = self.modules.len(), "replaced state");
        Ok(())
    }

    /// Mutation types in first-registration order.
    pub fn mutation_types(&self) -> impl Iterator<Item = &str> {
        self.mutations.kinds()
    }

    pub fn action_types(&self) -> impl Iterator<Item = &str> {
        self.actions.kinds()
    }

    pub fn getter_names(&self) -> impl Iterator<Item = &str> {
        self.getters.kinds()
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("modules", &self.modules.len())
            .field("mutations", &self.mutations.order)
            .field("actions", &self.actions.order)
            .field("getters", &self.getters.order)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

fn bind<H: Clone>(path: &ModulePath, namespace: &str, handler: &H) -> Binding<H> {
    Binding {
        path: path.clone(),
        namespace: namespace.to_string(),
        handler: handler.clone(),
    }
}

fn check_snapshot(path: &ModulePath, module: &Module, snapshot: &Value) -> Result<(), StoreError> {
    if !module.has_children() {
        return Ok(());
    }
    let Value::Object(map) = snapshot else {
        return Err(StoreError::InvalidState { path: path.clone() });
    };
    for (name, child) in module.children() {
        if let Some(child_snapshot) = map.get(name.as_str()) {
            check_snapshot(&path.join(name.clone()), child, child_snapshot)?;
        }
    }
    Ok(())
}

fn apply_snapshot(module: &mut Module, snapshot: Value) {
    let mut own = match snapshot {
        Value::Object(map) if module.has_children() => map,
        other => {
            *module.state_mut() = other;
            return;
        }
    };

    for (name, child) in module.children_mut() {
        if let Some(child_snapshot) = own.remove(name.as_str()) {
            apply_snapshot(child, child_snapshot);
        }
    }
    *module.state_mut() = Value::Object(own);
}

//! core::module
//!
//! Raw module definitions and the tree nodes built from them.
//!
//! # Overview
//!
//! A [`ModuleDef`] is what the caller writes: local state, handler tables,
//! and nested definitions. A [`Module`] is one node of the registered tree.
//! It holds a shared read-only reference to its definition, its own copy of
//! the local state, and its named children.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use storetree::core::module::ModuleDef;
//!
//! let cart = ModuleDef::new(json!({ "items": [] }))
//!     .namespaced(true)
//!     .mutation("add", |state, payload| {
//!         if let Some(items) = state["items"].as_array_mut() {
//!             items.push(payload.clone());
//!         }
//!     });
//!
//! let root = ModuleDef::new(json!({ "count": 0 })).module("cart", cart);
//! assert_eq!(root.modules.len(), 1);
//! ```

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use super::types::ModuleName;
use crate::store::context::{ActionContext, GetterContext};
use crate::store::StoreError;

/// Synchronous handler mutating one module's local state.
pub type Mutation = Rc<dyn Fn(&mut Value, &Value)>;

/// Handler bound to the store through an [`ActionContext`].
pub type Action = Rc<dyn Fn(&mut ActionContext<'_>, &Value) -> Result<Value, StoreError>>;

/// Derived value computed from a module's local state.
pub type Getter = Rc<dyn Fn(&Value, &GetterContext<'_>) -> Value>;

/// A raw module definition.
///
/// Handler tables and nested modules are ordered lists. Entries keep the
/// order they were added in, and a repeated name is kept as-is so that
/// registration can reject it.
#[derive(Clone)]
pub struct ModuleDef {
    /// Initial local state. Defaults to an empty object.
    pub state: Value,
    /// Whether this module prefixes its handler types with its name.
    pub namespaced: bool,
    pub mutations: Vec<(String, Mutation)>,
    pub actions: Vec<(String, Action)>,
    pub getters: Vec<(String, Getter)>,
    /// Nested module definitions, keyed by child name.
    pub modules: Vec<(String, Rc<ModuleDef>)>,
}

impl Default for ModuleDef {
    fn default() -> Self {
        Self {
            state: Value::Object(Default::default()),
            namespaced: false,
            mutations: Vec::new(),
            actions: Vec::new(),
            getters: Vec::new(),
            modules: Vec::new(),
        }
    }
}

impl ModuleDef {
    /// Create a definition with the given initial state and no handlers.
    pub fn new(state: impl Into<Value>) -> Self {
        Self {
            state: state.into(),
            ..Self::default()
        }
    }

    pub fn namespaced(mut self, namespaced: bool) -> Self {
        self.namespaced = namespaced;
        self
    }

    /// Add a mutation handler.
    pub fn mutation<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut Value, &Value) + 'static,
    {
        let handler: Mutation = Rc::new(handler);
        self.mutations.push((name.into(), handler));
        self
    }

    /// Add an action handler.
    pub fn action<F>(mut self, name: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&mut ActionContext<'_>, &Value) -> Result<Value, StoreError> + 'static,
    {
        let handler: Action = Rc::new(handler);
        self.actions.push((name.into(), handler));
        self
    }

    /// Add a getter.
    pub fn getter<F>(mut self, name: impl Into<String>, compute: F) -> Self
    where
        F: Fn(&Value, &GetterContext<'_>) -> Value + 'static,
    {
        let compute: Getter = Rc::new(compute);
        self.getters.push((name.into(), compute));
        self
    }

    /// Add a nested module definition.
    pub fn module(mut self, name: impl Into<String>, def: impl Into<Rc<ModuleDef>>) -> Self {
        self.modules.push((name.into(), def.into()));
        self
    }

    /// Mutable access to the first nested definition named `name`.
    ///
    /// Used to attach handlers to definitions loaded from a file. The nested
    /// definition is cloned first if it is shared elsewhere.
    pub fn module_mut(&mut self, name: &str) -> Option<&mut ModuleDef> {
        self.modules
            .iter_mut()
            .find(|(child, _)| child == name)
            .map(|(_, def)| Rc::make_mut(def))
    }
}

impl fmt::Debug for ModuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn names<T>(entries: &[(String, T)]) -> Vec<&str> {
            entries.iter().map(|(name, _)| name.as_str()).collect()
        }

        f.debug_struct("ModuleDef")
            .field("state", &self.state)
            .field("namespaced", &self.namespaced)
            .field("mutations", &names(&self.mutations))
            .field("actions", &names(&self.actions))
            .field("getters", &names(&self.getters))
            .field("modules", &self.modules)
            .finish()
    }
}

/// One node of the module tree.
#[derive(Debug, Clone)]
pub struct Module {
    raw: Rc<ModuleDef>,
    state: Value,
    children: Vec<(ModuleName, Module)>,
    registered_at: usize,
}

impl Module {
    /// Wrap a raw definition. The local state starts as a copy of `raw.state`.
    ///
    /// `registered_at` is the node's position in the registration walk.
    pub fn new(raw: Rc<ModuleDef>, registered_at: usize) -> Self {
        let state = raw.state.clone();
        Self {
            raw,
            state,
            children: Vec::new(),
            registered_at,
        }
    }

    /// Register `child` under `name`.
    ///
    /// An existing child with the same name is replaced and returned.
    pub fn add_child(&mut self, name: ModuleName, child: Module) -> Option<Module> {
        match self.children.iter().position(|(existing, _)| *existing == name) {
            Some(i) => Some(std::mem::replace(&mut self.children[i].1, child)),
            None => {
                self.children.push((name, child));
                None
            }
        }
    }

    /// The child registered under `name`, if any.
    pub fn get_child(&self, name: &str) -> Option<&Module> {
        self.children
            .iter()
            .find(|(child, _)| child.as_str() == name)
            .map(|(_, module)| module)
    }

    pub fn get_child_mut(&mut self, name: &str) -> Option<&mut Module> {
        self.children
            .iter_mut()
            .find(|(child, _)| child.as_str() == name)
            .map(|(_, module)| module)
    }

    /// This node's own local state. Descendants' state is not included.
    pub fn state(&self) -> &Value {
        &self.state
    }

    pub(crate) fn state_mut(&mut self) -> &mut Value {
        &mut self.state
    }

    /// The definition this node was registered from.
    pub fn raw(&self) -> &ModuleDef {
        &self.raw
    }

    pub fn namespaced(&self) -> bool {
        self.raw.namespaced
    }

    /// Children in registration order.
    pub fn children(&self) -> impl Iterator<Item = (&ModuleName, &Module)> {
        self.children.iter().map(|(name, module)| (name, module))
    }

    pub(crate) fn children_mut(&mut self) -> impl Iterator<Item = (&ModuleName, &mut Module)> {
        self.children.iter_mut().map(|(name, module)| (&*name, module))
    }

    pub fn child_names(&self) -> impl Iterator<Item = &ModuleName> {
        self.children.iter().map(|(name, _)| name)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Position of this node in the pre-order registration walk (root is 0).
    pub fn registered_at(&self) -> usize {
        self.registered_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn name(s: &str) -> ModuleName {
        ModuleName::new(s).unwrap()
    }

    fn leaf(state: Value, order: usize) -> Module {
        Module::new(Rc::new(ModuleDef::new(state)), order)
    }

    #[test]
    fn default_state_is_empty_object() {
        let def = ModuleDef::default();
        assert_eq!(def.state, json!({}));
    }

    #[test]
    fn new_module_copies_raw_state() {
        let module = leaf(json!({ "count": 0 }), 0);
        assert_eq!(module.state(), &json!({ "count": 0 }));
        assert_eq!(module.raw().state, json!({ "count": 0 }));
        assert!(!module.has_children());
    }

    #[test]
    fn get_child_missing_is_none() {
        let module = leaf(json!({}), 0);
        assert!(module.get_child("nope").is_none());
    }

    #[test]
    fn add_child_then_get() {
        let mut parent = leaf(json!({}), 0);
        assert!(parent.add_child(name("a"), leaf(json!(1), 1)).is_none());

        let child = parent.get_child("a").unwrap();
        assert_eq!(child.state(), &json!(1));
        assert_eq!(child.registered_at(), 1);
    }

    #[test]
    fn add_child_overwrites_same_name() {
        let mut parent = leaf(json!({}), 0);
        parent.add_child(name("a"), leaf(json!("first"), 1));
        let displaced = parent.add_child(name("a"), leaf(json!("second"), 2));

        assert_eq!(displaced.unwrap().state(), &json!("first"));
        assert_eq!(parent.get_child("a").unwrap().state(), &json!("second"));
        assert_eq!(parent.child_names().count(), 1);
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut parent = leaf(json!({}), 0);
        parent.add_child(name("zeta"), leaf(json!({}), 1));
        parent.add_child(name("alpha"), leaf(json!({}), 2));

        let names: Vec<_> = parent.child_names().map(ModuleName::as_str).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[test]
    fn builder_preserves_handler_order() {
        let def = ModuleDef::new(json!({}))
            .mutation("b", |_, _| {})
            .mutation("a", |_, _| {})
            .getter("g", |state, _| state.clone());

        let names: Vec<_> = def.mutations.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(def.getters.len(), 1);
    }

    #[test]
    fn module_mut_attaches_to_nested_definition() {
        let mut def = ModuleDef::new(json!({})).module("cart", ModuleDef::new(json!([])));
        let clear: Mutation = Rc::new(|state: &mut Value, _: &Value| *state = json!([]));
        def.module_mut("cart")
            .unwrap()
            .mutations
            .push(("clear".into(), clear));

        assert_eq!(def.modules[0].1.mutations.len(), 1);
        assert!(def.module_mut("missing").is_none());
    }

    #[test]
    fn debug_lists_handler_names() {
        let def = ModuleDef::new(json!({})).mutation("inc", |_, _| {});
        let rendered = format!("{def:?}");
        assert!(rendered.contains("\"inc\""));
    }
}

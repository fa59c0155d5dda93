//! store::state
//!
//! Composed view over the module tree's state.
//!
//! Each module owns only its local state. [`StateView`] presents them as one
//! nested object: the root's own keys, plus one key per child module,
//! recursively. Lookups by path borrow straight from the owning module, so
//! no state is copied unless [`StateView::compose`] is called.

use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::core::collection::ModuleCollection;
use crate::core::module::Module;
use crate::core::types::ModulePath;

/// Borrowed, read-only view of the combined state tree.
#[derive(Debug, Clone, Copy)]
pub struct StateView<'a> {
    modules: &'a ModuleCollection,
}

impl<'a> StateView<'a> {
    pub fn new(modules: &'a ModuleCollection) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &'a ModuleCollection {
        self.modules
    }

    /// The root module's own local state.
    pub fn root(&self) -> &'a Value {
        self.modules.root().state()
    }

    /// Local state of the module at `path`.
    ///
    /// This is the very value held by that module.
    pub fn get(&self, path: &ModulePath) -> Option<&'a Value> {
        self.modules.get(path).map(Module::state)
    }

    /// Materialise the nested state object.
    ///
    /// A root key with the same name as a child module is shadowed by the
    /// module's state.
    pub fn compose(&self) -> Value {
        compose_module(&ModulePath::root(), self.modules.root())
    }

    /// Read a value from the composed tree by path, without composing it.
    ///
    /// Module segments are followed first. Once they run out, the remaining
    /// segments index into that module's local state as object keys.
    pub fn lookup(&self, segments: &[&str]) -> Option<&'a Value> {
        let mut module = self.modules.root();
        let mut rest = segments;
        while let Some((head, tail)) = rest.split_first() {
            match module.get_child(head) {
                Some(child) => {
                    module = child;
                    rest = tail;
                }
                None => break,
            }
        }

        rest.iter()
            .try_fold(module.state(), |value, key| value.get(*key))
    }
}

fn compose_module(path: &ModulePath, module: &Module) -> Value {
    if !module.has_children() {
        return module.state().clone();
    }

    let mut composed = module.state().as_object().cloned().unwrap_or_default();

    for (name, child) in module.children() {
        let child_path = path.join(name.clone());
        if composed.contains_key(name.as_str()) {
            tracing::warn!(
                module = %child_path,
                "state field '{}' is shadowed by a nested module with the same name",
                name
            );
        }
        composed.insert(name.as_str().to_string(), compose_module(&child_path, child));
    }
    Value::Object(composed)
}

impl Serialize for StateView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.compose().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::module::ModuleDef;
    use serde_json::json;

    fn tree() -> ModuleCollection {
        ModuleCollection::new(
            ModuleDef::new(json!({ "count": 0 }))
                .module("cart", ModuleDef::new(json!({ "items": [] })))
                .module(
                    "user",
                    ModuleDef::new(json!({ "name": "ada" }))
                        .module("prefs", ModuleDef::new(json!({ "theme": "dark" }))),
                ),
        )
        .unwrap()
    }

    #[test]
    fn compose_nests_children_under_their_names() {
        let modules = tree();
        let view = StateView::new(&modules);
        assert_eq!(
            view.compose(),
            json!({
                "count": 0,
                "cart": { "items": [] },
                "user": { "name": "ada", "prefs": { "theme": "dark" } }
            })
        );
    }

    #[test]
    fn compose_of_flat_tree_is_root_state() {
        let modules = ModuleCollection::new(ModuleDef::new(json!(7))).unwrap();
        assert_eq!(StateView::new(&modules).compose(), json!(7));
    }

    #[test]
    fn get_borrows_the_modules_own_value() {
        let modules = tree();
        let view = StateView::new(&modules);
        let path: ModulePath = "user/prefs".parse().unwrap();

        let from_view = view.get(&path).unwrap();
        let from_tree = modules.get(&path).unwrap().state();
        assert!(std::ptr::eq(from_view, from_tree));
    }

    #[test]
    fn shadowed_root_key_loses_to_module() {
        let def = ModuleDef::new(json!({ "cart": "stale" }))
            .module("cart", ModuleDef::new(json!({ "items": [] })));
        let modules = ModuleCollection::new(def).unwrap();

        assert_eq!(
            StateView::new(&modules).compose(),
            json!({ "cart": { "items": [] } })
        );
    }

    #[test]
    fn lookup_walks_modules_then_keys() {
        let modules = tree();
        let view = StateView::new(&modules);

        assert_eq!(view.lookup(&["count"]), Some(&json!(0)));
        assert_eq!(view.lookup(&["user", "prefs", "theme"]), Some(&json!("dark")));
        assert_eq!(view.lookup(&["user", "name"]), Some(&json!("ada")));
        assert!(view.lookup(&["user", "missing"]).is_none());
        assert!(std::ptr::eq(
            view.lookup(&["cart"]).unwrap(),
            modules.root().get_child("cart").unwrap().state()
        ));
    }

    #[test]
    fn serializes_as_composed_object() {
        let modules = tree();
        let json = serde_json::to_value(StateView::new(&modules)).unwrap();
        assert_eq!(json["user"]["prefs"]["theme"], json!("dark"));
    }
}

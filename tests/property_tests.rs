//! Property-based tests for module tree construction.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated module trees.

use proptest::prelude::*;
use serde_json::{json, Value};

use storetree::core::collection::{ConfigurationError, ModuleCollection};
use storetree::core::module::ModuleDef;
use storetree::core::types::ModulePath;
use storetree::store::Store;

/// Plain description of a generated tree.
#[derive(Debug, Clone)]
struct Shape {
    value: i64,
    children: Vec<(String, Shape)>,
}

impl Shape {
    fn count(&self) -> usize {
        1 + self.children.iter().map(|(_, c)| c.count()).sum::<usize>()
    }
}

/// Strategy for trees up to four levels deep with unique sibling names.
fn shape() -> impl Strategy<Value = Shape> {
    let leaf = any::<i64>().prop_map(|value| Shape {
        value,
        children: Vec::new(),
    });

    leaf.prop_recursive(4, 48, 4, |inner| {
        (any::<i64>(), prop::collection::vec(inner, 0..4)).prop_map(|(value, kids)| Shape {
            value,
            children: kids
                .into_iter()
                .enumerate()
                .map(|(i, kid)| (format!("m{i}"), kid))
                .collect(),
        })
    })
}

fn to_def(shape: &Shape) -> ModuleDef {
    shape
        .children
        .iter()
        .fold(ModuleDef::new(json!({ "value": shape.value })), |def, (name, child)| {
            def.module(name.clone(), to_def(child))
        })
}

/// Follow `path` through a composed state object.
fn descend<'a>(composed: &'a Value, path: &ModulePath) -> Option<&'a Value> {
    path.iter()
        .try_fold(composed, |value, segment| value.get(segment.as_str()))
}

proptest! {
    /// Every module is registered after its parent, in strict pre-order.
    #[test]
    fn registration_is_pre_order(shape in shape()) {
        let tree = ModuleCollection::new(to_def(&shape)).unwrap();
        let walked = tree.walk();

        prop_assert_eq!(walked.len(), shape.count());
        prop_assert_eq!(tree.len(), shape.count());

        for (i, (_, module)) in walked.iter().enumerate() {
            prop_assert_eq!(module.registered_at(), i);
            for (_, child) in module.children() {
                prop_assert!(module.registered_at() < child.registered_at());
            }
        }
    }

    /// A node's children are exactly its definition's nested modules.
    #[test]
    fn children_mirror_definition(shape in shape()) {
        let tree = ModuleCollection::new(to_def(&shape)).unwrap();

        for (_, module) in tree.walk() {
            let registered: Vec<String> =
                module.child_names().map(|n| n.as_str().to_string()).collect();
            let declared: Vec<String> =
                module.raw().modules.iter().map(|(n, _)| n.clone()).collect();
            prop_assert_eq!(registered, declared);
        }
    }

    /// Looking a walked path back up yields the same node.
    #[test]
    fn paths_resolve_to_their_nodes(shape in shape()) {
        let tree = ModuleCollection::new(to_def(&shape)).unwrap();

        for (path, module) in tree.walk() {
            let found = tree.get(&path).unwrap();
            prop_assert!(std::ptr::eq(found, module));
        }
    }

    /// The composed state mirrors the tree, and path lookups borrow the
    /// module's own value.
    #[test]
    fn composed_state_round_trips(shape in shape()) {
        let store = Store::new(to_def(&shape)).unwrap();
        let view = store.state();
        let composed = view.compose();

        for (path, module) in store.modules().walk() {
            prop_assert!(std::ptr::eq(view.get(&path).unwrap(), module.state()));

            let nested = descend(&composed, &path).unwrap();
            prop_assert_eq!(&nested["value"], &module.state()["value"]);
        }
    }

    /// Repeating a sibling name anywhere fails construction.
    #[test]
    fn duplicate_sibling_always_rejected(shape in shape(), extra in any::<i64>()) {
        let def = to_def(&shape)
            .module("dup", ModuleDef::new(json!({ "value": extra })))
            .module("dup", ModuleDef::default());

        let err = ModuleCollection::new(def).unwrap_err();
        prop_assert_eq!(
            err,
            ConfigurationError::DuplicateModule { path: "dup".parse().unwrap() }
        );
    }

    /// Path display and parse agree for valid segment names.
    #[test]
    fn path_display_parse_roundtrip(
        segments in prop::collection::vec("[a-z][a-z0-9_-]{0,8}", 1..5)
    ) {
        let text = segments.join("/");
        let path: ModulePath = text.parse().unwrap();
        prop_assert_eq!(path.len(), segments.len());
        prop_assert_eq!(path.to_string(), text);
    }
}

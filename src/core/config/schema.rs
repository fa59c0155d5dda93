//! core::config::schema
//!
//! Schema of module definition files.
//!
//! # Example
//!
//! ```toml
//! [state]
//! count = 0
//!
//! [modules.cart]
//! namespaced = true
//!
//! [modules.cart.state]
//! items = []
//! ```
//!
//! The same document in JSON:
//!
//! ```json
//! {
//!   "state": { "count": 0 },
//!   "modules": { "cart": { "namespaced": true, "state": { "items": [] } } }
//! }
//! ```
//!
//! # Ordering
//!
//! `modules` is read entry by entry in document order. Repeated keys are
//! kept, so module registration sees and rejects them.

use std::fmt;
use std::rc::Rc;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;

use crate::core::module::ModuleDef;

/// One module as written in a definition file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ModuleDoc {
    /// Initial local state (empty object if omitted)
    pub state: Option<Value>,

    /// Whether handler types are prefixed with this module's name
    pub namespaced: bool,

    /// Nested modules in document order
    #[serde(deserialize_with = "ordered_modules")]
    pub modules: Vec<(String, ModuleDoc)>,
}

impl From<ModuleDoc> for ModuleDef {
    fn from(doc: ModuleDoc) -> Self {
        let mut def = match doc.state {
            Some(state) => ModuleDef::new(state),
            None => ModuleDef::default(),
        };
        def.namespaced = doc.namespaced;
        def.modules = doc
            .modules
            .into_iter()
            .map(|(name, child)| (name, Rc::new(ModuleDef::from(child))))
            .collect();
        def
    }
}

fn ordered_modules<'de, D>(deserializer: D) -> Result<Vec<(String, ModuleDoc)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ModulesVisitor;

    impl<'de> Visitor<'de> for ModulesVisitor {
        type Value = Vec<(String, ModuleDoc)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of module names to module definitions")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some(entry) = access.next_entry::<String, ModuleDoc>()? {
                entries.push(entry);
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(ModulesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_document_is_default() {
        let doc: ModuleDoc = serde_json::from_str("{}").unwrap();
        assert_eq!(doc, ModuleDoc::default());

        let def = ModuleDef::from(doc);
        assert_eq!(def.state, json!({}));
        assert!(!def.namespaced);
    }

    #[test]
    fn json_modules_keep_document_order() {
        let doc: ModuleDoc = serde_json::from_str(
            r#"{ "modules": { "zeta": {}, "alpha": { "namespaced": true } } }"#,
        )
        .unwrap();

        let names: Vec<_> = doc.modules.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert!(doc.modules[1].1.namespaced);
    }

    #[test]
    fn json_duplicate_module_keys_are_kept() {
        let doc: ModuleDoc =
            serde_json::from_str(r#"{ "modules": { "a": { "state": 1 }, "a": { "state": 2 } } }"#)
                .unwrap();
        assert_eq!(doc.modules.len(), 2);
    }

    #[test]
    fn toml_nested_tables() {
        let doc: ModuleDoc = toml::from_str(
            r#"
            [state]
            count = 0

            [modules.cart]
            namespaced = true

            [modules.cart.state]
            items = []
            "#,
        )
        .unwrap();

        assert_eq!(doc.state, Some(json!({ "count": 0 })));
        let (name, cart) = &doc.modules[0];
        assert_eq!(name, "cart");
        assert!(cart.namespaced);
        assert_eq!(cart.state, Some(json!({ "items": [] })));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<ModuleDoc>(r#"{ "mutations": {} }"#).is_err());
    }

    #[test]
    fn conversion_builds_nested_definitions() {
        let doc: ModuleDoc = serde_json::from_str(
            r#"{
                "state": { "n": 1 },
                "modules": { "a": { "modules": { "c": { "state": "leaf" } } } }
            }"#,
        )
        .unwrap();
        let def = ModuleDef::from(doc);

        assert_eq!(def.state, json!({ "n": 1 }));
        let (a_name, a) = &def.modules[0];
        assert_eq!(a_name, "a");
        assert_eq!(a.modules[0].1.state, json!("leaf"));
    }
}

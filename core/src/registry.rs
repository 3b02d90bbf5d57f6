//! Per-model-type state: declarations, derived resource names, and the
//! memoized metadata cache.
//!
//! # Design
//! A model is declared as a marker type implementing [`Model`]; everything
//! the library needs at the type level is a const. Mutable per-type state
//! (the metadata cache) lives in a [`RegistryEntry`] held by a [`Registry`]
//! keyed by `TypeId`, so clients built from the same registry share it.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::dispatch::Attributes;

/// A typed model declaration.
///
/// The implementing type is usually an empty marker struct:
///
/// ```
/// use restmodel_core::Model;
///
/// struct Person;
///
/// impl Model for Person {
///     const NAME: &'static str = "Person";
///     const UNIQUE_ID_FIELD: &'static str = "email";
/// }
/// ```
pub trait Model: 'static {
    /// Declared CamelCase model name; the REST resource name is derived
    /// from it.
    const NAME: &'static str;

    /// Attribute key used as the record's primary key when building
    /// find/update/destroy paths.
    const UNIQUE_ID_FIELD: &'static str = "id";
}

/// Shared state for one model type: the derived resource name and the
/// memoized field metadata.
#[derive(Debug)]
pub struct RegistryEntry {
    resource: String,
    meta: RwLock<Option<Attributes>>,
}

impl RegistryEntry {
    fn new(name: &str) -> Self {
        Self {
            resource: resource_name(name),
            meta: RwLock::new(None),
        }
    }

    /// The snake_case REST path segment for this model.
    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub(crate) fn cached_meta(&self) -> Option<Attributes> {
        self.meta
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn store_meta(&self, meta: Attributes) {
        *self.meta.write().unwrap_or_else(PoisonError::into_inner) = Some(meta);
    }
}

/// Registry of per-type entries, keyed by type identity.
///
/// Two clients for the same model type built from the same registry share
/// one entry, and therefore one metadata cache. Concurrent first calls to
/// `metadata()` may each fetch before one of them stores; the redundant
/// fetch is tolerated rather than serialized.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Mutex<HashMap<TypeId, Arc<RegistryEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for model type `M`, created on first use.
    pub fn entry<M: Model>(&self) -> Arc<RegistryEntry> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .entry(TypeId::of::<M>())
            .or_insert_with(|| Arc::new(RegistryEntry::new(M::NAME)))
            .clone()
    }
}

/// Derive the snake_case REST resource name from a CamelCase model name.
///
/// An underscore goes before each uppercase letter that follows a lowercase
/// one, and at each uppercase-to-lowercase run boundary, so `MyModelName`
/// becomes `my_model_name` and `HTTPServer` becomes `http_server`.
pub fn resource_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let after_lower = chars[i - 1].is_lowercase();
            let run_boundary =
                chars[i - 1].is_uppercase() && chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if after_lower || run_boundary {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Naive English pluralization for list paths. Irregular plurals are out of
/// scope; resource names that need them should not rely on this.
pub fn pluralize(resource: &str) -> String {
    format!("{resource}s")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    struct Thing;
    impl Model for Thing {
        const NAME: &'static str = "Thing";
    }

    struct MyModelName;
    impl Model for MyModelName {
        const NAME: &'static str = "MyModelName";
    }

    #[test]
    fn resource_name_converts_camel_case_to_snake_case() {
        assert_eq!(resource_name("MyModelName"), "my_model_name");
        assert_eq!(resource_name("Thing"), "thing");
    }

    #[test]
    fn resource_name_splits_uppercase_runs_at_their_boundary() {
        assert_eq!(resource_name("HTTPServer"), "http_server");
    }

    #[test]
    fn unique_id_field_defaults_to_id() {
        assert_eq!(Thing::UNIQUE_ID_FIELD, "id");
    }

    #[test]
    fn pluralize_appends_s() {
        assert_eq!(pluralize("person"), "persons");
    }

    #[test]
    fn registry_hands_out_one_entry_per_type() {
        let registry = Registry::new();
        let first = registry.entry::<Thing>();
        let second = registry.entry::<Thing>();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.resource(), "thing");
    }

    #[test]
    fn registry_keeps_types_separate() {
        let registry = Registry::new();
        let thing = registry.entry::<Thing>();
        let model = registry.entry::<MyModelName>();
        assert!(!Arc::ptr_eq(&thing, &model));
        assert_eq!(model.resource(), "my_model_name");
    }

    #[test]
    fn meta_cache_is_per_entry() {
        let registry = Registry::new();
        let thing = registry.entry::<Thing>();
        let model = registry.entry::<MyModelName>();

        let mut meta = Attributes::new();
        meta.insert("one".to_string(), json!({"required": true}));
        thing.store_meta(meta.clone());

        assert_eq!(thing.cached_meta(), Some(meta));
        assert_eq!(model.cached_meta(), None);
    }
}

//! Model operations and the per-record attribute bag.
//!
//! # Design
//! [`ModelClient`] carries the type-level operations (`list`, `find`,
//! `create`, `update`, `destroy`, `metadata`) for one [`Model`], bound to a
//! [`Dispatcher`]. [`Instance`] is an ordered, string-keyed attribute map
//! typed by its model; fixed accessors exist only for the fields the
//! lifecycle itself consumes (`id`, `errors`), everything else goes through
//! generic get/set by key.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::dispatch::{Attributes, Dispatcher};
use crate::error::Error;
use crate::http::{HttpMethod, Transport};
use crate::registry::{pluralize, Model, Registry, RegistryEntry};

/// Type-level operations for one model, bound to a dispatcher.
pub struct ModelClient<M: Model, T: Transport> {
    dispatcher: Dispatcher<T>,
    entry: Arc<RegistryEntry>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model, T: Transport> ModelClient<M, T> {
    /// Bind model type `M` to `dispatcher`, sharing per-type state (resource
    /// name, metadata cache) through `registry`.
    pub fn new(registry: &Registry, dispatcher: Dispatcher<T>) -> Self {
        Self {
            dispatcher,
            entry: registry.entry::<M>(),
            _model: PhantomData,
        }
    }

    /// The snake_case REST path segment for this model.
    pub fn resource(&self) -> &str {
        self.entry.resource()
    }

    pub fn dispatcher(&self) -> &Dispatcher<T> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<T> {
        &mut self.dispatcher
    }

    /// Field metadata for this model, fetched from `{resource}/meta` once
    /// and then served from the per-type cache. A failed fetch is not cached
    /// and will be retried on the next call.
    pub fn metadata(&self) -> Result<Attributes, Error> {
        if let Some(meta) = self.entry.cached_meta() {
            return Ok(meta);
        }
        let meta = self
            .dispatcher
            .get_object(&[Some(self.resource()), Some("meta")], &Attributes::new())?;
        self.entry.store_meta(meta.clone());
        Ok(meta)
    }

    /// All records, in the order the server returned them.
    pub fn list(&self) -> Result<Vec<Instance<M>>, Error> {
        let plural = pluralize(self.resource());
        let items = self
            .dispatcher
            .get_list(&[Some(plural.as_str())], &Attributes::new())?;
        Ok(items.into_iter().map(Instance::from_attributes).collect())
    }

    /// Fetch one record by id.
    ///
    /// A response of JSON `null` means no record matched and yields
    /// `Ok(None)`; HTTP status codes are not consulted. Any other non-object
    /// response fails with [`Error::JsonParse`].
    pub fn find(&self, id: &str) -> Result<Option<Instance<M>>, Error> {
        let segments = [Some(self.resource()), Some(id)];
        match self
            .dispatcher
            .request(HttpMethod::Get, &segments, &Attributes::new())?
        {
            Value::Null => Ok(None),
            Value::Object(map) => Ok(Some(Instance::from_attributes(map))),
            other => Err(Error::json_parse(
                "expected a JSON object or null",
                other.to_string(),
            )),
        }
    }

    /// `POST` a new record.
    ///
    /// The returned instance starts from `attrs` and is then overwritten
    /// key-by-key with whatever the server sent back, so server-side
    /// `errors` end up on the instance.
    pub fn create(&self, attrs: Attributes) -> Result<Instance<M>, Error> {
        let response = self
            .dispatcher
            .request(HttpMethod::Post, &[Some(self.resource())], &attrs)?;
        Ok(merged_instance(attrs, response))
    }

    /// `PUT` new attribute values for an existing record; same merge
    /// semantics as [`ModelClient::create`].
    pub fn update(&self, id: &str, attrs: Attributes) -> Result<Instance<M>, Error> {
        let segments = [Some(self.resource()), Some(id)];
        let response = self
            .dispatcher
            .request(HttpMethod::Put, &segments, &attrs)?;
        Ok(merged_instance(attrs, response))
    }

    /// `DELETE` a record and return the decoded response verbatim. Local
    /// instances are left untouched.
    pub fn destroy(&self, id: &str) -> Result<Value, Error> {
        let segments = [Some(self.resource()), Some(id)];
        self.dispatcher
            .request(HttpMethod::Delete, &segments, &Attributes::new())
    }
}

/// Seed an instance with the submitted attributes, then overwrite with the
/// server's response. Non-object responses merge nothing.
fn merged_instance<M: Model>(attrs: Attributes, response: Value) -> Instance<M> {
    let mut instance = Instance::from_attributes(attrs);
    if let Value::Object(map) = response {
        instance.merge(map);
    }
    instance
}

/// One remote record: an ordered, string-keyed attribute bag typed by its
/// model. Created fresh by every fetch/create/update/find call.
pub struct Instance<M: Model> {
    attributes: Attributes,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> Instance<M> {
    pub fn new() -> Self {
        Self::from_attributes(Attributes::new())
    }

    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            attributes,
            _model: PhantomData,
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn into_attributes(self) -> Attributes {
        self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    /// Overwrite attributes key-by-key from `attrs`.
    pub fn merge(&mut self, attrs: Attributes) {
        for (key, value) in attrs {
            self.attributes.insert(key, value);
        }
    }

    /// The value in the model's unique-id field. Derived from the attribute
    /// map on every read, never stored separately; an explicit `null` counts
    /// as unset.
    pub fn id(&self) -> Option<&Value> {
        match self.attributes.get(M::UNIQUE_ID_FIELD) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// Errors reported by the server under the `"errors"` attribute.
    /// Missing or `null` reads as empty; a non-array value reads as a single
    /// error description.
    pub fn errors(&self) -> Vec<Value> {
        match self.attributes.get("errors") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.clone(),
            Some(other) => vec![other.clone()],
        }
    }

    pub fn set_errors(&mut self, errors: impl Into<Value>) {
        self.attributes.insert("errors".to_string(), errors.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors().is_empty()
    }

    /// Whether `field` is required according to the model's metadata: true
    /// iff the field's metadata entry exists and its `required` flag is
    /// exactly `true`.
    pub fn required<T: Transport>(
        &self,
        field: &str,
        client: &ModelClient<M, T>,
    ) -> Result<bool, Error> {
        let meta = client.metadata()?;
        Ok(meta
            .get(field)
            .and_then(Value::as_object)
            .and_then(|entry| entry.get("required"))
            .is_some_and(|flag| flag == &Value::Bool(true)))
    }

    /// Create or update this record remotely, then merge the server's view
    /// of it back into this instance.
    ///
    /// The record is created when the unique-id field is unset or when
    /// `find` reports no match, and updated otherwise. Returns `Ok(true)`
    /// iff the merged instance carries no errors; business-level `errors`
    /// payloads become the boolean, transport and parse failures propagate
    /// as `Err`.
    pub fn save<T: Transport>(&mut self, client: &ModelClient<M, T>) -> Result<bool, Error> {
        let id = self.id().map(id_segment);
        let existing = match &id {
            Some(id) => client.find(id)?,
            None => None,
        };
        let saved = match (&existing, &id) {
            (Some(_), Some(id)) => {
                debug!(resource = client.resource(), id = %id, "updating existing record");
                client.update(id, self.attributes.clone())?
            }
            _ => {
                debug!(resource = client.resource(), "creating new record");
                client.create(self.attributes.clone())?
            }
        };
        self.merge(saved.into_attributes());
        Ok(!self.has_errors())
    }
}

/// Render an id value as a path segment: strings go bare, anything else
/// keeps its JSON rendering.
fn id_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl<M: Model> Default for Instance<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Model> Clone for Instance<M> {
    fn clone(&self) -> Self {
        Self::from_attributes(self.attributes.clone())
    }
}

impl<M: Model> PartialEq for Instance<M> {
    fn eq(&self, other: &Self) -> bool {
        self.attributes == other.attributes
    }
}

impl<M: Model> fmt::Debug for Instance<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("model", &M::NAME)
            .field("attributes", &self.attributes)
            .finish()
    }
}

impl<M: Model> Serialize for Instance<M> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.attributes.serialize(serializer)
    }
}

impl<'de, M: Model> Deserialize<'de> for Instance<M> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Attributes::deserialize(deserializer).map(Instance::from_attributes)
    }
}

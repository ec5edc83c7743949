//! Generic resource representation
//!
//! A [`Resource`] is one server-side entity decoded from a JSON object: the
//! collection it came from, its identifier, and every other attribute the
//! server sent. The attribute set is open; typed views such as
//! [`crate::Volume`] read known keys out of it.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// One remote entity, immutable once decoded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resource {
    #[serde(skip)]
    collection: &'static str,
    id: String,
    #[serde(flatten)]
    attributes: Map<String, Value>,
}

impl Resource {
    /// Decode one item of `collection` from a response value.
    ///
    /// The value must be an object with an `id`; numeric ids are kept in
    /// their decimal form.
    pub fn from_value(collection: &'static str, value: Value) -> Result<Self> {
        let Value::Object(mut attributes) = value else {
            return Err(Error::missing_key("id"));
        };

        let id = match attributes.remove("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            _ => return Err(Error::missing_key("id")),
        };

        Ok(Self {
            collection,
            id,
            attributes,
        })
    }

    /// Decode every item of a JSON array
    pub fn list_from_value(collection: &'static str, value: Value, key: &str) -> Result<Vec<Self>> {
        let Value::Array(items) = value else {
            return Err(Error::missing_key(key));
        };

        items
            .into_iter()
            .map(|item| Self::from_value(collection, item))
            .collect()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection path segment this resource belongs to, e.g. `volumes`
    pub fn collection(&self) -> &'static str {
        self.collection
    }

    /// All attributes except `id`
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|v| v.as_str())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.as_u64())
    }

    /// Whether attribute `key` equals `expected`; `id` is matched too
    pub fn matches(&self, key: &str, expected: &Value) -> bool {
        if key == "id" {
            return match expected {
                Value::String(s) => s == &self.id,
                Value::Number(n) => n.to_string() == self.id,
                _ => false,
            };
        }
        self.get(key) == Some(expected)
    }

    /// Full JSON object, `id` included
    pub fn to_value(&self) -> Value {
        let mut map = self.attributes.clone();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        Value::Object(map)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {}>", self.collection, self.id)
    }
}

/// Either a bare identifier or something that already carries one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceRef<'a> {
    Id(&'a str),
    Resource(&'a Resource),
}

impl<'a> From<&'a str> for ResourceRef<'a> {
    fn from(id: &'a str) -> Self {
        ResourceRef::Id(id)
    }
}

impl<'a> From<&'a String> for ResourceRef<'a> {
    fn from(id: &'a String) -> Self {
        ResourceRef::Id(id.as_str())
    }
}

impl<'a> From<&'a Resource> for ResourceRef<'a> {
    fn from(resource: &'a Resource) -> Self {
        ResourceRef::Resource(resource)
    }
}

/// Resolve a [`ResourceRef`] to the identifier used in request paths
pub fn get_id<'a>(target: impl Into<ResourceRef<'a>>) -> &'a str {
    match target.into() {
        ResourceRef::Id(id) => id,
        ResourceRef::Resource(resource) => resource.id(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_splits_id_from_attributes() {
        let resource = Resource::from_value(
            "volumes",
            json!({"id": "abc123", "size": 10, "status": "available"}),
        )
        .unwrap();

        assert_eq!(resource.id(), "abc123");
        assert_eq!(resource.get_u64("size"), Some(10));
        assert_eq!(resource.get_str("status"), Some("available"));
        assert!(resource.get("id").is_none());
        assert_eq!(resource.to_string(), "<volumes: abc123>");
    }

    #[test]
    fn numeric_ids_are_accepted() {
        let resource = Resource::from_value("os-volume_attachments", json!({"id": 7})).unwrap();
        assert_eq!(resource.id(), "7");
        assert!(resource.matches("id", &json!(7)));
    }

    #[test]
    fn missing_id_is_an_error() {
        let err = Resource::from_value("volumes", json!({"size": 1})).unwrap_err();
        assert!(matches!(err, Error::MissingKey { ref key } if key == "id"));

        let err = Resource::from_value("volumes", json!("abc")).unwrap_err();
        assert!(matches!(err, Error::MissingKey { .. }));
    }

    #[test]
    fn list_requires_an_array() {
        let err = Resource::list_from_value("volumes", json!({}), "volumes").unwrap_err();
        assert!(matches!(err, Error::MissingKey { ref key } if key == "volumes"));
    }

    #[test]
    fn get_id_resolves_both_forms() {
        let resource = Resource::from_value("volumes", json!({"id": "abc123"})).unwrap();
        let raw = String::from("abc123");

        assert_eq!(get_id(&resource), "abc123");
        assert_eq!(get_id("abc123"), "abc123");
        assert_eq!(get_id(&raw), "abc123");
    }

    #[test]
    fn to_value_restores_id() {
        let value = json!({"id": "v1", "size": 2});
        let resource = Resource::from_value("volumes", value.clone()).unwrap();
        assert_eq!(resource.to_value(), value);
    }
}

//! Entity (a table row with a stable identity)

use std::hash::Hash;
use std::hash::Hasher;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::error::FetchError;

/// A row of the table.
///
/// Identity is carried by `identity_key` alone: two entities with the same key
/// are the same row, regardless of their display fields. Display fields are
/// opaque to the selection logic.
///
/// # Examples
///
/// ```
/// use pageselect_lib::model::Entity;
///
/// let a = Entity::new("129884").with_field("title", "Starry Night and the Astronauts");
/// let b = Entity::new("129884").with_field("title", "renamed");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    identity_key: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

impl Entity {
    /// Creates an entity with no display fields.
    pub fn new(identity_key: impl Into<String>) -> Self {
        Self {
            identity_key: identity_key.into(),
            fields: Map::new(),
        }
    }

    /// Adds a display field.
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Builds an entity from a raw JSON record, taking the identity from `key_field`.
    ///
    /// String and numeric keys are accepted. The key field stays in the
    /// display fields. Records without a usable key are rejected rather than
    /// falling back to a display field, since display values (titles, names)
    /// are not unique.
    pub fn from_record(record: Map<String, Value>, key_field: &str) -> Result<Self, FetchError> {
        let identity_key = match record.get(key_field) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(FetchError::MissingIdentity {
                    field: key_field.to_string(),
                });
            }
        };

        Ok(Self {
            identity_key,
            fields: record,
        })
    }

    /// Returns the identity key.
    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    /// Returns all display fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Returns a display field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns a display field rendered as text.
    ///
    /// Strings are returned as-is, `null` and missing fields as `None`,
    /// everything else through its JSON representation.
    pub fn get_text(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.identity_key == other.identity_key
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.identity_key.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_numeric_identity() {
        let entity = Entity::from_record(record(json!({"id": 27992, "title": "A Sunday"})), "id").unwrap();
        assert_eq!(entity.identity_key(), "27992");
        assert_eq!(entity.get_text("title").as_deref(), Some("A Sunday"));
    }

    #[test]
    fn test_string_identity() {
        let entity = Entity::from_record(record(json!({"uuid": "a-b-c"})), "uuid").unwrap();
        assert_eq!(entity.identity_key(), "a-b-c");
    }

    #[test]
    fn test_missing_identity() {
        let err = Entity::from_record(record(json!({"title": "Untitled"})), "id").unwrap_err();
        assert!(matches!(err, FetchError::MissingIdentity { field } if field == "id"));

        let err = Entity::from_record(record(json!({"id": null})), "id").unwrap_err();
        assert!(matches!(err, FetchError::MissingIdentity { .. }));
    }

    #[test]
    fn test_same_title_different_identity() {
        let a = Entity::new("1").with_field("title", "Untitled");
        let b = Entity::new("2").with_field("title", "Untitled");
        assert_ne!(a, b);
    }

    #[test]
    fn test_get_text_variants() {
        let entity = Entity::new("1")
            .with_field("date_start", 1884)
            .with_field("inscriptions", Value::Null);
        assert_eq!(entity.get_text("date_start").as_deref(), Some("1884"));
        assert_eq!(entity.get_text("inscriptions"), None);
        assert_eq!(entity.get_text("missing"), None);
    }
}

//! Resource state container
//!
//! Holds a resource record as a JSON object. Import handlers fill it attribute by
//! attribute; the adapter converts it to and from the typed models.

use crate::error::{ProviderError, ProviderResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    values: Map<String, Value>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_value(value: Value) -> ProviderResult<Self> {
        match value {
            Value::Object(values) => Ok(Self { values }),
            Value::Null => Ok(Self::default()),
            other => Err(ProviderError::Invariant(format!(
                "state must be an object, got {}",
                other
            ))),
        }
    }

    /// Decode the whole record into a typed model
    pub fn get<T: DeserializeOwned>(&self) -> ProviderResult<T> {
        Ok(serde_json::from_value(Value::Object(self.values.clone()))?)
    }

    /// Replace the whole record with a typed model
    pub fn set<T: Serialize>(&mut self, model: &T) -> ProviderResult<()> {
        *self = Self::from_value(serde_json::to_value(model)?)?;
        Ok(())
    }

    /// Set a single top-level attribute
    pub fn set_attribute<T: Serialize>(&mut self, name: &str, value: T) -> ProviderResult<()> {
        self.values.insert(name.to_string(), serde_json::to_value(value)?);
        Ok(())
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Record {
        id: String,
        name: Option<String>,
    }

    #[test]
    fn test_set_attribute_then_get() {
        let mut state = State::new();
        state.set_attribute("id", "abc").unwrap();

        let record: Record = state.get().unwrap();
        assert_eq!(record, Record { id: "abc".to_string(), name: None });
    }

    #[test]
    fn test_set_replaces_record() {
        let mut state = State::from_value(json!({ "stale": true })).unwrap();
        state
            .set(&Record { id: "1".to_string(), name: Some("api".to_string()) })
            .unwrap();

        assert_eq!(state.into_value(), json!({ "id": "1", "name": "api" }));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(State::from_value(json!([1, 2])).is_err());
    }
}

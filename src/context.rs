// Shared context - the single scratchpad every state in a chain reads and writes

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form key/value store shared by all states of one `Chain`.
///
/// No validation is applied to keys or values. The chain lends it to each
/// state hook by reference and empties it in place on reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    data: Map<String, Value>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, returning whatever was previously under `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Store any serializable value.
    pub fn insert_serialized<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> serde_json::Result<Option<Value>> {
        let value = serde_json::to_value(value)?;
        Ok(self.data.insert(key.into(), value))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Read a value back as a concrete type. `Ok(None)` when the key is absent.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> serde_json::Result<Option<T>> {
        self.data
            .get(key)
            .map(|value| T::deserialize(value))
            .transpose()
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.data.get(key).and_then(Value::as_bool)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Empty the store without replacing it.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn data(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Copy of the current contents as a JSON object.
    pub fn snapshot(&self) -> Value {
        Value::Object(self.data.clone())
    }
}

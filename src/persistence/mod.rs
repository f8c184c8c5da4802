//! Key-value persistence
//!
//! The browser build stores everything in LocalStorage; native builds and
//! tests use an in-memory map. Values are JSON strings.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;

/// String key-value store (LocalStorage semantics)
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// In-memory storage for native builds and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Read and deserialize a JSON value. `Ok(None)` if the key is absent.
pub fn load_json<T: DeserializeOwned>(storage: &impl Storage, key: &str) -> Result<Option<T>> {
    match storage.get_item(key)? {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

/// Serialize and store a JSON value
pub fn save_json<T: Serialize>(storage: &mut impl Storage, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)?;
    storage.set_item(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_memory_storage_roundtrip() {
        let mut storage = MemoryStorage::new();
        assert!(storage.is_empty());
        storage.set_item("a", "1").unwrap();
        assert_eq!(storage.get_item("a").unwrap().as_deref(), Some("1"));
        storage.remove_item("a").unwrap();
        assert_eq!(storage.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_load_json_missing_and_malformed() {
        let mut storage = MemoryStorage::new();
        assert_eq!(load_json::<u64>(&storage, "score").unwrap(), None);

        storage.set_item("score", "{oops").unwrap();
        assert!(matches!(load_json::<u64>(&storage, "score"), Err(Error::Json(_))));

        save_json(&mut storage, "score", &42u64).unwrap();
        assert_eq!(load_json::<u64>(&storage, "score").unwrap(), Some(42));
    }
}

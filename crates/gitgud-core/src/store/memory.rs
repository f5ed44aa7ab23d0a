//! In-memory state store for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use super::StateStore;
use crate::error::StoreError;

/// In-memory fake of the durable store.
///
/// Behaves like [`super::FileStore`] minus the filesystem: keys hold
/// trimmed text, appends grow line-wise, deletes are idempotent.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .ok()?
            .get(key)
            .map(|v| v.trim().to_string())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn append(&self, key: &str, line: &str) -> Result<(), StoreError> {
        if let Ok(mut values) = self.values.lock() {
            let entry = values.entry(key.to_string()).or_default();
            entry.push_str(line);
            entry.push('\n');
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        if let Ok(mut values) = self.values.lock() {
            values.remove(key);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.values
            .lock()
            .map(|v| v.contains_key(key))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_a_store() {
        let store = MemoryStore::new();
        assert!(store.read("k").is_none());
        store.write("k", "v").unwrap();
        assert_eq!(store.read("k").as_deref(), Some("v"));
        store.append("log", "a").unwrap();
        store.append("log", "b").unwrap();
        assert_eq!(store.read("log").unwrap().lines().count(), 2);
        store.delete("k").unwrap();
        assert!(!store.exists("k"));
    }
}

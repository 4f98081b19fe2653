//! Key/value persistence for settings and high scores
//!
//! Values are stored as JSON strings. On the web the backend is LocalStorage;
//! elsewhere (and in tests) an in-memory map stands in for it.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::GameError;

/// String key/value store
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError>;
    fn remove(&mut self, key: &str);
}

/// Volatile storage, used on native and in tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.items.remove(key);
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    inner: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn open() -> Result<Self, GameError> {
        let window = web_sys::window().ok_or(GameError::NoWindow)?;
        let inner = window
            .local_storage()
            .ok()
            .flatten()
            .ok_or(GameError::StorageUnavailable)?;
        Ok(Self { inner })
    }
}

#[cfg(target_arch = "wasm32")]
impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), GameError> {
        // Throws when the quota is exceeded or storage is disabled
        self.inner
            .set_item(key, value)
            .map_err(|_| GameError::StorageWrite(key.to_string()))
    }

    fn remove(&mut self, key: &str) {
        let _ = self.inner.remove_item(key);
    }
}

/// Read and decode a value. Missing keys are `Ok(None)`; corrupt data is an error.
pub fn load_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, GameError> {
    match storage.get(key) {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

pub fn save_json<T: Serialize>(
    storage: &mut dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), GameError> {
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// Load a value, falling back to its default when missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(storage: &dyn Storage, key: &str) -> T {
    match load_json(storage, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("No stored '{}', using defaults", key);
            T::default()
        }
        Err(e) => {
            log::warn!("Discarding stored '{}': {}", key, e);
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        volume: u8,
        name: Option<String>,
    }

    #[test]
    fn test_save_then_load() {
        let mut storage = MemoryStorage::new();
        let prefs = Prefs {
            volume: 7,
            name: Some("spud".into()),
        };
        save_json(&mut storage, "prefs", &prefs).unwrap();

        let loaded: Option<Prefs> = load_json(&storage, "prefs").unwrap();
        assert_eq!(loaded, Some(prefs));
    }

    #[test]
    fn test_missing_key() {
        let storage = MemoryStorage::new();
        let loaded: Option<Prefs> = load_json(&storage, "nothing").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_corrupt_data_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.set("prefs", "{not json").unwrap();

        assert!(matches!(
            load_json::<Prefs>(&storage, "prefs"),
            Err(GameError::Json(_))
        ));
        let prefs: Prefs = load_or_default(&storage, "prefs");
        assert_eq!(prefs, Prefs::default());
    }

    #[test]
    fn test_remove() {
        let mut storage = MemoryStorage::new();
        storage.set("k", "1").unwrap();
        storage.remove("k");
        assert!(storage.get("k").is_none());
    }
}

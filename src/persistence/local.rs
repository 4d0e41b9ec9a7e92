//! Browser LocalStorage backend (wasm32)
//!
//! The whole store lives as one JSON object under a single LocalStorage key.

use serde_json::Value;

use super::{Entries, KeyValueStore, StoreError};

/// Settings store backed by `window.localStorage`
pub struct LocalStorageStore {
    storage: web_sys::Storage,
    entries: Entries,
}

impl LocalStorageStore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "hoppy_bunny_settings";

    /// Open the store, reading whatever was saved last
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .ok_or(StoreError::Unavailable("no window"))?
            .local_storage()
            .map_err(|_| StoreError::Unavailable("localStorage access denied"))?
            .ok_or(StoreError::Unavailable("localStorage disabled"))?;

        let entries = match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => Entries::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring unreadable saved settings: {}", e);
                Entries::default()
            }),
            _ => {
                log::info!("No saved settings found, starting fresh");
                Entries::default()
            }
        };

        Ok(Self { storage, entries })
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.set(key, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if !self.entries.dirty {
            return Ok(());
        }
        let json = self.entries.to_json()?;
        self.storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| StoreError::Unavailable("localStorage write rejected"))?;
        self.entries.dirty = false;
        log::info!("Settings store saved");
        Ok(())
    }
}

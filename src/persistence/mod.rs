//! Durable key/value settings store
//!
//! Features:
//! - Integer/string values by key, missing keys read as 0 / None
//! - Explicit flush; nothing is durable until `flush` succeeds
//! - Backends: JSON file (native), LocalStorage (web), memory (tests)

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use serde_json::Value;

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod local;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFileStore;
#[cfg(target_arch = "wasm32")]
pub use local::LocalStorageStore;

/// Errors from reading or writing a store
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Json(serde_json::Error),
    /// Backend cannot be reached (no window, storage disabled, ...)
    Unavailable(&'static str),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "settings store I/O error: {}", e),
            Self::Json(e) => write!(f, "settings store encoding error: {}", e),
            Self::Unavailable(what) => write!(f, "settings store unavailable: {}", what),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

/// Process-wide durable key/value settings
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<&Value>;

    fn set(&mut self, key: &str, value: Value);

    /// Make every `set` so far durable
    fn flush(&mut self) -> Result<(), StoreError>;

    /// Integer under `key`; 0 when missing or not an integer
    fn get_int(&self, key: &str) -> i64 {
        self.get(key).and_then(Value::as_i64).unwrap_or(0)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.set(key, Value::from(value));
    }

    fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(Value::as_str).map(str::to_owned)
    }

    fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, Value::from(value));
    }
}

/// Entries shared by the backends, plus a dirty flag for cheap flushes
#[derive(Debug, Clone, Default)]
pub(crate) struct Entries {
    pub values: BTreeMap<String, Value>,
    pub dirty: bool,
}

impl Entries {
    /// Parse a JSON object; anything else is an error
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let values: BTreeMap<String, Value> = serde_json::from_str(json)?;
        Ok(Self {
            values,
            dirty: false,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.values)
    }

    pub fn set(&mut self, key: &str, value: Value) {
        if self.values.get(key) != Some(&value) {
            self.values.insert(key.to_owned(), value);
            self.dirty = true;
        }
    }
}

/// In-memory store (tests and throwaway runs)
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Entries,
    flushes: usize,
    fail_flush: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful flushes
    pub fn flushes(&self) -> usize {
        self.flushes
    }

    /// Make every following flush fail, as a full disk would
    pub fn set_fail_flush(&mut self, fail: bool) {
        self.fail_flush = fail;
    }

    /// Whether there are sets that have not been flushed
    pub fn is_dirty(&self) -> bool {
        self.entries.dirty
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<&Value> {
        self.entries.values.get(key)
    }

    fn set(&mut self, key: &str, value: Value) {
        self.entries.set(key, value);
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        if self.fail_flush {
            return Err(StoreError::Unavailable("flush disabled"));
        }
        self.entries.dirty = false;
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_int_reads_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.get_int("highscore"), 0);
        assert_eq!(store.get_string("highscore"), None);
    }

    #[test]
    fn test_wrong_type_reads_zero() {
        let mut store = MemoryStore::new();
        store.set_string("highscore", "twelve");
        assert_eq!(store.get_int("highscore"), 0);
    }

    #[test]
    fn test_set_marks_dirty_until_flush() {
        let mut store = MemoryStore::new();
        store.set_int("highscore", 12);
        assert!(store.is_dirty());
        store.flush().unwrap();
        assert!(!store.is_dirty());
        assert_eq!(store.get_int("highscore"), 12);

        // Same value again is not a change
        store.set_int("highscore", 12);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_failing_flush_keeps_value_in_memory() {
        let mut store = MemoryStore::new();
        store.set_fail_flush(true);
        store.set_int("highscore", 3);
        assert!(matches!(store.flush(), Err(StoreError::Unavailable(_))));
        assert_eq!(store.get_int("highscore"), 3);
        assert_eq!(store.flushes(), 0);
    }

    #[test]
    fn test_entries_reject_non_object() {
        assert!(Entries::from_json("[1, 2]").is_err());
        let entries = Entries::from_json(r#"{"highscore": 9}"#).unwrap();
        assert_eq!(entries.values.get("highscore"), Some(&Value::from(9)));
    }
}

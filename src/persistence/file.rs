//! JSON file backend (native)
//!
//! The whole store is one JSON object. Flushing writes a sibling `.tmp` file
//! and renames it over the original, so a crash mid-write leaves the previous
//! contents intact.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde_json::Value;

use super::{Entries, KeyValueStore, StoreError};

/// Settings store backed by a JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Entries,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object is
    /// moved aside to `<name>.corrupt` and the store starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(json) => match Entries::from_json(&json) {
                Ok(entries) => {
                    log::info!("Loaded settings store {}", path.display());
                    entries
                }
                Err(e) => {
                    let aside = path.with_extension("corrupt");
                    log::warn!(
                        "Settings store {} is unreadable ({}); moving it to {}",
                        path.display(),
                        e,
                        aside.display()
                    );
                    fs::rename(&path, &aside)?;
                    Entries::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings store at {}, starting fresh", path.display());
                Entries::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    /// Per-user location of the store, if the platform has one
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "paulrobello", "hoppy-bunny")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for JsonFileStore {
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

        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, self.entries.to_json()?)?;
        fs::rename(&tmp, &self.path)?;

        self.entries.dirty = false;
        log::debug!("Flushed settings store {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Unique scratch directory per test
    fn scratch_dir() -> PathBuf {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!(
            "hoppy-bunny-store-{}-{}",
            std::process::id(),
            id
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = scratch_dir();
        let store = JsonFileStore::open(dir.join("settings.json")).unwrap();
        assert_eq!(store.get_int("highscore"), 0);
        assert!(!dir.exists());
    }

    #[test]
    fn test_flush_persists_across_reopen() {
        let dir = scratch_dir();
        let path = dir.join("nested").join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("highscore", 17);
        store.flush().unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("highscore"), 17);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unflushed_values_are_not_durable() {
        let dir = scratch_dir();
        let path = dir.join("settings.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set_int("highscore", 4);
        drop(store);

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_int("highscore"), 0);
    }

    #[test]
    fn test_corrupt_file_moved_aside() {
        let dir = scratch_dir();
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("settings.json");
        fs::write(&path, "{{{ definitely not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_int("highscore"), 0);
        assert!(path.with_extension("corrupt").exists());
        assert!(!path.exists());

        let _ = fs::remove_dir_all(&dir);
    }
}

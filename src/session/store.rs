use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::{PoisonError, RwLock},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
struct Flags {
    birthday_reached: bool,
}

/// Persisted session flags, kept as a small JSON file in the app data dir.
/// A store without a path keeps everything in memory.
pub struct FlagStore {
    path: Option<PathBuf>,
    data: RwLock<Flags>,
}

impl FlagStore {
    /// A missing or unreadable file starts from defaults.
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read flags from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log::warn!("ignoring corrupt flag file {}: {err}", path.display());
                Flags::default()
            })
        } else {
            Flags::default()
        };

        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(Flags::default()),
        }
    }

    pub fn birthday_reached(&self) -> bool {
        self.data
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .birthday_reached
    }

    pub fn set_birthday_reached(&self, reached: bool) -> Result<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| anyhow!("flag store lock poisoned"))?;
        if guard.birthday_reached == reached {
            return Ok(());
        }
        guard.birthday_reached = reached;
        self.persist(&guard)
    }

    fn persist(&self, data: &Flags) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(path, serialized)
            .with_context(|| format!("Failed to write flags to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_survives_a_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");

        let store = FlagStore::new(path.clone()).unwrap();
        assert!(!store.birthday_reached());
        store.set_birthday_reached(true).unwrap();

        let reopened = FlagStore::new(path.clone()).unwrap();
        assert!(reopened.birthday_reached());

        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains("\"birthdayReached\": true"));
    }

    #[test]
    fn corrupt_file_reads_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flags.json");
        fs::write(&path, "{ not json").unwrap();

        let store = FlagStore::new(path).unwrap();
        assert!(!store.birthday_reached());
    }

    #[test]
    fn in_memory_store_writes_nothing() {
        let store = FlagStore::in_memory();
        store.set_birthday_reached(true).unwrap();
        assert!(store.birthday_reached());
    }
}

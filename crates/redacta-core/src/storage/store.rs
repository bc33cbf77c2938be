//! On-device key-value persistence.
//!
//! The store is a serialization mirror of the in-memory application
//! state: every mutation is written through immediately, one JSON blob
//! per logical key, no transactions across keys and no versioning.
//!
//! [`KvStore`] is the injectable port; the real backend is a SQLite
//! `kv` table at `~/.config/redacta/redacta.db`, and tests substitute
//! the in-memory [`MemoryStore`].

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::chat::ChatHistories;
use crate::error::StorageError;
use crate::model::SavedCorrection;
use crate::progression::UserStats;

use super::data_dir;

/// Logical key names for the persisted blobs.
pub mod keys {
    pub const USER_STATS: &str = "user_stats";
    pub const CORRECTION_HISTORY: &str = "correction_history";
    pub const CHAT_SESSIONS: &str = "chat_sessions";
    pub const TERMS_ACCEPTED: &str = "terms_accepted";
    pub const GUIDE_SEEN: &str = "guide_seen";
}

/// Persistence port: `get`/`set` over independently-keyed records.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed store.
///
/// A single `kv` table holds every record; the schema is created on
/// first open.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the store at `~/.config/redacta/redacta.db`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StorageError> {
        let path = data_dir()?.join("redacta.db");
        Self::open_at(&path)
    }

    fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory().map_err(StorageError::from)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        let value = conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.conn.lock().expect("store mutex poisoned");
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.inner.lock().expect("store mutex poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed wrapper over a [`KvStore`]: one method pair per persisted key,
/// JSON in both directions. Cheap to clone; the app state and the chat
/// orchestrator share one handle.
#[derive(Clone)]
pub struct StateStore {
    inner: Arc<dyn KvStore>,
}

impl StateStore {
    pub fn new(store: impl KvStore + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Open the default on-disk store.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::new(Database::open()?))
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.inner.get(key)? {
            None => Ok(None),
            Some(raw) => serde_json::from_str(&raw).map(Some).map_err(|e| {
                StorageError::CorruptRecord {
                    key: key.to_string(),
                    message: e.to_string(),
                }
            }),
        }
    }

    fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let raw = serde_json::to_string(value).map_err(|e| StorageError::CorruptRecord {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        self.inner.set(key, &raw)
    }

    pub fn load_stats(&self) -> Result<Option<UserStats>, StorageError> {
        self.load(keys::USER_STATS)
    }

    pub fn save_stats(&self, stats: &UserStats) -> Result<(), StorageError> {
        self.save(keys::USER_STATS, stats)
    }

    pub fn load_history(&self) -> Result<Option<Vec<SavedCorrection>>, StorageError> {
        self.load(keys::CORRECTION_HISTORY)
    }

    pub fn save_history(&self, history: &[SavedCorrection]) -> Result<(), StorageError> {
        self.save(keys::CORRECTION_HISTORY, &history)
    }

    pub fn load_chats(&self) -> Result<Option<ChatHistories>, StorageError> {
        self.load(keys::CHAT_SESSIONS)
    }

    pub fn save_chats(&self, chats: &ChatHistories) -> Result<(), StorageError> {
        self.save(keys::CHAT_SESSIONS, chats)
    }

    /// Boolean flag, false when absent or unreadable.
    pub fn flag(&self, key: &str) -> bool {
        matches!(self.inner.get(key), Ok(Some(ref v)) if v == "true")
    }

    pub fn set_flag(&self, key: &str) -> Result<(), StorageError> {
        self.inner.set(key, "true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_set_then_get_round_trips() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.get("missing").unwrap(), None);
        db.set("k", "v1").unwrap();
        db.set("k", "v2").unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn database_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("redacta.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set("k", "v").unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn stats_round_trip_through_state_store() {
        let store = StateStore::new(MemoryStore::new());
        assert!(store.load_stats().unwrap().is_none());

        let stats = UserStats {
            xp: 42,
            ..UserStats::default()
        };
        store.save_stats(&stats).unwrap();
        assert_eq!(store.load_stats().unwrap().unwrap(), stats);
    }

    #[test]
    fn corrupt_record_is_reported_with_its_key() {
        let mem = MemoryStore::new();
        mem.set(keys::USER_STATS, "{not json").unwrap();
        let store = StateStore::new(mem);
        match store.load_stats() {
            Err(StorageError::CorruptRecord { key, .. }) => {
                assert_eq!(key, keys::USER_STATS);
            }
            other => panic!("expected CorruptRecord, got {other:?}"),
        }
    }

    #[test]
    fn flags_default_to_false() {
        let store = StateStore::new(MemoryStore::new());
        assert!(!store.flag(keys::TERMS_ACCEPTED));
        store.set_flag(keys::TERMS_ACCEPTED).unwrap();
        assert!(store.flag(keys::TERMS_ACCEPTED));
        assert!(!store.flag(keys::GUIDE_SEEN));
    }
}

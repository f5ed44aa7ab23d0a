//! Durable state store abstraction.
//!
//! All persisted records (counter, pending task, skip quota, streak,
//! stats, achievements, history) live behind the [`StateStore`] trait so
//! the engine never assumes a particular storage technology and stays
//! testable with an in-memory fake. Each invocation is a fresh process:
//! callers borrow-read and borrow-write per call and hold no copy of
//! store contents across invocations.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::de::DeserializeOwned;
use std::path::PathBuf;

use crate::error::StoreError;

/// Logical store keys, one persisted value each.
pub mod keys {
    /// Monotonic request counter (integer text).
    pub const REQUEST_COUNTER: &str = "request_counter";
    /// The single outstanding exercise (free text; presence is the gate).
    pub const PENDING_TASK: &str = "pending_task";
    /// Skips used today (integer text).
    pub const DAILY_SKIPS: &str = "daily_skips";
    /// Date of the last skip-quota reset (ISO date text).
    pub const LAST_SKIP_DATE: &str = "last_skip_date";
    /// Streak record: current, last completion date, best (newline-joined).
    pub const STREAK: &str = "streak_data";
    /// Stats counters (JSON).
    pub const STATS: &str = "stats.json";
    /// Unlocked achievement ids (JSON array).
    pub const ACHIEVEMENTS: &str = "achievements.json";
    /// Append-only event log (JSONL).
    pub const HISTORY: &str = "task_history.jsonl";
    /// User configuration (TOML).
    pub const CONFIG: &str = "config.toml";
}

/// A set of named persisted values addressed by stable keys.
///
/// Reads never fail: a missing or unreadable value is `None`, and the
/// typed helpers substitute the type's default so the engine degrades to
/// default state instead of raising.
pub trait StateStore {
    /// Read the trimmed value of a key, `None` if missing or unreadable.
    fn read(&self, key: &str) -> Option<String>;

    /// Write a key's value, replacing any previous content.
    fn write(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Append one line to an append-only key.
    fn append(&self, key: &str, line: &str) -> Result<(), StoreError>;

    /// Remove a key. Removing an absent key is a no-op.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Whether the key currently holds a value.
    fn exists(&self, key: &str) -> bool;

    /// Read an integer key, substituting `default` when missing or malformed.
    fn read_u32(&self, key: &str, default: u32) -> u32 {
        self.read(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Read a JSON key, substituting the type default when missing or malformed.
    fn read_json<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read(key)
            .and_then(|v| serde_json::from_str(&v).ok())
            .unwrap_or_default()
    }
}

/// Returns the data directory, `~/.gitgud/` by default.
///
/// Set `GITGUD_DATA_DIR` to relocate it (tests point this at a temp dir).
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf, StoreError> {
    let dir = match std::env::var("GITGUD_DATA_DIR") {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".gitgud"),
    };

    std::fs::create_dir_all(&dir).map_err(|e| StoreError::DataDir {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}

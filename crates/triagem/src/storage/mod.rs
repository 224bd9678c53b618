//! Storage layer for triagem.
//!
//! All persisted state lives in a small key-value store holding JSON values.
//! The store is reached through the [`KeyValueStore`] trait so the
//! application context can run against the `SQLite`-backed [`SqliteStore`]
//! or the in-memory [`MemoryStore`].

pub mod memory;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::config::CorruptPolicy;
use crate::error::{Error, Result};

pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, StorageStats};

/// Key of the single pending assessment slot.
pub const CURRENT_ASSESSMENT_KEY: &str = "currentAssessment";

/// Key of the newest-first consultation history list.
pub const CONSULTATION_HISTORY_KEY: &str = "consultationHistory";

/// Key of the fingerprint of the last committed pending assessment.
pub const COMMITTED_ASSESSMENT_KEY: &str = "committedAssessment";

/// A synchronous key-value store of JSON values.
///
/// Reading an absent key is not an error; it yields `None`.
pub trait KeyValueStore {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails or the stored text is not
    /// valid JSON.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn write(&mut self, key: &str, value: &Value) -> Result<()>;

    /// Remove `key`. Returns `true` if a value was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn remove(&mut self, key: &str) -> Result<bool>;

    /// List all keys currently present, in ascending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store fails.
    fn keys(&self) -> Result<Vec<String>>;
}

/// Read and decode the value under `key`.
///
/// Undecodable data is handled according to `on_corrupt`: either returned as
/// [`Error::CorruptValue`] or logged and treated as absent.
///
/// # Errors
///
/// Returns an error if the store fails, or if the value is corrupt and the
/// policy is [`CorruptPolicy::Fail`].
pub fn load<T, S>(store: &S, key: &str, on_corrupt: CorruptPolicy) -> Result<Option<T>>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let decoded = match store.read(key) {
        Ok(None) => return Ok(None),
        Ok(Some(value)) => {
            serde_json::from_value(value).map_err(|source| Error::corrupt_value(key, source))
        }
        Err(err) => Err(err),
    };

    match decoded {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_corrupt_value() && on_corrupt == CorruptPolicy::Reset => {
            warn!("Ignoring corrupt value under '{}': {}", key, err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns an error if encoding or the store fails.
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let value = serde_json::to_value(value)?;
    store.write(key, &value)
}

//! Typed JSON access on top of a `KeyValueStore`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::{KeyValueStore, StorageError};

/// Read and decode the JSON document under `key`.
///
/// A value that does not decode as `T` is treated like a missing one and
/// logged; only backend failures are errors.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be read.
pub async fn read_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            tracing::warn!(key, error = %err, "ignoring malformed stored value");
            Ok(None)
        }
    }
}

/// Like [`read_json`], falling back to `T::default()` when absent or malformed.
///
/// # Errors
///
/// Returns `StorageError` if the store cannot be read.
pub async fn read_json_or_default<T: DeserializeOwned + Default>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<T, StorageError> {
    Ok(read_json(store, key).await?.unwrap_or_default())
}

/// Encode `value` as JSON and store it under `key`.
///
/// # Errors
///
/// Returns `StorageError::Serialization` if encoding fails, or the store's
/// error if the write fails.
pub async fn write_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw =
        serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.set(key, raw).await
}

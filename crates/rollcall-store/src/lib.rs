//! # rollcall-store — Storage Port
//!
//! The engine never imports a concrete storage client. It talks to this
//! async key-value port, which any backend can implement: per-key atomic
//! get/put/delete of JSON documents, last-write-wins, no compare-and-swap
//! and no cross-key transactions.
//!
//! Two concurrent read-modify-write cycles on the same key can race and
//! lose an update. That is an accepted, documented limitation of the
//! underlying store, not something this layer papers over — every
//! stateful transition upstream is idempotent or cheaply safe to run
//! twice instead.
//!
//! State objects are always written as one complete replacement, never
//! patched field-by-field.

pub mod keys;
pub mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub use keys::OrgKeys;
pub use memory::MemoryStore;

/// Storage failure. Deliberately separate from the domain taxonomy:
/// these propagate as-is to the calling layer, which decides on 5xx
/// behavior.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The backend failed to serve the request.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored document failed to deserialize into its expected shape.
    #[error("corrupt document at {key}: {source}")]
    Corrupt {
        /// The storage key holding the document.
        key: String,
        /// The deserialization failure.
        source: serde_json::Error,
    },
}

/// Opaque async JSON key-value store.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read the document at `key`, `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the document at `key`.
    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove the document at `key`. Removing an absent key is not an
    /// error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Read and deserialize a document, mapping shape mismatches to
/// [`StoreError::Corrupt`].
pub async fn read_doc<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key).await? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                key: key.to_string(),
                source,
            }),
    }
}

/// Serialize and write a document as one complete replacement.
pub async fn write_doc<T: Serialize>(
    store: &dyn StateStore,
    key: &str,
    doc: &T,
) -> Result<(), StoreError> {
    let value = serde_json::to_value(doc).map_err(|source| StoreError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    store.put(key, value).await
}

//! # In-Memory Store
//!
//! Thread-safe, cloneable map-backed implementation of the storage
//! port. Used by tests and single-node deployments.
//!
//! The lock is `parking_lot`, not `tokio::sync`, because it is never
//! held across an `.await` point; a panicking writer does not poison it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::{StateStore, StoreError};

/// Map-backed [`StateStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<HashMap<String, Value>>>,
}

impl Clone for MemoryStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Value) -> Result<(), StoreError> {
        tracing::trace!(key, "put");
        self.data.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.data.write().remove(key);
        Ok(())
    }
}

//! Binary object storage for rendered case documents.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

/// Lifetime of a signed download link, in seconds.
pub const SIGNED_URL_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object already exists at {0}")]
    KeyExists(String),
    #[error("object not found at {0}")]
    NotFound(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Append-only blob store. Issuance keys are timestamp-qualified, so an
/// overwrite signals a caller bug rather than a retry.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`. Fails if the key is already present.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError>;

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Produce a time-limited download URL for an existing object.
    async fn signed_url(&self, key: &str, ttl_secs: u64) -> Result<String, StorageError>;
}

/// In-process store backing the default deployment and tests.
#[derive(Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), StorageError> {
        let mut objects = self.objects.write().await;
        if objects.contains_key(key) {
            return Err(StorageError::KeyExists(key.to_string()));
        }
        objects.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn signed_url(&self, key: &str, ttl_secs: u64) -> Result<String, StorageError> {
        let objects = self.objects.read().await;
        if !objects.contains_key(key) {
            return Err(StorageError::NotFound(key.to_string()));
        }
        Ok(format!(
            "memory://case-documents/{}?expires_in={}",
            key, ttl_secs
        ))
    }
}

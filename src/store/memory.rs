use super::{StoreError, SubscriptionStore};
use crate::subscription::{encode_subscriptions, SubscriptionSet};
use async_trait::async_trait;

/// In-process store holding the blob in memory.
///
/// Counts upserts so callers can tell whether a run wrote anything.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    blob: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored bytes, valid JSON or not.
    pub fn with_blob(blob: Vec<u8>) -> Self {
        Self {
            blob: Some(blob),
            writes: 0,
        }
    }

    pub fn with_subscriptions(set: &SubscriptionSet) -> Result<Self, StoreError> {
        let blob = encode_subscriptions(set).map_err(StoreError::Encode)?;
        Ok(Self::with_blob(blob))
    }

    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    /// Number of upserts performed against this store
    pub fn writes(&self) -> usize {
        self.writes
    }
}

#[async_trait]
impl SubscriptionStore for MemoryStore {
    async fn load_blob(&mut self) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.blob.clone())
    }

    async fn upsert_blob(&mut self, blob: &[u8]) -> Result<u64, StoreError> {
        self.blob = Some(blob.to_vec());
        self.writes += 1;
        Ok(1)
    }
}

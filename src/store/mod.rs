//! Persistence of the subscription blob.
//!
//! The blob lives in one row of a generic key-value table. Backends only
//! move opaque bytes in and out through [`SubscriptionStore`]; decoding,
//! encoding and the row-count check live here so every backend shares
//! them.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::subscription::{decode_subscriptions, encode_subscriptions, SubscriptionSet};
use crate::utils::compute_hash;
use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Expected at most one stored subscription row, found {0}")]
    DataIntegrity(usize),

    #[error("Failed to decode stored subscriptions: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Failed to encode subscriptions: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Minimal capability a storage backend has to provide.
#[async_trait]
pub trait SubscriptionStore: Send {
    /// Fetch the stored blob, or `None` if no row exists yet.
    async fn load_blob(&mut self) -> Result<Option<Vec<u8>>, StoreError>;

    /// Insert or replace the stored blob in one atomic statement.
    ///
    /// Returns the number of rows affected.
    async fn upsert_blob(&mut self, blob: &[u8]) -> Result<u64, StoreError>;
}

/// Load the currently persisted subscription set.
///
/// A missing row is the first-run case and yields an empty set.
pub async fn load_subscriptions<S>(store: &mut S) -> Result<SubscriptionSet, StoreError>
where
    S: SubscriptionStore + ?Sized,
{
    let Some(blob) = store.load_blob().await? else {
        info!("No stored subscriptions yet, starting from an empty set");
        return Ok(SubscriptionSet::new());
    };

    debug!(bytes = blob.len(), digest = %compute_hash(&blob), "Loaded stored blob");
    decode_subscriptions(&blob).map_err(StoreError::Decode)
}

/// Serialize `set` and persist it as the sole stored row.
pub async fn write_subscriptions<S>(store: &mut S, set: &SubscriptionSet) -> Result<u64, StoreError>
where
    S: SubscriptionStore + ?Sized,
{
    let blob = encode_subscriptions(set).map_err(StoreError::Encode)?;
    let rows_affected = store.upsert_blob(&blob).await?;

    info!(
        subscriptions = set.len(),
        bytes = blob.len(),
        digest = %compute_hash(&blob),
        rows_affected,
        "Wrote subscriptions"
    );
    Ok(rows_affected)
}

/// Reduce a query result to at most one row.
pub(crate) fn single_row<T>(mut rows: Vec<T>) -> Result<Option<T>, StoreError> {
    match rows.len() {
        0 | 1 => Ok(rows.pop()),
        n => Err(StoreError::DataIntegrity(n)),
    }
}

#![allow(dead_code)]

use async_trait::async_trait;
use rssfeed_sync::config::{ReconcilePolicy, SyncConfig};
use rssfeed_sync::store::{StoreError, SubscriptionStore};
use std::path::Path;
use tempfile::TempDir;
use tokio::fs;

pub const CHANNEL: &str = "chan1";

/// Create a temporary directory for a test
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Should create temp dir")
}

/// Write `content` as the feed list inside `dir` and return a config pointing at it
pub async fn write_feed_list(dir: &Path, content: &str, policy: ReconcilePolicy) -> SyncConfig {
    let feed_file = dir.join("feeds.txt");
    fs::write(&feed_file, content)
        .await
        .expect("Should write feed list");

    SyncConfig {
        feed_file,
        channel_id: CHANNEL.to_string(),
        policy,
        dry_run: false,
    }
}

/// Store whose every operation fails, for error propagation tests
pub struct BrokenStore;

#[async_trait]
impl SubscriptionStore for BrokenStore {
    async fn load_blob(&mut self) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }

    async fn upsert_blob(&mut self, _blob: &[u8]) -> Result<u64, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

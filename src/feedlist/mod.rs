//! Loading the declarative feed list.
//!
//! The file holds one feed URL per line. Lines starting with `"# "` are
//! comments and empty lines are skipped wherever they appear; everything
//! else is taken verbatim as a URL.

use crate::subscription::{Subscription, SubscriptionSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Prefix marking a commented-out feed
pub const COMMENT_PREFIX: &str = "# ";

#[derive(Error, Debug)]
pub enum FeedListError {
    #[error("Failed to read feed list {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read the feed list at `path` and build the subscriptions it declares for `channel_id`.
pub async fn load_feed_list(path: &Path, channel_id: &str) -> Result<SubscriptionSet, FeedListError> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|source| FeedListError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let set = parse_feed_list(&content, channel_id);
    debug!(path = %path.display(), feeds = set.len(), "Loaded feed list");

    if set.is_empty() {
        warn!(path = %path.display(), "Feed list declares no feeds");
    }

    Ok(set)
}

/// Parse feed list content into a subscription set.
pub fn parse_feed_list(content: &str, channel_id: &str) -> SubscriptionSet {
    content
        .split('\n')
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
        .map(|url| Subscription::new(channel_id, url))
        .collect()
}

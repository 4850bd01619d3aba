//! Subscription records and the JSON document they are stored in.
//!
//! The document layout is shared with the Mattermost RSS feed plugin, so
//! field names follow the plugin's spelling (`Subscriptions`, `ChannelID`,
//! `URL`, `XMLInfo`) rather than Rust conventions.

mod types;

pub use types::{subscription_key, Subscription, SubscriptionSet, XmlFeedMeta};

/// Decode a stored blob.
///
/// A top-level `null` document decodes to an empty set.
pub fn decode_subscriptions(bytes: &[u8]) -> Result<SubscriptionSet, serde_json::Error> {
    let decoded: Option<SubscriptionSet> = serde_json::from_slice(bytes)?;
    Ok(decoded.unwrap_or_default())
}

/// Encode a set into the blob written back to storage.
pub fn encode_subscriptions(set: &SubscriptionSet) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(set)
}

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Feed metadata snapshot kept by the plugin next to a subscription.
///
/// This tool never fills it in, but it is carried through untouched so a
/// rewrite of the stored blob does not lose what the plugin recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlFeedMeta {
    #[serde(rename = "ID", alias = "id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(rename = "Title", alias = "title", default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(rename = "GUID", alias = "guid", default, skip_serializing_if = "String::is_empty")]
    pub guid: String,

    #[serde(rename = "PubDate", alias = "pubDate", default, skip_serializing_if = "String::is_empty")]
    pub pub_date: String,
}

/// One watched feed delivered to one channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Destination channel identifier
    #[serde(rename = "ChannelID", alias = "channelID", alias = "channelId")]
    pub channel_id: String,

    /// Feed URL, exactly as declared
    #[serde(rename = "URL", alias = "url")]
    pub url: String,

    /// Serialized as `null` when absent, matching what the plugin writes
    #[serde(rename = "XMLInfo", alias = "xmlFeedMeta", default)]
    pub xml_info: Option<XmlFeedMeta>,
}

impl Subscription {
    pub fn new(channel_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            url: url.into(),
            xml_info: None,
        }
    }

    /// The map key this subscription is stored under.
    pub fn key(&self) -> String {
        subscription_key(&self.channel_id, &self.url)
    }
}

/// Build the synthetic key `<channel>/<url>`.
///
/// For a fixed channel the key is injective in the URL, so two keys are
/// equal exactly when both the channel and the URL are.
pub fn subscription_key(channel_id: &str, url: &str) -> String {
    format!("{channel_id}/{url}")
}

/// The whole subscription document stored as a single blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionSet {
    /// Map of `<channel>/<url>` -> Subscription
    #[serde(
        rename = "Subscriptions",
        alias = "subscriptions",
        default,
        deserialize_with = "null_as_empty"
    )]
    pub subscriptions: BTreeMap<String, Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.subscriptions.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Subscription> {
        self.subscriptions.get(key)
    }

    /// Insert a subscription under its own key, returning any entry it replaced.
    pub fn insert(&mut self, subscription: Subscription) -> Option<Subscription> {
        self.subscriptions.insert(subscription.key(), subscription)
    }

    /// Insert under an explicit key. Stored blobs are trusted to carry their own keys.
    pub fn insert_with_key(&mut self, key: String, subscription: Subscription) -> Option<Subscription> {
        self.subscriptions.insert(key, subscription)
    }

    pub fn remove(&mut self, key: &str) -> Option<Subscription> {
        self.subscriptions.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Subscription)> {
        self.subscriptions.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.subscriptions.keys()
    }
}

impl FromIterator<Subscription> for SubscriptionSet {
    fn from_iter<I: IntoIterator<Item = Subscription>>(iter: I) -> Self {
        let mut set = SubscriptionSet::new();
        for subscription in iter {
            set.insert(subscription);
        }
        set
    }
}

/// The plugin may persist a nil map, which arrives as `null`.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Subscription>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<BTreeMap<String, Subscription>>::deserialize(deserializer)
        .map(Option::unwrap_or_default)
}

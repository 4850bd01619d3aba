pub mod config;
pub mod feedlist;
pub mod logging;
pub mod reconciliation;
pub mod store;
pub mod subscription;
pub mod utils;

// Re-export commonly used types
pub use config::{ConfigError, DatabaseConfig, ReconcilePolicy, StorageKey, SyncConfig};
pub use feedlist::{load_feed_list, parse_feed_list, FeedListError};
pub use reconciliation::{
    build_reconciliation_plan, execute_reconciliation, sync_feed_list, ExecuteError,
    ReconciliationOptions, ReconciliationPlan, ReconciliationResult,
};
pub use store::{
    load_subscriptions, write_subscriptions, MemoryStore, PostgresStore, StoreError,
    SubscriptionStore,
};
pub use subscription::{
    decode_subscriptions, encode_subscriptions, subscription_key, Subscription, SubscriptionSet,
    XmlFeedMeta,
};

mod common;

use common::{create_test_dir, write_feed_list, BrokenStore, CHANNEL};
use rssfeed_sync::config::ReconcilePolicy;
use rssfeed_sync::reconciliation::{sync_feed_list, ExecuteError};
use rssfeed_sync::store::{load_subscriptions, MemoryStore, StoreError};
use rssfeed_sync::subscription::{decode_subscriptions, Subscription, SubscriptionSet, XmlFeedMeta};
use rssfeed_sync::FeedListError;

const TWO_FEEDS: &str = "http://a.example/feed\nhttp://b.example/feed\n";

async fn stored(store: &mut MemoryStore) -> SubscriptionSet {
    load_subscriptions(store).await.expect("Should load stored set")
}

#[tokio::test]
async fn test_first_run_adds_all_feeds() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    let mut store = MemoryStore::new();

    let result = sync_feed_list(&mut store, &config).await.expect("Should sync");

    assert_eq!(result.added.len(), 2);
    assert!(result.removed.is_empty());
    assert_eq!(result.rows_affected, Some(1));
    assert_eq!(store.writes(), 1);

    let keys: Vec<String> = stored(&mut store).await.keys().cloned().collect();
    assert_eq!(
        keys,
        vec!["chan1/http://a.example/feed", "chan1/http://b.example/feed"]
    );
    assert_eq!(result.report_lines().last().unwrap(), "1 rows affected");
}

#[tokio::test]
async fn test_second_run_is_in_sync() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    let mut store = MemoryStore::new();

    let first = sync_feed_list(&mut store, &config).await.expect("First sync");
    let second = sync_feed_list(&mut store, &config).await.expect("Second sync");

    assert!(second.in_sync());
    assert_eq!(second.rows_affected, None);
    assert_eq!(second.subscriptions, first.subscriptions);
    assert_eq!(store.writes(), 1, "Second run must not write");
    assert_eq!(second.report_lines(), vec!["remote in sync with feed list"]);
}

#[tokio::test]
async fn test_removed_line_is_pruned() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    let mut store = MemoryStore::new();
    sync_feed_list(&mut store, &config).await.expect("First sync");
    let before = stored(&mut store).await;

    let config = write_feed_list(
        temp_dir.path(),
        "http://a.example/feed\n# http://b.example/feed\n",
        ReconcilePolicy::Prune,
    )
    .await;
    let result = sync_feed_list(&mut store, &config).await.expect("Second sync");

    let mut expected = before.clone();
    expected.remove("chan1/http://b.example/feed");

    assert_eq!(result.removed.len(), 1);
    assert_eq!(result.removed[0].url, "http://b.example/feed");
    assert_eq!(stored(&mut store).await, expected);
    assert_eq!(
        result.report_lines(),
        vec!["-\thttp://b.example/feed", "1 rows affected"]
    );
}

#[tokio::test]
async fn test_added_line_adds_exactly_one_key() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    let mut store = MemoryStore::new();
    sync_feed_list(&mut store, &config).await.expect("First sync");
    let before = stored(&mut store).await;

    let config = write_feed_list(
        temp_dir.path(),
        &format!("{TWO_FEEDS}http://c.example/feed\n"),
        ReconcilePolicy::Prune,
    )
    .await;
    let result = sync_feed_list(&mut store, &config).await.expect("Second sync");

    let mut expected = before.clone();
    expected.insert(Subscription::new(CHANNEL, "http://c.example/feed"));

    assert_eq!(result.added.len(), 1);
    assert_eq!(stored(&mut store).await, expected);
}

#[tokio::test]
async fn test_extra_stored_key_is_removed() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;

    let remote: SubscriptionSet = [
        Subscription::new(CHANNEL, "http://a.example/feed"),
        Subscription::new(CHANNEL, "http://b.example/feed"),
        Subscription::new(CHANNEL, "http://extra.example/feed"),
    ]
    .into_iter()
    .collect();
    let mut store = MemoryStore::with_subscriptions(&remote).expect("Should seed store");

    let result = sync_feed_list(&mut store, &config).await.expect("Should sync");

    assert_eq!(result.removed.len(), 1);
    assert!(result.added.is_empty());
    assert_eq!(store.writes(), 1);
    assert!(!stored(&mut store)
        .await
        .contains_key("chan1/http://extra.example/feed"));
}

#[tokio::test]
async fn test_one_for_one_swap_is_written() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(
        temp_dir.path(),
        "http://a.example/feed\nhttp://c.example/feed\n",
        ReconcilePolicy::Prune,
    )
    .await;

    let remote: SubscriptionSet = [
        Subscription::new(CHANNEL, "http://a.example/feed"),
        Subscription::new(CHANNEL, "http://b.example/feed"),
    ]
    .into_iter()
    .collect();
    let mut store = MemoryStore::with_subscriptions(&remote).expect("Should seed store");

    let result = sync_feed_list(&mut store, &config).await.expect("Should sync");

    assert!(result.changed);
    assert_eq!(result.subscriptions.len(), remote.len());
    assert_eq!(store.writes(), 1);
}

#[tokio::test]
async fn test_additive_policy_keeps_undeclared_feeds() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(
        temp_dir.path(),
        "http://a.example/feed\n",
        ReconcilePolicy::Additive,
    )
    .await;

    let remote: SubscriptionSet = [Subscription::new(CHANNEL, "http://old.example/feed")]
        .into_iter()
        .collect();
    let mut store = MemoryStore::with_subscriptions(&remote).expect("Should seed store");

    let result = sync_feed_list(&mut store, &config).await.expect("Should sync");

    assert!(result.removed.is_empty());
    assert_eq!(result.added.len(), 1);
    let after = stored(&mut store).await;
    assert_eq!(after.len(), 2);
    assert!(after.contains_key("chan1/http://old.example/feed"));
}

#[tokio::test]
async fn test_dry_run_does_not_write() {
    let temp_dir = create_test_dir();
    let mut config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    config.dry_run = true;
    let mut store = MemoryStore::new();

    let result = sync_feed_list(&mut store, &config).await.expect("Should sync");

    assert!(result.changed);
    assert_eq!(result.rows_affected, None);
    assert_eq!(store.writes(), 0);
    assert!(store.blob().is_none());
    assert_eq!(
        result.report_lines().last().unwrap(),
        "dry run: 2 to add, 0 to remove, nothing written"
    );
}

#[tokio::test]
async fn test_plugin_metadata_survives_rewrite() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;

    let blob = br#"{"Subscriptions":{"chan1/http://a.example/feed":{"ChannelID":"chan1","URL":"http://a.example/feed","XMLInfo":{"ID":"urn:a","Title":"A","GUID":"g-1","PubDate":"Tue, 10 Jun 2003 04:00:00 GMT"}}}}"#;
    let mut store = MemoryStore::with_blob(blob.to_vec());

    sync_feed_list(&mut store, &config).await.expect("Should sync");

    let after = decode_subscriptions(store.blob().unwrap()).expect("Should decode");
    let kept = after.get("chan1/http://a.example/feed").unwrap();
    assert_eq!(
        kept.xml_info,
        Some(XmlFeedMeta {
            id: "urn:a".to_string(),
            title: "A".to_string(),
            guid: "g-1".to_string(),
            pub_date: "Tue, 10 Jun 2003 04:00:00 GMT".to_string(),
        })
    );
    assert!(after.contains_key("chan1/http://b.example/feed"));
}

#[tokio::test]
async fn test_missing_feed_list_fails_without_write() {
    let temp_dir = create_test_dir();
    let config = rssfeed_sync::SyncConfig {
        feed_file: temp_dir.path().join("missing.txt"),
        channel_id: CHANNEL.to_string(),
        policy: ReconcilePolicy::Prune,
        dry_run: false,
    };
    let mut store = MemoryStore::new();

    let result = sync_feed_list(&mut store, &config).await;

    assert!(matches!(
        result,
        Err(ExecuteError::FeedList(FeedListError::Read { .. }))
    ));
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_malformed_stored_blob_is_decode_error() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;
    let mut store = MemoryStore::with_blob(b"{\"Subscriptions\": [".to_vec());

    let result = sync_feed_list(&mut store, &config).await;

    assert!(matches!(
        result,
        Err(ExecuteError::Store(StoreError::Decode(_)))
    ));
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn test_storage_failure_propagates() {
    let temp_dir = create_test_dir();
    let config = write_feed_list(temp_dir.path(), TWO_FEEDS, ReconcilePolicy::Prune).await;

    let result = sync_feed_list(&mut BrokenStore, &config).await;

    assert!(matches!(
        result,
        Err(ExecuteError::Store(StoreError::Database(_)))
    ));
}

use super::plan::build_reconciliation_plan;
use crate::config::{ReconcilePolicy, SyncConfig};
use crate::feedlist::{load_feed_list, FeedListError};
use crate::store::{load_subscriptions, write_subscriptions, StoreError, SubscriptionStore};
use crate::subscription::{Subscription, SubscriptionSet};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ExecuteError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Feed list error: {0}")]
    FeedList(#[from] FeedListError),
}

/// Options for one reconciliation run
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconciliationOptions {
    pub policy: ReconcilePolicy,
    /// Plan and report without writing
    pub dry_run: bool,
}

impl From<&SyncConfig> for ReconciliationOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            policy: config.policy,
            dry_run: config.dry_run,
        }
    }
}

/// Result of reconciliation execution
#[derive(Debug, Clone, Default)]
pub struct ReconciliationResult {
    pub added: Vec<Subscription>,
    pub removed: Vec<Subscription>,
    /// Whether the new set differs from the stored one
    pub changed: bool,
    /// Rows affected by the write, `None` when nothing was written
    pub rows_affected: Option<u64>,
    /// The set that is (or, in a dry run, would be) stored after the run
    pub subscriptions: SubscriptionSet,
}

impl ReconciliationResult {
    pub fn in_sync(&self) -> bool {
        !self.changed
    }

    /// Human-readable change report: one `-`/`+` line per feed, then a summary.
    pub fn report_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .removed
            .iter()
            .map(|s| format!("-\t{}", s.url))
            .chain(self.added.iter().map(|s| format!("+\t{}", s.url)))
            .collect();

        let summary = match self.rows_affected {
            Some(rows) => format!("{rows} rows affected"),
            None if self.in_sync() => "remote in sync with feed list".to_string(),
            None => format!(
                "dry run: {} to add, {} to remove, nothing written",
                self.added.len(),
                self.removed.len()
            ),
        };
        lines.push(summary);
        lines
    }
}

/// Reconcile `local` against whatever `store` currently holds.
///
/// The stored blob is replaced as a whole, and only when the merged set is
/// not exactly equal to the stored one.
pub async fn execute_reconciliation<S>(
    store: &mut S,
    local: &SubscriptionSet,
    options: ReconciliationOptions,
) -> Result<ReconciliationResult, ExecuteError>
where
    S: SubscriptionStore + ?Sized,
{
    let remote = load_subscriptions(store).await?;
    info!(
        stored = remote.len(),
        declared = local.len(),
        policy = %options.policy,
        "Reconciling subscriptions"
    );

    let plan = build_reconciliation_plan(local, &remote, options.policy);
    let updated = plan.apply(&remote);
    let changed = updated != remote;

    for change in &plan.to_add {
        debug!(key = %change.key, "Adding subscription");
    }
    for change in &plan.to_remove {
        debug!(key = %change.key, "Removing subscription");
    }

    let rows_affected = if !changed {
        info!("Stored subscriptions already match the feed list");
        None
    } else if options.dry_run {
        info!(
            added = plan.to_add.len(),
            removed = plan.to_remove.len(),
            "Dry run, not writing"
        );
        None
    } else {
        Some(write_subscriptions(store, &updated).await?)
    };

    Ok(ReconciliationResult {
        added: plan.to_add.into_iter().map(|c| c.subscription).collect(),
        removed: plan.to_remove.into_iter().map(|c| c.subscription).collect(),
        changed,
        rows_affected,
        subscriptions: updated,
    })
}

/// Load the feed list named by `config` and reconcile it against `store`.
pub async fn sync_feed_list<S>(
    store: &mut S,
    config: &SyncConfig,
) -> Result<ReconciliationResult, ExecuteError>
where
    S: SubscriptionStore + ?Sized,
{
    let local = load_feed_list(&config.feed_file, &config.channel_id).await?;
    execute_reconciliation(store, &local, ReconciliationOptions::from(config)).await
}

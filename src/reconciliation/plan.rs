use crate::config::ReconcilePolicy;
use crate::subscription::{Subscription, SubscriptionSet};

/// A subscription the plan adds or removes, with the key it lives under
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedChange {
    pub key: String,
    pub subscription: Subscription,
}

/// The reconciliation plan
#[derive(Debug, Clone, Default)]
pub struct ReconciliationPlan {
    /// Declared locally but not stored yet
    pub to_add: Vec<PlannedChange>,

    /// Stored but no longer declared (only under the prune policy)
    pub to_remove: Vec<PlannedChange>,

    /// Stored keys carried over untouched
    pub unchanged: Vec<String>,
}

impl ReconciliationPlan {
    /// Check if applying the plan changes anything
    pub fn has_changes(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }

    /// Produce the new stored set from the current one.
    ///
    /// Entries that are kept are copied as stored, metadata included.
    pub fn apply(&self, remote: &SubscriptionSet) -> SubscriptionSet {
        let mut updated = remote.clone();

        for change in &self.to_remove {
            updated.remove(&change.key);
        }
        for change in &self.to_add {
            updated.insert_with_key(change.key.clone(), change.subscription.clone());
        }

        updated
    }
}

/// Diff the locally declared set against the stored one.
///
/// A key encodes both channel and URL, so two entries with the same key
/// always carry the same URL and presence is the only thing compared.
pub fn build_reconciliation_plan(
    local: &SubscriptionSet,
    remote: &SubscriptionSet,
    policy: ReconcilePolicy,
) -> ReconciliationPlan {
    let mut plan = ReconciliationPlan::default();

    for (key, subscription) in remote.iter() {
        if local.contains_key(key) || policy == ReconcilePolicy::Additive {
            plan.unchanged.push(key.clone());
        } else {
            plan.to_remove.push(PlannedChange {
                key: key.clone(),
                subscription: subscription.clone(),
            });
        }
    }

    for (key, subscription) in local.iter() {
        if !remote.contains_key(key) {
            plan.to_add.push(PlannedChange {
                key: key.clone(),
                subscription: subscription.clone(),
            });
        }
    }

    plan
}

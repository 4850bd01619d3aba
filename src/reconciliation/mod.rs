//! Reconciling the declared feed list with the stored subscriptions.
//!
//! Planning is pure: [`build_reconciliation_plan`] diffs two sets under a
//! [`ReconcilePolicy`](crate::config::ReconcilePolicy). Execution loads the
//! stored set, plans, and writes the result back only when it differs.

mod execute;
mod plan;

pub use execute::{
    execute_reconciliation, sync_feed_list, ExecuteError, ReconciliationOptions,
    ReconciliationResult,
};
pub use plan::{build_reconciliation_plan, PlannedChange, ReconciliationPlan};

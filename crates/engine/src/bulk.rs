//! Bulk transition coordination.
//!
//! Applies one target status to a list of orders sequentially, never as a
//! parallel fan-out. Per-item failures are recorded and iteration continues;
//! there is no all-or-nothing semantics and no cross-order locking.

use serde::Serialize;
use tracing::{info, warn};

use orderflow_orders::{OrderId, OrderStatus};

use crate::executor::{TransitionContext, TransitionExecutor};
use crate::retry::RetryPolicy;
use crate::store::{InventoryHistoryStore, OrderStore, ProductStore};

/// Aggregate of a bulk run, keeping per-item detail rather than collapsing to
/// counts immediately.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    pub successes: Vec<OrderId>,
    pub failures: Vec<(OrderId, String)>,
    /// Orders whose status changed but whose reconciliation needs a manual
    /// adjustment (soft failures; counted as successes).
    pub warnings: Vec<(OrderId, String)>,
}

impl BulkOutcome {
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// User-facing one-liner: "N orders updated, M failed".
    pub fn summary(&self) -> String {
        format!(
            "{} orders updated, {} failed",
            self.success_count(),
            self.failure_count()
        )
    }
}

/// Applies one target status to many orders through the executor + retry.
///
/// After a batch, the caller is responsible for invalidating any derived
/// views (order lists, inventory views, dashboard aggregates).
#[derive(Debug)]
pub struct BulkTransitionCoordinator<O, P, H> {
    executor: TransitionExecutor<O, P, H>,
    retry: RetryPolicy,
}

impl<O, P, H> BulkTransitionCoordinator<O, P, H>
where
    O: OrderStore,
    P: ProductStore,
    H: InventoryHistoryStore,
{
    pub fn new(executor: TransitionExecutor<O, P, H>, retry: RetryPolicy) -> Self {
        Self { executor, retry }
    }

    pub fn executor(&self) -> &TransitionExecutor<O, P, H> {
        &self.executor
    }

    /// Sequential fold over the id list; one failed id never aborts the batch.
    pub fn apply_to_many(
        &self,
        order_ids: &[OrderId],
        target: OrderStatus,
        ctx: &TransitionContext,
    ) -> BulkOutcome {
        let outcome = order_ids.iter().fold(
            BulkOutcome::default(),
            |mut outcome, &order_id| {
                let result =
                    self.executor
                        .transition_with_retry(order_id, target, ctx, &self.retry);
                if result.success {
                    outcome.successes.push(order_id);
                    if let Some(warning) = result.warning {
                        warn!(%order_id, warning = %warning, "bulk transition applied with warning");
                        outcome.warnings.push((order_id, warning));
                    }
                } else {
                    let reason = result.error.unwrap_or_else(|| "unknown error".to_owned());
                    warn!(%order_id, reason = %reason, "bulk transition item failed");
                    outcome.failures.push((order_id, reason));
                }
                outcome
            },
        );

        info!(
            target_status = %target,
            total = order_ids.len(),
            succeeded = outcome.success_count(),
            failed = outcome.failure_count(),
            "bulk transition finished"
        );
        outcome
    }
}

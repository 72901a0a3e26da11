//! Single-order transition orchestration.
//!
//! `TransitionExecutor` moves one order through one status change: re-read the
//! order under its tenant, consult the editability guard, persist the status
//! plus the implied milestone, then run the inventory side effects the target
//! status implies. The status write is authoritative; side-effect failures are
//! downgraded to a soft warning, never rolled back.

use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, info, warn};

use orderflow_core::{TenantId, UserId};
use orderflow_inventory::{InventoryHistoryEntry, ReferenceType};
use orderflow_orders::{status, Order, OrderId, OrderStatus};

use crate::audit::AuditLogWriter;
use crate::retry::{RetryPolicy, Transient};
use crate::store::{InventoryHistoryStore, OrderStore, ProductStore, StatusUpdate, StoreError};
use crate::sync::{InventorySynchronizer, StockAdjustment};

/// Per-call context. The tenant id is always explicit; the engine carries no
/// ambient tenant state.
#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub tenant_id: TenantId,
    pub performed_by: UserId,
    /// Required when the target status is `cancelled`.
    pub cancellation_reason: Option<String>,
}

impl TransitionContext {
    pub fn new(tenant_id: TenantId, performed_by: UserId) -> Self {
        Self {
            tenant_id,
            performed_by,
            cancellation_reason: None,
        }
    }

    pub fn with_cancellation_reason(mut self, reason: impl Into<String>) -> Self {
        self.cancellation_reason = Some(reason.into());
        self
    }
}

/// Why a transition attempt did not apply.
#[derive(Debug, Error)]
pub enum TransitionError {
    /// Disallowed by the guard or missing required input. Deterministic;
    /// never retried, nothing was written.
    #[error("{reason}")]
    Rejected {
        current: OrderStatus,
        reason: String,
    },

    /// No such order under the given tenant. Fails closed: a colliding id
    /// belonging to another tenant looks exactly like a missing order.
    #[error("order not found for this tenant")]
    NotFound,

    /// The persistence layer failed; transient store errors are retryable.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Transient for TransitionError {
    fn is_transient(&self) -> bool {
        matches!(self, TransitionError::Store(e) if e.is_transient())
    }
}

/// Structured outcome of one transition call. Synchronous return value, not
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitionResult {
    pub order_id: OrderId,
    /// Resulting status on success; the order's current status on a guard
    /// rejection; `None` when the order could not be read at all.
    pub status: Option<OrderStatus>,
    pub success: bool,
    pub error: Option<String>,
    /// Soft failure: the status was updated but reconciliation needs a
    /// manual adjustment.
    pub warning: Option<String>,
}

impl TransitionResult {
    fn applied(order_id: OrderId, new_status: OrderStatus, warning: Option<String>) -> Self {
        Self {
            order_id,
            status: Some(new_status),
            success: true,
            error: None,
            warning,
        }
    }

    fn failed(order_id: OrderId, status: Option<OrderStatus>, error: String) -> Self {
        Self {
            order_id,
            status,
            success: false,
            error: Some(error),
            warning: None,
        }
    }
}

const RECONCILE_WARNING: &str =
    "status updated but inventory reconciliation failed; adjust manually";

/// Orchestrates one order's status change against the persistence boundary.
#[derive(Debug)]
pub struct TransitionExecutor<O, P, H> {
    orders: O,
    inventory: InventorySynchronizer<P>,
    audit: AuditLogWriter<H>,
}

impl<O, P, H> TransitionExecutor<O, P, H>
where
    O: OrderStore,
    P: ProductStore,
    H: InventoryHistoryStore,
{
    pub fn new(orders: O, products: P, history: H) -> Self {
        Self {
            orders,
            inventory: InventorySynchronizer::new(products),
            audit: AuditLogWriter::new(history),
        }
    }

    /// One transition attempt, returned as a structured result.
    pub fn transition(
        &self,
        order_id: OrderId,
        target: OrderStatus,
        ctx: &TransitionContext,
    ) -> TransitionResult {
        self.finish(order_id, self.try_transition(order_id, target, ctx))
    }

    /// Transition with bounded retry on transient store failures.
    pub fn transition_with_retry(
        &self,
        order_id: OrderId,
        target: OrderStatus,
        ctx: &TransitionContext,
        policy: &RetryPolicy,
    ) -> TransitionResult {
        self.finish(
            order_id,
            policy.run(|| self.try_transition(order_id, target, ctx)),
        )
    }

    fn finish(
        &self,
        order_id: OrderId,
        outcome: Result<TransitionResult, TransitionError>,
    ) -> TransitionResult {
        match outcome {
            Ok(result) => result,
            Err(TransitionError::Rejected { current, reason }) => {
                TransitionResult::failed(order_id, Some(current), reason)
            }
            Err(e) => TransitionResult::failed(order_id, None, e.to_string()),
        }
    }

    /// The transition pipeline proper. Errors out before any write on guard
    /// refusals; after the status write, failures are soft (worked into the
    /// result as a warning, never an `Err`).
    pub fn try_transition(
        &self,
        order_id: OrderId,
        target: OrderStatus,
        ctx: &TransitionContext,
    ) -> Result<TransitionResult, TransitionError> {
        // Re-read scoped to tenant; defense against stale caller state and
        // the cross-tenant write path.
        let order = self
            .orders
            .get(ctx.tenant_id, order_id)?
            .ok_or(TransitionError::NotFound)?;
        let current = order.status();

        // Already there: successful no-op, side effects must not re-apply.
        if current == target {
            debug!(%order_id, status = %target, "order already in target status");
            return Ok(TransitionResult::applied(order_id, target, None));
        }

        if let Some(restriction) = status::edit_restriction(current) {
            return Err(TransitionError::Rejected {
                current,
                reason: restriction.to_owned(),
            });
        }
        if !status::can_transition(order.kind(), current, target) {
            return Err(TransitionError::Rejected {
                current,
                reason: format!(
                    "cannot move a {} order from {current} to {target}",
                    order.kind()
                ),
            });
        }

        let cancellation_reason = if target == OrderStatus::Cancelled {
            let reason = ctx
                .cancellation_reason
                .as_deref()
                .map(str::trim)
                .unwrap_or_default();
            if reason.is_empty() {
                return Err(TransitionError::Rejected {
                    current,
                    reason: "cancellation requires a reason".to_owned(),
                });
            }
            Some(reason.to_owned())
        } else {
            None
        };

        // Status write: happens-before all inventory side effects.
        let updated = self.orders.update_status(
            ctx.tenant_id,
            order_id,
            &StatusUpdate {
                target,
                at: Utc::now(),
                cancellation_reason,
            },
        )?;
        info!(
            %order_id,
            order_number = updated.order_number(),
            from = %current,
            to = %target,
            "order status updated"
        );

        let warning = if target == OrderStatus::Cancelled {
            self.reconcile(&updated, ReferenceType::OrderCancelled, StockAdjustment::Restore, ctx)
        } else if target.is_fulfillment() {
            self.reconcile(&updated, ReferenceType::OrderDelivered, StockAdjustment::Deduct, ctx)
        } else {
            None
        };

        Ok(TransitionResult::applied(order_id, target, warning))
    }

    /// Run the stock deltas + audit entries for one transition. The status is
    /// already externally visible, so failures here are soft: logged and
    /// reported as a warning, never rolled back.
    fn reconcile(
        &self,
        order: &Order,
        reference_type: ReferenceType,
        mode: StockAdjustment,
        ctx: &TransitionContext,
    ) -> Option<String> {
        match self.apply_side_effects(order, reference_type, mode, ctx) {
            Ok(()) => None,
            Err(e) => {
                warn!(
                    order_id = %order.id_typed(),
                    reference_type = %reference_type,
                    error = %e,
                    "inventory reconciliation failed after status write"
                );
                Some(RECONCILE_WARNING.to_owned())
            }
        }
    }

    fn apply_side_effects(
        &self,
        order: &Order,
        reference_type: ReferenceType,
        mode: StockAdjustment,
        ctx: &TransitionContext,
    ) -> Result<(), StoreError> {
        let order_id = order.id_typed();

        // Effectively-once: a replayed transition (at-least-once retry) finds
        // its own audit entries and skips the deltas.
        if self
            .audit
            .already_applied(ctx.tenant_id, reference_type, order_id.0)?
        {
            debug!(%order_id, reference_type = %reference_type, "reconciliation already recorded, skipping");
            return Ok(());
        }

        let reason = match reference_type {
            ReferenceType::OrderCancelled => order
                .cancellation_reason()
                .unwrap_or("order cancelled")
                .to_owned(),
            ReferenceType::OrderDelivered => "stock deducted on fulfillment".to_owned(),
        };

        for item in order.items() {
            let Some(change) = self.inventory.apply(
                ctx.tenant_id,
                item.product_id,
                item.quantity.magnitude(),
                mode,
            )?
            else {
                // Product deleted since the order was placed: skip the line.
                continue;
            };

            let entry = InventoryHistoryEntry::new(
                ctx.tenant_id,
                item.product_id,
                mode.change_type(),
                change.previous,
                change.new,
                reference_type,
                order_id.0,
                reason.clone(),
                ctx.performed_by,
                Utc::now(),
            )
            .with_metadata(json!({
                "order_number": order.order_number(),
                "order_status": order.status(),
            }));
            self.audit.record(entry)?;
        }

        Ok(())
    }
}

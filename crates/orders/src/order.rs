use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use orderflow_core::{DomainError, DomainResult, Entity, RecordId, TenantId, TenantScoped};
use orderflow_inventory::ProductId;

use crate::status::{self, Milestone, OrderKind, OrderStatus};

/// Order identifier (tenant-scoped via `tenant_id` on the record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub RecordId);

impl OrderId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Payment state, an independent axis from the fulfillment status.
///
/// The lifecycle engine reads it for display purposes only and never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Unpaid,
    Paid,
    Refunded,
}

/// Ordered quantity, unit-bearing per order family.
///
/// Sell-side lines are weight-based, buy-side lines are count-based. The
/// magnitude is what moves in and out of product stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantity {
    Weight { grams: i64 },
    Units { count: i64 },
}

impl Quantity {
    /// Unsigned stock-delta base for this line.
    pub fn magnitude(self) -> i64 {
        match self {
            Quantity::Weight { grams } => grams,
            Quantity::Units { count } => count,
        }
    }

    /// Whether this quantity's unit matches the order family.
    pub fn matches_kind(self, kind: OrderKind) -> bool {
        matches!(
            (self, kind),
            (Quantity::Weight { .. }, OrderKind::Sell) | (Quantity::Units { .. }, OrderKind::Buy)
        )
    }
}

/// Order line: product, quantity, unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// Price in smallest currency unit (e.g., cents).
    pub unit_price: u64,
}

/// Once-set timestamps recording when an order first entered each status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderMilestones {
    pub confirmed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub ordered_at: Option<DateTime<Utc>>,
    pub received_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl OrderMilestones {
    pub fn get(&self, milestone: Milestone) -> Option<DateTime<Utc>> {
        match milestone {
            Milestone::Confirmed => self.confirmed_at,
            Milestone::Shipped => self.shipped_at,
            Milestone::Delivered => self.delivered_at,
            Milestone::Ordered => self.ordered_at,
            Milestone::Received => self.received_at,
            Milestone::Cancelled => self.cancelled_at,
        }
    }

    /// Record a milestone if it has not been reached before.
    ///
    /// Returns `false` (and leaves the existing value untouched) when the
    /// milestone was already set; timestamps are written exactly once.
    pub fn record(&mut self, milestone: Milestone, at: DateTime<Utc>) -> bool {
        let slot = match milestone {
            Milestone::Confirmed => &mut self.confirmed_at,
            Milestone::Shipped => &mut self.shipped_at,
            Milestone::Delivered => &mut self.delivered_at,
            Milestone::Ordered => &mut self.ordered_at,
            Milestone::Received => &mut self.received_at,
            Milestone::Cancelled => &mut self.cancelled_at,
        };
        if slot.is_some() {
            return false;
        }
        *slot = Some(at);
        true
    }
}

/// An order record, either family.
///
/// The engine exclusively owns `status`, `milestones` and `cancellation_reason`
/// while a transition is in flight; monetary fields and `payment_status` are
/// owned by flows outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    tenant_id: TenantId,
    order_number: String,
    kind: OrderKind,
    status: OrderStatus,
    /// Total in smallest currency unit.
    total: u64,
    payment_status: PaymentStatus,
    items: Vec<OrderItem>,
    created_at: DateTime<Utc>,
    milestones: OrderMilestones,
    cancellation_reason: Option<String>,
}

impl Order {
    /// Create a new order in its family's initial status.
    ///
    /// Every line's quantity unit must match the family (weight for sell,
    /// count for buy) and be positive.
    pub fn new(
        id: OrderId,
        tenant_id: TenantId,
        order_number: impl Into<String>,
        kind: OrderKind,
        items: Vec<OrderItem>,
        total: u64,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        for item in &items {
            if !item.quantity.matches_kind(kind) {
                return Err(DomainError::validation(
                    "line quantity unit does not match order family",
                ));
            }
            if item.quantity.magnitude() <= 0 {
                return Err(DomainError::validation("line quantity must be positive"));
            }
        }

        Ok(Self {
            id,
            tenant_id,
            order_number: order_number.into(),
            kind,
            status: kind.initial_status(),
            total,
            payment_status: PaymentStatus::Unpaid,
            items,
            created_at,
            milestones: OrderMilestones::default(),
            cancellation_reason: None,
        })
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn order_number(&self) -> &str {
        &self.order_number
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn payment_status(&self) -> PaymentStatus {
        self.payment_status
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn milestones(&self) -> &OrderMilestones {
        &self.milestones
    }

    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    pub fn is_locked(&self) -> bool {
        status::edit_restriction(self.status).is_some()
    }

    /// Move the order into `target`, stamping the implied milestone on first entry.
    ///
    /// Enforces the transition graph (monotonic; terminal states are final) and
    /// requires a non-empty reason when entering `Cancelled`. `target` equal to
    /// the current status is a no-op. The milestone slot is written only if it
    /// was never set, so a replayed transition cannot move a timestamp.
    pub fn enter_status(
        &mut self,
        target: OrderStatus,
        at: DateTime<Utc>,
        cancellation_reason: Option<&str>,
    ) -> DomainResult<()> {
        if self.status == target {
            return Ok(());
        }
        if !status::can_transition(self.kind, self.status, target) {
            let msg = status::edit_restriction(self.status)
                .map(str::to_owned)
                .unwrap_or_else(|| {
                    format!("cannot move a {} order to {}", self.status, target)
                });
            return Err(DomainError::invariant(msg));
        }

        if target == OrderStatus::Cancelled {
            let reason = cancellation_reason.map(str::trim).unwrap_or_default();
            if reason.is_empty() {
                return Err(DomainError::validation(
                    "cancellation requires a reason",
                ));
            }
            self.cancellation_reason = Some(reason.to_owned());
        }

        if let Some(milestone) = target.milestone() {
            self.milestones.record(milestone, at);
        }
        self.status = target;
        Ok(())
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for Order {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

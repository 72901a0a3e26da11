//! Order status vocabulary, the legal-transition graph and the editability guard.
//!
//! The graph is a static table: per order family, each status lists its legal
//! successors. `cancelled` is reachable from every non-terminal state and is
//! final. Fulfillment states (`delivered`, `received`) are likewise terminal.

use serde::{Deserialize, Serialize};

/// Order family discriminant.
///
/// Sell-side orders are wholesale sales (weight-based quantities); buy-side
/// orders are purchase orders (count-based quantities). Each family has its
/// own status set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Sell,
    Buy,
}

impl OrderKind {
    /// Status a freshly created order of this family starts in.
    pub fn initial_status(self) -> OrderStatus {
        match self {
            OrderKind::Sell => OrderStatus::Pending,
            OrderKind::Buy => OrderStatus::Draft,
        }
    }
}

impl core::fmt::Display for OrderKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            OrderKind::Sell => "sell",
            OrderKind::Buy => "buy",
        })
    }
}

/// Order status lifecycle values, both families.
///
/// Sell-side: `pending`, `confirmed`, `in_transit`, `delivered`, `cancelled`.
/// Buy-side: `draft`, `ordered`, `received`, `cancelled`. These are the only
/// values ever written to an order's status field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    // Sell-side.
    Pending,
    Confirmed,
    InTransit,
    Delivered,
    // Buy-side.
    Draft,
    Ordered,
    Received,
    // Shared terminal.
    Cancelled,
}

impl OrderStatus {
    /// Wire/display name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Draft => "draft",
            OrderStatus::Ordered => "ordered",
            OrderStatus::Received => "received",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// True for statuses from which no further transition exists, in either family.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Received | OrderStatus::Cancelled
        )
    }

    /// True for the completion state of either family (triggers stock deduction).
    pub fn is_fulfillment(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Received)
    }

    /// Whether this status is part of the given family's lifecycle.
    pub fn belongs_to(self, kind: OrderKind) -> bool {
        match kind {
            OrderKind::Sell => matches!(
                self,
                OrderStatus::Pending
                    | OrderStatus::Confirmed
                    | OrderStatus::InTransit
                    | OrderStatus::Delivered
                    | OrderStatus::Cancelled
            ),
            OrderKind::Buy => matches!(
                self,
                OrderStatus::Draft
                    | OrderStatus::Ordered
                    | OrderStatus::Received
                    | OrderStatus::Cancelled
            ),
        }
    }

    /// Which once-set milestone timestamp entering this status implies, if any.
    pub fn milestone(self) -> Option<Milestone> {
        match self {
            OrderStatus::Confirmed => Some(Milestone::Confirmed),
            OrderStatus::InTransit => Some(Milestone::Shipped),
            OrderStatus::Delivered => Some(Milestone::Delivered),
            OrderStatus::Ordered => Some(Milestone::Ordered),
            OrderStatus::Received => Some(Milestone::Received),
            OrderStatus::Cancelled => Some(Milestone::Cancelled),
            OrderStatus::Pending | OrderStatus::Draft => None,
        }
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Milestone timestamps an order can reach, each recorded exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Milestone {
    Confirmed,
    Shipped,
    Delivered,
    Ordered,
    Received,
    Cancelled,
}

/// Legal successor statuses of `current` within the given family.
///
/// Terminal states and states outside the family have no successors.
pub fn successors(kind: OrderKind, current: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match (kind, current) {
        (OrderKind::Sell, Pending) => &[Confirmed, Cancelled],
        (OrderKind::Sell, Confirmed) => &[InTransit, Cancelled],
        (OrderKind::Sell, InTransit) => &[Delivered, Cancelled],
        (OrderKind::Buy, Draft) => &[Ordered, Cancelled],
        (OrderKind::Buy, Ordered) => &[Received, Cancelled],
        _ => &[],
    }
}

/// Membership check against the transition graph.
///
/// `current == target` is permitted (callers treat it as "already there", not
/// as a new transition); otherwise `target` must be a listed successor of
/// `current` and belong to the order's family.
pub fn can_transition(kind: OrderKind, current: OrderStatus, target: OrderStatus) -> bool {
    if !target.belongs_to(kind) {
        return false;
    }
    if current == target {
        return true;
    }
    successors(kind, current).contains(&target)
}

/// Human-readable reason a locked order refuses edits, `None` when editable.
///
/// Purely in-memory; never touches the store. Callers must consult this before
/// attempting any status write.
pub fn edit_restriction(current: OrderStatus) -> Option<&'static str> {
    match current {
        OrderStatus::Delivered => Some("Delivered orders cannot be modified"),
        OrderStatus::Received => Some("Received orders cannot be modified"),
        OrderStatus::Cancelled => Some("Cancelled orders cannot be modified"),
        _ => None,
    }
}

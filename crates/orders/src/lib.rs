//! Order domain module.
//!
//! This crate contains business rules for the order lifecycle, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage): the
//! order record for both families, the status transition graph and the
//! editability guard.

pub mod order;
pub mod status;

pub use order::{Order, OrderId, OrderItem, OrderMilestones, PaymentStatus, Quantity};
pub use status::{
    can_transition, edit_restriction, successors, Milestone, OrderKind, OrderStatus,
};

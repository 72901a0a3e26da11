//! Persistence boundary for the lifecycle engine.
//!
//! The engine consumes scoped CRUD over three record families (orders,
//! products and inventory history) through the traits in this module. Every
//! operation takes an explicit [`TenantId`]; implementations must refuse
//! cross-tenant access (absent rather than filtered after the fact), because
//! the tenant scope is a security boundary, not a convenience filter.
//!
//! ## Design principles
//!
//! - **No storage assumptions**: works with the in-memory implementations
//!   (tests/dev) and future SQL backends (production)
//! - **Tenant isolation**: enforced on both read and write operations
//! - **Typed failure classification**: [`StoreError::Unavailable`] marks
//!   transient infrastructure failures at the point the I/O call fails, so
//!   retry decisions never depend on error message text
//! - **Conditional writes**: stock and status updates are single
//!   read-modify-write operations under one guard, not separate read + blind
//!   write calls

mod memory;

pub use memory::{InMemoryHistoryStore, InMemoryOrderStore, InMemoryProductStore};

use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

use orderflow_core::{RecordId, TenantId};
use orderflow_inventory::{InventoryHistoryEntry, Product, ProductId, ReferenceType, StockChange};
use orderflow_orders::{Order, OrderId, OrderStatus};

use crate::retry::Transient;

/// Store operation error.
///
/// Infrastructure failures (availability, backend faults) as opposed to the
/// domain errors raised by the orders/inventory crates.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or timed out. Transient:
    /// callers may retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The record does not exist under the given tenant scope.
    #[error("record not found for tenant")]
    NotFound,

    /// A conditional update was refused (the record changed concurrently, or
    /// the stored state no longer admits the write).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other backend failure (lock poisoned, serialization, permissions).
    /// Permanent: never retried.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn backend(msg: impl Into<String>) -> Self {
        Self::Backend(msg.into())
    }
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Status write applied by [`OrderStore::update_status`] in one conditional
/// update: the new status, the entry timestamp for the implied milestone
/// (written first-entry-only) and the cancellation reason when applicable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub target: OrderStatus,
    pub at: DateTime<Utc>,
    pub cancellation_reason: Option<String>,
}

/// Tenant-scoped order persistence.
pub trait OrderStore: Send + Sync {
    fn get(&self, tenant_id: TenantId, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    fn insert(&self, order: Order) -> Result<(), StoreError>;

    /// Apply a status transition to the stored order under one guard.
    ///
    /// The stored record is re-validated against the transition graph at write
    /// time (defense against a concurrent change between the caller's read and
    /// this write) and returned in its post-transition state.
    fn update_status(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, StoreError>;
}

/// Tenant-scoped product persistence.
pub trait ProductStore: Send + Sync {
    fn get(&self, tenant_id: TenantId, product_id: ProductId)
        -> Result<Option<Product>, StoreError>;

    fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Apply a signed, zero-floored stock delta as a single conditional
    /// update (read + clamp + write under one guard).
    ///
    /// Returns `Ok(None)` when the product does not exist under the tenant;
    /// callers treat a missing product as a skippable line, not a fault.
    fn apply_stock_delta(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Option<StockChange>, StoreError>;
}

/// Append-only inventory history persistence.
pub trait InventoryHistoryStore: Send + Sync {
    /// Pure insert; entries are never updated or deleted.
    fn append(&self, entry: InventoryHistoryEntry) -> Result<(), StoreError>;

    /// Entries recorded for one (reference_type, reference_id) pair, i.e. one
    /// order transition. Used as the effectively-once reconciliation marker.
    fn list_for_reference(
        &self,
        tenant_id: TenantId,
        reference_type: ReferenceType,
        reference_id: RecordId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError>;

    /// Full trail for one product (reporting/compliance reads).
    fn list_for_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn get(&self, tenant_id: TenantId, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(tenant_id, order_id)
    }

    fn insert(&self, order: Order) -> Result<(), StoreError> {
        (**self).insert(order)
    }

    fn update_status(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, StoreError> {
        (**self).update_status(tenant_id, order_id, update)
    }
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Product>, StoreError> {
        (**self).get(tenant_id, product_id)
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product)
    }

    fn apply_stock_delta(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Option<StockChange>, StoreError> {
        (**self).apply_stock_delta(tenant_id, product_id, delta)
    }
}

impl<S> InventoryHistoryStore for Arc<S>
where
    S: InventoryHistoryStore + ?Sized,
{
    fn append(&self, entry: InventoryHistoryEntry) -> Result<(), StoreError> {
        (**self).append(entry)
    }

    fn list_for_reference(
        &self,
        tenant_id: TenantId,
        reference_type: ReferenceType,
        reference_id: RecordId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError> {
        (**self).list_for_reference(tenant_id, reference_type, reference_id)
    }

    fn list_for_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError> {
        (**self).list_for_product(tenant_id, product_id)
    }
}

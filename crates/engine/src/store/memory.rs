//! In-memory store implementations.
//!
//! Intended for tests/dev. Rows are keyed by `(tenant_id, id)` so a colliding
//! record id under another tenant is a different row entirely.

use std::collections::HashMap;
use std::sync::RwLock;

use orderflow_core::{RecordId, TenantId, TenantScoped};
use orderflow_inventory::{InventoryHistoryEntry, Product, ProductId, ReferenceType, StockChange};
use orderflow_orders::{Order, OrderId};

use super::{InventoryHistoryStore, OrderStore, ProductStore, StatusUpdate, StoreError};

fn lock_poisoned<T>(_: T) -> StoreError {
    StoreError::backend("lock poisoned")
}

/// In-memory tenant-scoped order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    inner: RwLock<HashMap<(TenantId, OrderId), Order>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn get(&self, tenant_id: TenantId, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let map = self.inner.read().map_err(lock_poisoned)?;
        Ok(map.get(&(tenant_id, order_id)).cloned())
    }

    fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(lock_poisoned)?;
        map.insert((order.tenant_id(), order.id_typed()), order);
        Ok(())
    }

    fn update_status(
        &self,
        tenant_id: TenantId,
        order_id: OrderId,
        update: &StatusUpdate,
    ) -> Result<Order, StoreError> {
        let mut map = self.inner.write().map_err(lock_poisoned)?;
        let order = map
            .get_mut(&(tenant_id, order_id))
            .ok_or(StoreError::NotFound)?;

        // Re-validated at write time: the executor checks the guard first, so
        // a refusal here means the record changed between read and write.
        order
            .enter_status(
                update.target,
                update.at,
                update.cancellation_reason.as_deref(),
            )
            .map_err(|e| StoreError::conflict(e.to_string()))?;

        Ok(order.clone())
    }
}

/// In-memory tenant-scoped product store.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<HashMap<(TenantId, ProductId), Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Option<Product>, StoreError> {
        let map = self.inner.read().map_err(lock_poisoned)?;
        Ok(map.get(&(tenant_id, product_id)).cloned())
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(lock_poisoned)?;
        map.insert((product.tenant_id(), product.id_typed()), product);
        Ok(())
    }

    fn apply_stock_delta(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Option<StockChange>, StoreError> {
        let mut map = self.inner.write().map_err(lock_poisoned)?;
        // Read + clamp + write while the lock is held: one conditional update.
        Ok(map
            .get_mut(&(tenant_id, product_id))
            .map(|product| product.apply_stock_delta(delta)))
    }
}

/// In-memory append-only inventory history store.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<InventoryHistoryEntry>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryHistoryStore for InMemoryHistoryStore {
    fn append(&self, entry: InventoryHistoryEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write().map_err(lock_poisoned)?;
        entries.push(entry);
        Ok(())
    }

    fn list_for_reference(
        &self,
        tenant_id: TenantId,
        reference_type: ReferenceType,
        reference_id: RecordId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries
            .iter()
            .filter(|e| {
                e.tenant_id == tenant_id
                    && e.reference_type == reference_type
                    && e.reference_id == reference_id
            })
            .cloned()
            .collect())
    }

    fn list_for_product(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
    ) -> Result<Vec<InventoryHistoryEntry>, StoreError> {
        let entries = self.entries.read().map_err(lock_poisoned)?;
        Ok(entries
            .iter()
            .filter(|e| e.tenant_id == tenant_id && e.product_id == product_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderflow_orders::{OrderItem, OrderKind, OrderStatus, Quantity};

    fn seed_order(store: &InMemoryOrderStore, tenant_id: TenantId) -> OrderId {
        let order_id = OrderId::new(RecordId::new());
        let order = Order::new(
            order_id,
            tenant_id,
            "WS-1",
            OrderKind::Sell,
            vec![OrderItem {
                product_id: ProductId::new(RecordId::new()),
                quantity: Quantity::Weight { grams: 500 },
                unit_price: 100,
            }],
            500,
            Utc::now(),
        )
        .unwrap();
        store.insert(order).unwrap();
        order_id
    }

    #[test]
    fn get_is_tenant_scoped() {
        let store = InMemoryOrderStore::new();
        let tenant_a = TenantId::new();
        let tenant_b = TenantId::new();
        let order_id = seed_order(&store, tenant_a);

        assert!(store.get(tenant_a, order_id).unwrap().is_some());
        assert!(store.get(tenant_b, order_id).unwrap().is_none());
    }

    #[test]
    fn update_status_refuses_other_tenants() {
        let store = InMemoryOrderStore::new();
        let tenant_a = TenantId::new();
        let order_id = seed_order(&store, tenant_a);

        let update = StatusUpdate {
            target: OrderStatus::Confirmed,
            at: Utc::now(),
            cancellation_reason: None,
        };
        let err = store
            .update_status(TenantId::new(), order_id, &update)
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
        // The real row is untouched.
        let order = store.get(tenant_a, order_id).unwrap().unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
    }

    #[test]
    fn stock_delta_on_missing_product_returns_none() {
        let store = InMemoryProductStore::new();
        let change = store
            .apply_stock_delta(TenantId::new(), ProductId::new(RecordId::new()), 5)
            .unwrap();
        assert!(change.is_none());
    }

    #[test]
    fn history_reads_filter_by_tenant() {
        let store = InMemoryHistoryStore::new();
        let tenant_a = TenantId::new();
        let product_id = ProductId::new(RecordId::new());
        let reference_id = RecordId::new();

        let entry = InventoryHistoryEntry::new(
            tenant_a,
            product_id,
            orderflow_inventory::ChangeType::Return,
            10,
            15,
            ReferenceType::OrderCancelled,
            reference_id,
            "order cancelled",
            orderflow_core::UserId::new(),
            Utc::now(),
        );
        store.append(entry).unwrap();

        assert_eq!(
            store
                .list_for_reference(tenant_a, ReferenceType::OrderCancelled, reference_id)
                .unwrap()
                .len(),
            1
        );
        assert!(store
            .list_for_reference(TenantId::new(), ReferenceType::OrderCancelled, reference_id)
            .unwrap()
            .is_empty());
        assert!(store
            .list_for_product(TenantId::new(), product_id)
            .unwrap()
            .is_empty());
    }
}

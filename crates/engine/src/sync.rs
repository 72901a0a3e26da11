//! Inventory side-effect synchronizer.
//!
//! Applies stock-quantity deltas to product records as a side effect of
//! specific transitions: restore on cancellation, deduct (floored at zero) on
//! fulfillment. The store performs the clamp-and-write as one conditional
//! update; this type decides direction and magnitude.

use tracing::debug;

use orderflow_core::TenantId;
use orderflow_inventory::{ChangeType, ProductId, StockChange};

use crate::store::{ProductStore, StoreError};

/// Direction of a reconciliation delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// Quantity moves back into stock (cancellation).
    Restore,
    /// Quantity leaves stock, floored at zero (fulfillment).
    Deduct,
}

impl StockAdjustment {
    /// Signed delta for a line of the given magnitude.
    pub fn signed_delta(self, magnitude: i64) -> i64 {
        let magnitude = magnitude.abs();
        match self {
            StockAdjustment::Restore => magnitude,
            StockAdjustment::Deduct => -magnitude,
        }
    }

    /// Audit vocabulary for this direction.
    pub fn change_type(self) -> ChangeType {
        match self {
            StockAdjustment::Restore => ChangeType::Return,
            StockAdjustment::Deduct => ChangeType::Deduction,
        }
    }
}

/// Applies per-line stock deltas through the product store.
#[derive(Debug)]
pub struct InventorySynchronizer<P> {
    products: P,
}

impl<P: ProductStore> InventorySynchronizer<P> {
    pub fn new(products: P) -> Self {
        Self { products }
    }

    /// Apply one line's quantity to the product's stock.
    ///
    /// Returns the resulting [`StockChange`], or `Ok(None)` when the product
    /// no longer exists under the tenant (the line is skipped, not fatal).
    pub fn apply(
        &self,
        tenant_id: TenantId,
        product_id: ProductId,
        quantity: i64,
        mode: StockAdjustment,
    ) -> Result<Option<StockChange>, StoreError> {
        let delta = mode.signed_delta(quantity);
        let change = self.products.apply_stock_delta(tenant_id, product_id, delta)?;
        match &change {
            Some(c) => debug!(
                %product_id,
                delta,
                previous = c.previous,
                new = c.new,
                "stock adjusted"
            ),
            None => debug!(%product_id, "product missing, stock adjustment skipped"),
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderflow_core::RecordId;
    use orderflow_inventory::Product;
    use crate::store::InMemoryProductStore;

    fn setup(stock: i64) -> (InventorySynchronizer<InMemoryProductStore>, TenantId, ProductId) {
        let store = InMemoryProductStore::new();
        let tenant_id = TenantId::new();
        let product_id = ProductId::new(RecordId::new());
        store
            .insert(Product::new(product_id, tenant_id, "SKU-1", "Beans", stock))
            .unwrap();
        (InventorySynchronizer::new(store), tenant_id, product_id)
    }

    #[test]
    fn restore_adds_the_magnitude() {
        let (sync, tenant_id, product_id) = setup(10);
        let change = sync
            .apply(tenant_id, product_id, 5, StockAdjustment::Restore)
            .unwrap()
            .unwrap();
        assert_eq!(change, StockChange { previous: 10, new: 15 });
    }

    #[test]
    fn deduct_is_floored_at_zero() {
        let (sync, tenant_id, product_id) = setup(3);
        let change = sync
            .apply(tenant_id, product_id, 5, StockAdjustment::Deduct)
            .unwrap()
            .unwrap();
        assert_eq!(change, StockChange { previous: 3, new: 0 });
    }

    #[test]
    fn negative_magnitudes_never_flip_the_direction() {
        // A corrupt line quantity must not turn a deduction into a restore.
        assert_eq!(StockAdjustment::Deduct.signed_delta(-5), -5);
        assert_eq!(StockAdjustment::Restore.signed_delta(-5), 5);
    }

    #[test]
    fn missing_product_is_skipped() {
        let (sync, tenant_id, _) = setup(10);
        let change = sync
            .apply(
                tenant_id,
                ProductId::new(RecordId::new()),
                5,
                StockAdjustment::Restore,
            )
            .unwrap();
        assert!(change.is_none());
    }
}

use serde::{Deserialize, Serialize};

use orderflow_core::{Entity, RecordId, TenantId, TenantScoped};

/// Product identifier (tenant-scoped via `tenant_id` on the record).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub RecordId);

impl ProductId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for ProductId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Outcome of one stock adjustment: quantity before and after.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub previous: i64,
    pub new: i64,
}

impl StockChange {
    /// Signed amount actually applied (zero-floor clamping included).
    pub fn amount(self) -> i64 {
        self.new - self.previous
    }
}

/// Product stock record.
///
/// The lifecycle engine owns writes to the two quantity fields only during
/// the cancel and deliver/receive transitions; everything else about a product
/// is owned by catalog/inventory flows outside this engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    id: ProductId,
    tenant_id: TenantId,
    sku: String,
    name: String,
    stock_quantity: i64,
    available_quantity: i64,
}

impl Product {
    pub fn new(
        id: ProductId,
        tenant_id: TenantId,
        sku: impl Into<String>,
        name: impl Into<String>,
        stock_quantity: i64,
    ) -> Self {
        Self {
            id,
            tenant_id,
            sku: sku.into(),
            name: name.into(),
            stock_quantity,
            available_quantity: stock_quantity,
        }
    }

    pub fn id_typed(&self) -> ProductId {
        self.id
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stock_quantity(&self) -> i64 {
        self.stock_quantity
    }

    pub fn available_quantity(&self) -> i64 {
        self.available_quantity
    }

    /// Apply a signed stock delta, floored at zero.
    ///
    /// Both `stock_quantity` and `available_quantity` are set to the same
    /// clamped value; the engine keeps them equal. Returns previous/new so the
    /// caller can record the change in the audit trail.
    pub fn apply_stock_delta(&mut self, delta: i64) -> StockChange {
        let previous = self.stock_quantity;
        let new = (previous + delta).max(0);
        self.stock_quantity = new;
        self.available_quantity = new;
        StockChange { previous, new }
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl TenantScoped for Product {
    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        Product::new(
            ProductId::new(RecordId::new()),
            TenantId::new(),
            "SKU-1",
            "Arabica beans",
            stock,
        )
    }

    #[test]
    fn restore_increases_both_quantity_fields() {
        let mut p = product(10);
        let change = p.apply_stock_delta(5);
        assert_eq!(change, StockChange { previous: 10, new: 15 });
        assert_eq!(p.stock_quantity(), 15);
        assert_eq!(p.available_quantity(), 15);
    }

    #[test]
    fn deduction_is_floored_at_zero() {
        let mut p = product(3);
        let change = p.apply_stock_delta(-5);
        assert_eq!(change, StockChange { previous: 3, new: 0 });
        assert_eq!(change.amount(), -3);
        assert_eq!(p.stock_quantity(), 0);
    }
}

//! Append-only inventory audit trail.
//!
//! Every engine-driven stock mutation produces exactly one
//! [`InventoryHistoryEntry`] per (order item, transition) pair. Entries are
//! never updated or deleted; reporting and compliance exports depend on the
//! serialized field set staying stable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use orderflow_core::{RecordId, TenantId, UserId};

use crate::product::ProductId;

/// History entry identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntryId(pub RecordId);

impl HistoryEntryId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for HistoryEntryId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Direction of an engine-driven stock change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// Stock moved back in (cancellation restore).
    Return,
    /// Stock moved out (fulfillment deduction).
    Deduction,
}

/// Which transition produced the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceType {
    OrderCancelled,
    OrderDelivered,
}

impl ReferenceType {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceType::OrderCancelled => "order_cancelled",
            ReferenceType::OrderDelivered => "order_delivered",
        }
    }
}

impl core::fmt::Display for ReferenceType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable audit record describing a quantity change.
///
/// `change_amount` is signed: positive for restores, negative (or zero, when
/// the deduction was fully clamped) for deductions. `reference_id` is the id
/// of the order whose transition caused the change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryHistoryEntry {
    pub entry_id: HistoryEntryId,
    pub tenant_id: TenantId,
    pub product_id: ProductId,
    pub change_type: ChangeType,
    pub previous_quantity: i64,
    pub new_quantity: i64,
    pub change_amount: i64,
    pub reference_type: ReferenceType,
    pub reference_id: RecordId,
    pub reason: String,
    pub notes: Option<String>,
    pub performed_by: UserId,
    pub metadata: JsonValue,
    pub recorded_at: DateTime<Utc>,
}

impl InventoryHistoryEntry {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tenant_id: TenantId,
        product_id: ProductId,
        change_type: ChangeType,
        previous_quantity: i64,
        new_quantity: i64,
        reference_type: ReferenceType,
        reference_id: RecordId,
        reason: impl Into<String>,
        performed_by: UserId,
        recorded_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entry_id: HistoryEntryId::new(RecordId::new()),
            tenant_id,
            product_id,
            change_type,
            previous_quantity,
            new_quantity,
            change_amount: new_quantity - previous_quantity,
            reference_type,
            reference_id,
            reason: reason.into(),
            notes: None,
            performed_by,
            metadata: JsonValue::Null,
            recorded_at,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_metadata(mut self, metadata: JsonValue) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> InventoryHistoryEntry {
        InventoryHistoryEntry::new(
            TenantId::new(),
            ProductId::new(RecordId::new()),
            ChangeType::Return,
            10,
            15,
            ReferenceType::OrderCancelled,
            RecordId::new(),
            "order cancelled",
            UserId::new(),
            Utc::now(),
        )
    }

    #[test]
    fn change_amount_is_derived_from_quantities() {
        let e = entry();
        assert_eq!(e.change_amount, 5);
    }

    #[test]
    fn reference_type_serializes_snake_case() {
        assert_eq!(ReferenceType::OrderCancelled.as_str(), "order_cancelled");
        let json = serde_json::to_value(ReferenceType::OrderDelivered).unwrap();
        assert_eq!(json, serde_json::json!("order_delivered"));
    }

    #[test]
    fn serialized_shape_keeps_the_exposed_field_set() {
        let json = serde_json::to_value(entry()).unwrap();
        let obj = json.as_object().unwrap();
        for field in [
            "tenant_id",
            "product_id",
            "change_type",
            "previous_quantity",
            "new_quantity",
            "change_amount",
            "reference_type",
            "reference_id",
            "reason",
            "notes",
            "performed_by",
            "metadata",
        ] {
            assert!(obj.contains_key(field), "missing audit field {field}");
        }
    }
}

//! Audit-log writer for engine-driven stock mutations.

use tracing::error;

use orderflow_core::{RecordId, TenantId};
use orderflow_inventory::{InventoryHistoryEntry, ReferenceType};

use crate::store::{InventoryHistoryStore, StoreError};

/// Appends immutable history entries to the inventory audit trail.
///
/// The trail doubles as the effectively-once marker for reconciliation: a
/// transition that already has entries under its `(reference_type,
/// reference_id)` pair has had its stock deltas applied, and a replay (e.g.
/// an at-least-once retry) must skip them.
#[derive(Debug)]
pub struct AuditLogWriter<H> {
    history: H,
}

impl<H: InventoryHistoryStore> AuditLogWriter<H> {
    pub fn new(history: H) -> Self {
        Self { history }
    }

    /// Append one entry. Pure insert; never updates existing rows.
    pub fn record(&self, entry: InventoryHistoryEntry) -> Result<(), StoreError> {
        if let Err(e) = self.history.append(entry) {
            // The stock update this entry describes has already been made and
            // is not reverted; the caller downgrades this to a soft warning.
            error!(error = %e, "failed to append inventory history entry");
            return Err(e);
        }
        Ok(())
    }

    /// Whether a transition has already written entries for this reference.
    pub fn already_applied(
        &self,
        tenant_id: TenantId,
        reference_type: ReferenceType,
        reference_id: RecordId,
    ) -> Result<bool, StoreError> {
        Ok(!self
            .history
            .list_for_reference(tenant_id, reference_type, reference_id)?
            .is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use orderflow_core::UserId;
    use orderflow_inventory::{ChangeType, ProductId};
    use crate::store::InMemoryHistoryStore;

    #[test]
    fn already_applied_flips_after_the_first_record() {
        let writer = AuditLogWriter::new(InMemoryHistoryStore::new());
        let tenant_id = TenantId::new();
        let reference_id = RecordId::new();

        assert!(!writer
            .already_applied(tenant_id, ReferenceType::OrderCancelled, reference_id)
            .unwrap());

        writer
            .record(InventoryHistoryEntry::new(
                tenant_id,
                ProductId::new(RecordId::new()),
                ChangeType::Return,
                10,
                15,
                ReferenceType::OrderCancelled,
                reference_id,
                "order cancelled",
                UserId::new(),
                Utc::now(),
            ))
            .unwrap();

        assert!(writer
            .already_applied(tenant_id, ReferenceType::OrderCancelled, reference_id)
            .unwrap());
        // A different reference type for the same order is still unapplied.
        assert!(!writer
            .already_applied(tenant_id, ReferenceType::OrderDelivered, reference_id)
            .unwrap());
    }
}

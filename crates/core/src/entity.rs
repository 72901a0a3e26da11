//! Entity trait: identity + continuity across state changes.

use crate::id::TenantId;

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}

/// Entities owned by exactly one tenant.
///
/// Everything this engine persists is tenant-scoped; stores key their rows by
/// `(tenant_id, id)` and refuse cross-tenant reads and writes.
pub trait TenantScoped {
    fn tenant_id(&self) -> TenantId;
}

//! Inventory domain module.
//!
//! Product stock records and the append-only inventory history (audit trail).
//! Pure domain logic; persistence lives behind the engine crate's store traits.

pub mod history;
pub mod product;

pub use history::{
    ChangeType, HistoryEntryId, InventoryHistoryEntry, ReferenceType,
};
pub use product::{Product, ProductId, StockChange};

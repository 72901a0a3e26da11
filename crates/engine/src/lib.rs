//! Order-lifecycle engine: persistence boundary, transition orchestration,
//! inventory reconciliation, retry and bulk coordination.
//!
//! The engine is a library invoked in-process by controller code; it has no
//! wire protocol of its own. All public operations return structured results
//! (`TransitionResult`, `BulkOutcome`); failures never escape the boundary as
//! panics or raw errors.

pub mod audit;
pub mod bulk;
pub mod executor;
pub mod retry;
pub mod store;
pub mod sync;


pub use audit::AuditLogWriter;
pub use bulk::{BulkOutcome, BulkTransitionCoordinator};
pub use executor::{TransitionContext, TransitionError, TransitionExecutor, TransitionResult};
pub use retry::{RetryPolicy, Transient};
pub use store::{
    InMemoryHistoryStore, InMemoryOrderStore, InMemoryProductStore, InventoryHistoryStore,
    OrderStore, ProductStore, StatusUpdate, StoreError,
};
pub use sync::{InventorySynchronizer, StockAdjustment};

//! Stock ledger engine: derived views and orchestration over the movement log.
//!
//! The record store is the single source of truth; every figure this crate
//! reports (current stock, low-stock sets, reason breakdowns) is recomputed by
//! folding committed movements on read. Nothing here caches mutable state, so
//! there is no cache-invalidation correctness burden, only a performance one.

pub mod breakdown;
pub mod query;
pub mod record;
pub mod summary;
pub mod transfer;


pub use breakdown::{BreakdownScope, ReasonBreakdown, ReasonLedger};
pub use query::StockQueryService;
pub use record::MovementRecorder;
pub use summary::{LowStockItem, StockAggregator, StockSummary};
pub use transfer::{Transfer, TransferCoordinator, TransferReceipt, TransferState};

use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockledger_core::{ItemId, LedgerResult, ReferenceNumber, WarehouseId};
use stockledger_movements::{MovementDraft, StockMovement};

use crate::filter::MovementFilter;

/// Append-only movement record store.
///
/// The store is the only shared mutable resource in the engine. It owns
/// movement identity and timestamps exclusively: callers submit drafts, the
/// store assigns `MovementId` and a `created_at` that is monotonically
/// non-decreasing with insertion order for the instance.
///
/// ## Append Semantics
///
/// `append()`:
/// - validates the draft shape (positive quantity, OUT-requires-reason)
/// - validates referenced item/warehouse ids against the injected
///   master-data lookup
/// - assigns identity and timestamp, persists append-only
///
/// ## Immutability
///
/// A persisted movement is never mutated or deleted individually. The only
/// deletion path is `delete_by_reference`, which removes an entire linked
/// transaction atomically; no partial deletion state is observable to readers.
///
/// ## Concurrency
///
/// Reads only ever observe fully committed records. The store itself does not
/// serialize the recompute-then-append sequence of OUT-issuing callers; that
/// discipline lives in `StockLocks`, held by the engine across the sequence.
pub trait MovementStore: Send + Sync {
    /// Validate and persist a movement draft, returning the stored record.
    fn append(&self, draft: MovementDraft) -> LedgerResult<StockMovement>;

    /// Remove every movement sharing `reference`, atomically. Returns the
    /// number of removed records; `NotFound` when none exist.
    fn delete_by_reference(&self, reference: &ReferenceNumber) -> LedgerResult<usize>;

    /// Filtered scan, ordered by `created_at` descending (ties: latest
    /// insertion first).
    fn query(&self, filter: &MovementFilter) -> LedgerResult<Vec<StockMovement>>;

    fn list_by_item(&self, item_id: ItemId) -> LedgerResult<Vec<StockMovement>> {
        self.query(&MovementFilter::default().for_item(item_id))
    }

    fn list_by_warehouse(&self, warehouse_id: WarehouseId) -> LedgerResult<Vec<StockMovement>> {
        self.query(&MovementFilter::default().for_warehouse(warehouse_id))
    }

    fn list_by_date_range(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> LedgerResult<Vec<StockMovement>> {
        self.query(&MovementFilter::default().between(from, to))
    }

    fn list_by_reason(&self, reason: &str) -> LedgerResult<Vec<StockMovement>> {
        self.query(&MovementFilter::default().with_reason(reason))
    }
}

impl<S> MovementStore for Arc<S>
where
    S: MovementStore + ?Sized,
{
    fn append(&self, draft: MovementDraft) -> LedgerResult<StockMovement> {
        (**self).append(draft)
    }

    fn delete_by_reference(&self, reference: &ReferenceNumber) -> LedgerResult<usize> {
        (**self).delete_by_reference(reference)
    }

    fn query(&self, filter: &MovementFilter) -> LedgerResult<Vec<StockMovement>> {
        (**self).query(filter)
    }
}

//! Caller-facing movement recording.

use std::sync::Arc;

use stockledger_core::{LedgerError, LedgerResult, ReferenceNumber};
use stockledger_movements::{MovementDraft, MovementType, StockMovement};
use stockledger_store::{MovementFilter, MovementStore, StockLocks};

use crate::summary::current_stock_of;

/// Records simple IN/OUT movements against the ledger.
///
/// IN movements cannot violate the non-negativity invariant and append
/// directly. OUT movements hold the (item, warehouse) key lock across the
/// sufficiency check and the append, so the engine's own paths never produce
/// a negative balance.
#[derive(Debug)]
pub struct MovementRecorder<S> {
    store: S,
    locks: Arc<StockLocks>,
}

impl<S> MovementRecorder<S>
where
    S: MovementStore,
{
    pub fn new(store: S, locks: Arc<StockLocks>) -> Self {
        Self { store, locks }
    }

    /// Validate and persist one movement.
    pub fn record(&self, draft: MovementDraft) -> LedgerResult<StockMovement> {
        // Shape check up front so a malformed draft never takes the key lock.
        draft.validate()?;

        match draft.movement_type {
            MovementType::In => self.store.append(draft),
            MovementType::Out => {
                self.locks
                    .with_exclusive(draft.item_id, draft.warehouse_id, || {
                        let available = current_stock_of(
                            &self.store,
                            draft.item_id,
                            Some(draft.warehouse_id),
                        )?;
                        if available < draft.quantity {
                            return Err(LedgerError::insufficient_stock(
                                available,
                                draft.quantity,
                            ));
                        }
                        self.store.append(draft)
                    })
            }
        }
    }

    /// Administrative reversal of an erroneous bulk operation: removes the
    /// entire linked transaction under `reference`, atomically. Derived
    /// views need no invalidation because they are always recomputed from
    /// the log.
    ///
    /// Deletion mutates the balances of every (item, warehouse) pair the
    /// transaction touched, so their key locks are all held across the
    /// delete. Without that, removing an IN leg could interleave with a
    /// concurrent OUT between its sufficiency check and its append.
    pub fn reverse(&self, reference: &ReferenceNumber) -> LedgerResult<usize> {
        let filter = MovementFilter::default().for_reference(*reference);
        let keys = self
            .store
            .query(&filter)?
            .iter()
            .map(|movement| (movement.item_id, movement.warehouse_id))
            .collect();
        self.locks
            .with_exclusive_all(keys, || self.store.delete_by_reference(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_core::{ItemId, WarehouseId};
    use stockledger_movements::ReasonCode;
    use stockledger_store::{InMemoryMasterData, InMemoryMovementStore};

    fn recorder() -> (
        MovementRecorder<Arc<InMemoryMovementStore>>,
        Arc<InMemoryMovementStore>,
        ItemId,
        WarehouseId,
    ) {
        let master = Arc::new(InMemoryMasterData::new());
        let item = master.add_item("Widget", 0);
        let warehouse = master.add_warehouse();
        let store = Arc::new(InMemoryMovementStore::new(master));
        let recorder = MovementRecorder::new(store.clone(), Arc::new(StockLocks::new()));
        (recorder, store, item, warehouse)
    }

    #[test]
    fn records_in_then_out() {
        let (recorder, store, item, warehouse) = recorder();

        recorder
            .record(MovementDraft::inbound(item, warehouse, 10))
            .unwrap();
        recorder
            .record(MovementDraft::outbound(item, warehouse, 4, ReasonCode::Used))
            .unwrap();

        assert_eq!(
            current_stock_of(&store, item, Some(warehouse)).unwrap(),
            6
        );
    }

    #[test]
    fn out_beyond_balance_is_rejected() {
        let (recorder, store, item, warehouse) = recorder();

        recorder
            .record(MovementDraft::inbound(item, warehouse, 3))
            .unwrap();
        let err = recorder
            .record(MovementDraft::outbound(item, warehouse, 4, ReasonCode::Lost))
            .unwrap_err();

        assert_eq!(
            err,
            LedgerError::InsufficientStock {
                available: 3,
                requested: 4
            }
        );
        assert_eq!(
            current_stock_of(&store, item, Some(warehouse)).unwrap(),
            3
        );
    }

    #[test]
    fn malformed_draft_fails_fast() {
        let (recorder, _, item, warehouse) = recorder();
        let err = recorder
            .record(MovementDraft::inbound(item, warehouse, 0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMovement(_)));
    }

    #[test]
    fn reverse_deletes_linked_transaction() {
        let (recorder, store, item, warehouse) = recorder();
        let reference = ReferenceNumber::new();

        recorder
            .record(MovementDraft::inbound(item, warehouse, 5).with_reference(reference))
            .unwrap();
        recorder
            .record(MovementDraft::inbound(item, warehouse, 7).with_reference(reference))
            .unwrap();

        assert_eq!(recorder.reverse(&reference).unwrap(), 2);
        assert_eq!(current_stock_of(&store, item, Some(warehouse)).unwrap(), 0);
        assert_eq!(recorder.reverse(&reference), Err(LedgerError::NotFound));
    }
}

use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use stockledger_core::{LedgerError, LedgerResult, MasterData, MovementId, ReferenceNumber};
use stockledger_movements::{MovementDraft, StockMovement};

use crate::filter::MovementFilter;
use crate::r#trait::MovementStore;

#[derive(Debug)]
struct Inner {
    movements: Vec<StockMovement>,
    last_created_at: DateTime<Utc>,
}

/// In-memory append-only movement record store.
///
/// Intended for tests/dev and as the reference implementation of the store
/// contract. Not optimized for performance: scans are linear and recomputed
/// per query, which is exactly the "fold the log on read" model.
pub struct InMemoryMovementStore {
    inner: RwLock<Inner>,
    master: Arc<dyn MasterData>,
}

impl InMemoryMovementStore {
    pub fn new(master: Arc<dyn MasterData>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                movements: Vec::new(),
                last_created_at: DateTime::<Utc>::MIN_UTC,
            }),
            master,
        }
    }

    fn validate_master_data(&self, draft: &MovementDraft) -> LedgerResult<()> {
        if !self.master.item_exists(draft.item_id) {
            return Err(LedgerError::invalid_movement(format!(
                "unknown item {}",
                draft.item_id
            )));
        }
        if !self.master.warehouse_exists(draft.warehouse_id) {
            return Err(LedgerError::invalid_movement(format!(
                "unknown warehouse {}",
                draft.warehouse_id
            )));
        }
        Ok(())
    }
}

impl MovementStore for InMemoryMovementStore {
    fn append(&self, draft: MovementDraft) -> LedgerResult<StockMovement> {
        draft.validate()?;
        self.validate_master_data(&draft)?;

        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::storage("movement store lock poisoned"))?;

        // Timestamps are monotonically non-decreasing with insertion order.
        let created_at = Utc::now().max(inner.last_created_at);
        inner.last_created_at = created_at;

        let stored = StockMovement::from_draft(draft, MovementId::new(), created_at);
        inner.movements.push(stored.clone());
        Ok(stored)
    }

    fn delete_by_reference(&self, reference: &ReferenceNumber) -> LedgerResult<usize> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerError::storage("movement store lock poisoned"))?;

        let before = inner.movements.len();
        inner
            .movements
            .retain(|m| m.reference_number != Some(*reference));
        let removed = before - inner.movements.len();

        if removed == 0 {
            return Err(LedgerError::not_found());
        }

        tracing::info!(reference = %reference, removed, "deleted movements by reference");
        Ok(removed)
    }

    fn query(&self, filter: &MovementFilter) -> LedgerResult<Vec<StockMovement>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerError::storage("movement store lock poisoned"))?;

        // Reverse insertion order first so the stable sort leaves equal
        // timestamps latest-first.
        let mut matching: Vec<StockMovement> = inner
            .movements
            .iter()
            .rev()
            .filter(|m| filter.matches(m))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = filter.limit {
            matching.truncate(limit);
        }
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::master::InMemoryMasterData;
    use stockledger_movements::{MovementType, ReasonCode};

    fn store_with_master() -> (
        InMemoryMovementStore,
        stockledger_core::ItemId,
        stockledger_core::WarehouseId,
    ) {
        let master = Arc::new(InMemoryMasterData::new());
        let item = master.add_item("Widget", 0);
        let warehouse = master.add_warehouse();
        (InMemoryMovementStore::new(master), item, warehouse)
    }

    #[test]
    fn append_assigns_identity_and_timestamp() {
        let (store, item, warehouse) = store_with_master();

        let a = store
            .append(MovementDraft::inbound(item, warehouse, 5))
            .unwrap();
        let b = store
            .append(MovementDraft::inbound(item, warehouse, 7))
            .unwrap();

        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
    }

    #[test]
    fn append_rejects_unknown_item_and_warehouse() {
        let (store, item, warehouse) = store_with_master();

        let unknown_item =
            store.append(MovementDraft::inbound(stockledger_core::ItemId::new(), warehouse, 5));
        assert!(matches!(
            unknown_item,
            Err(LedgerError::InvalidMovement(_))
        ));

        let unknown_warehouse = store.append(MovementDraft::inbound(
            item,
            stockledger_core::WarehouseId::new(),
            5,
        ));
        assert!(matches!(
            unknown_warehouse,
            Err(LedgerError::InvalidMovement(_))
        ));
    }

    #[test]
    fn query_orders_by_created_at_descending() {
        let (store, item, warehouse) = store_with_master();

        for qty in 1..=4 {
            store
                .append(MovementDraft::inbound(item, warehouse, qty))
                .unwrap();
        }

        let all = store.query(&MovementFilter::default()).unwrap();
        assert_eq!(all.len(), 4);
        for pair in all.windows(2) {
            assert!(pair[0].created_at >= pair[1].created_at);
        }
        // Latest insertion first, even under equal timestamps.
        assert_eq!(all[0].quantity, 4);
        assert_eq!(all[3].quantity, 1);
    }

    #[test]
    fn filters_compose() {
        let (store, item, warehouse) = store_with_master();

        store
            .append(MovementDraft::inbound(item, warehouse, 10))
            .unwrap();
        store
            .append(MovementDraft::outbound(item, warehouse, 4, ReasonCode::Used))
            .unwrap();
        store
            .append(MovementDraft::outbound(
                item,
                warehouse,
                1,
                ReasonCode::Damaged,
            ))
            .unwrap();

        let outs = store
            .query(&MovementFilter::default().of_type(MovementType::Out))
            .unwrap();
        assert_eq!(outs.len(), 2);

        let used = store.list_by_reason("USED").unwrap();
        assert_eq!(used.len(), 1);
        assert_eq!(used[0].quantity, 4);

        let limited = store
            .query(&MovementFilter::default().newest(2))
            .unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].quantity, 1);
    }

    #[test]
    fn delete_by_reference_removes_whole_transaction_only() {
        let (store, item, warehouse) = store_with_master();
        let reference = ReferenceNumber::new();
        let other = ReferenceNumber::new();

        store
            .append(MovementDraft::inbound(item, warehouse, 10).with_reference(reference))
            .unwrap();
        store
            .append(
                MovementDraft::outbound(item, warehouse, 10, ReasonCode::Transferred)
                    .with_reference(reference),
            )
            .unwrap();
        store
            .append(MovementDraft::inbound(item, warehouse, 3).with_reference(other))
            .unwrap();

        assert_eq!(store.delete_by_reference(&reference).unwrap(), 2);

        let remaining = store.query(&MovementFilter::default()).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].reference_number, Some(other));
    }

    #[test]
    fn delete_by_unknown_reference_is_not_found() {
        let (store, _, _) = store_with_master();
        assert_eq!(
            store.delete_by_reference(&ReferenceNumber::new()),
            Err(LedgerError::NotFound)
        );
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let (store, item, warehouse) = store_with_master();

        let first = store
            .append(MovementDraft::inbound(item, warehouse, 1))
            .unwrap();
        let last = store
            .append(MovementDraft::inbound(item, warehouse, 2))
            .unwrap();

        let ranged = store
            .list_by_date_range(first.created_at, last.created_at)
            .unwrap();
        assert_eq!(ranged.len(), 2);
    }
}

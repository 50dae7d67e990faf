//! Stock aggregation: folding the movement log into balances.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use stockledger_core::{ItemId, LedgerResult, MasterData, WarehouseId};
use stockledger_movements::MovementType;
use stockledger_store::{MovementFilter, MovementStore};

/// Derived stock figures for a scope. Computed, never persisted: always
/// reproducible purely from the record store's contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub item_id: ItemId,
    pub warehouse_id: Option<WarehouseId>,
    pub total_in: i64,
    pub total_out: i64,
    pub current_stock: i64,
}

/// A catalog item at or below its low-stock threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    pub item_id: ItemId,
    pub name: String,
    pub current_stock: i64,
    /// The threshold the item was compared against.
    pub threshold: i64,
}

impl LowStockItem {
    pub fn out_of_stock(&self) -> bool {
        self.current_stock <= 0
    }
}

/// Computes current stock, totals and low-stock classifications by folding
/// movement records on read.
pub struct StockAggregator<S> {
    store: S,
    master: Arc<dyn MasterData>,
}

/// Fold matching movements into (total_in, total_out).
fn fold_totals<S: MovementStore>(
    store: &S,
    item_id: ItemId,
    warehouse_id: Option<WarehouseId>,
) -> LedgerResult<(i64, i64)> {
    let mut filter = MovementFilter::default().for_item(item_id);
    if let Some(warehouse_id) = warehouse_id {
        filter = filter.for_warehouse(warehouse_id);
    }

    let mut total_in = 0i64;
    let mut total_out = 0i64;
    for movement in store.query(&filter)? {
        match movement.movement_type {
            MovementType::In => total_in += movement.quantity,
            MovementType::Out => total_out += movement.quantity,
        }
    }
    Ok((total_in, total_out))
}

/// Current balance of a (item, optional-warehouse) scope. Shared with the
/// transfer coordinator and recorder for their sufficiency checks.
pub(crate) fn current_stock_of<S: MovementStore>(
    store: &S,
    item_id: ItemId,
    warehouse_id: Option<WarehouseId>,
) -> LedgerResult<i64> {
    let (total_in, total_out) = fold_totals(store, item_id, warehouse_id)?;
    Ok(total_in - total_out)
}

impl<S> StockAggregator<S>
where
    S: MovementStore,
{
    pub fn new(store: S, master: Arc<dyn MasterData>) -> Self {
        Self { store, master }
    }

    /// Σ IN − Σ OUT over matching movements. An item with zero movements has
    /// current stock 0; that is a defined semantic, not error suppression.
    ///
    /// Never clamped: a negative result means some OUT was appended without a
    /// sufficiency check upstream, and is surfaced (plus logged) rather than
    /// hidden.
    pub fn current_stock(
        &self,
        item_id: ItemId,
        warehouse_id: Option<WarehouseId>,
    ) -> LedgerResult<i64> {
        let stock = current_stock_of(&self.store, item_id, warehouse_id)?;
        if stock < 0 {
            tracing::warn!(item = %item_id, stock, "negative current stock derived from ledger");
        }
        Ok(stock)
    }

    /// Derived totals for one scope.
    pub fn summary(
        &self,
        item_id: ItemId,
        warehouse_id: Option<WarehouseId>,
    ) -> LedgerResult<StockSummary> {
        let (total_in, total_out) = fold_totals(&self.store, item_id, warehouse_id)?;
        Ok(StockSummary {
            item_id,
            warehouse_id,
            total_in,
            total_out,
            current_stock: total_in - total_out,
        })
    }

    /// One row per item that has at least one movement; items with zero
    /// movements are omitted (contrast with `low_stock`, which includes
    /// them). Ordered by item id for determinism.
    pub fn summary_for_all(&self) -> LedgerResult<Vec<StockSummary>> {
        let mut totals: HashMap<ItemId, (i64, i64)> = HashMap::new();
        for movement in self.store.query(&MovementFilter::default())? {
            let entry = totals.entry(movement.item_id).or_default();
            match movement.movement_type {
                MovementType::In => entry.0 += movement.quantity,
                MovementType::Out => entry.1 += movement.quantity,
            }
        }

        let mut rows: Vec<StockSummary> = totals
            .into_iter()
            .map(|(item_id, (total_in, total_out))| StockSummary {
                item_id,
                warehouse_id: None,
                total_in,
                total_out,
                current_stock: total_in - total_out,
            })
            .collect();
        rows.sort_by_key(|row| row.item_id);
        Ok(rows)
    }

    /// Catalog items whose current stock is at or below the threshold.
    ///
    /// `threshold = None` compares each item against its own configured
    /// minimum stock. Items with zero movement records are included (zero
    /// stock is always "low" for any non-negative threshold). Ordered by
    /// display name ascending for determinism.
    pub fn low_stock(&self, threshold: Option<i64>) -> LedgerResult<Vec<LowStockItem>> {
        let mut low = Vec::new();
        for item in self.master.list_items() {
            let threshold = threshold.unwrap_or(item.minimum_stock);
            let current_stock = current_stock_of(&self.store, item.id, None)?;
            if current_stock <= threshold {
                low.push(LowStockItem {
                    item_id: item.id,
                    name: item.name,
                    current_stock,
                    threshold,
                });
            }
        }
        low.sort_by(|a, b| a.name.cmp(&b.name).then(a.item_id.cmp(&b.item_id)));
        Ok(low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockledger_movements::{MovementDraft, ReasonCode};
    use stockledger_store::{InMemoryMasterData, InMemoryMovementStore};

    struct Fixture {
        aggregator: StockAggregator<Arc<InMemoryMovementStore>>,
        store: Arc<InMemoryMovementStore>,
        master: Arc<InMemoryMasterData>,
        item: ItemId,
        warehouse: WarehouseId,
    }

    fn fixture() -> Fixture {
        let master = Arc::new(InMemoryMasterData::new());
        let item = master.add_item("Widget", 10);
        let warehouse = master.add_warehouse();
        let store = Arc::new(InMemoryMovementStore::new(master.clone()));
        let aggregator = StockAggregator::new(store.clone(), master.clone());
        Fixture {
            aggregator,
            store,
            master,
            item,
            warehouse,
        }
    }

    #[test]
    fn current_stock_is_in_minus_out() {
        let f = fixture();
        f.store
            .append(MovementDraft::inbound(f.item, f.warehouse, 100))
            .unwrap();
        f.store
            .append(MovementDraft::outbound(f.item, f.warehouse, 30, ReasonCode::Used))
            .unwrap();
        f.store
            .append(MovementDraft::outbound(
                f.item,
                f.warehouse,
                20,
                ReasonCode::Damaged,
            ))
            .unwrap();

        assert_eq!(f.aggregator.current_stock(f.item, None).unwrap(), 50);
        assert_eq!(
            f.aggregator.current_stock(f.item, Some(f.warehouse)).unwrap(),
            50
        );
    }

    #[test]
    fn zero_movements_mean_zero_stock_not_error() {
        let f = fixture();
        assert_eq!(f.aggregator.current_stock(f.item, None).unwrap(), 0);
    }

    #[test]
    fn summary_carries_both_totals() {
        let f = fixture();
        f.store
            .append(MovementDraft::inbound(f.item, f.warehouse, 8))
            .unwrap();
        f.store
            .append(MovementDraft::outbound(f.item, f.warehouse, 3, ReasonCode::Given))
            .unwrap();

        let summary = f.aggregator.summary(f.item, None).unwrap();
        assert_eq!(summary.total_in, 8);
        assert_eq!(summary.total_out, 3);
        assert_eq!(summary.current_stock, 5);
    }

    #[test]
    fn summary_for_all_omits_items_without_movements() {
        let f = fixture();
        let idle_item = f.master.add_item("Idle", 0);
        f.store
            .append(MovementDraft::inbound(f.item, f.warehouse, 4))
            .unwrap();

        let rows = f.aggregator.summary_for_all().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item_id, f.item);
        assert!(rows.iter().all(|row| row.item_id != idle_item));
    }

    #[test]
    fn low_stock_includes_items_with_no_movements() {
        let f = fixture();
        // `item` has minimum 10 and zero movements: always low.
        let low = f.aggregator.low_stock(None).unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].item_id, f.item);
        assert_eq!(low[0].current_stock, 0);
        assert_eq!(low[0].threshold, 10);
        assert!(low[0].out_of_stock());
    }

    #[test]
    fn low_stock_is_ordered_by_name() {
        let f = fixture();
        f.master.add_item("Anvil", 5);
        f.master.add_item("Zinc plate", 5);

        let low = f.aggregator.low_stock(Some(0)).unwrap();
        let names: Vec<&str> = low.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Anvil", "Widget", "Zinc plate"]);
    }

    #[test]
    fn explicit_threshold_overrides_minimum_stock() {
        let f = fixture();
        f.store
            .append(MovementDraft::inbound(f.item, f.warehouse, 50))
            .unwrap();

        // Above its own minimum (10), so not low by default.
        assert!(f.aggregator.low_stock(None).unwrap().is_empty());
        // But at or below an explicit threshold of 50.
        assert_eq!(f.aggregator.low_stock(Some(50)).unwrap().len(), 1);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        struct Step {
            inbound: bool,
            quantity: i64,
        }

        fn step_strategy() -> impl Strategy<Value = Step> {
            (any::<bool>(), 1i64..1_000).prop_map(|(inbound, quantity)| Step { inbound, quantity })
        }

        proptest! {
            /// currentStock == Σ IN − Σ OUT, independent of insertion order.
            #[test]
            fn fold_is_commutative(
                steps in proptest::collection::vec(step_strategy(), 1..40),
                seed in any::<u64>(),
            ) {
                let expected: i64 = steps
                    .iter()
                    .map(|s| if s.inbound { s.quantity } else { -s.quantity })
                    .sum();

                // Deterministic shuffle of the same multiset.
                let mut shuffled = steps.clone();
                let mut state = seed;
                for i in (1..shuffled.len()).rev() {
                    state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                    let j = (state >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }

                for ordering in [steps, shuffled] {
                    let master = Arc::new(InMemoryMasterData::new());
                    let item = master.add_item("Widget", 0);
                    let warehouse = master.add_warehouse();
                    let store = Arc::new(InMemoryMovementStore::new(master.clone()));
                    let aggregator = StockAggregator::new(store.clone(), master);

                    for step in &ordering {
                        let draft = if step.inbound {
                            MovementDraft::inbound(item, warehouse, step.quantity)
                        } else {
                            MovementDraft::outbound(item, warehouse, step.quantity, ReasonCode::Used)
                        };
                        store.append(draft).unwrap();
                    }

                    prop_assert_eq!(aggregator.current_stock(item, None).unwrap(), expected);
                }
            }
        }
    }
}

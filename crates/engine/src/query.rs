//! Composition façade over the aggregation components.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use stockledger_core::{ItemId, LedgerError, LedgerResult, MasterData, WarehouseId};
use stockledger_movements::StockMovement;
use stockledger_store::{MovementFilter, MovementStore};

use crate::breakdown::{BreakdownScope, ReasonBreakdown, ReasonLedger};
use crate::summary::{LowStockItem, StockAggregator, StockSummary};

/// Thin query façade: argument validation plus delegation, no independent
/// logic. Malformed parameters fail with `InvalidArgument`.
pub struct StockQueryService<S> {
    store: S,
    aggregator: StockAggregator<S>,
    reasons: ReasonLedger<S>,
}

impl<S> StockQueryService<S>
where
    S: MovementStore + Clone,
{
    pub fn new(store: S, master: Arc<dyn MasterData>) -> Self {
        Self {
            aggregator: StockAggregator::new(store.clone(), master.clone()),
            reasons: ReasonLedger::new(store.clone(), master),
            store,
        }
    }

    /// Current stock of an item across all warehouses.
    pub fn item_stock(&self, item_id: ItemId) -> LedgerResult<i64> {
        self.aggregator.current_stock(item_id, None)
    }

    /// Current stock of an item in one warehouse.
    pub fn item_stock_at(&self, item_id: ItemId, warehouse_id: WarehouseId) -> LedgerResult<i64> {
        self.aggregator.current_stock(item_id, Some(warehouse_id))
    }

    /// Items at or below `threshold`. Negative thresholds are malformed.
    pub fn items_below_threshold(&self, threshold: i64) -> LedgerResult<Vec<LowStockItem>> {
        if threshold < 0 {
            return Err(LedgerError::invalid_argument(format!(
                "threshold must be non-negative (got {threshold})"
            )));
        }
        self.aggregator.low_stock(Some(threshold))
    }

    /// Items at or below their own configured minimum stock.
    pub fn items_below_minimum(&self) -> LedgerResult<Vec<LowStockItem>> {
        self.aggregator.low_stock(None)
    }

    /// Per-item totals for every item with at least one movement.
    pub fn summaries(&self) -> LedgerResult<Vec<StockSummary>> {
        self.aggregator.summary_for_all()
    }

    /// The `limit` most recent movements, newest first.
    pub fn recent_movements(&self, limit: usize) -> LedgerResult<Vec<StockMovement>> {
        self.store.query(&MovementFilter::default().newest(limit))
    }

    /// Reason breakdown over the inclusive `[start, end]` window.
    pub fn reason_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scope: BreakdownScope,
    ) -> LedgerResult<Vec<ReasonBreakdown>> {
        if start > end {
            return Err(LedgerError::invalid_argument(format!(
                "inverted date range ({start} > {end})"
            )));
        }
        self.reasons.breakdown(start, end, scope)
    }

    /// Top `limit` stock-out reasons over the engine's entire history.
    pub fn top_reasons(&self, limit: usize) -> LedgerResult<Vec<ReasonBreakdown>> {
        self.reasons.top_reasons(limit)
    }
}

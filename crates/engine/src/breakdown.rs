//! Reason ledger: stock-out classification analytics.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{CategoryId, ItemId, LedgerResult, MasterData};
use stockledger_movements::{MovementType, StockMovement};
use stockledger_store::{MovementFilter, MovementStore};

/// Count and share of one reason group over the considered OUT movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasonBreakdown {
    /// Literal reason label; predefined codes and free-text values are
    /// grouped separately, so distinct free-text reasons never merge.
    pub reason: String,
    pub count: u64,
    /// 100 × count / Σ count over the considered set.
    pub percentage: f64,
}

/// Scope of a breakdown query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakdownScope {
    #[default]
    Global,
    Item(ItemId),
    Category(CategoryId),
}

/// Classifies OUT movements by reason and computes breakdown/percentage/top-N
/// analytics over the movement log.
pub struct ReasonLedger<S> {
    store: S,
    master: Arc<dyn MasterData>,
}

impl<S> ReasonLedger<S>
where
    S: MovementStore,
{
    pub fn new(store: S, master: Arc<dyn MasterData>) -> Self {
        Self { store, master }
    }

    /// Reason breakdown of OUT movements within the inclusive `[start, end]`
    /// window. Rows ordered by count descending, ties by reason label
    /// ascending. An empty considered set yields an empty list (no
    /// division-by-zero row is emitted).
    pub fn breakdown(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        scope: BreakdownScope,
    ) -> LedgerResult<Vec<ReasonBreakdown>> {
        let mut filter = MovementFilter::default()
            .of_type(MovementType::Out)
            .between(start, end);
        if let BreakdownScope::Item(item_id) = scope {
            filter = filter.for_item(item_id);
        }

        let movements = self.store.query(&filter)?;
        let considered = movements
            .iter()
            .filter(|m| self.in_scope(m, scope));
        Ok(tally(considered))
    }

    /// Same grouping over the engine's entire history, truncated to `limit`
    /// rows after the descending-count sort. A limit of zero yields an empty
    /// list, not an error.
    pub fn top_reasons(&self, limit: usize) -> LedgerResult<Vec<ReasonBreakdown>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let filter = MovementFilter::default().of_type(MovementType::Out);
        let movements = self.store.query(&filter)?;
        let mut rows = tally(movements.iter());
        rows.truncate(limit);
        Ok(rows)
    }

    fn in_scope(&self, movement: &StockMovement, scope: BreakdownScope) -> bool {
        match scope {
            BreakdownScope::Global | BreakdownScope::Item(_) => true,
            BreakdownScope::Category(category) => {
                self.master.category_of(movement.item_id) == Some(category)
            }
        }
    }
}

/// Group by literal reason label and compute shares.
fn tally<'a>(movements: impl Iterator<Item = &'a StockMovement>) -> Vec<ReasonBreakdown> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for movement in movements {
        if let Some(label) = movement.reason_label() {
            *counts.entry(label.to_string()).or_default() += 1;
        }
    }

    let total: u64 = counts.values().sum();
    if total == 0 {
        return Vec::new();
    }

    let mut rows: Vec<ReasonBreakdown> = counts
        .into_iter()
        .map(|(reason, count)| ReasonBreakdown {
            reason,
            count,
            percentage: 100.0 * count as f64 / total as f64,
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.reason.cmp(&b.reason)));
    rows
}

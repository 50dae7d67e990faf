//! Movement query filters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{ItemId, ReferenceNumber, WarehouseId};
use stockledger_movements::{MovementType, StockMovement};

/// Filter criteria for movement scans.
///
/// All criteria are optional and conjunctive; date bounds are inclusive on
/// both ends. Results are always ordered by `created_at` descending.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovementFilter {
    pub item_id: Option<ItemId>,
    pub warehouse_id: Option<WarehouseId>,
    pub movement_type: Option<MovementType>,
    /// Literal reason label (predefined or free-text); matches OUT movements only.
    pub reason: Option<String>,
    pub reference_number: Option<ReferenceNumber>,
    /// Inclusive lower bound on `created_at`.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`.
    pub to: Option<DateTime<Utc>>,
    /// Maximum number of movements to return, applied after ordering.
    pub limit: Option<usize>,
}

impl MovementFilter {
    pub fn for_item(mut self, item_id: ItemId) -> Self {
        self.item_id = Some(item_id);
        self
    }

    pub fn for_warehouse(mut self, warehouse_id: WarehouseId) -> Self {
        self.warehouse_id = Some(warehouse_id);
        self
    }

    pub fn of_type(mut self, movement_type: MovementType) -> Self {
        self.movement_type = Some(movement_type);
        self
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn for_reference(mut self, reference: ReferenceNumber) -> Self {
        self.reference_number = Some(reference);
        self
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn newest(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Does `movement` satisfy every set criterion?
    pub fn matches(&self, movement: &StockMovement) -> bool {
        if let Some(item_id) = self.item_id
            && movement.item_id != item_id
        {
            return false;
        }
        if let Some(warehouse_id) = self.warehouse_id
            && movement.warehouse_id != warehouse_id
        {
            return false;
        }
        if let Some(movement_type) = self.movement_type
            && movement.movement_type != movement_type
        {
            return false;
        }
        if let Some(reason) = &self.reason
            && movement.reason_label() != Some(reason.as_str())
        {
            return false;
        }
        if let Some(reference) = self.reference_number
            && movement.reference_number != Some(reference)
        {
            return false;
        }
        if let Some(from) = self.from
            && movement.created_at < from
        {
            return false;
        }
        if let Some(to) = self.to
            && movement.created_at > to
        {
            return false;
        }
        true
    }
}

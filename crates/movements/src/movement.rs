use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{
    ItemId, LedgerError, LedgerResult, MovementId, ReferenceNumber, WarehouseId,
};

use crate::reason::{Reason, validate_reason};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    In,
    Out,
}

/// A movement intent submitted by a caller.
///
/// Identity and timestamp are deliberately absent: the record store
/// exclusively owns both and assigns them at append time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub movement_type: MovementType,
    pub quantity: i64,
    /// Required when `movement_type` is `Out`; must be `None` for `In`.
    pub reason: Option<Reason>,
    /// Optional correlation key linking movements of one business transaction.
    pub reference_number: Option<ReferenceNumber>,
}

impl MovementDraft {
    /// Draft an IN movement (receipt, adjustment up).
    pub fn inbound(item_id: ItemId, warehouse_id: WarehouseId, quantity: i64) -> Self {
        Self {
            item_id,
            warehouse_id,
            movement_type: MovementType::In,
            quantity,
            reason: None,
            reference_number: None,
        }
    }

    /// Draft an OUT movement with its reason.
    pub fn outbound(
        item_id: ItemId,
        warehouse_id: WarehouseId,
        quantity: i64,
        reason: impl Into<Reason>,
    ) -> Self {
        Self {
            item_id,
            warehouse_id,
            movement_type: MovementType::Out,
            quantity,
            reason: Some(reason.into()),
            reference_number: None,
        }
    }

    pub fn with_reference(mut self, reference: ReferenceNumber) -> Self {
        self.reference_number = Some(reference);
        self
    }

    /// Deterministic shape validation, independent of master data.
    ///
    /// Existence of the referenced item/warehouse is checked by the store via
    /// the injected master-data lookup, not here.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.quantity <= 0 {
            return Err(LedgerError::invalid_movement(format!(
                "quantity must be positive (got {})",
                self.quantity
            )));
        }
        match (self.movement_type, &self.reason) {
            (MovementType::Out, None) => {
                return Err(LedgerError::invalid_movement(
                    "OUT movement requires a reason",
                ));
            }
            (MovementType::Out, Some(reason)) => {
                if !validate_reason(reason.label()) {
                    return Err(LedgerError::invalid_movement(
                        "reason must be non-blank and at most 100 characters",
                    ));
                }
            }
            (MovementType::In, Some(_)) => {
                return Err(LedgerError::invalid_movement(
                    "IN movement must not carry a reason",
                ));
            }
            (MovementType::In, None) => {}
        }
        Ok(())
    }

    /// Signed contribution to a stock balance: +quantity for IN, -quantity for OUT.
    pub fn signed_quantity(&self) -> i64 {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }
}

/// A persisted stock movement. Immutable once created: never mutated or
/// deleted individually; deletion happens only by `reference_number`,
/// removing an entire linked transaction atomically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMovement {
    pub id: MovementId,
    pub item_id: ItemId,
    pub warehouse_id: WarehouseId,
    pub movement_type: MovementType,
    pub quantity: i64,
    pub reason: Option<Reason>,
    pub reference_number: Option<ReferenceNumber>,
    /// Assignment timestamp; monotonically non-decreasing with insertion
    /// order for a given store instance.
    pub created_at: DateTime<Utc>,
}

impl StockMovement {
    /// Materialize a validated draft into a record. Intended for stores,
    /// which own identity and timestamp assignment.
    pub fn from_draft(draft: MovementDraft, id: MovementId, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            item_id: draft.item_id,
            warehouse_id: draft.warehouse_id,
            movement_type: draft.movement_type,
            quantity: draft.quantity,
            reason: draft.reason,
            reference_number: draft.reference_number,
            created_at,
        }
    }

    /// Signed contribution to a stock balance: +quantity for IN, -quantity for OUT.
    pub fn signed_quantity(&self) -> i64 {
        match self.movement_type {
            MovementType::In => self.quantity,
            MovementType::Out => -self.quantity,
        }
    }

    /// Literal reason label, when present (OUT movements).
    pub fn reason_label(&self) -> Option<&str> {
        self.reason.as_ref().map(Reason::label)
    }
}

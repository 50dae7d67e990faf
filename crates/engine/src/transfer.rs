//! Warehouse-to-warehouse transfer orchestration.
//!
//! A transfer is one logical operation realized as two linked movement
//! records: an OUT from the source (reason `TRANSFERRED`) and an IN to the
//! destination, sharing one reference number. Both are recorded or neither
//! is: if the second append fails after the first succeeded, the
//! coordinator compensates with a delete-by-reference. A saga, not a
//! two-phase commit.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockledger_core::{
    ItemId, LedgerError, LedgerResult, ReferenceNumber, WarehouseId,
};
use stockledger_movements::{MovementDraft, ReasonCode, StockMovement};
use stockledger_store::{MovementStore, StockLocks};

use crate::summary::current_stock_of;

/// Transfer request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferState {
    Requested,
    Validated,
    Committed,
    Rejected,
}

/// One transfer request moving through the state machine
/// `Requested → Validated → Committed` or `Requested → Rejected`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub item_id: ItemId,
    pub source: WarehouseId,
    pub destination: WarehouseId,
    pub quantity: i64,
    pub state: TransferState,
    pub requested_at: DateTime<Utc>,
}

/// Proof of a committed transfer: the shared reference and both legs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub reference: ReferenceNumber,
    pub out_movement: StockMovement,
    pub in_movement: StockMovement,
}

/// Orchestrates transfers over the record store.
///
/// The commit path holds the source (item, warehouse) key lock across the
/// sufficiency re-check and both appends, so two concurrent transfers
/// depleting the same balance can never both pass against a stale figure.
#[derive(Debug)]
pub struct TransferCoordinator<S> {
    store: S,
    locks: Arc<StockLocks>,
}

impl<S> TransferCoordinator<S>
where
    S: MovementStore,
{
    pub fn new(store: S, locks: Arc<StockLocks>) -> Self {
        Self { store, locks }
    }

    /// Open a transfer request (state `Requested`).
    pub fn request(
        &self,
        item_id: ItemId,
        source: WarehouseId,
        destination: WarehouseId,
        quantity: i64,
    ) -> Transfer {
        Transfer {
            item_id,
            source,
            destination,
            quantity,
            state: TransferState::Requested,
            requested_at: Utc::now(),
        }
    }

    /// Validate a requested transfer: source ≠ destination, positive
    /// quantity, and sufficient stock at the source at validation time.
    /// Failure moves the transfer to `Rejected`.
    pub fn validate(&self, transfer: &mut Transfer) -> LedgerResult<()> {
        if transfer.state != TransferState::Requested {
            return Err(LedgerError::invalid_argument(format!(
                "transfer cannot be validated in state {:?}",
                transfer.state
            )));
        }
        match self.check(transfer) {
            Ok(()) => {
                transfer.state = TransferState::Validated;
                Ok(())
            }
            Err(err) => {
                transfer.state = TransferState::Rejected;
                Err(err)
            }
        }
    }

    /// Commit a validated transfer.
    ///
    /// Sufficiency is re-checked under the source key lock immediately before
    /// the first append; if stock was consumed by a concurrent operation
    /// since validation, the commit rejects with `InsufficientStock` instead
    /// of proceeding. On a partial append the OUT leg is rolled back and
    /// `TransferFailed` is surfaced, leaving the ledger as if the transfer
    /// never happened.
    pub fn commit(&self, transfer: &mut Transfer) -> LedgerResult<TransferReceipt> {
        if transfer.state != TransferState::Validated {
            return Err(LedgerError::invalid_argument(format!(
                "transfer cannot be committed in state {:?}",
                transfer.state
            )));
        }

        let item_id = transfer.item_id;
        let source = transfer.source;
        let destination = transfer.destination;
        let quantity = transfer.quantity;

        let outcome = self.locks.with_exclusive(item_id, source, || {
            // Re-validation: the balance may have moved since validate().
            let available = current_stock_of(&self.store, item_id, Some(source))?;
            if available < quantity {
                return Err(LedgerError::insufficient_stock(available, quantity));
            }

            let reference = ReferenceNumber::new();
            let out_movement = self.store.append(
                MovementDraft::outbound(item_id, source, quantity, ReasonCode::Transferred)
                    .with_reference(reference),
            )?;

            let in_movement = match self.store.append(
                MovementDraft::inbound(item_id, destination, quantity).with_reference(reference),
            ) {
                Ok(movement) => movement,
                Err(err) => return Err(self.roll_back(reference, err)),
            };

            tracing::info!(
                reference = %reference,
                item = %item_id,
                quantity,
                "transfer committed"
            );
            Ok(TransferReceipt {
                reference,
                out_movement,
                in_movement,
            })
        });

        match outcome {
            Ok(receipt) => {
                transfer.state = TransferState::Committed;
                Ok(receipt)
            }
            Err(err) => {
                transfer.state = TransferState::Rejected;
                Err(err)
            }
        }
    }

    /// Request, validate and commit in one call.
    pub fn execute(
        &self,
        item_id: ItemId,
        source: WarehouseId,
        destination: WarehouseId,
        quantity: i64,
    ) -> LedgerResult<TransferReceipt> {
        let mut transfer = self.request(item_id, source, destination, quantity);
        self.validate(&mut transfer)?;
        self.commit(&mut transfer)
    }

    fn check(&self, transfer: &Transfer) -> LedgerResult<()> {
        if transfer.source == transfer.destination {
            return Err(LedgerError::invalid_movement(
                "source and destination warehouses must differ",
            ));
        }
        if transfer.quantity <= 0 {
            return Err(LedgerError::invalid_movement(format!(
                "transfer quantity must be positive (got {})",
                transfer.quantity
            )));
        }
        let available =
            current_stock_of(&self.store, transfer.item_id, Some(transfer.source))?;
        if available < transfer.quantity {
            return Err(LedgerError::insufficient_stock(available, transfer.quantity));
        }
        Ok(())
    }

    /// Compensate a one-sided transfer by deleting the shared reference.
    /// Returns the error to surface to the caller.
    fn roll_back(&self, reference: ReferenceNumber, cause: LedgerError) -> LedgerError {
        match self.store.delete_by_reference(&reference) {
            Ok(removed) => {
                tracing::warn!(
                    reference = %reference,
                    removed,
                    %cause,
                    "transfer rolled back after partial commit"
                );
                LedgerError::transfer_failed(format!(
                    "destination append failed ({cause}); transfer rolled back"
                ))
            }
            Err(rollback_err) => {
                tracing::error!(
                    reference = %reference,
                    %cause,
                    %rollback_err,
                    "transfer rollback failed; ledger may hold a one-sided movement"
                );
                LedgerError::storage(format!(
                    "rollback of reference {reference} failed: {rollback_err}"
                ))
            }
        }
    }
}

//! Ledger foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! strongly-typed identifiers, the ledger error taxonomy, and the master-data
//! lookup boundary the ledger consumes but never owns.

pub mod error;
pub mod id;
pub mod master_data;

pub use error::{LedgerError, LedgerResult};
pub use id::{CategoryId, ItemId, MovementId, ReferenceNumber, WarehouseId};
pub use master_data::{ItemRef, MasterData};

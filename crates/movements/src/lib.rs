//! Stock-movement domain model.
//!
//! This crate contains the business rules for movement records, implemented
//! purely as deterministic domain logic (no IO, no storage). A movement is an
//! atomic, immutable IN/OUT quantity event against an item at a warehouse;
//! everything the engine reports is derived by folding these records.

pub mod movement;
pub mod reason;

pub use movement::{MovementDraft, MovementType, StockMovement};
pub use reason::{Reason, ReasonCode, validate_reason, validate_reason_type};

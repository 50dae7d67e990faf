//! Movement record store boundary and in-memory implementation.
//!
//! The record store is the single source of truth: an append-only log of
//! immutable stock movements. Everything else the engine reports is derived
//! by folding it, so read models are disposable and recomputable at any time.

pub mod filter;
pub mod in_memory;
pub mod locks;
pub mod master;
pub mod r#trait;

pub use filter::MovementFilter;
pub use in_memory::InMemoryMovementStore;
pub use locks::StockLocks;
pub use master::InMemoryMasterData;
pub use r#trait::MovementStore;

//! Per-(item, warehouse) serialization of balance-mutating operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use stockledger_core::{ItemId, LedgerError, LedgerResult, WarehouseId};

/// Keyed mutex table granting scoped exclusive access to all movements of a
/// given (item, warehouse) balance.
///
/// OUT-issuing operations hold the key's lock across their whole
/// recompute-current-stock-then-append sequence, which makes the sufficiency
/// check race-free: two concurrent transfers depleting the same balance can
/// never both validate against a stale figure. IN-only appends cannot violate
/// non-negativity and skip the lock entirely. Distinct keys proceed in
/// parallel; there is no global lock.
#[derive(Debug, Default)]
pub struct StockLocks {
    table: Mutex<HashMap<(ItemId, WarehouseId), Arc<Mutex<()>>>>,
}

impl StockLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding exclusive access to the (item, warehouse) key.
    ///
    /// The table lock is released before `f` runs; only the key's own mutex
    /// is held, so operations on other keys are not blocked.
    pub fn with_exclusive<R>(
        &self,
        item_id: ItemId,
        warehouse_id: WarehouseId,
        f: impl FnOnce() -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        let key_lock = {
            let mut table = self
                .table
                .lock()
                .map_err(|_| LedgerError::storage("stock lock table poisoned"))?;
            Arc::clone(table.entry((item_id, warehouse_id)).or_default())
        };

        let _guard = key_lock
            .lock()
            .map_err(|_| LedgerError::storage("stock key lock poisoned"))?;
        f()
    }

    /// Run `f` while holding exclusive access to every given key at once.
    ///
    /// Keys are deduplicated and acquired in sorted order, so multi-key
    /// holders cannot deadlock against each other or against single-key
    /// holders. An empty key set runs `f` without locking anything.
    pub fn with_exclusive_all<R>(
        &self,
        mut keys: Vec<(ItemId, WarehouseId)>,
        f: impl FnOnce() -> LedgerResult<R>,
    ) -> LedgerResult<R> {
        keys.sort_unstable();
        keys.dedup();

        let key_locks = {
            let mut table = self
                .table
                .lock()
                .map_err(|_| LedgerError::storage("stock lock table poisoned"))?;
            keys.iter()
                .map(|key| Arc::clone(table.entry(*key).or_default()))
                .collect::<Vec<_>>()
        };

        let mut guards = Vec::with_capacity(key_locks.len());
        for key_lock in &key_locks {
            guards.push(
                key_lock
                    .lock()
                    .map_err(|_| LedgerError::storage("stock key lock poisoned"))?,
            );
        }
        f()
    }
}

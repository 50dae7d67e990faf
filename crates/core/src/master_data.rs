//! Master-data lookup boundary.
//!
//! Items, warehouses and categories are external master-data entities the
//! ledger references by id only. It never creates, renames, or deletes them;
//! it consumes this trait for append validation, low-stock thresholds and
//! category scoping.

use std::sync::Arc;

use crate::id::{CategoryId, ItemId, WarehouseId};

/// Catalog row as the ledger sees it: identity plus the fields the ledger
/// needs (display name for deterministic ordering, minimum-stock threshold,
/// category membership).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRef {
    pub id: ItemId,
    pub name: String,
    pub minimum_stock: i64,
    pub category: Option<CategoryId>,
}

/// Read-only master-data lookup injected into the ledger.
///
/// Implementations are expected to be cheap to query; the ledger calls
/// `item_exists`/`warehouse_exists` on every append.
pub trait MasterData: Send + Sync {
    fn item_exists(&self, id: ItemId) -> bool;

    fn warehouse_exists(&self, id: WarehouseId) -> bool;

    /// Minimum-stock threshold configured for the item (0 when unset).
    /// Used as the default low-stock threshold.
    fn minimum_stock_of(&self, id: ItemId) -> i64;

    /// Display name of the item, if known.
    fn item_name(&self, id: ItemId) -> Option<String>;

    /// Category the item belongs to, if any.
    fn category_of(&self, id: ItemId) -> Option<CategoryId>;

    /// Enumerate the catalog. Needed so low-stock detection can include
    /// items with zero movement records.
    fn list_items(&self) -> Vec<ItemRef>;
}

impl<M> MasterData for Arc<M>
where
    M: MasterData + ?Sized,
{
    fn item_exists(&self, id: ItemId) -> bool {
        (**self).item_exists(id)
    }

    fn warehouse_exists(&self, id: WarehouseId) -> bool {
        (**self).warehouse_exists(id)
    }

    fn minimum_stock_of(&self, id: ItemId) -> i64 {
        (**self).minimum_stock_of(id)
    }

    fn item_name(&self, id: ItemId) -> Option<String> {
        (**self).item_name(id)
    }

    fn category_of(&self, id: ItemId) -> Option<CategoryId> {
        (**self).category_of(id)
    }

    fn list_items(&self) -> Vec<ItemRef> {
        (**self).list_items()
    }
}

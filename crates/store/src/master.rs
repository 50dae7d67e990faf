//! In-memory master data for tests/dev.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use stockledger_core::{CategoryId, ItemId, ItemRef, MasterData, WarehouseId};

/// In-memory catalog of items and warehouses.
///
/// The ledger only reads master data; this implementation adds mutation
/// helpers so tests and dev setups can seed a catalog.
#[derive(Debug, Default)]
pub struct InMemoryMasterData {
    items: RwLock<HashMap<ItemId, ItemRef>>,
    warehouses: RwLock<HashSet<WarehouseId>>,
}

impl InMemoryMasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item and return its generated id.
    pub fn add_item(&self, name: impl Into<String>, minimum_stock: i64) -> ItemId {
        let item = ItemRef {
            id: ItemId::new(),
            name: name.into(),
            minimum_stock,
            category: None,
        };
        let id = item.id;
        self.insert_item(item);
        id
    }

    /// Register an item under a category and return its generated id.
    pub fn add_item_in_category(
        &self,
        name: impl Into<String>,
        minimum_stock: i64,
        category: CategoryId,
    ) -> ItemId {
        let item = ItemRef {
            id: ItemId::new(),
            name: name.into(),
            minimum_stock,
            category: Some(category),
        };
        let id = item.id;
        self.insert_item(item);
        id
    }

    pub fn insert_item(&self, item: ItemRef) {
        if let Ok(mut items) = self.items.write() {
            items.insert(item.id, item);
        }
    }

    pub fn add_warehouse(&self) -> WarehouseId {
        let id = WarehouseId::new();
        if let Ok(mut warehouses) = self.warehouses.write() {
            warehouses.insert(id);
        }
        id
    }
}

impl MasterData for InMemoryMasterData {
    fn item_exists(&self, id: ItemId) -> bool {
        self.items
            .read()
            .map(|items| items.contains_key(&id))
            .unwrap_or(false)
    }

    fn warehouse_exists(&self, id: WarehouseId) -> bool {
        self.warehouses
            .read()
            .map(|warehouses| warehouses.contains(&id))
            .unwrap_or(false)
    }

    fn minimum_stock_of(&self, id: ItemId) -> i64 {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(&id).map(|item| item.minimum_stock))
            .unwrap_or(0)
    }

    fn item_name(&self, id: ItemId) -> Option<String> {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(&id).map(|item| item.name.clone()))
    }

    fn category_of(&self, id: ItemId) -> Option<CategoryId> {
        self.items
            .read()
            .ok()
            .and_then(|items| items.get(&id).and_then(|item| item.category))
    }

    fn list_items(&self) -> Vec<ItemRef> {
        self.items
            .read()
            .map(|items| items.values().cloned().collect())
            .unwrap_or_default()
    }
}

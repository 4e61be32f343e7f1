use cucumber::World;
use deposit_pool_engine::{
    allocation_objects::{Allocation, AllocatorConfig, SweepResult},
    AddressAllocator,
    AllocationError,
    MemoryStore,
    PlaceholderJanitor,
    PoolRefreshApi,
    SqliteDatabase,
};
use log::*;

use crate::support::{prepare_catalog, ScriptedOrders};

#[derive(Default, Debug, World)]
pub struct PoolWorld {
    pub system: Option<PoolSystem>,
    pub last_pop: Option<Result<String, AllocationError>>,
    pub last_allocation: Option<Result<Allocation, AllocationError>>,
    pub last_sweep: Option<SweepResult>,
}

#[derive(Debug)]
pub struct PoolSystem {
    pub catalog: SqliteDatabase,
    pub store: MemoryStore,
    pub orders: ScriptedOrders,
    pub allocator: AddressAllocator<MemoryStore>,
    pub refresh: PoolRefreshApi<SqliteDatabase, MemoryStore>,
    pub janitor: PlaceholderJanitor<MemoryStore, ScriptedOrders>,
}

impl PoolWorld {
    pub fn system(&self) -> &PoolSystem {
        self.system.as_ref().expect("Deposit pool not initialised")
    }
}

impl PoolSystem {
    pub async fn new() -> Self {
        let catalog = prepare_catalog().await;
        debug!("Created catalog: {}", catalog.url());
        let store = MemoryStore::new();
        let orders = ScriptedOrders::default();
        let allocator = AddressAllocator::new(store.clone(), AllocatorConfig::default());
        let refresh = PoolRefreshApi::new(catalog.clone(), store.clone());
        let janitor = PlaceholderJanitor::new(store.clone(), orders.clone());
        Self { catalog, store, orders, allocator, refresh, janitor }
    }
}

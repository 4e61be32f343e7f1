//! Deposit Pool Engine
//!
//! The deposit pool engine allocates receiving addresses for stablecoin (USDT TRC20) orders. Incoming transfers carry
//! no memo, so a transfer can only be matched to its order by the address it was sent to and the amount. The engine
//! guarantees that no two pending orders on the same address are waiting for amounts within the collision tolerance
//! of each other.
//!
//! The library is divided into three sections:
//! 1. Backend contracts ([`mod@traits`]) and their implementations. The address catalog lives in SQLite
//!    ([`SqliteDatabase`]). The rotating address pool and the per-address placeholder index live in a shared keyed
//!    store: Redis ([`RedisStore`]) in production, or [`MemoryStore`] in tests.
//! 2. The public API ([`AddressAllocator`], [`PoolRefreshApi`] and [`PlaceholderJanitor`]). These are plain service
//!    objects. Construct them once and share them.
//! 3. Data types ([`mod@db_types`]) shared by all of the above.
pub mod db_types;
pub mod helpers;
pub mod memory;
pub mod redis_store;
pub mod traits;

mod dpa_api;
#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use dpa_api::{
    allocation_objects,
    allocator_api::AddressAllocator,
    errors::AllocationError,
    janitor_api::PlaceholderJanitor,
    pool_api::PoolRefreshApi,
};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
#[cfg(feature = "sqlite")]
pub use sqlite::{db::db_url, SqliteDatabase};
pub use traits::{
    AddressStore,
    AddressStoreError,
    DepositStore,
    DepositStoreError,
    LifetimeOnly,
    OrderStatusError,
    OrderStatusLookup,
    PlaceholderIndex,
    PoolRegistry,
};

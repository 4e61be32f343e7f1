//! Backend contracts for the deposit pool engine.
//!
//! * [`AddressStore`] is the durable address catalog. It only has to supply the ordered list of active addresses to
//!   the allocator, but also exposes the administrative calls used to maintain the catalog.
//! * [`PoolRegistry`] is the rotating queue of addresses that are currently allocatable.
//! * [`PlaceholderIndex`] records, per address, which pending orders are waiting for which amounts.
//! * [`DepositStore`] is shorthand for a keyed store that provides both of the above (Redis in production, or the
//!   in-memory store in tests).
//! * [`OrderStatusLookup`] is the read-only view of the order store that the placeholder janitor consults.
mod address_store;
mod deposit_store;
mod order_status;
mod placeholder_index;
mod pool_registry;

pub use address_store::{AddressStore, AddressStoreError};
pub(crate) use deposit_store::amount_window;
pub use deposit_store::{DepositStore, DepositStoreError};
pub use order_status::{LifetimeOnly, OrderStatusError, OrderStatusLookup};
pub use placeholder_index::PlaceholderIndex;
pub use pool_registry::PoolRegistry;

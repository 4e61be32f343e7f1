//! The public API of the deposit pool engine.
//!
//! * [`AddressAllocator`](allocator_api::AddressAllocator) picks receiving addresses for new orders and manages the
//!   placeholders that keep amounts on one address apart.
//! * [`PoolRefreshApi`](pool_api::PoolRefreshApi) rebuilds the rotating pool from the address catalog.
//! * [`PlaceholderJanitor`](janitor_api::PlaceholderJanitor) reaps placeholders whose orders are long gone.
pub mod allocation_objects;
pub mod allocator_api;
pub mod errors;
pub mod janitor_api;
pub mod pool_api;

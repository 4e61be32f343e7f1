//! # Redis keyed store
//!
//! The address pool and the placeholder index live in Redis, so that every allocator instance sees the same rotation
//! and the same pending orders. The layout is:
//!
//! * `u_pool`: a list of addresses in rotation order.
//! * `u:<address>`: a sorted set per address. Members are order ids, scores are the expected amounts.
//! * `u_created`: a sorted set of `<address>|<order_id>` members, scored by creation time in milliseconds. The
//!   placeholder janitor reads this to find stale placeholders.
//!
//! Placeholders written before the creation index existed have no entry in `u_created`, so the janitor cannot see
//! them. [`RedisStore::backfill_created_index`] adds the missing entries, stamped with the current time, and runs at
//! server start-up. Those placeholders then age out one full lifetime after the backfill.
//!
//! Keys can be namespaced (see [`RedisKeys::with_namespace`]) so that test runs do not disturb a live pool.
mod keys;
mod redis_impl;
mod scripts;

pub use keys::RedisKeys;
pub use redis_impl::RedisStore;

use chrono::{DateTime, Utc};
use dpa_common::UsdtAmount;

use crate::{
    db_types::{OrderId, Placeholder, PlaceholderRecord},
    traits::DepositStoreError,
};

/// Per-address index of pending orders, keyed by order id and ordered by expected amount.
///
/// The index does not enforce the collision tolerance on [`add`](PlaceholderIndex::add). Callers that want the
/// check and the insert to happen together should use [`reserve`](PlaceholderIndex::reserve).
#[allow(async_fn_in_trait)]
pub trait PlaceholderIndex {
    /// Registers `order_id` as waiting on `address` for `amount`. Re-adding the same order id overwrites the amount.
    /// The creation time of an existing placeholder is kept.
    async fn add(&self, address: &str, order_id: &OrderId, amount: UsdtAmount) -> Result<(), DepositStoreError>;

    /// All placeholders under `address` whose amount lies in `[amount - tolerance, amount + tolerance]`, lowest
    /// amount first.
    async fn in_range(
        &self,
        address: &str,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<Vec<Placeholder>, DepositStoreError>;

    /// Removes the placeholder for `order_id` under `address`. Removing a placeholder that does not exist is not an
    /// error.
    async fn remove(&self, address: &str, order_id: &OrderId) -> Result<(), DepositStoreError>;

    /// Atomically registers the placeholder if, and only if, no *other* order has a placeholder under `address`
    /// within `tolerance` of `amount`. Returns `true` if the placeholder was registered.
    async fn reserve(
        &self,
        address: &str,
        order_id: &OrderId,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<bool, DepositStoreError>;

    /// Every placeholder, across all addresses, that was created at or before `cutoff`.
    async fn created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<PlaceholderRecord>, DepositStoreError>;
}

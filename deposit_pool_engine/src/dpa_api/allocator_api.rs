use std::fmt::Debug;

use dpa_common::UsdtAmount;
use log::*;

use crate::{
    db_types::{OrderId, Placeholder},
    dpa_api::{
        allocation_objects::{Allocation, AllocatorConfig},
        errors::AllocationError,
    },
    traits::DepositStore,
};

/// `AddressAllocator` hands out receiving addresses so that no two pending orders on the same address are waiting
/// for amounts within the collision tolerance of each other. This lets an incoming transfer be matched to its order
/// by `(address, amount)` alone.
///
/// There are two ways to use it:
/// * [`Self::allocate`] picks an address and registers the placeholder in one step. Concurrent callers can never
///   end up with two colliding orders on the same address.
/// * [`Self::pop`] followed by [`Self::register_placeholder`]. This is the two-step protocol used by older callers.
///   Two workers asking for similar amounts at the same moment can both be handed the same address, since nothing
///   is reserved until the placeholder is registered.
pub struct AddressAllocator<B> {
    db: B,
    config: AllocatorConfig,
}

impl<B> Debug for AddressAllocator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AddressAllocator ({:?})", self.config)
    }
}

impl<B> AddressAllocator<B> {
    pub fn new(db: B, config: AllocatorConfig) -> Self {
        Self { db, config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn tolerance(&self) -> UsdtAmount {
        self.config.tolerance
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B> AddressAllocator<B>
where B: DepositStore
{
    /// Finds an address that has no pending order within the collision tolerance of `amount`.
    ///
    /// Candidates are taken from the head of the pool and rotated to the tail as they are examined, so successive
    /// calls spread orders across the pool. At most one full cycle of the pool is examined (fewer if
    /// `max_probes` is set).
    ///
    /// Nothing is reserved. The caller must register a placeholder for the order on the returned address.
    pub async fn pop(&self, amount: UsdtAmount) -> Result<String, AllocationError> {
        check_amount(amount)?;
        check_window(amount, self.config.tolerance)?;
        let probes = self.probe_limit().await?;
        for _ in 0..probes {
            let candidate = self.db.rotate_once().await?;
            let conflicts = self.db.in_range(&candidate, amount, self.config.tolerance).await?;
            if conflicts.is_empty() {
                debug!("🎯️ Address {candidate} is free for {amount}");
                return Ok(candidate);
            }
            trace!("🎯️ Address {candidate} has {} orders waiting near {amount}. Skipping it.", conflicts.len());
        }
        warn!("🎯️ No address is free for {amount} after examining {probes} candidates");
        Err(AllocationError::NoAvailableAddress)
    }

    /// Finds a free address for `amount` and registers the placeholder for `order_id` on it in the same step.
    ///
    /// Calling this again for an order that already holds a placeholder is safe: an order never conflicts with
    /// itself.
    pub async fn allocate(&self, order_id: &OrderId, amount: UsdtAmount) -> Result<Allocation, AllocationError> {
        check_amount(amount)?;
        check_window(amount, self.config.tolerance)?;
        let probes = self.probe_limit().await?;
        for _ in 0..probes {
            let candidate = self.db.rotate_once().await?;
            if self.db.reserve(&candidate, order_id, amount, self.config.tolerance).await? {
                info!("🎯️ Order {order_id} for {amount} will be paid to {candidate}");
                return Ok(Allocation { address: candidate, order_id: order_id.clone(), amount });
            }
            trace!("🎯️ Address {candidate} is taken near {amount}. Skipping it.");
        }
        warn!("🎯️ Could not allocate an address to order {order_id} for {amount} after examining {probes} candidates");
        Err(AllocationError::NoAvailableAddress)
    }

    /// Registers `order_id` as waiting on `address` for `amount`. Re-registering an order overwrites its amount.
    pub async fn register_placeholder(
        &self,
        address: &str,
        order_id: &OrderId,
        amount: UsdtAmount,
    ) -> Result<(), AllocationError> {
        check_amount(amount)?;
        self.db.add(address, order_id, amount).await?;
        Ok(())
    }

    /// Releases the placeholder for `order_id` on `address`, typically once the order is paid or has expired.
    /// Releasing a placeholder that does not exist succeeds.
    pub async fn remove_placeholder(&self, address: &str, order_id: &OrderId) -> Result<(), AllocationError> {
        self.db.remove(address, order_id).await?;
        Ok(())
    }

    /// The placeholders on `address` with amounts within `tolerance` of `amount`. The configured collision tolerance
    /// is used if `tolerance` is `None`.
    ///
    /// This is how a payment watcher matches an incoming transfer to its order.
    pub async fn query_placeholders(
        &self,
        address: &str,
        amount: UsdtAmount,
        tolerance: Option<UsdtAmount>,
    ) -> Result<Vec<Placeholder>, AllocationError> {
        let tolerance = tolerance.unwrap_or(self.config.tolerance);
        if tolerance < UsdtAmount::default() {
            return Err(AllocationError::InvalidAmount(format!("Tolerance cannot be negative: {tolerance}")));
        }
        check_window(amount, tolerance)?;
        let result = self.db.in_range(address, amount, tolerance).await?;
        Ok(result)
    }

    /// Replaces the pool with `addresses`, in order.
    pub async fn flush_pool(&self, addresses: &[String]) -> Result<(), AllocationError> {
        self.db.replace(addresses).await?;
        Ok(())
    }

    pub async fn pool_size(&self) -> Result<usize, AllocationError> {
        let size = self.db.size().await?;
        Ok(size)
    }

    async fn probe_limit(&self) -> Result<usize, AllocationError> {
        let size = self.db.size().await?;
        if size == 0 {
            warn!("🎯️ The address pool is empty. Nothing can be allocated until it is refreshed.");
            return Err(AllocationError::PoolExhausted);
        }
        Ok(self.config.probe_limit(size))
    }
}

fn check_amount(amount: UsdtAmount) -> Result<(), AllocationError> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(AllocationError::InvalidAmount(format!("Order amounts must be positive, got {amount}")))
    }
}

fn check_window(amount: UsdtAmount, tolerance: UsdtAmount) -> Result<(), AllocationError> {
    amount.window(tolerance).map(|_| ()).map_err(|e| AllocationError::InvalidAmount(e.to_string()))
}

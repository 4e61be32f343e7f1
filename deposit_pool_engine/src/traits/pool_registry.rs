use crate::traits::DepositStoreError;

/// The rotating queue of addresses that are currently allocatable.
#[allow(async_fn_in_trait)]
pub trait PoolRegistry {
    /// Discards the current pool and loads `addresses` in the given order, as a single atomic step. Readers never
    /// observe a partially loaded pool. An empty list empties the pool.
    async fn replace(&self, addresses: &[String]) -> Result<(), DepositStoreError>;

    /// The number of addresses in the pool. Other callers may change the pool at any time, so this is an iteration
    /// bound rather than a guarantee.
    async fn size(&self) -> Result<usize, DepositStoreError>;

    /// Moves the address at the head of the pool to the tail and returns it. Calling this `n` times on a pool of
    /// `n` addresses visits each address exactly once, in pool order.
    ///
    /// Returns [`DepositStoreError::PoolExhausted`] if the pool is empty.
    async fn rotate_once(&self) -> Result<String, DepositStoreError>;
}

use std::fmt::Debug;

use log::*;

use crate::{
    dpa_api::errors::AllocationError,
    traits::{AddressStore, PoolRegistry},
};

/// Rebuilds the rotating pool from the address catalog.
///
/// The pool is replaced wholesale with the catalog's active addresses, highest priority first. Placeholders are not
/// touched, so orders already waiting on an address that has since been disabled can still be matched.
pub struct PoolRefreshApi<A, B> {
    catalog: A,
    pool: B,
}

impl<A, B> Debug for PoolRefreshApi<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PoolRefreshApi")
    }
}

impl<A, B> PoolRefreshApi<A, B> {
    pub fn new(catalog: A, pool: B) -> Self {
        Self { catalog, pool }
    }

    pub fn catalog(&self) -> &A {
        &self.catalog
    }
}

impl<A, B> PoolRefreshApi<A, B>
where
    A: AddressStore,
    B: PoolRegistry,
{
    /// Loads the active addresses from the catalog into the pool. Returns the new pool size.
    pub async fn refresh(&self) -> Result<usize, AllocationError> {
        let addresses = self.catalog.active_addresses().await?;
        let addresses = addresses.into_iter().map(|a| a.address).collect::<Vec<_>>();
        self.pool.replace(&addresses).await?;
        info!("🔁️ Address pool refreshed from the catalog. {} addresses are now in rotation.", addresses.len());
        Ok(addresses.len())
    }
}

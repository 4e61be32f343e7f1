use thiserror::Error;

use crate::{
    db_types::{DepositAddress, NewDepositAddress},
    helpers::TronAddressError,
};

#[derive(Debug, Clone, Error)]
pub enum AddressStoreError {
    #[error("The address catalog is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Invalid receiving address. {0}")]
    InvalidAddress(String),
    #[error("Address {0} is not in the catalog")]
    AddressNotFound(String),
    #[error("Address {0} is already in the catalog")]
    AddressAlreadyExists(String),
}

impl From<sqlx::Error> for AddressStoreError {
    fn from(e: sqlx::Error) -> Self {
        AddressStoreError::StoreUnavailable(e.to_string())
    }
}

impl From<TronAddressError> for AddressStoreError {
    fn from(e: TronAddressError) -> Self {
        AddressStoreError::InvalidAddress(e.to_string())
    }
}

/// The durable catalog of every receiving address known to the system.
#[allow(async_fn_in_trait)]
pub trait AddressStore {
    /// The enabled addresses, highest priority first. Addresses with equal priority are returned in the order they
    /// were added to the catalog. This is the list that seeds the pool.
    async fn active_addresses(&self) -> Result<Vec<DepositAddress>, AddressStoreError>;

    /// Adds a new address to the catalog. The address must be a valid TRON address and must not already exist.
    async fn insert_address(&self, address: NewDepositAddress) -> Result<DepositAddress, AddressStoreError>;

    async fn fetch_address(&self, address: &str) -> Result<Option<DepositAddress>, AddressStoreError>;

    /// Every address in the catalog, enabled or not, highest priority first.
    async fn fetch_all_addresses(&self) -> Result<Vec<DepositAddress>, AddressStoreError>;

    /// Enables or disables an address. Disabled addresses drop out of the pool at the next refresh.
    async fn set_address_enabled(&self, address: &str, enabled: bool) -> Result<DepositAddress, AddressStoreError>;

    async fn set_address_priority(&self, address: &str, priority: i64) -> Result<DepositAddress, AddressStoreError>;
}

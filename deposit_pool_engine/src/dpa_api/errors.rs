use thiserror::Error;

use crate::traits::{AddressStoreError, DepositStoreError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    #[error("A backing store is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("The address pool is empty")]
    PoolExhausted,
    #[error("Every address in the pool already has an order waiting for a similar amount")]
    NoAvailableAddress,
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
}

impl From<DepositStoreError> for AllocationError {
    fn from(e: DepositStoreError) -> Self {
        match e {
            DepositStoreError::StoreUnavailable(s) => AllocationError::StoreUnavailable(s),
            DepositStoreError::PoolExhausted => AllocationError::PoolExhausted,
            DepositStoreError::InvalidRecord(s) => AllocationError::StoreUnavailable(format!("Invalid record. {s}")),
            DepositStoreError::InvalidAmount(s) => AllocationError::InvalidAmount(s),
        }
    }
}

impl From<AddressStoreError> for AllocationError {
    fn from(e: AddressStoreError) -> Self {
        match e {
            AddressStoreError::StoreUnavailable(s) => AllocationError::StoreUnavailable(s),
            other => AllocationError::StoreUnavailable(other.to_string()),
        }
    }
}

use dpa_common::{UsdtAmount, UsdtConversionError};
use thiserror::Error;

use crate::traits::{PlaceholderIndex, PoolRegistry};

#[derive(Debug, Clone, Error)]
pub enum DepositStoreError {
    #[error("The keyed store is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("The address pool is empty")]
    PoolExhausted,
    #[error("The keyed store holds a record that cannot be read: {0}")]
    InvalidRecord(String),
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
}

impl From<redis::RedisError> for DepositStoreError {
    fn from(e: redis::RedisError) -> Self {
        DepositStoreError::StoreUnavailable(e.to_string())
    }
}

impl From<UsdtConversionError> for DepositStoreError {
    fn from(e: UsdtConversionError) -> Self {
        DepositStoreError::InvalidRecord(e.to_string())
    }
}

/// The bounds of a range query around `amount`.
pub(crate) fn amount_window(
    amount: UsdtAmount,
    tolerance: UsdtAmount,
) -> Result<(UsdtAmount, UsdtAmount), DepositStoreError> {
    amount.window(tolerance).map_err(|e| DepositStoreError::InvalidAmount(e.to_string()))
}

/// A keyed store that hosts both the address pool and the placeholder index.
pub trait DepositStore: PoolRegistry + PlaceholderIndex {}

impl<T> DepositStore for T where T: PoolRegistry + PlaceholderIndex {}

use thiserror::Error;

use crate::db_types::{OrderId, OrderStatus};

#[derive(Debug, Clone, Error)]
pub enum OrderStatusError {
    #[error("The order store is unavailable: {0}")]
    Unavailable(String),
    #[error("The order store returned an unexpected response: {0}")]
    InvalidResponse(String),
}

/// Read-only access to the order store.
#[allow(async_fn_in_trait)]
pub trait OrderStatusLookup {
    /// The current status of the order, or `None` if the order store does not know about it.
    async fn order_status(&self, order_id: &OrderId) -> Result<Option<OrderStatus>, OrderStatusError>;
}

/// Used when no order store is configured. Every order is reported as unknown, so placeholders are reaped purely on
/// age.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifetimeOnly;

impl OrderStatusLookup for LifetimeOnly {
    async fn order_status(&self, _order_id: &OrderId) -> Result<Option<OrderStatus>, OrderStatusError> {
        Ok(None)
    }
}

use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use dpa_common::UsdtAmount;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    DepositAddress     ---------------------------------------------------------
/// A receiving address as recorded in the address catalog.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct DepositAddress {
    pub id: i64,
    pub address: String,
    pub is_active: bool,
    /// Higher priorities are seeded into the pool first.
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   NewDepositAddress   ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepositAddress {
    pub address: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default = "default_priority")]
    pub priority: i64,
}

fn default_active() -> bool {
    true
}

fn default_priority() -> i64 {
    1
}

impl NewDepositAddress {
    pub fn new<S: Into<String>>(address: S) -> Self {
        Self { address: address.into(), is_active: default_active(), priority: default_priority() }
    }

    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_active = false;
        self
    }
}

//--------------------------------------      Placeholder      ---------------------------------------------------------
/// A pending order waiting on an address for a specific amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placeholder {
    pub order_id: OrderId,
    pub amount: UsdtAmount,
}

impl Placeholder {
    pub fn new(order_id: OrderId, amount: UsdtAmount) -> Self {
        Self { order_id, amount }
    }
}

//--------------------------------------   PlaceholderRecord   ---------------------------------------------------------
/// Locates a placeholder in the index, together with the time it was first registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderRecord {
    pub address: String,
    pub order_id: OrderId,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------      OrderStatus      ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// The order is still waiting for a transfer.
    Pending,
    Paid,
    Failed,
    Expired,
}

#[derive(Debug, Clone, Error)]
#[error("Invalid order status: {0}")]
pub struct OrderStatusConversionError(String);

impl FromStr for OrderStatus {
    type Err = OrderStatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "failed" => Ok(Self::Failed),
            "expired" => Ok(Self::Expired),
            _ => Err(OrderStatusConversionError(s.to_string())),
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Paid => write!(f, "Paid"),
            Self::Failed => write!(f, "Failed"),
            Self::Expired => write!(f, "Expired"),
        }
    }
}

impl OrderStatus {
    /// True once the order can no longer receive a transfer, i.e. its placeholder is no longer needed.
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

use std::fmt::Display;

use deposit_pool_engine::db_types::OrderId;
use dpa_common::UsdtAmount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSizeResponse {
    pub size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushPoolRequest {
    pub addresses: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopRequest {
    pub amount: UsdtAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopResponse {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllocateRequest {
    pub order_id: OrderId,
    pub amount: UsdtAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderRequest {
    pub address: String,
    pub order_id: OrderId,
    pub amount: UsdtAmount,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderPath {
    pub address: String,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceholderQuery {
    pub amount: UsdtAmount,
    pub tolerance: Option<UsdtAmount>,
}

/// Changes to a catalog address. At least one field must be present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddressUpdate {
    pub is_active: Option<bool>,
    pub priority: Option<i64>,
}

use std::str::FromStr;

use dpa_common::UsdtAmount;
use serde::{Deserialize, Serialize};

use crate::db_types::OrderId;

/// The default collision tolerance, in whole USDT.
pub const DEFAULT_COLLISION_TOLERANCE: i64 = 2;

/// Tuning for [`AddressAllocator`](crate::AddressAllocator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorConfig {
    /// Two orders on the same address must differ by more than this amount.
    pub tolerance: UsdtAmount,
    /// Upper bound on the number of candidates examined per allocation. `None` examines the whole pool once.
    pub max_probes: Option<usize>,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self { tolerance: UsdtAmount::from(DEFAULT_COLLISION_TOLERANCE), max_probes: None }
    }
}

impl AllocatorConfig {
    pub fn with_tolerance(mut self, tolerance: UsdtAmount) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// A limit of zero is treated as no limit.
    pub fn with_max_probes(mut self, max_probes: usize) -> Self {
        self.max_probes = (max_probes > 0).then_some(max_probes);
        self
    }

    /// The number of candidates to examine given the current pool size.
    pub fn probe_limit(&self, pool_size: usize) -> usize {
        self.max_probes.map_or(pool_size, |m| m.min(pool_size))
    }
}

/// An address that has been handed out to an order, with its placeholder already in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub address: String,
    pub order_id: OrderId,
    pub amount: UsdtAmount,
}

/// The outcome of one placeholder janitor pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepResult {
    pub removed: usize,
    pub retained: usize,
}

impl SweepResult {
    pub fn examined(&self) -> usize {
        self.removed + self.retained
    }
}

/// Parses a tolerance string, e.g. from configuration. Tolerances must not be negative.
pub fn parse_tolerance(s: &str) -> Result<UsdtAmount, String> {
    let tolerance = UsdtAmount::from_str(s).map_err(|e| e.to_string())?;
    if tolerance < UsdtAmount::default() {
        return Err(format!("Tolerance cannot be negative: {tolerance}"));
    }
    Ok(tolerance)
}

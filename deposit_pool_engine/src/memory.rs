//! An in-process [`DepositStore`](crate::traits::DepositStore).
//!
//! Every operation runs under a single mutex, so `rotate_once`, `replace` and `reserve` are atomic with respect to
//! each other, just as they are on Redis. It is used by the test suites and is handy for running the allocator
//! without a Redis server.
use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use chrono::{DateTime, Utc};
use dpa_common::UsdtAmount;
use log::*;

use crate::{
    db_types::{OrderId, Placeholder, PlaceholderRecord},
    traits::{amount_window, DepositStoreError, PlaceholderIndex, PoolRegistry},
};

#[derive(Debug, Clone)]
struct Entry {
    amount: UsdtAmount,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct State {
    pool: VecDeque<String>,
    placeholders: HashMap<String, HashMap<OrderId, Entry>>,
}

impl State {
    fn conflicts(
        &self,
        address: &str,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<Vec<Placeholder>, DepositStoreError> {
        let (min, max) = amount_window(amount, tolerance)?;
        let mut result = self
            .placeholders
            .get(address)
            .map(|orders| {
                orders
                    .iter()
                    .filter(|(_, e)| e.amount >= min && e.amount <= max)
                    .map(|(id, e)| Placeholder::new(id.clone(), e.amount))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        result.sort_by(|a, b| a.amount.cmp(&b.amount).then_with(|| a.order_id.cmp(&b.order_id)));
        Ok(result)
    }

    fn insert(&mut self, address: &str, order_id: &OrderId, amount: UsdtAmount, now: DateTime<Utc>) {
        let orders = self.placeholders.entry(address.to_string()).or_default();
        orders
            .entry(order_id.clone())
            .and_modify(|e| e.amount = amount)
            .or_insert(Entry { amount, created_at: now });
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DepositStoreError> {
        self.state.lock().map_err(|e| DepositStoreError::StoreUnavailable(format!("Store lock poisoned: {e}")))
    }

    /// Registers a placeholder with an explicit creation time.
    pub fn add_created_at(
        &self,
        address: &str,
        order_id: &OrderId,
        amount: UsdtAmount,
        created_at: DateTime<Utc>,
    ) -> Result<(), DepositStoreError> {
        self.lock()?.insert(address, order_id, amount, created_at);
        Ok(())
    }

    /// A snapshot of the pool, head first.
    pub fn pool_snapshot(&self) -> Result<Vec<String>, DepositStoreError> {
        Ok(self.lock()?.pool.iter().cloned().collect())
    }

    /// The total number of placeholders across all addresses.
    pub fn placeholder_count(&self) -> Result<usize, DepositStoreError> {
        Ok(self.lock()?.placeholders.values().map(HashMap::len).sum())
    }
}

impl PoolRegistry for MemoryStore {
    async fn replace(&self, addresses: &[String]) -> Result<(), DepositStoreError> {
        let mut state = self.lock()?;
        if addresses.is_empty() {
            warn!("🧮️ The address pool is being replaced with an empty list. No addresses can be allocated.");
        }
        state.pool = addresses.iter().cloned().collect();
        Ok(())
    }

    async fn size(&self) -> Result<usize, DepositStoreError> {
        Ok(self.lock()?.pool.len())
    }

    async fn rotate_once(&self) -> Result<String, DepositStoreError> {
        let mut state = self.lock()?;
        let head = state.pool.pop_front().ok_or(DepositStoreError::PoolExhausted)?;
        state.pool.push_back(head.clone());
        Ok(head)
    }
}

impl PlaceholderIndex for MemoryStore {
    async fn add(&self, address: &str, order_id: &OrderId, amount: UsdtAmount) -> Result<(), DepositStoreError> {
        self.add_created_at(address, order_id, amount, Utc::now())
    }

    async fn in_range(
        &self,
        address: &str,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<Vec<Placeholder>, DepositStoreError> {
        self.lock()?.conflicts(address, amount, tolerance)
    }

    async fn remove(&self, address: &str, order_id: &OrderId) -> Result<(), DepositStoreError> {
        let mut state = self.lock()?;
        let now_empty = match state.placeholders.get_mut(address) {
            Some(orders) => {
                orders.remove(order_id);
                orders.is_empty()
            },
            None => false,
        };
        if now_empty {
            state.placeholders.remove(address);
        }
        Ok(())
    }

    async fn reserve(
        &self,
        address: &str,
        order_id: &OrderId,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<bool, DepositStoreError> {
        let mut state = self.lock()?;
        let blocked = state.conflicts(address, amount, tolerance)?.iter().any(|p| &p.order_id != order_id);
        if blocked {
            return Ok(false);
        }
        state.insert(address, order_id, amount, Utc::now());
        Ok(true)
    }

    async fn created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<PlaceholderRecord>, DepositStoreError> {
        let state = self.lock()?;
        let mut result = state
            .placeholders
            .iter()
            .flat_map(|(address, orders)| {
                orders.iter().filter(move |(_, e)| e.created_at <= cutoff).map(move |(id, e)| PlaceholderRecord {
                    address: address.clone(),
                    order_id: id.clone(),
                    created_at: e.created_at,
                })
            })
            .collect::<Vec<_>>();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(result)
    }
}

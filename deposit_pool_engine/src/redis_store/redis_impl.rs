use std::{fmt::Debug, sync::Arc};

use chrono::{DateTime, TimeZone, Utc};
use dpa_common::UsdtAmount;
use log::*;
use redis::{aio::ConnectionManager, AsyncCommands, AsyncIter, Client, Script};

use super::{keys::RedisKeys, scripts::RESERVE_PLACEHOLDER};
use crate::{
    db_types::{OrderId, Placeholder, PlaceholderRecord},
    traits::{amount_window, DepositStoreError, PlaceholderIndex, PoolRegistry},
};

/// The production [`DepositStore`](crate::traits::DepositStore). Cloning is cheap; clones share the underlying
/// connection manager.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
    keys: RedisKeys,
    reserve_script: Arc<Script>,
}

impl Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RedisStore ({:?})", self.keys)
    }
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, DepositStoreError> {
        Self::connect_with_keys(url, RedisKeys::default()).await
    }

    pub async fn connect_with_keys(url: &str, keys: RedisKeys) -> Result<Self, DepositStoreError> {
        let client = Client::open(url)?;
        let manager = ConnectionManager::new(client).await?;
        debug!("🧮️ Connected to the keyed store");
        Ok(Self { manager, keys, reserve_script: Arc::new(Script::new(RESERVE_PLACEHOLDER)) })
    }

    pub fn keys(&self) -> &RedisKeys {
        &self.keys
    }

    /// Adds a creation-index entry, dated now, for every placeholder that lacks one. Existing entries are left as
    /// they are. Returns the number of entries added.
    pub async fn backfill_created_index(&self) -> Result<usize, DepositStoreError> {
        let placeholder_keys = {
            let mut conn = self.manager.clone();
            let mut iter: AsyncIter<String> = conn.scan_match(self.keys.placeholders_pattern()).await?;
            let mut keys = Vec::new();
            while let Some(key) = iter.next_item().await {
                keys.push(key);
            }
            keys
        };
        let mut conn = self.manager.clone();
        let index = self.keys.created_index();
        let now = Utc::now().timestamp_millis();
        let mut added = 0;
        for key in &placeholder_keys {
            let Some(address) = self.keys.address_of(key) else { continue };
            let order_ids: Vec<String> = conn.zrange(key, 0, -1).await?;
            if order_ids.is_empty() {
                continue;
            }
            let mut pipe = redis::pipe();
            for order_id in &order_ids {
                pipe.cmd("ZADD").arg(&index).arg("NX").arg(now).arg(RedisKeys::index_member(address, order_id));
            }
            let counts: Vec<usize> = pipe.query_async(&mut conn).await?;
            added += counts.iter().sum::<usize>();
        }
        if added > 0 {
            info!("🧮️ Added {added} placeholders from {} addresses to the creation index", placeholder_keys.len());
        } else {
            debug!("🧮️ Every placeholder is already in the creation index");
        }
        Ok(added)
    }

    /// Round-trips a `PING` to check that the store is reachable.
    pub async fn ping(&self) -> Result<(), DepositStoreError> {
        let mut conn = self.manager.clone();
        let pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        if pong == "PONG" {
            Ok(())
        } else {
            Err(DepositStoreError::StoreUnavailable(format!("Unexpected PING response: {pong}")))
        }
    }
}

impl PoolRegistry for RedisStore {
    async fn replace(&self, addresses: &[String]) -> Result<(), DepositStoreError> {
        let mut conn = self.manager.clone();
        let pool = self.keys.pool();
        let mut pipe = redis::pipe();
        pipe.atomic().del(&pool).ignore();
        if addresses.is_empty() {
            warn!("🧮️ The address pool is being replaced with an empty list. No addresses can be allocated.");
        } else {
            pipe.rpush(&pool, addresses).ignore();
        }
        let _: () = pipe.query_async(&mut conn).await?;
        info!("🧮️ Address pool replaced with {} addresses", addresses.len());
        Ok(())
    }

    async fn size(&self) -> Result<usize, DepositStoreError> {
        let mut conn = self.manager.clone();
        let size: usize = conn.llen(self.keys.pool()).await?;
        Ok(size)
    }

    async fn rotate_once(&self) -> Result<String, DepositStoreError> {
        let mut conn = self.manager.clone();
        let pool = self.keys.pool();
        let head: Option<String> =
            redis::cmd("LMOVE").arg(&pool).arg(&pool).arg("LEFT").arg("RIGHT").query_async(&mut conn).await?;
        head.ok_or(DepositStoreError::PoolExhausted)
    }
}

impl PlaceholderIndex for RedisStore {
    async fn add(&self, address: &str, order_id: &OrderId, amount: UsdtAmount) -> Result<(), DepositStoreError> {
        let mut conn = self.manager.clone();
        let score = amount.to_score()?;
        let now = Utc::now().timestamp_millis();
        let member = RedisKeys::index_member(address, order_id.as_str());
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zadd(self.keys.placeholders(address), order_id.as_str(), score)
            .ignore()
            .cmd("ZADD")
            .arg(self.keys.created_index())
            .arg("NX")
            .arg(now)
            .arg(member)
            .ignore();
        let _: () = pipe.query_async(&mut conn).await?;
        debug!("🧮️ Placeholder for order {order_id} ({amount}) registered on {address}");
        Ok(())
    }

    async fn in_range(
        &self,
        address: &str,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<Vec<Placeholder>, DepositStoreError> {
        let (min, max) = amount_window(amount, tolerance)?;
        let (min, max) = (min.to_plain_string(), max.to_plain_string());
        let mut conn = self.manager.clone();
        let members: Vec<(String, f64)> =
            conn.zrangebyscore_withscores(self.keys.placeholders(address), min, max).await?;
        members
            .into_iter()
            .map(|(order_id, score)| Ok(Placeholder::new(OrderId::from(order_id), UsdtAmount::from_score(score)?)))
            .collect()
    }

    async fn remove(&self, address: &str, order_id: &OrderId) -> Result<(), DepositStoreError> {
        let mut conn = self.manager.clone();
        let member = RedisKeys::index_member(address, order_id.as_str());
        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrem(self.keys.placeholders(address), order_id.as_str())
            .ignore()
            .zrem(self.keys.created_index(), member)
            .ignore();
        let _: () = pipe.query_async(&mut conn).await?;
        debug!("🧮️ Placeholder for order {order_id} removed from {address}");
        Ok(())
    }

    async fn reserve(
        &self,
        address: &str,
        order_id: &OrderId,
        amount: UsdtAmount,
        tolerance: UsdtAmount,
    ) -> Result<bool, DepositStoreError> {
        let (min, max) = amount_window(amount, tolerance)?;
        let (min, max) = (min.to_plain_string(), max.to_plain_string());
        let mut conn = self.manager.clone();
        let score = amount.to_score()?;
        let now = Utc::now().timestamp_millis();
        let member = RedisKeys::index_member(address, order_id.as_str());
        let claimed: i64 = self
            .reserve_script
            .key(self.keys.placeholders(address))
            .key(self.keys.created_index())
            .arg(order_id.as_str())
            .arg(score)
            .arg(min)
            .arg(max)
            .arg(now)
            .arg(member)
            .invoke_async(&mut conn)
            .await?;
        let claimed = claimed == 1;
        if claimed {
            debug!("🧮️ Reserved {address} for order {order_id} ({amount})");
        } else {
            trace!("🧮️ {address} already has an order waiting near {amount}");
        }
        Ok(claimed)
    }

    async fn created_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<PlaceholderRecord>, DepositStoreError> {
        let mut conn = self.manager.clone();
        let members: Vec<(String, f64)> =
            conn.zrangebyscore_withscores(self.keys.created_index(), "-inf", cutoff.timestamp_millis()).await?;
        members.into_iter().map(|(member, score)| parse_index_entry(&member, score)).collect()
    }
}

fn parse_index_entry(member: &str, score: f64) -> Result<PlaceholderRecord, DepositStoreError> {
    let (address, order_id) = RedisKeys::split_index_member(member)
        .ok_or_else(|| DepositStoreError::InvalidRecord(format!("Malformed creation index entry: {member}")))?;
    let created_at = Utc
        .timestamp_millis_opt(score as i64)
        .single()
        .ok_or_else(|| DepositStoreError::InvalidRecord(format!("Invalid creation time {score} for {member}")))?;
    Ok(PlaceholderRecord { address: address.to_string(), order_id: OrderId::from(order_id), created_at })
}

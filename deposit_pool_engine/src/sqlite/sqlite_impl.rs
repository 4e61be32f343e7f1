//! `SqliteDatabase` is the SQLite-backed address catalog.
use std::fmt::Debug;

use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{addresses, db_url, new_pool};
use crate::{
    db_types::{DepositAddress, NewDepositAddress},
    helpers::validate_tron_address,
    traits::{AddressStore, AddressStoreError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl AddressStore for SqliteDatabase {
    async fn active_addresses(&self) -> Result<Vec<DepositAddress>, AddressStoreError> {
        let mut conn = self.pool.acquire().await?;
        let result = addresses::fetch_active(&mut conn).await?;
        trace!("🗃️ {} active addresses in the catalog", result.len());
        Ok(result)
    }

    async fn insert_address(&self, address: NewDepositAddress) -> Result<DepositAddress, AddressStoreError> {
        validate_tron_address(&address.address)?;
        let mut conn = self.pool.acquire().await?;
        addresses::insert_address(address, &mut conn).await
    }

    async fn fetch_address(&self, address: &str) -> Result<Option<DepositAddress>, AddressStoreError> {
        let mut conn = self.pool.acquire().await?;
        addresses::fetch_address(address, &mut conn).await
    }

    async fn fetch_all_addresses(&self) -> Result<Vec<DepositAddress>, AddressStoreError> {
        let mut conn = self.pool.acquire().await?;
        addresses::fetch_all(&mut conn).await
    }

    async fn set_address_enabled(&self, address: &str, enabled: bool) -> Result<DepositAddress, AddressStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = addresses::set_enabled(address, enabled, &mut conn).await?;
        let state = if enabled { "enabled" } else { "disabled" };
        info!("🗃️ Address {address} has been {state}. The change takes effect at the next pool refresh.");
        Ok(record)
    }

    async fn set_address_priority(&self, address: &str, priority: i64) -> Result<DepositAddress, AddressStoreError> {
        let mut conn = self.pool.acquire().await?;
        let record = addresses::set_priority(address, priority, &mut conn).await?;
        debug!("🗃️ Address {address} now has priority {priority}");
        Ok(record)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the catalog schema up to date.
    pub async fn run_migrations(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        debug!("🗃️ Address catalog migrations are up to date");
        Ok(())
    }

    pub async fn close(&mut self) {
        self.pool.close().await;
    }
}

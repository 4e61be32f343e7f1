#![allow(dead_code)]
use std::{
    collections::HashMap,
    str::FromStr,
    sync::{Arc, Mutex},
};

use deposit_pool_engine::{
    db_types::{OrderId, OrderStatus},
    OrderStatusError,
    OrderStatusLookup,
    SqliteDatabase,
};
use dpa_common::UsdtAmount;
use log::*;
use sqlx::{migrate::MigrateDatabase, Sqlite};

pub const TRON_ADDRESSES: [&str; 5] = [
    "TJZwS38S32rvG8u3tKMFKErQPWGJrwUyG8",
    "TDByHhWkeiMQP6Fg5kMYDjtrnkh35jcpJn",
    "THfwAeZpMpQFRH7h3KNtDYZ5SqjS5N75hr",
    "TC1EffkaG8tPfTRsdcA9WTPKCL99fJU76J",
    "TWHEM4zdA2S8hCtmYy61unkgeKTo9Wr3vw",
];

pub fn usdt(s: &str) -> UsdtAmount {
    UsdtAmount::from_str(s).expect("Not a valid USDT amount")
}

pub fn addresses(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// Creates an empty, migrated address catalog in the temp directory.
pub async fn prepare_catalog() -> SqliteDatabase {
    dotenvy::from_filename(".env.test").ok();
    let _ = env_logger::try_init();
    let url = format!("sqlite://{}/dpa_it_{}.db", std::env::temp_dir().display(), rand::random::<u64>());
    Sqlite::create_database(&url).await.expect("Error creating database");
    let db = SqliteDatabase::new_with_url(&url, 1).await.expect("Error connecting to database");
    db.run_migrations().await.expect("Error running migrations");
    debug!("🚀️ Created test catalog {url}");
    db
}

pub async fn drop_catalog(mut db: SqliteDatabase) {
    db.close().await;
    let url = db.url().to_string();
    if let Err(e) = Sqlite::drop_database(&url).await {
        warn!("🚀️ Could not drop test catalog {url}: {e}");
    }
}

/// An order store whose answers are set up by the test.
#[derive(Debug, Clone, Default)]
pub struct ScriptedOrders {
    statuses: Arc<Mutex<HashMap<OrderId, Result<OrderStatus, String>>>>,
}

impl ScriptedOrders {
    pub fn set_status(&self, order_id: &str, status: OrderStatus) {
        self.statuses.lock().unwrap().insert(OrderId::from(order_id), Ok(status));
    }

    pub fn set_unreachable(&self, order_id: &str) {
        self.statuses.lock().unwrap().insert(OrderId::from(order_id), Err("connection refused".into()));
    }
}

impl OrderStatusLookup for ScriptedOrders {
    async fn order_status(&self, order_id: &OrderId) -> Result<Option<OrderStatus>, OrderStatusError> {
        match self.statuses.lock().unwrap().get(order_id) {
            Some(Ok(status)) => Ok(Some(*status)),
            Some(Err(e)) => Err(OrderStatusError::Unavailable(e.clone())),
            None => Ok(None),
        }
    }
}

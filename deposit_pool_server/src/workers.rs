use std::time::Duration;

use deposit_pool_engine::{PlaceholderJanitor, PoolRefreshApi, RedisStore, SqliteDatabase};
use log::*;
use tokio::task::JoinHandle;

use crate::order_status::OrderStatusSource;

/// Starts the pool refresh worker. Do not await the returned JoinHandle, as it will run indefinitely.
///
/// The first refresh happens one `interval` after the worker starts. Start-up refreshes are the caller's job.
pub fn start_pool_refresh_worker(db: SqliteDatabase, store: RedisStore, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let api = PoolRefreshApi::new(db, store);
        // Skip the tick that fires immediately
        timer.tick().await;
        info!("🕰️ Pool refresh worker started. The pool will be rebuilt every {}s", interval.as_secs());
        loop {
            timer.tick().await;
            debug!("🕰️ Running pool refresh job");
            match api.refresh().await {
                Ok(size) => debug!("🕰️ Pool refresh job complete. {size} addresses in rotation."),
                Err(e) => error!("🕰️ Error running pool refresh job: {e}"),
            }
        }
    })
}

/// Starts the stale placeholder janitor. Do not await the returned JoinHandle, as it will run indefinitely.
pub fn start_janitor_worker(
    store: RedisStore,
    lookup: OrderStatusSource,
    lifetime: chrono::Duration,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        let janitor = PlaceholderJanitor::new(store, lookup);
        info!(
            "🕰️ Placeholder janitor started. Placeholders older than {} minutes are checked every {}s",
            lifetime.num_minutes(),
            interval.as_secs()
        );
        loop {
            timer.tick().await;
            debug!("🕰️ Running placeholder sweep");
            match janitor.sweep(lifetime).await {
                Ok(result) => {
                    if result.examined() > 0 {
                        info!(
                            "🕰️ {} stale placeholders examined. {} removed, {} kept.",
                            result.examined(),
                            result.removed,
                            result.retained
                        );
                    }
                },
                Err(e) => {
                    error!("🕰️ Error running placeholder sweep: {e}");
                },
            }
        }
    })
}

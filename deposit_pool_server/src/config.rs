//! Server configuration.
//!
//! Everything is read from environment variables (optionally loaded from a `.env` file). Invalid values are logged and
//! replaced with their defaults, so the server always starts with a usable configuration.
use std::{env, str::FromStr, time::Duration};

use deposit_pool_engine::allocation_objects::{parse_tolerance, AllocatorConfig};
use dpa_common::{parse_boolean_flag, Secret};
use log::*;

const DEFAULT_DPA_HOST: &str = "127.0.0.1";
const DEFAULT_DPA_PORT: u16 = 8370;
const DEFAULT_DATABASE_URL: &str = "sqlite://data/deposit_pool.db";
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_POOL_REFRESH_INTERVAL: Duration = Duration::from_secs(300);
const DEFAULT_PLACEHOLDER_LIFETIME: chrono::Duration = chrono::Duration::minutes(15);
const DEFAULT_JANITOR_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub redis_url: Secret<String>,
    pub allocator: AllocatorConfig,
    /// If true, the pool is rebuilt from the address catalog when the server starts.
    pub refresh_on_startup: bool,
    /// How often the pool is rebuilt from the catalog. `None` disables the refresh worker.
    pub pool_refresh_interval: Option<Duration>,
    /// The longest an order can be pending. Placeholders older than this are checked by the janitor.
    pub placeholder_lifetime: chrono::Duration,
    /// How often the janitor runs. `None` disables it.
    pub janitor_interval: Option<Duration>,
    /// Base URL of the order-status endpoint. The janitor queries `{url}/{order_id}`.
    pub order_status_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DPA_HOST.to_string(),
            port: DEFAULT_DPA_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: Secret::new(DEFAULT_REDIS_URL.to_string()),
            allocator: AllocatorConfig::default(),
            refresh_on_startup: true,
            pool_refresh_interval: Some(DEFAULT_POOL_REFRESH_INTERVAL),
            placeholder_lifetime: DEFAULT_PLACEHOLDER_LIFETIME,
            janitor_interval: Some(DEFAULT_JANITOR_INTERVAL),
            order_status_url: None,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DPA_HOST").ok().unwrap_or_else(|| DEFAULT_DPA_HOST.into());
        let port = parse_env("DPA_PORT", DEFAULT_DPA_PORT);
        let database_url = env::var("DPA_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ DPA_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let redis_url = env::var("DPA_REDIS_URL").ok().unwrap_or_else(|| {
            info!("🪛️ DPA_REDIS_URL is not set. Using the default, {DEFAULT_REDIS_URL}.");
            DEFAULT_REDIS_URL.to_string()
        });
        let allocator = configure_allocator();
        let refresh_on_startup = parse_boolean_flag(env::var("DPA_REFRESH_ON_STARTUP").ok(), true);
        let pool_refresh_interval =
            parse_interval("DPA_POOL_REFRESH_INTERVAL", DEFAULT_POOL_REFRESH_INTERVAL.as_secs(), Duration::from_secs);
        let placeholder_lifetime = configure_placeholder_lifetime();
        let janitor_interval =
            parse_interval("DPA_JANITOR_INTERVAL", DEFAULT_JANITOR_INTERVAL.as_secs(), Duration::from_secs);
        let order_status_url = env::var("DPA_ORDER_STATUS_URL").ok().filter(|s| !s.trim().is_empty());
        if order_status_url.is_none() {
            info!(
                "🪛️ DPA_ORDER_STATUS_URL is not set. Stale placeholders will be removed once they are older than {} \
                 minutes, regardless of order status.",
                placeholder_lifetime.num_minutes()
            );
        }
        Self {
            host,
            port,
            database_url,
            redis_url: Secret::new(redis_url),
            allocator,
            refresh_on_startup,
            pool_refresh_interval,
            placeholder_lifetime,
            janitor_interval,
            order_status_url,
        }
    }
}

fn configure_allocator() -> AllocatorConfig {
    let mut config = AllocatorConfig::default();
    if let Ok(s) = env::var("DPA_COLLISION_TOLERANCE") {
        match parse_tolerance(&s) {
            Ok(tolerance) => config = config.with_tolerance(tolerance),
            Err(e) => warn!(
                "🪛️ Invalid configuration value for DPA_COLLISION_TOLERANCE. {e} Using the default, {}.",
                config.tolerance
            ),
        }
    }
    if let Ok(s) = env::var("DPA_MAX_PROBES") {
        match s.parse::<usize>() {
            Ok(n) => config = config.with_max_probes(n),
            Err(e) => warn!("🪛️ Invalid configuration value for DPA_MAX_PROBES. {e}. Every address will be examined."),
        }
    }
    info!("🪛️ Collision tolerance is {}. Probe limit: {:?}", config.tolerance, config.max_probes);
    config
}

fn configure_placeholder_lifetime() -> chrono::Duration {
    env::var("DPA_PLACEHOLDER_LIFETIME")
        .map_err(|_| {
            info!(
                "🪛️ DPA_PLACEHOLDER_LIFETIME is not set. Using the default value of {} minutes.",
                DEFAULT_PLACEHOLDER_LIFETIME.num_minutes()
            )
        })
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for DPA_PLACEHOLDER_LIFETIME. {e}"))
                .and_then(|m| {
                    if m > 0 {
                        Ok(chrono::Duration::minutes(m))
                    } else {
                        warn!("🪛️ DPA_PLACEHOLDER_LIFETIME must be positive. Got {m}.");
                        Err(())
                    }
                })
        })
        .ok()
        .unwrap_or(DEFAULT_PLACEHOLDER_LIFETIME)
}

fn parse_env<T>(name: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + Copy,
    T::Err: std::fmt::Display,
{
    env::var(name)
        .map(|s| {
            s.parse::<T>().unwrap_or_else(|e| {
                error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
                default
            })
        })
        .ok()
        .unwrap_or(default)
}

/// Reads an interval in whole units from `name`. Zero disables whatever the interval drives.
fn parse_interval(name: &str, default: u64, to_duration: fn(u64) -> Duration) -> Option<Duration> {
    match parse_env(name, default) {
        0 => {
            info!("🪛️ {name} is 0. The corresponding worker is disabled.");
            None
        },
        n => Some(to_duration(n)),
    }
}

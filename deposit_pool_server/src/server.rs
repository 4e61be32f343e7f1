use std::{fmt::Display, time::Duration};

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpRequest, HttpServer};
use deposit_pool_engine::{AddressAllocator, PoolRefreshApi, RedisStore, SqliteDatabase};
use log::*;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    order_status::OrderStatusSource,
    routes::{
        health,
        AddAddressRoute,
        AddressesRoute,
        AllocateRoute,
        FlushPoolRoute,
        PoolSizeRoute,
        PopRoute,
        QueryPlaceholdersRoute,
        RefreshPoolRoute,
        RegisterPlaceholderRoute,
        RemovePlaceholderRoute,
        UpdateAddressRoute,
    },
    workers::{start_janitor_worker, start_pool_refresh_worker},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    db.run_migrations().await.map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let store = RedisStore::connect(config.redis_url.reveal())
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    info!("🚀️ Connected to the address catalog and the pool store");
    if let Err(e) = store.backfill_created_index().await {
        warn!("🚀️ Could not index older placeholders. They stay invisible to the janitor until the next start-up. {e}");
    }

    if config.refresh_on_startup {
        let api = PoolRefreshApi::new(db.clone(), store.clone());
        if let Err(e) = api.refresh().await {
            error!("🚀️ Could not build the address pool at startup. The existing pool will be used. {e}");
        }
    }
    match config.pool_refresh_interval {
        Some(interval) => {
            let _ = start_pool_refresh_worker(db.clone(), store.clone(), interval);
        },
        None => info!("🚀️ Scheduled pool refreshes are disabled"),
    }
    if let Some(interval) = config.janitor_interval {
        let lookup = OrderStatusSource::from_url(config.order_status_url.as_deref())
            .map_err(|e| ServerError::InitializeError(e.to_string()))?;
        let _ = start_janitor_worker(store.clone(), lookup, config.placeholder_lifetime, interval);
    }
    let srv = create_server_instance(config, db, store)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(
    config: ServerConfig,
    db: SqliteDatabase,
    store: RedisStore,
) -> Result<Server, ServerError> {
    let addr = (config.host.clone(), config.port);
    let srv = HttpServer::new(move || {
        let allocator = AddressAllocator::new(store.clone(), config.allocator.clone());
        let refresh_api = PoolRefreshApi::new(db.clone(), store.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("dpa::access_log"))
            .app_data(web::Data::new(allocator))
            .app_data(web::Data::new(refresh_api))
            .app_data(web::Data::new(db.clone()))
            .app_data(web::JsonConfig::default().error_handler(invalid_request))
            .app_data(web::QueryConfig::default().error_handler(invalid_request))
            .app_data(web::PathConfig::default().error_handler(invalid_request))
            .service(health)
            .service(PoolSizeRoute::<RedisStore>::new())
            .service(FlushPoolRoute::<RedisStore>::new())
            .service(RefreshPoolRoute::<SqliteDatabase, RedisStore>::new())
            .service(PopRoute::<RedisStore>::new())
            .service(AllocateRoute::<RedisStore>::new())
            .service(RegisterPlaceholderRoute::<RedisStore>::new())
            .service(RemovePlaceholderRoute::<RedisStore>::new())
            .service(QueryPlaceholdersRoute::<RedisStore>::new())
            .service(AddressesRoute::<SqliteDatabase>::new())
            .service(AddAddressRoute::<SqliteDatabase>::new())
            .service(UpdateAddressRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind(addr)?
    .run();
    Ok(srv)
}

/// Malformed bodies, queries and paths are reported with the same `{"error": ...}` body as every other failure.
pub fn invalid_request<E: Display>(e: E, _req: &HttpRequest) -> actix_web::Error {
    ServerError::InvalidRequestBody(e.to_string()).into()
}

use std::str::FromStr;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use chrono::{TimeZone, Utc};
use deposit_pool_engine::{
    allocation_objects::Allocation,
    db_types::{DepositAddress, OrderId},
    traits::AddressStoreError,
    MemoryStore,
    PoolRefreshApi,
};
use dpa_common::UsdtAmount;
use serde_json::json;

use super::{
    helpers::{error_message, get_request, memory_allocator, post_raw, post_request, put_request, ADDR1, ADDR2, ADDR3},
    mocks::MockAddressCatalog,
};
use crate::{
    data_objects::{PoolSizeResponse, PopResponse},
    routes::{AllocateRoute, FlushPoolRoute, PoolSizeRoute, PopRoute, RefreshPoolRoute},
};

fn usdt(s: &str) -> UsdtAmount {
    UsdtAmount::from_str(s).unwrap()
}

async fn pool_routes(pool: &[&str]) -> (impl FnOnce(&mut ServiceConfig), MemoryStore) {
    let (api, store) = memory_allocator(pool).await;
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(PoolSizeRoute::<MemoryStore>::new())
            .service(FlushPoolRoute::<MemoryStore>::new())
            .service(PopRoute::<MemoryStore>::new())
            .service(AllocateRoute::<MemoryStore>::new())
            .app_data(web::Data::new(api));
    };
    (configure, store)
}

#[actix_web::test]
async fn pool_size() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = pool_routes(&[ADDR1, ADDR2]).await;
    let (status, body) = get_request("/pool/size", configure).await;
    assert_eq!(status, StatusCode::OK);
    let size: PoolSizeResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(size.size, 2);
}

#[actix_web::test]
async fn flush_pool_replaces_the_pool_in_order() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = pool_routes(&[ADDR1]).await;
    let (status, _) = put_request("/pool", &json!({ "addresses": [ADDR3, ADDR2] }), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.pool_snapshot().unwrap(), vec![ADDR3.to_string(), ADDR2.to_string()]);
}

#[actix_web::test]
async fn flush_pool_rejects_invalid_addresses() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = pool_routes(&[ADDR1]).await;
    let (status, body) = put_request("/pool", &json!({ "addresses": [ADDR2, "TNotAnAddress"] }), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("TNotAnAddress"));
    // The pool is untouched
    assert_eq!(store.pool_snapshot().unwrap(), vec![ADDR1.to_string()]);
}

#[actix_web::test]
async fn flush_pool_with_nothing_empties_the_pool() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = pool_routes(&[ADDR1, ADDR2]).await;
    let (status, _) = put_request("/pool", &json!({ "addresses": [] }), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert!(store.pool_snapshot().unwrap().is_empty());
}

#[actix_web::test]
async fn pop_from_an_empty_pool() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = pool_routes(&[]).await;
    let (status, body) = post_request("/pool/pop", &json!({ "amount": "10" }), configure).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error_message(&body), "The address pool is empty");
}

#[actix_web::test]
async fn pop_skips_busy_addresses() {
    let _ = env_logger::try_init().ok();
    let (api, store) = memory_allocator(&[ADDR1, ADDR2]).await;
    api.register_placeholder(ADDR1, &OrderId::from("busy"), usdt("100")).await.unwrap();
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(PopRoute::<MemoryStore>::new()).app_data(web::Data::new(api));
    };
    let (status, body) = post_request("/pool/pop", &json!({ "amount": 101.5 }), configure).await;
    assert_eq!(status, StatusCode::OK);
    let popped: PopResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(popped.address, ADDR2);
    // pop does not reserve anything
    assert_eq!(store.placeholder_count().unwrap(), 1);
}

#[actix_web::test]
async fn pop_rejects_bad_amounts() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = pool_routes(&[ADDR1]).await;
    let (status, _) = post_request("/pool/pop", &json!({ "amount": "-3" }), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (configure, _) = pool_routes(&[ADDR1]).await;
    let (status, _) = post_request("/pool/pop", &json!({ "amount": "1.0000001" }), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_bodies_are_json_errors() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = pool_routes(&[ADDR1]).await;
    let (status, body) = post_raw("/allocate", "{\"order_id\": ", configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request body"));
}

#[actix_web::test]
async fn allocate_reserves_the_address() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = pool_routes(&[ADDR1]).await;
    let body = json!({ "order_id": "order-1", "amount": "250.5" });
    let (status, body) = post_request("/allocate", &body, configure).await;
    assert_eq!(status, StatusCode::OK);
    let allocation: Allocation = serde_json::from_str(&body).unwrap();
    assert_eq!(allocation.address, ADDR1);
    assert_eq!(allocation.order_id, OrderId::from("order-1"));
    assert_eq!(allocation.amount, usdt("250.5"));
    assert_eq!(store.placeholder_count().unwrap(), 1);
}

#[actix_web::test]
async fn allocate_conflict() {
    let _ = env_logger::try_init().ok();
    let (api, _) = memory_allocator(&[ADDR1]).await;
    api.allocate(&OrderId::from("first"), usdt("40")).await.unwrap();
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(AllocateRoute::<MemoryStore>::new()).app_data(web::Data::new(api));
    };
    let body = json!({ "order_id": "second", "amount": "41.99" });
    let (status, body) = post_request("/allocate", &body, configure).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(error_message(&body).starts_with("No address is free for this amount"));
}

fn catalog_entry(id: i64, address: &str, priority: i64) -> DepositAddress {
    let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    DepositAddress { id, address: address.to_string(), is_active: true, priority, created_at: t, updated_at: t }
}

#[actix_web::test]
async fn refresh_loads_the_active_catalog() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockAddressCatalog::new();
    catalog
        .expect_active_addresses()
        .times(1)
        .returning(|| Ok(vec![catalog_entry(2, ADDR2, 10), catalog_entry(1, ADDR1, 1)]));
    let store = MemoryStore::new();
    let api = PoolRefreshApi::new(catalog, store.clone());
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(RefreshPoolRoute::<MockAddressCatalog, MemoryStore>::new()).app_data(web::Data::new(api));
    };
    let (status, body) = post_request("/pool/refresh", &json!({}), configure).await;
    assert_eq!(status, StatusCode::OK);
    let size: PoolSizeResponse = serde_json::from_str(&body).unwrap();
    assert_eq!(size.size, 2);
    assert_eq!(store.pool_snapshot().unwrap(), vec![ADDR2.to_string(), ADDR1.to_string()]);
}

#[actix_web::test]
async fn refresh_with_catalog_down() {
    let _ = env_logger::try_init().ok();
    let mut catalog = MockAddressCatalog::new();
    catalog
        .expect_active_addresses()
        .returning(|| Err(AddressStoreError::StoreUnavailable("database is locked".into())));
    let store = MemoryStore::new();
    let api = PoolRefreshApi::new(catalog, store.clone());
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(RefreshPoolRoute::<MockAddressCatalog, MemoryStore>::new()).app_data(web::Data::new(api));
    };
    let (status, body) = post_request("/pool/refresh", &json!({}), configure).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(error_message(&body).contains("database is locked"));
}

#[actix_web::test]
async fn amounts_too_large_for_a_range_query() {
    let _ = env_logger::try_init().ok();
    let huge = "79228162514264337593543950335";
    let (configure, _) = pool_routes(&[ADDR1]).await;
    let (status, body) = post_request("/pool/pop", &json!({ "amount": huge }), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid amount"));

    let (configure, store) = pool_routes(&[ADDR1]).await;
    let (status, _) = post_request("/allocate", &json!({ "order_id": "big", "amount": huge }), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.placeholder_count().unwrap(), 0);
    assert_eq!(store.pool_snapshot().unwrap(), vec![ADDR1.to_string()]);
}

use std::str::FromStr;

use actix_web::{http::StatusCode, web, web::ServiceConfig};
use deposit_pool_engine::{
    db_types::{OrderId, Placeholder},
    MemoryStore,
};
use dpa_common::UsdtAmount;
use serde_json::json;

use super::helpers::{delete_request, error_message, get_request, memory_allocator, post_request, ADDR1, ADDR2};
use crate::routes::{QueryPlaceholdersRoute, RegisterPlaceholderRoute, RemovePlaceholderRoute};

fn usdt(s: &str) -> UsdtAmount {
    UsdtAmount::from_str(s).unwrap()
}

async fn placeholder_routes() -> (impl Fn(&mut ServiceConfig) + Clone, MemoryStore) {
    let (api, store) = memory_allocator(&[ADDR1, ADDR2]).await;
    let api = web::Data::new(api);
    let configure = move |cfg: &mut ServiceConfig| {
        cfg.service(RegisterPlaceholderRoute::<MemoryStore>::new())
            .service(RemovePlaceholderRoute::<MemoryStore>::new())
            .service(QueryPlaceholdersRoute::<MemoryStore>::new())
            .app_data(api.clone());
    };
    (configure, store)
}

#[actix_web::test]
async fn register_query_and_remove() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = placeholder_routes().await;
    let body = json!({ "address": ADDR1, "order_id": "1001", "amount": "75.25" });
    let (status, _) = post_request("/placeholders", &body, configure.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.placeholder_count().unwrap(), 1);

    let path = format!("/placeholders/{ADDR1}?amount=76");
    let (status, body) = get_request(&path, configure.clone()).await;
    assert_eq!(status, StatusCode::OK);
    let found: Vec<Placeholder> = serde_json::from_str(&body).unwrap();
    assert_eq!(found, vec![Placeholder::new(OrderId::from("1001"), usdt("75.25"))]);

    // Exact matching
    let path = format!("/placeholders/{ADDR1}?amount=76&tolerance=0");
    let (_, body) = get_request(&path, configure.clone()).await;
    let found: Vec<Placeholder> = serde_json::from_str(&body).unwrap();
    assert!(found.is_empty());

    let path = format!("/placeholders/{ADDR1}/1001");
    let (status, _) = delete_request(&path, configure.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.placeholder_count().unwrap(), 0);
    // Removing it again is fine
    let (status, _) = delete_request(&path, configure).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn register_rejects_non_positive_amounts() {
    let _ = env_logger::try_init().ok();
    let (configure, store) = placeholder_routes().await;
    let body = json!({ "address": ADDR1, "order_id": "1001", "amount": "0" });
    let (status, body) = post_request("/placeholders", &body, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid amount"));
    assert_eq!(store.placeholder_count().unwrap(), 0);
}

#[actix_web::test]
async fn query_needs_an_amount() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = placeholder_routes().await;
    let (status, body) = get_request(&format!("/placeholders/{ADDR2}"), configure.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Could not read request body"));
    let (status, _) = get_request(&format!("/placeholders/{ADDR2}?amount=10&tolerance=-1"), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn query_is_per_address() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = placeholder_routes().await;
    let body = json!({ "address": ADDR1, "order_id": "a", "amount": 20 });
    post_request("/placeholders", &body, configure.clone()).await;
    let (status, body) = get_request(&format!("/placeholders/{ADDR2}?amount=20"), configure).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "[]");
}

#[actix_web::test]
async fn query_rejects_amounts_too_large_for_a_range() {
    let _ = env_logger::try_init().ok();
    let (configure, _) = placeholder_routes().await;
    let path = format!("/placeholders/{ADDR1}?amount=79228162514264337593543950335");
    let (status, body) = get_request(&path, configure.clone()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).starts_with("Invalid amount"));
    let path = format!("/placeholders/{ADDR1}?amount=-79228162514264337593543950335");
    let (status, _) = get_request(&path, configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

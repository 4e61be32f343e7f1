//! Order status lookups for the placeholder janitor.
use std::{sync::Arc, time::Duration};

use deposit_pool_engine::{
    db_types::{OrderId, OrderStatus},
    LifetimeOnly,
    OrderStatusError,
    OrderStatusLookup,
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    StatusCode,
    Url,
};
use serde::Deserialize;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct OrderStatusResponse {
    status: OrderStatus,
}

/// Queries the orchestration layer's order-status endpoint.
///
/// `GET {base_url}/{order_id}` must answer with `{"status": "pending" | "paid" | "failed" | "expired"}`, or 404 if the
/// order is unknown.
#[derive(Debug, Clone)]
pub struct HttpOrderStatus {
    base_url: Url,
    client: Arc<Client>,
}

impl HttpOrderStatus {
    pub fn new(base_url: &str) -> Result<Self, OrderStatusError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| OrderStatusError::Unavailable(format!("Invalid order status URL {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(OrderStatusError::Unavailable(format!("{base_url} cannot be used as a base URL")));
        }
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("Deposit Pool Janitor")
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OrderStatusError::Unavailable(e.to_string()))?;
        Ok(Self { base_url, client: Arc::new(client) })
    }

    pub fn url_for(&self, order_id: &OrderId) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was ruled out in the constructor, so path_segments_mut always succeeds
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(order_id.as_str());
        }
        url
    }
}

impl OrderStatusLookup for HttpOrderStatus {
    async fn order_status(&self, order_id: &OrderId) -> Result<Option<OrderStatus>, OrderStatusError> {
        let url = self.url_for(order_id);
        trace!("📦️ Fetching order status from {url}");
        let response = self.client.get(url).send().await.map_err(|e| OrderStatusError::Unavailable(e.to_string()))?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body = response
                    .json::<OrderStatusResponse>()
                    .await
                    .map_err(|e| OrderStatusError::InvalidResponse(e.to_string()))?;
                Ok(Some(body.status))
            },
            status => {
                let message = response.text().await.unwrap_or_default();
                Err(OrderStatusError::InvalidResponse(format!("Order status query returned {status}. {message}")))
            },
        }
    }
}

/// The order status source chosen by configuration.
#[derive(Debug, Clone)]
pub enum OrderStatusSource {
    LifetimeOnly(LifetimeOnly),
    Http(HttpOrderStatus),
}

impl OrderStatusSource {
    pub fn from_url(url: Option<&str>) -> Result<Self, OrderStatusError> {
        match url {
            Some(url) => {
                info!("📦️ Stale placeholders will be checked against the order store at {url}");
                Ok(Self::Http(HttpOrderStatus::new(url)?))
            },
            None => Ok(Self::LifetimeOnly(LifetimeOnly)),
        }
    }
}

impl OrderStatusLookup for OrderStatusSource {
    async fn order_status(&self, order_id: &OrderId) -> Result<Option<OrderStatus>, OrderStatusError> {
        match self {
            Self::LifetimeOnly(lookup) => lookup.order_status(order_id).await,
            Self::Http(lookup) => lookup.order_status(order_id).await,
        }
    }
}

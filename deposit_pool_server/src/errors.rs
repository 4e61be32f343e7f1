use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use deposit_pool_engine::{AddressStoreError, AllocationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("A backing store is unavailable. {0}")]
    StoreUnavailable(String),
    #[error("The address pool is empty")]
    PoolExhausted,
    #[error("No address is free for this amount. Try again shortly, or with a different amount.")]
    NoAvailableAddress,
    #[error("Invalid amount. {0}")]
    InvalidAmount(String),
    #[error("Invalid receiving address. {0}")]
    InvalidAddress(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("The address already exists. {0}")]
    AddressAlreadyExists(String),
    #[error("The data was not found. {0}")]
    NoRecordFound(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::PoolExhausted => StatusCode::SERVICE_UNAVAILABLE,
            Self::NoAvailableAddress => StatusCode::CONFLICT,
            Self::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            Self::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::AddressAlreadyExists(_) => StatusCode::CONFLICT,
            Self::NoRecordFound(_) => StatusCode::NOT_FOUND,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

impl From<AllocationError> for ServerError {
    fn from(e: AllocationError) -> Self {
        match e {
            AllocationError::StoreUnavailable(s) => Self::StoreUnavailable(s),
            AllocationError::PoolExhausted => Self::PoolExhausted,
            AllocationError::NoAvailableAddress => Self::NoAvailableAddress,
            AllocationError::InvalidAmount(s) => Self::InvalidAmount(s),
        }
    }
}

impl From<AddressStoreError> for ServerError {
    fn from(e: AddressStoreError) -> Self {
        match e {
            AddressStoreError::StoreUnavailable(s) => Self::StoreUnavailable(s),
            AddressStoreError::InvalidAddress(s) => Self::InvalidAddress(s),
            AddressStoreError::AddressNotFound(s) => Self::NoRecordFound(format!("Address {s} is not in the catalog")),
            AddressStoreError::AddressAlreadyExists(s) => Self::AddressAlreadyExists(s),
        }
    }
}

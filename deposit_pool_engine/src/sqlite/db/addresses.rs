use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{DepositAddress, NewDepositAddress},
    traits::AddressStoreError,
};

/// Inserts a new address into the catalog. The address is not validated here; that is the caller's job.
pub async fn insert_address(
    address: NewDepositAddress,
    conn: &mut SqliteConnection,
) -> Result<DepositAddress, AddressStoreError> {
    let record = sqlx::query_as(
        r#"
            INSERT INTO deposit_addresses (address, is_active, priority)
            VALUES ($1, $2, $3)
            RETURNING *;
        "#,
    )
    .bind(&address.address)
    .bind(address.is_active)
    .bind(address.priority)
    .fetch_one(conn)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref de) if de.is_unique_violation() => {
            AddressStoreError::AddressAlreadyExists(address.address.clone())
        },
        e => AddressStoreError::from(e),
    })?;
    debug!("📒️ Address {} added to the catalog", address.address);
    Ok(record)
}

pub async fn fetch_address(
    address: &str,
    conn: &mut SqliteConnection,
) -> Result<Option<DepositAddress>, AddressStoreError> {
    let record = sqlx::query_as("SELECT * FROM deposit_addresses WHERE address = $1")
        .bind(address)
        .fetch_optional(conn)
        .await?;
    Ok(record)
}

pub async fn fetch_all(conn: &mut SqliteConnection) -> Result<Vec<DepositAddress>, AddressStoreError> {
    let records = sqlx::query_as("SELECT * FROM deposit_addresses ORDER BY priority DESC, id ASC")
        .fetch_all(conn)
        .await?;
    Ok(records)
}

pub async fn fetch_active(conn: &mut SqliteConnection) -> Result<Vec<DepositAddress>, AddressStoreError> {
    let records =
        sqlx::query_as("SELECT * FROM deposit_addresses WHERE is_active = TRUE ORDER BY priority DESC, id ASC")
            .fetch_all(conn)
            .await?;
    Ok(records)
}

pub async fn set_enabled(
    address: &str,
    enabled: bool,
    conn: &mut SqliteConnection,
) -> Result<DepositAddress, AddressStoreError> {
    let record: Option<DepositAddress> = sqlx::query_as(
        r#"
            UPDATE deposit_addresses SET is_active = $1, updated_at = CURRENT_TIMESTAMP
            WHERE address = $2
            RETURNING *;
        "#,
    )
    .bind(enabled)
    .bind(address)
    .fetch_optional(conn)
    .await?;
    record.ok_or_else(|| AddressStoreError::AddressNotFound(address.to_string()))
}

pub async fn set_priority(
    address: &str,
    priority: i64,
    conn: &mut SqliteConnection,
) -> Result<DepositAddress, AddressStoreError> {
    let record: Option<DepositAddress> = sqlx::query_as(
        r#"
            UPDATE deposit_addresses SET priority = $1, updated_at = CURRENT_TIMESTAMP
            WHERE address = $2
            RETURNING *;
        "#,
    )
    .bind(priority)
    .bind(address)
    .fetch_optional(conn)
    .await?;
    record.ok_or_else(|| AddressStoreError::AddressNotFound(address.to_string()))
}

//! # Deposit pool server
//! This crate hosts the HTTP surface of the deposit pool allocator. It is responsible for:
//! * Handing out receiving addresses to the orchestration layer, and managing the placeholders that keep amounts on
//!   one address apart.
//! * Maintaining the address catalog, and refreshing the rotating pool from it.
//! * Running the background workers that refresh the pool and sweep stale placeholders.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `GET /health`: A health check route that returns a 200 OK response.
//! * `GET /pool/size`, `PUT /pool`, `POST /pool/refresh`: Inspect, replace, or rebuild the address pool.
//! * `POST /pool/pop`: Find an address that is free for an amount, without reserving it.
//! * `POST /allocate`: Find a free address and reserve it for an order in one step.
//! * `POST /placeholders`, `DELETE /placeholders/{address}/{order_id}`, `GET /placeholders/{address}`: Manage and
//!   query the placeholders on an address.
//! * `GET /addresses`, `POST /addresses`, `PATCH /addresses/{address}`: Maintain the address catalog.
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod order_status;
pub mod routes;
pub mod server;
pub mod workers;

#[cfg(test)]
mod endpoint_tests;

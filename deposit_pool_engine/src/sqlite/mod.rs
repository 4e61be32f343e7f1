//! SQLite backend for the address catalog.
mod sqlite_impl;

pub mod db;
pub use sqlite_impl::SqliteDatabase;

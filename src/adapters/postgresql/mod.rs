//! PostgreSQL database integration
//!
//! Source of the catalog queries and target of record imports.

pub mod adapter;
pub mod client;
pub mod values;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;

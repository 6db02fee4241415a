//! PostgreSQL database integration
//!
//! This module provides integration with PostgreSQL for storing sample
//! aggregates as JSONB snapshots.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::PostgreSQLSample;

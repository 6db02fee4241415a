//! External system integrations for LabTrack.
//!
//! Each port is a trait; the application layer only ever holds
//! `Arc<dyn Port + Send + Sync>`:
//!
//! - [`database`] - [`SampleRepository`](database::SampleRepository) port and factory
//! - [`memory`] - in-process repository
//! - [`postgresql`] - PostgreSQL repository
//! - [`notification`] - result-ready and abnormal-result messages (log, webhook)
//! - [`document`] - plain-text sample reports
//! - [`cache`] - advisory TTL cache for lookups
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external dependencies and
//! enable testing with in-memory implementations.
//!
//! ```rust
//! use labtrack::adapters::database::create_sample_repository;
//! use labtrack::config::LabConfig;
//!
//! # async fn example() -> labtrack::domain::Result<()> {
//! let config = LabConfig::default();
//! let repository = create_sample_repository(&config).await?;
//! assert_eq!(repository.backend_name(), "memory");
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod database;
pub mod document;
pub mod memory;
pub mod notification;
pub mod postgresql;

//! Core application logic for LabTrack.
//!
//! This module sits between the domain model and the adapters: it loads
//! samples, runs one aggregate operation per command, persists the result and
//! hands the drained events to the dispatcher.
//!
//! # Modules
//!
//! - [`commands`] - One handler per lifecycle use case
//! - [`queries`] - Read-side lookups, lists and reports
//! - [`events`] - Post-commit event logging and abnormal-result alerts
//! - [`dto`] - The outward [`SampleDto`](dto::SampleDto) representation
//! - [`service`] - Wiring of handlers and ports
//!
//! # Example
//!
//! ```rust,no_run
//! use labtrack::config::load_config;
//! use labtrack::core::commands::RegisterSampleCommand;
//! use labtrack::core::service::LabServiceBuilder;
//! use labtrack::domain::AnalysisKind;
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("labtrack.toml")?;
//! let service = LabServiceBuilder::from_config(&config).await?.build()?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let sample = service
//!     .register_sample(
//!         RegisterSampleCommand {
//!             patient_id: Uuid::new_v4(),
//!             analysis_kind: AnalysisKind::Glucose,
//!         },
//!         &shutdown_rx,
//!     )
//!     .await?;
//!
//! println!("Registered {}", sample.code);
//! # Ok(())
//! # }
//! ```

pub mod commands;
pub mod dto;
pub mod events;
pub mod queries;
pub mod service;

// LabTrack - Laboratory Sample Lifecycle Tool
// Copyright (c) 2025 LabTrack Contributors
// Licensed under the MIT License

//! # LabTrack - Laboratory Sample Lifecycle
//!
//! LabTrack manages a laboratory test sample from intake through patient
//! notification: registration, result entry, doctor validation, patient
//! notification and rejection.
//!
//! ## Overview
//!
//! The heart of the crate is the [`domain::Sample`] aggregate. It enforces the
//! valid state transitions, classifies numeric results against their reference
//! range, and records a [`domain::SampleEvent`] for every transition. Around it:
//!
//! - **Command handlers** load a sample, run one operation and persist it with
//!   an optimistic version check
//! - **Queries** read samples by id, code, patient or validation backlog
//! - **Adapters** store samples (in-memory, PostgreSQL), send notifications
//!   (log, webhook), render reports and cache lookups
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Command handlers, queries, event dispatch and wiring
//! - [`adapters`] - Storage, notification, document and cache adapters
//! - [`domain`] - Value objects, the sample aggregate and its events
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust
//! use labtrack::adapters::memory::InMemorySampleRepository;
//! use labtrack::core::commands::{AddResultCommand, RegisterSampleCommand};
//! use labtrack::core::service::LabServiceBuilder;
//! use labtrack::domain::AnalysisKind;
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let service = LabServiceBuilder::new()
//!     .repository(Arc::new(InMemorySampleRepository::new()))
//!     .build()?;
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
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
//! let sample = service
//!     .add_result(
//!         AddResultCommand {
//!             sample_id: sample.id,
//!             value: 5.4,
//!             unit: "mmol/L".to_string(),
//!             reference_min: 3.9,
//!             reference_max: 6.1,
//!             notes: String::new(),
//!         },
//!         &shutdown_rx,
//!     )
//!     .await?;
//!
//! assert_eq!(sample.result_status, "Completed");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`] with a
//! [`domain::LabError`]. Each error maps to an [`domain::ErrorCategory`] so a
//! transport can choose a response without matching every variant.
//!
//! ## Logging
//!
//! LabTrack uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(sample_code = "LAB-2025-000042", "Result validated");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

//! Sample storage abstraction
//!
//! This module provides the trait-based storage port, allowing LabTrack to
//! work with different backends (in-memory, PostgreSQL).

pub mod factory;
pub mod traits;

pub use factory::create_sample_repository;
pub use traits::SampleRepository;

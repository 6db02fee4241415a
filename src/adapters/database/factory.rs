//! Sample repository factory
//!
//! Builds the storage adapter selected by `database_target`.

use crate::adapters::database::traits::SampleRepository;
use crate::adapters::memory::InMemorySampleRepository;
use crate::adapters::postgresql::adapter::PostgreSQLAdapter;
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::config::schema::{DatabaseTarget, LabConfig};
use crate::domain::{LabError, Result};
use std::sync::Arc;

/// Create a sample repository based on the configuration
///
/// For PostgreSQL the schema migration runs first when `auto_migrate` is set.
///
/// # Errors
///
/// Returns an error if the backend cannot be created or migrated
pub async fn create_sample_repository(
    config: &LabConfig,
) -> Result<Arc<dyn SampleRepository + Send + Sync>> {
    match config.database_target {
        DatabaseTarget::Memory => {
            tracing::info!("Creating in-memory sample repository");
            Ok(Arc::new(InMemorySampleRepository::new()) as Arc<dyn SampleRepository + Send + Sync>)
        }
        DatabaseTarget::PostgreSQL => {
            let pg_config = config.postgresql.as_ref().ok_or_else(|| {
                LabError::Configuration(
                    "postgresql configuration is required when database_target = 'postgresql'"
                        .to_string(),
                )
            })?;

            tracing::info!("Creating PostgreSQL sample repository");
            let client = PostgreSQLClient::new(pg_config.clone()).await?;
            let adapter = PostgreSQLAdapter::new(client);

            if pg_config.auto_migrate {
                adapter.ensure_schema().await?;
            }

            Ok(Arc::new(adapter) as Arc<dyn SampleRepository + Send + Sync>)
        }
    }
}

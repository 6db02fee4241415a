//! Human-readable sample reports
//!
//! The [`ReportRenderer`] port turns a stored sample into document bytes.
//! [`TextReportRenderer`] renders plain UTF-8 text with an integrity footer.

pub mod text;

pub use text::{verify_report, TextReportRenderer};

use crate::domain::ids::SampleId;
use crate::domain::Result;
use async_trait::async_trait;

/// Document port
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Render the report for a sample
    ///
    /// # Errors
    ///
    /// - `NotFound` when the sample does not exist
    /// - `Document` when rendering fails
    async fn generate_report(&self, sample_id: SampleId) -> Result<Vec<u8>>;

    /// MIME type of the rendered bytes
    fn content_type(&self) -> &'static str;
}

//! Patient and staff notifications
//!
//! The [`NotificationSender`] port delivers two messages: "result ready" to a
//! patient and "abnormal result" to the on-call recipient. Two adapters ship
//! with LabTrack:
//!
//! - [`LogNotificationSender`] - writes the message to the log only
//! - [`WebhookNotificationSender`] - POSTs a JSON payload to an HTTP endpoint
//!
//! Delivery is best effort; no retry or outbox is kept.

pub mod log;
pub mod webhook;

pub use self::log::LogNotificationSender;
pub use self::webhook::WebhookNotificationSender;

use crate::config::schema::{NotificationConfig, NotificationProvider};
use crate::domain::analysis::AnalysisKind;
use crate::domain::email::EmailAddress;
use crate::domain::sample_code::SampleCode;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Notification port
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Tell a patient their result is ready
    ///
    /// # Errors
    ///
    /// Returns `LabError::Notification` when delivery fails.
    async fn send_result_ready(
        &self,
        email: &EmailAddress,
        recipient_name: &str,
        code: &SampleCode,
    ) -> Result<()>;

    /// Alert staff about a validated abnormal result
    ///
    /// # Errors
    ///
    /// Returns `LabError::Notification` when delivery fails.
    async fn send_abnormal_alert(
        &self,
        email: &EmailAddress,
        code: &SampleCode,
        analysis_kind: AnalysisKind,
    ) -> Result<()>;

    /// Provider name for logs and status output
    fn provider_name(&self) -> &'static str;
}

/// Create the notification sender selected by `notification.provider`
///
/// # Errors
///
/// Returns an error if the webhook client cannot be built.
pub fn create_notification_sender(
    config: &NotificationConfig,
) -> Result<Arc<dyn NotificationSender + Send + Sync>> {
    match config.provider {
        NotificationProvider::Log => {
            tracing::info!("Using log notification sender");
            Ok(Arc::new(LogNotificationSender::new()) as Arc<dyn NotificationSender + Send + Sync>)
        }
        NotificationProvider::Webhook => {
            tracing::info!("Using webhook notification sender");
            Ok(Arc::new(WebhookNotificationSender::new(config)?)
                as Arc<dyn NotificationSender + Send + Sync>)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;

    #[test]
    fn test_factory_selects_provider() {
        let sender = create_notification_sender(&NotificationConfig::default()).unwrap();
        assert_eq!(sender.provider_name(), "log");

        let config = NotificationConfig {
            provider: NotificationProvider::Webhook,
            endpoint: Some("https://notify.example.org/lab".to_string()),
            auth_type: "bearer".to_string(),
            api_key: Some(secret_string("token".to_string())),
            ..NotificationConfig::default()
        };
        let sender = create_notification_sender(&config).unwrap();
        assert_eq!(sender.provider_name(), "webhook");
    }
}

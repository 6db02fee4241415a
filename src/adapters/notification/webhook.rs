//! HTTP webhook notification sender
//!
//! Each notification is a JSON `POST` to the configured endpoint. The
//! payload carries a `type` field (`result_ready` or `abnormal_result`) so a
//! single endpoint can route both messages.

use super::NotificationSender;
use crate::config::schema::NotificationConfig;
use crate::domain::analysis::AnalysisKind;
use crate::domain::email::EmailAddress;
use crate::domain::sample_code::SampleCode;
use crate::domain::{LabError, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;
use url::Url;

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WebhookPayload<'a> {
    ResultReady {
        recipient_email: &'a str,
        recipient_name: &'a str,
        sample_code: &'a str,
        sent_at: String,
    },
    AbnormalResult {
        recipient_email: &'a str,
        sample_code: &'a str,
        analysis_kind: &'a str,
        analysis_label: &'a str,
        sent_at: String,
    },
}

/// Webhook implementation of [`NotificationSender`]
///
/// # Example
///
/// ```no_run
/// use labtrack::adapters::notification::{NotificationSender, WebhookNotificationSender};
/// use labtrack::config::{secret_string, NotificationConfig, NotificationProvider};
///
/// # fn example() -> labtrack::domain::Result<()> {
/// let config = NotificationConfig {
///     provider: NotificationProvider::Webhook,
///     endpoint: Some("https://notify.example.org/lab".to_string()),
///     auth_type: "bearer".to_string(),
///     api_key: Some(secret_string("token".to_string())),
///     ..NotificationConfig::default()
/// };
/// let sender = WebhookNotificationSender::new(&config)?;
/// assert_eq!(sender.provider_name(), "webhook");
/// # Ok(())
/// # }
/// ```
pub struct WebhookNotificationSender {
    client: Client,
    endpoint: Url,
    auth_header: Option<String>,
}

impl WebhookNotificationSender {
    /// Create a sender from the notification configuration
    ///
    /// # Errors
    ///
    /// Returns `LabError::Configuration` if the endpoint is missing or
    /// invalid, and `LabError::Notification` if the HTTP client cannot be built.
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            LabError::Configuration(
                "notification.endpoint is required for the webhook provider".to_string(),
            )
        })?;
        let endpoint = Url::parse(endpoint).map_err(|e| {
            LabError::Configuration(format!("Invalid notification endpoint '{endpoint}': {e}"))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| LabError::Notification(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            auth_header: Self::auth_header_value(config),
        })
    }

    /// Build authorization header value
    fn auth_header_value(config: &NotificationConfig) -> Option<String> {
        match config.auth_type.as_str() {
            "bearer" => config
                .api_key
                .as_ref()
                .map(|key| format!("Bearer {}", key.expose_secret().as_ref())),
            "basic" => match (&config.username, &config.password) {
                (Some(username), Some(password)) => {
                    let credentials = format!("{username}:{}", password.expose_secret().as_ref());
                    let encoded = general_purpose::STANDARD.encode(credentials.as_bytes());
                    Some(format!("Basic {encoded}"))
                }
                _ => None,
            },
            _ => None,
        }
    }

    async fn post(&self, payload: &WebhookPayload<'_>) -> Result<()> {
        let mut request = self.client.post(self.endpoint.clone()).json(payload);
        if let Some(ref auth) = self.auth_header {
            request = request.header("Authorization", auth);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LabError::Notification(format!("Webhook request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LabError::Notification(format!(
                "Webhook returned status {status}: {body}"
            )));
        }

        tracing::debug!(endpoint = %self.endpoint, status = %status, "Webhook delivered");
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for WebhookNotificationSender {
    async fn send_result_ready(
        &self,
        email: &EmailAddress,
        recipient_name: &str,
        code: &SampleCode,
    ) -> Result<()> {
        self.post(&WebhookPayload::ResultReady {
            recipient_email: email.as_str(),
            recipient_name,
            sample_code: code.as_str(),
            sent_at: Utc::now().to_rfc3339(),
        })
        .await
    }

    async fn send_abnormal_alert(
        &self,
        email: &EmailAddress,
        code: &SampleCode,
        analysis_kind: AnalysisKind,
    ) -> Result<()> {
        self.post(&WebhookPayload::AbnormalResult {
            recipient_email: email.as_str(),
            sample_code: code.as_str(),
            analysis_kind: analysis_kind.as_str(),
            analysis_label: analysis_kind.label(),
            sent_at: Utc::now().to_rfc3339(),
        })
        .await
    }

    fn provider_name(&self) -> &'static str {
        "webhook"
    }
}

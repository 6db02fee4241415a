//! Notification sender that only logs

use super::NotificationSender;
use crate::domain::analysis::AnalysisKind;
use crate::domain::email::EmailAddress;
use crate::domain::sample_code::SampleCode;
use crate::domain::Result;
use async_trait::async_trait;

/// Writes each notification as a structured `info` event
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

impl LogNotificationSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSender for LogNotificationSender {
    async fn send_result_ready(
        &self,
        email: &EmailAddress,
        recipient_name: &str,
        code: &SampleCode,
    ) -> Result<()> {
        tracing::info!(
            recipient = %email,
            recipient_name = recipient_name,
            sample_code = %code,
            "Result ready notification"
        );
        Ok(())
    }

    async fn send_abnormal_alert(
        &self,
        email: &EmailAddress,
        code: &SampleCode,
        analysis_kind: AnalysisKind,
    ) -> Result<()> {
        tracing::warn!(
            recipient = %email,
            sample_code = %code,
            analysis_kind = %analysis_kind,
            "Abnormal result alert"
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "log"
    }
}

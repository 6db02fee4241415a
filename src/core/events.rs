//! Post-commit event dispatch
//!
//! Runs after the repository accepted a change. Every event is logged; a
//! validated abnormal result also raises an alert when a recipient is
//! configured. Nothing here can fail the command: the state change is already
//! durable, so alert failures are logged and dropped.

use crate::adapters::notification::NotificationSender;
use crate::domain::email::EmailAddress;
use crate::domain::events::SampleEvent;
use crate::{log_error_with_context, log_transition};
use std::sync::Arc;

/// Outcome counters of one [`EventDispatcher::dispatch`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub events: usize,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

/// Delivers drained aggregate events to their side effects
pub struct EventDispatcher {
    notifier: Arc<dyn NotificationSender + Send + Sync>,
    alert_recipient: Option<EmailAddress>,
}

impl EventDispatcher {
    pub fn new(
        notifier: Arc<dyn NotificationSender + Send + Sync>,
        alert_recipient: Option<EmailAddress>,
    ) -> Self {
        Self {
            notifier,
            alert_recipient,
        }
    }

    /// Handle events in order
    pub async fn dispatch(&self, events: &[SampleEvent]) -> DispatchOutcome {
        let mut outcome = DispatchOutcome {
            events: events.len(),
            ..DispatchOutcome::default()
        };

        for event in events {
            log_transition!(event);

            if let SampleEvent::ResultValidated {
                code,
                analysis_kind,
                is_normal: false,
                ..
            } = event
            {
                let Some(recipient) = &self.alert_recipient else {
                    tracing::debug!(sample_code = %code, "No alert recipient configured");
                    continue;
                };

                match self
                    .notifier
                    .send_abnormal_alert(recipient, code, *analysis_kind)
                    .await
                {
                    Ok(()) => {
                        outcome.alerts_sent += 1;
                        tracing::info!(
                            sample_code = %code,
                            recipient = %recipient,
                            "Abnormal result alert sent"
                        );
                    }
                    Err(e) => {
                        outcome.alerts_failed += 1;
                        log_error_with_context!(&e, "Failed to send abnormal result alert");
                    }
                }
            }
        }

        outcome
    }
}

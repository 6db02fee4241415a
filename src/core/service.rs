//! Application service wiring
//!
//! [`LabService`] bundles the command handlers and queries over one set of
//! ports. [`LabServiceBuilder`] assembles it either from explicit ports (tests,
//! embedding) or from a [`LabConfig`].

use crate::adapters::cache::{create_cache, Cache};
use crate::adapters::database::create_sample_repository;
use crate::adapters::database::traits::SampleRepository;
use crate::adapters::document::{ReportRenderer, TextReportRenderer};
use crate::adapters::notification::{
    create_notification_sender, LogNotificationSender, NotificationSender,
};
use crate::config::LabConfig;
use crate::core::commands::{
    shared_rng, AddResultCommand, AddResultHandler, CommandContext, NotifyPatientCommand,
    NotifyPatientHandler, RegisterSampleCommand, RegisterSampleHandler, RejectSampleCommand,
    RejectSampleHandler, SharedRng, ValidateResultCommand, ValidateResultHandler,
};
use crate::core::dto::SampleDto;
use crate::core::events::EventDispatcher;
use crate::core::queries::SampleQueries;
use crate::domain::clock::{Clock, SystemClock};
use crate::domain::email::EmailAddress;
use crate::domain::{LabError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Entry point for every lifecycle use case
pub struct LabService {
    register: RegisterSampleHandler,
    add_result: AddResultHandler,
    validate: ValidateResultHandler,
    notify: NotifyPatientHandler,
    reject: RejectSampleHandler,
    queries: SampleQueries,
    backend: &'static str,
    provider: &'static str,
}

impl LabService {
    pub async fn register_sample(
        &self,
        command: RegisterSampleCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        self.register.handle(command, shutdown).await
    }

    pub async fn add_result(
        &self,
        command: AddResultCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        self.add_result.handle(command, shutdown).await
    }

    pub async fn validate_result(
        &self,
        command: ValidateResultCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        self.validate.handle(command, shutdown).await
    }

    pub async fn notify_patient(
        &self,
        command: NotifyPatientCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        self.notify.handle(command, shutdown).await
    }

    pub async fn reject_sample(
        &self,
        command: RejectSampleCommand,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<SampleDto> {
        self.reject.handle(command, shutdown).await
    }

    /// Read-side handlers
    pub fn queries(&self) -> &SampleQueries {
        &self.queries
    }

    /// Storage backend name
    pub fn backend_name(&self) -> &'static str {
        self.backend
    }

    /// Notification provider name
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }
}

/// Builder for [`LabService`]
///
/// Only the repository is required. Defaults: log notifications, no cache,
/// system clock, entropy-seeded randomness, no abnormal-result alerts.
///
/// # Example
///
/// ```
/// use labtrack::adapters::memory::InMemorySampleRepository;
/// use labtrack::core::service::LabServiceBuilder;
/// use std::sync::Arc;
///
/// let service = LabServiceBuilder::new()
///     .repository(Arc::new(InMemorySampleRepository::new()))
///     .build()
///     .unwrap();
/// assert_eq!(service.backend_name(), "memory");
/// ```
pub struct LabServiceBuilder {
    repository: Option<Arc<dyn SampleRepository + Send + Sync>>,
    notifier: Option<Arc<dyn NotificationSender + Send + Sync>>,
    cache: Option<Arc<dyn Cache + Send + Sync>>,
    clock: Option<Arc<dyn Clock>>,
    rng: Option<SharedRng>,
    alert_recipient: Option<EmailAddress>,
    cache_ttl: Duration,
}

impl Default for LabServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LabServiceBuilder {
    pub fn new() -> Self {
        Self {
            repository: None,
            notifier: None,
            cache: None,
            clock: None,
            rng: None,
            alert_recipient: None,
            cache_ttl: Duration::from_secs(300),
        }
    }

    /// Create every port from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a port cannot be created or the alert recipient
    /// is not a valid address.
    pub async fn from_config(config: &LabConfig) -> Result<Self> {
        let repository = create_sample_repository(config).await?;
        let notifier = create_notification_sender(&config.notification)?;
        let alert_recipient = config
            .notification
            .abnormal_alert_recipient
            .as_deref()
            .map(EmailAddress::new)
            .transpose()?;

        let mut builder = Self::new()
            .repository(repository)
            .notifier(notifier)
            .cache_ttl(Duration::from_secs(config.cache.ttl_seconds));
        builder.cache = create_cache(&config.cache);
        builder.alert_recipient = alert_recipient;
        Ok(builder)
    }

    pub fn repository(mut self, repository: Arc<dyn SampleRepository + Send + Sync>) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn NotificationSender + Send + Sync>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn cache(mut self, cache: Arc<dyn Cache + Send + Sync>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn rng(mut self, rng: SharedRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Recipient of abnormal-result alerts
    pub fn alert_recipient(mut self, recipient: EmailAddress) -> Self {
        self.alert_recipient = Some(recipient);
        self
    }

    /// Assemble the service
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when no repository was supplied.
    pub fn build(self) -> Result<LabService> {
        let repository = self.repository.ok_or_else(|| {
            LabError::Configuration("A sample repository is required".to_string())
        })?;
        let notifier = self.notifier.unwrap_or_else(|| {
            Arc::new(LogNotificationSender::new()) as Arc<dyn NotificationSender + Send + Sync>
        });
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock) as Arc<dyn Clock>);
        let rng = self.rng.unwrap_or_else(shared_rng);

        if self.alert_recipient.is_none() {
            tracing::debug!("No abnormal-result alert recipient configured");
        }

        let context = CommandContext {
            repository: repository.clone(),
            dispatcher: Arc::new(EventDispatcher::new(
                notifier.clone(),
                self.alert_recipient,
            )),
            cache: self.cache.clone(),
            cache_ttl: self.cache_ttl,
            clock: clock.clone(),
            rng,
        };

        let reports: Arc<dyn ReportRenderer + Send + Sync> =
            Arc::new(TextReportRenderer::new(repository.clone(), clock));

        Ok(LabService {
            register: RegisterSampleHandler::new(context.clone()),
            add_result: AddResultHandler::new(context.clone()),
            validate: ValidateResultHandler::new(context.clone()),
            notify: NotifyPatientHandler::new(context.clone(), notifier.clone()),
            reject: RejectSampleHandler::new(context),
            queries: SampleQueries::new(repository.clone(), reports, self.cache, self.cache_ttl),
            backend: repository.backend_name(),
            provider: notifier.provider_name(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::cache::InMemoryCache;
    use crate::adapters::memory::InMemorySampleRepository;
    use crate::core::queries::sample_id_key;
    use crate::domain::analysis::AnalysisKind;
    use uuid::Uuid;

    #[test]
    fn test_build_requires_repository() {
        let err = LabServiceBuilder::new().build().err().unwrap();
        assert!(matches!(err, LabError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_from_default_config() {
        let service = LabServiceBuilder::from_config(&LabConfig::default())
            .await
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(service.backend_name(), "memory");
        assert_eq!(service.provider_name(), "log");
    }

    #[tokio::test]
    async fn test_commands_invalidate_cached_lookup() {
        let cache = Arc::new(InMemoryCache::new(Arc::new(SystemClock)));
        let service = LabServiceBuilder::new()
            .repository(Arc::new(InMemorySampleRepository::new()))
            .cache(cache.clone())
            .build()
            .unwrap();
        let (_tx, shutdown) = watch::channel(false);

        let dto = service
            .register_sample(
                RegisterSampleCommand {
                    patient_id: Uuid::new_v4(),
                    analysis_kind: AnalysisKind::Hiv,
                },
                &shutdown,
            )
            .await
            .unwrap();

        service.queries().get_by_id(dto.id).await.unwrap();
        assert!(cache.get(&sample_id_key(dto.id)).await.unwrap().is_some());

        service
            .reject_sample(
                RejectSampleCommand {
                    sample_id: dto.id,
                    reason: "leaked in transit".to_string(),
                },
                &shutdown,
            )
            .await
            .unwrap();
        assert!(cache.get(&sample_id_key(dto.id)).await.unwrap().is_none());

        let fresh = service.queries().get_by_id(dto.id).await.unwrap();
        assert_eq!(fresh.status, "Rejected");
    }
}

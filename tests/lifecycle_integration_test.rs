//! End-to-end lifecycle tests against the in-memory backend
//!
//! These tests drive the public service API the way the CLI does and check the
//! stored aggregate, the notifications sent and the optimistic version checks.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use labtrack::adapters::database::traits::SampleRepository;
use labtrack::adapters::document::verify_report;
use labtrack::adapters::memory::InMemorySampleRepository;
use labtrack::adapters::notification::NotificationSender;
use labtrack::core::commands::{
    seeded_rng, AddResultCommand, NotifyPatientCommand, RegisterSampleCommand,
    RejectSampleCommand, ValidateResultCommand,
};
use labtrack::core::service::{LabService, LabServiceBuilder};
use labtrack::domain::{
    AnalysisKind, DoctorId, EmailAddress, FixedClock, LabError, PatientId, ResultStatus,
    ResultValue, SampleCode, SampleId, SampleStatus,
};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use uuid::Uuid;

#[derive(Default)]
struct RecordingSender {
    ready: Mutex<Vec<(String, String, String)>>,
    alerts: Mutex<Vec<(String, String, AnalysisKind)>>,
    fail_ready: bool,
}

#[async_trait]
impl NotificationSender for RecordingSender {
    async fn send_result_ready(
        &self,
        email: &EmailAddress,
        recipient_name: &str,
        code: &SampleCode,
    ) -> labtrack::domain::Result<()> {
        if self.fail_ready {
            return Err(LabError::Notification("smtp relay refused".to_string()));
        }
        self.ready.lock().unwrap().push((
            email.to_string(),
            recipient_name.to_string(),
            code.to_string(),
        ));
        Ok(())
    }

    async fn send_abnormal_alert(
        &self,
        email: &EmailAddress,
        code: &SampleCode,
        analysis_kind: AnalysisKind,
    ) -> labtrack::domain::Result<()> {
        self.alerts
            .lock()
            .unwrap()
            .push((email.to_string(), code.to_string(), analysis_kind));
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

struct Harness {
    service: LabService,
    repository: Arc<InMemorySampleRepository>,
    sender: Arc<RecordingSender>,
    shutdown: watch::Receiver<bool>,
    _shutdown_tx: watch::Sender<bool>,
}

fn harness_with(sender: RecordingSender) -> Harness {
    let repository = Arc::new(InMemorySampleRepository::new());
    let sender = Arc::new(sender);
    let service = LabServiceBuilder::new()
        .repository(repository.clone())
        .notifier(sender.clone())
        .clock(Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap(),
        )))
        .rng(seeded_rng(2025))
        .alert_recipient(EmailAddress::new("oncall@lab.example.org").unwrap())
        .build()
        .unwrap();
    let (tx, rx) = watch::channel(false);

    Harness {
        service,
        repository,
        sender,
        shutdown: rx,
        _shutdown_tx: tx,
    }
}

fn harness() -> Harness {
    harness_with(RecordingSender::default())
}

impl Harness {
    async fn register(&self, patient: Uuid, kind: AnalysisKind) -> SampleId {
        self.service
            .register_sample(
                RegisterSampleCommand {
                    patient_id: patient,
                    analysis_kind: kind,
                },
                &self.shutdown,
            )
            .await
            .unwrap()
            .id
    }

    async fn add_result(&self, id: SampleId, value: f64) {
        self.service
            .add_result(
                AddResultCommand {
                    sample_id: id,
                    value,
                    unit: "mmol/L".to_string(),
                    reference_min: 3.9,
                    reference_max: 6.1,
                    notes: String::new(),
                },
                &self.shutdown,
            )
            .await
            .unwrap();
    }

    async fn validate(&self, id: SampleId) -> labtrack::domain::Result<()> {
        self.service
            .validate_result(
                ValidateResultCommand {
                    sample_id: id,
                    doctor_id: DoctorId::new(Uuid::new_v4()).unwrap(),
                    notes: "ok".to_string(),
                },
                &self.shutdown,
            )
            .await
            .map(|_| ())
    }

    async fn notify(&self, id: SampleId) -> labtrack::domain::Result<()> {
        let email: String = SafeEmail().fake();
        let name: String = Name().fake();
        self.service
            .notify_patient(
                NotifyPatientCommand {
                    sample_id: id,
                    patient_email: EmailAddress::new(email).unwrap(),
                    patient_name: name,
                },
                &self.shutdown,
            )
            .await
            .map(|_| ())
    }
}

#[tokio::test]
async fn test_full_lifecycle() {
    let h = harness();
    let patient = Uuid::new_v4();
    let id = h.register(patient, AnalysisKind::Glucose).await;

    h.add_result(id, 5.2).await;
    h.validate(id).await.unwrap();
    h.notify(id).await.unwrap();

    let sample = h.repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(sample.status(), SampleStatus::Validated);
    assert_eq!(sample.result_status(), ResultStatus::Notified);
    assert_eq!(sample.version(), 4);
    assert!(sample.validated_by().is_some());
    assert_eq!(
        sample.notified_at(),
        Some(Utc.with_ymd_and_hms(2025, 6, 2, 8, 0, 0).unwrap())
    );
    assert!(sample.pending_events().is_empty());

    let ready = h.sender.ready.lock().unwrap().clone();
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].2, sample.code().to_string());
    assert!(h.sender.alerts.lock().unwrap().is_empty());

    let listed = h
        .service
        .queries()
        .get_by_patient(PatientId::new(patient).unwrap())
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].result_status, "Notified");

    let report = h.service.queries().generate_report(id).await.unwrap();
    assert!(verify_report(&report));
}

#[tokio::test]
async fn test_abnormal_validation_raises_one_alert() {
    let h = harness();
    let id = h.register(Uuid::new_v4(), AnalysisKind::Glucose).await;
    h.add_result(id, 11.8).await;
    h.validate(id).await.unwrap();

    let alerts = h.sender.alerts.lock().unwrap().clone();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].0, "oncall@lab.example.org");
    assert_eq!(alerts[0].2, AnalysisKind::Glucose);
}

#[tokio::test]
async fn test_notification_failure_leaves_sample_validated() {
    let h = harness_with(RecordingSender {
        fail_ready: true,
        ..RecordingSender::default()
    });
    let id = h.register(Uuid::new_v4(), AnalysisKind::Thyroid).await;
    h.add_result(id, 5.0).await;
    h.validate(id).await.unwrap();

    let err = h.notify(id).await.unwrap_err();
    assert!(matches!(err, LabError::Notification(_)));
    assert!(err.is_infrastructure());

    let sample = h.repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(sample.result_status(), ResultStatus::Validated);
    assert_eq!(sample.version(), 3);
}

#[tokio::test]
async fn test_stale_update_conflicts() {
    let h = harness();
    let id = h.register(Uuid::new_v4(), AnalysisKind::Urine).await;

    // Two readers load the same version
    let mut first = h.repository.get_by_id(id).await.unwrap().unwrap();
    let mut second = h.repository.get_by_id(id).await.unwrap().unwrap();
    let clock = FixedClock::new(Utc::now());
    let mut rng = rand::thread_rng();

    first.add_result(ResultValue::new(1.0, "g/L", 0.0, 2.0).unwrap(), "", &clock, &mut rng);
    h.repository.update(&first).await.unwrap();

    second.reject("contaminated");
    let err = h.repository.update(&second).await.unwrap_err();
    assert!(matches!(err, LabError::Conflict(_)));

    let stored = h.repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status(), SampleStatus::Completed);
    assert_eq!(stored.version(), 2);
}

#[tokio::test]
async fn test_pending_validation_lists_completed_only() {
    let h = harness();
    let completed = h.register(Uuid::new_v4(), AnalysisKind::Glucose).await;
    let received = h.register(Uuid::new_v4(), AnalysisKind::Glucose).await;
    let validated = h.register(Uuid::new_v4(), AnalysisKind::Glucose).await;

    h.add_result(completed, 5.0).await;
    h.add_result(validated, 5.0).await;
    h.validate(validated).await.unwrap();

    let pending = h.service.queries().get_pending_validation().await.unwrap();
    let ids: Vec<SampleId> = pending.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![completed]);
    assert!(!ids.contains(&received));
}

#[tokio::test]
async fn test_rejected_sample_keeps_result() {
    let h = harness();
    let id = h.register(Uuid::new_v4(), AnalysisKind::Cholesterol).await;
    h.add_result(id, 4.0).await;

    let dto = h
        .service
        .reject_sample(
            RejectSampleCommand {
                sample_id: id,
                reason: "label mismatch".to_string(),
            },
            &h.shutdown,
        )
        .await
        .unwrap();

    assert_eq!(dto.status, "Rejected");
    assert_eq!(dto.result_status, "Completed");
    assert!(dto.result.is_some());

    let by_code = h.service.queries().get_by_code(&dto.code).await.unwrap();
    assert_eq!(by_code.status, "Rejected");
}

#[tokio::test]
async fn test_unknown_sample_is_not_found() {
    let h = harness();
    let missing = SampleId::new(Uuid::new_v4()).unwrap();

    let err = h.validate(missing).await.unwrap_err();
    assert!(matches!(err, LabError::NotFound(_)));
    assert!(!err.is_infrastructure());
}

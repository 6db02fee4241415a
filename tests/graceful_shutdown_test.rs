//! Integration tests for graceful shutdown functionality
//!
//! These tests verify that:
//! - Shutdown signals reach every receiver
//! - A handler started after shutdown refuses to run
//! - An interrupted command leaves the stored sample untouched

use labtrack::adapters::database::traits::SampleRepository;
use labtrack::adapters::memory::InMemorySampleRepository;
use labtrack::core::commands::{AddResultCommand, RegisterSampleCommand, RejectSampleCommand};
use labtrack::core::service::{LabService, LabServiceBuilder};
use labtrack::domain::{AnalysisKind, ErrorCategory, LabError, SampleId, SampleStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use uuid::Uuid;

fn service(repository: Arc<InMemorySampleRepository>) -> LabService {
    LabServiceBuilder::new()
        .repository(repository)
        .build()
        .unwrap()
}

async fn registered(service: &LabService, shutdown: &watch::Receiver<bool>) -> SampleId {
    service
        .register_sample(
            RegisterSampleCommand {
                patient_id: Uuid::new_v4(),
                analysis_kind: AnalysisKind::Glucose,
            },
            shutdown,
        )
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_shutdown_signal_propagation() {
    let (shutdown_tx, shutdown_rx1) = watch::channel(false);
    let shutdown_rx2 = shutdown_rx1.clone();

    assert!(!*shutdown_rx1.borrow());
    assert!(!*shutdown_rx2.borrow());

    shutdown_tx.send(true).unwrap();

    assert!(*shutdown_rx1.borrow());
    assert!(*shutdown_rx2.borrow());
}

#[tokio::test]
async fn test_shutdown_signal_timing() {
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let waiter = tokio::spawn(async move {
        shutdown_rx.changed().await.unwrap();
        *shutdown_rx.borrow()
    });

    tokio::time::sleep(Duration::from_millis(20)).await;
    shutdown_tx.send(true).unwrap();

    let observed = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert!(observed);
}

#[tokio::test]
async fn test_command_after_shutdown_is_cancelled() {
    let repository = Arc::new(InMemorySampleRepository::new());
    let service = service(repository.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let id = registered(&service, &shutdown_rx).await;
    shutdown_tx.send(true).unwrap();

    let err = service
        .add_result(
            AddResultCommand {
                sample_id: id,
                value: 5.0,
                unit: "mmol/L".to_string(),
                reference_min: 3.9,
                reference_max: 6.1,
                notes: String::new(),
            },
            &shutdown_rx,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, LabError::Cancelled(_)));
    assert_eq!(err.category(), ErrorCategory::ServiceUnavailable);

    let stored = repository.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.status(), SampleStatus::Received);
    assert_eq!(stored.version(), 1);
}

#[tokio::test]
async fn test_graceful_shutdown_simulation() {
    let repository = Arc::new(InMemorySampleRepository::new());
    let service = service(repository.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(registered(&service, &shutdown_rx).await);
    }

    // Reject samples one by one until the signal arrives
    let mut rejected = 0;
    for (index, id) in ids.iter().enumerate() {
        if index == 2 {
            shutdown_tx.send(true).unwrap();
        }
        let outcome = service
            .reject_sample(
                RejectSampleCommand {
                    sample_id: *id,
                    reason: "courier delay".to_string(),
                },
                &shutdown_rx,
            )
            .await;
        match outcome {
            Ok(_) => rejected += 1,
            Err(LabError::Cancelled(_)) => break,
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    assert_eq!(rejected, 2);
    let last = repository.get_by_id(ids[2]).await.unwrap().unwrap();
    assert_eq!(last.status(), SampleStatus::Received);
    assert_eq!(last.rejection_reason(), None);
}

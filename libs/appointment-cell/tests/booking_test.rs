use std::sync::Arc;

use assert_matches::assert_matches;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::models::AppointmentError;
use appointment_cell::services::{BookingLedger, BookingService};
use notification_cell::models::{ArtifactKind, StepStatus};
use notification_cell::NotificationPipeline;
use shared_utils::test_utils::TestConfig;

mod common;
use common::{catalog, jan, ledger, pipeline_with, request, RecordingMail, UnreachableMail};

#[tokio::test]
async fn test_first_booking_confirms_on_every_channel() {
    let config = TestConfig::default();
    let mail = Arc::new(RecordingMail::default());
    let pipeline = Arc::new(pipeline_with(&config, mail.clone()));
    let service = BookingService::with_parts(Arc::new(ledger(&config)), Arc::clone(&pipeline));

    let outcome = service
        .book(request("Asha", "Dr.A", jan(5), "10:00"))
        .await
        .unwrap();

    assert_eq!(outcome.queue_position, 1);
    assert!(outcome.notifications.all_ok(), "{:?}", outcome.notifications);

    let sent = mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "asha@example.com");
    assert!(sent[0].attachment.is_some());

    let id = outcome.appointment.id;
    for kind in [ArtifactKind::Audio, ArtifactKind::QrCode, ArtifactKind::Receipt] {
        assert!(pipeline.artifacts().load(id, kind).await.unwrap().is_some());
    }
}

#[tokio::test]
async fn test_second_booking_same_day_is_second_in_queue() {
    let config = TestConfig::default();
    let service = BookingService::with_parts(
        Arc::new(ledger(&config)),
        Arc::new(pipeline_with(&config, Arc::new(RecordingMail::default()))),
    );

    let first = service.book(request("P1", "Dr.A", jan(5), "10:00")).await.unwrap();
    let other_doctor = service.book(request("P2", "Dr.B", jan(5), "2:00 PM")).await.unwrap();
    let second = service.book(request("P3", "Dr.A", jan(5), "11:00")).await.unwrap();

    assert_eq!(first.queue_position, 1);
    assert_eq!(other_doctor.queue_position, 1);
    assert_eq!(second.queue_position, 2);
}

#[tokio::test]
async fn test_rejected_booking_is_not_stored_or_announced() {
    let config = TestConfig::default();
    let mail = Arc::new(RecordingMail::default());
    let ledger = Arc::new(ledger(&config));
    let service = BookingService::with_parts(Arc::clone(&ledger), Arc::new(pipeline_with(&config, mail.clone())));

    let result = service.book(request("P1", "Dr.A", jan(5), "4:00 PM")).await;

    assert_matches!(result, Err(AppointmentError::InvalidSlot { .. }));
    assert!(ledger.list_all().await.unwrap().is_empty());
    assert!(mail.sent.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_mail_failure_keeps_the_booking() {
    let config = TestConfig::default();
    let ledger = Arc::new(ledger(&config));
    let service = BookingService::with_parts(
        Arc::clone(&ledger),
        Arc::new(pipeline_with(&config, Arc::new(UnreachableMail))),
    );

    let outcome = service.book(request("P1", "Dr.A", jan(5), "10:00")).await.unwrap();

    assert!(outcome.notifications.email.is_failed());
    assert!(outcome.notifications.receipt.is_ok());
    assert_eq!(ledger.list_all().await.unwrap(), vec![outcome.appointment]);
}

#[tokio::test]
async fn test_real_collaborators_degrade_without_losing_the_booking() {
    let tts = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/translate_tts"))
        .and(query_param("q", "Appointment booked with Dr.A at 10:00 on 2024-01-05"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ID3wiremock-audio".to_vec()))
        .expect(1)
        .mount(&tts)
        .await;

    let config = TestConfig::default()
        .with_tts(format!("{}/translate_tts", tts.uri()))
        .with_mail_credentials();
    let app_config = config.to_app_config();
    let ledger = Arc::new(BookingLedger::new(app_config.appointments_file.clone(), catalog()));
    let pipeline = Arc::new(NotificationPipeline::from_config(&app_config));
    let service = BookingService::with_parts(Arc::clone(&ledger), Arc::clone(&pipeline));

    let outcome = service.book(request("Asha", "Dr.A", jan(5), "10:00")).await.unwrap();

    assert_eq!(outcome.notifications.voice, StepStatus::Ok);
    assert_eq!(outcome.notifications.qr, StepStatus::Ok);
    assert_eq!(outcome.notifications.receipt, StepStatus::Ok);
    // Nothing listens on the configured relay port.
    assert!(outcome.notifications.email.is_failed());

    let audio = pipeline
        .artifacts()
        .load(outcome.appointment.id, ArtifactKind::Audio)
        .await
        .unwrap();
    assert_eq!(audio.as_deref(), Some(&b"ID3wiremock-audio"[..]));
    assert_eq!(ledger.find_by_id(outcome.appointment.id).await.unwrap(), Some(outcome.appointment));
}

#[tokio::test]
async fn test_unconfigured_relay_skips_email() {
    let config = TestConfig::default();
    let app_config = config.to_app_config();
    let service = BookingService::with_parts(
        Arc::new(BookingLedger::new(app_config.appointments_file.clone(), catalog())),
        Arc::new(NotificationPipeline::from_config(&app_config)),
    );

    let outcome = service.book(request("P1", "Dr.A", jan(5), "10:00")).await.unwrap();

    assert_matches!(outcome.notifications.email, StepStatus::Skipped(_));
    // Default TTS endpoint points at a closed port.
    assert!(outcome.notifications.voice.is_failed());
    assert!(outcome.notifications.receipt.is_ok());
}

#[tokio::test]
async fn test_double_booking_then_cancellation_scenario() {
    let config = TestConfig::default();
    let ledger = Arc::new(ledger(&config));
    let service = BookingService::with_parts(
        Arc::clone(&ledger),
        Arc::new(pipeline_with(&config, Arc::new(RecordingMail::default()))),
    );
    let console = appointment_cell::services::AdminConsole::new(Arc::clone(&ledger));

    let p1 = service.book(request("P1", "Dr.A", jan(5), "10:00")).await.unwrap();
    let p2 = service.book(request("P2", "Dr.A", jan(5), "10:00")).await.unwrap();
    assert_eq!(p1.queue_position, 1);
    assert_eq!(p2.queue_position, 2);

    assert!(console.cancel(p1.appointment.id).await.unwrap());
    assert_eq!(console.list_for_date(jan(5)).await.unwrap(), vec![p2.appointment.clone()]);

    assert!(!console.cancel(p1.appointment.id).await.unwrap());
    assert_eq!(console.list_for_date(jan(5)).await.unwrap(), vec![p2.appointment]);
}

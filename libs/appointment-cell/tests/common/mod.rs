#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use appointment_cell::models::NewAppointment;
use appointment_cell::services::BookingLedger;
use appointment_cell::AppointmentState;
use doctor_cell::{DoctorSlots, SlotCatalog};
use notification_cell::models::{NotificationError, OutgoingMail};
use notification_cell::services::{ArtifactStore, MailTransport, NotificationPipeline, SpeechSynthesizer};
use shared_utils::test_utils::TestConfig;

pub fn catalog() -> Arc<SlotCatalog> {
    Arc::new(SlotCatalog::new(vec![
        DoctorSlots::new("Dr.A", &["10:00", "11:00"]),
        DoctorSlots::new("Dr.B", &["2:00 PM"]),
    ])
    .unwrap())
}

pub fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

pub fn request(name: &str, doctor: &str, date: NaiveDate, slot: &str) -> NewAppointment {
    NewAppointment {
        patient_name: name.to_string(),
        patient_email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        doctor_id: doctor.to_string(),
        date,
        time_slot: slot.to_string(),
    }
}

pub fn ledger(config: &TestConfig) -> BookingLedger {
    BookingLedger::new(config.path("appointments.csv"), catalog())
}

pub struct StaticSpeech;

#[async_trait]
impl SpeechSynthesizer for StaticSpeech {
    async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, NotificationError> {
        Ok(b"ID3test-audio".to_vec())
    }
}

#[derive(Default)]
pub struct RecordingMail {
    pub sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl MailTransport for RecordingMail {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

pub struct UnreachableMail;

#[async_trait]
impl MailTransport for UnreachableMail {
    async fn send(&self, _mail: OutgoingMail) -> Result<(), NotificationError> {
        Err(NotificationError::Mail("connection refused".to_string()))
    }
}

pub fn pipeline_with(config: &TestConfig, mailer: Arc<dyn MailTransport>) -> NotificationPipeline {
    NotificationPipeline::new(
        Arc::new(StaticSpeech),
        Some(mailer),
        ArtifactStore::new(config.path("artifacts")),
        Duration::from_secs(5),
        Duration::from_secs(1),
    )
}

/// State wired to the shared test catalog, a temp-dir ledger and in-memory
/// notification collaborators.
pub fn state_with(config: &TestConfig, mailer: Arc<dyn MailTransport>) -> Arc<AppointmentState> {
    Arc::new(AppointmentState::with_parts(
        config.to_arc(),
        Arc::new(ledger(config)),
        Arc::new(pipeline_with(config, mailer)),
    ))
}

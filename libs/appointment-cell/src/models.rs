// libs/appointment-cell/src/models.rs
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use notification_cell::models::{PipelineReport, ReceiptDetails};
use shared_database::StoreError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A stored booking. Never mutated; cancellation deletes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: Uuid,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
    pub created_at: DateTime<Utc>,
}

impl AppointmentRecord {
    pub fn receipt_details(&self) -> ReceiptDetails {
        ReceiptDetails {
            appointment_id: self.id,
            patient_name: self.patient_name.clone(),
            patient_email: self.patient_email.clone(),
            doctor: self.doctor_id.clone(),
            date: self.date,
            time_slot: self.time_slot.clone(),
        }
    }
}

/// A booking request: an appointment before the ledger gives it an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAppointment {
    pub patient_name: String,
    pub patient_email: String,
    pub doctor_id: String,
    pub date: NaiveDate,
    pub time_slot: String,
}

/// One ledger row as persisted. `id` and `created_at` are optional only so
/// that files written before those columns existed can still be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRow {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl AppointmentRow {
    /// `None` until the row has been assigned an identity.
    pub fn to_record(&self) -> Option<AppointmentRecord> {
        Some(AppointmentRecord {
            id: self.id?,
            patient_name: self.name.clone(),
            patient_email: self.email.clone(),
            doctor_id: self.doctor.clone(),
            date: self.date,
            time_slot: self.time.clone(),
            created_at: self.created_at?,
        })
    }
}

impl From<&AppointmentRecord> for AppointmentRow {
    fn from(record: &AppointmentRecord) -> Self {
        Self {
            id: Some(record.id),
            name: record.patient_name.clone(),
            email: record.patient_email.clone(),
            doctor: record.doctor_id.clone(),
            date: record.date,
            time: record.time_slot.clone(),
            created_at: Some(record.created_at),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingOutcome {
    pub appointment: AppointmentRecord,
    pub queue_position: usize,
    pub notifications: PipelineReport,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelResponse {
    pub id: Uuid,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub payload: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub appointment: Option<AppointmentRecord>,
}

// ==============================================================================
// STATISTICS MODELS
// ==============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub total: usize,
    pub by_doctor: BTreeMap<String, usize>,
    pub by_date: BTreeMap<NaiveDate, usize>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Time slot {time_slot} is not offered by {doctor_id}")]
    InvalidSlot { doctor_id: String, time_slot: String },

    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Ledger storage error: {0}")]
    Persistence(#[from] StoreError),
}

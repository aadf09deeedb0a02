use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// ==============================================================================
// PIPELINE INPUT
// ==============================================================================

/// The booking fields the confirmation artifacts are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptDetails {
    pub appointment_id: Uuid,
    pub patient_name: String,
    pub patient_email: String,
    pub doctor: String,
    pub date: NaiveDate,
    pub time_slot: String,
}

// ==============================================================================
// PIPELINE OUTPUT
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum StepStatus {
    Ok,
    Failed(String),
    Skipped(String),
}

impl StepStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, StepStatus::Ok)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepStatus::Failed(_))
    }
}

/// Outcome of each best-effort step, reported separately so a failed email
/// never hides a good receipt (or the other way round).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub voice: StepStatus,
    pub qr: StepStatus,
    pub receipt: StepStatus,
    pub email: StepStatus,
}

impl PipelineReport {
    pub fn all_ok(&self) -> bool {
        self.voice.is_ok() && self.qr.is_ok() && self.receipt.is_ok() && self.email.is_ok()
    }
}

// ==============================================================================
// ARTIFACTS AND MAIL
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Audio,
    QrCode,
    Receipt,
}

impl ArtifactKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Audio => "confirm.mp3",
            ArtifactKind::QrCode => "qr.svg",
            ArtifactKind::Receipt => "receipt.pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Audio => "audio/mpeg",
            ArtifactKind::QrCode => "image/svg+xml",
            ArtifactKind::Receipt => "application/pdf",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAttachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<MailAttachment>,
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    #[error("QR encoding failed: {0}")]
    QrEncoding(String),

    #[error("Receipt generation failed: {0}")]
    Receipt(String),

    #[error("Mail delivery failed: {0}")]
    Mail(String),

    #[error("Artifact storage failed: {0}")]
    Artifact(#[from] std::io::Error),

    #[error("{step} step timed out after {timeout_ms} ms")]
    Timeout { step: &'static str, timeout_ms: u128 },
}

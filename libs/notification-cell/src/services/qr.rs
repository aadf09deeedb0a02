use qrcode::render::svg;
use qrcode::{Color, QrCode};
use uuid::Uuid;

use crate::models::{NotificationError, ReceiptDetails};

const PAYLOAD_PREFIX: &str = "SMARTCARE";
const SEPARATOR: char = '|';

/// The text encoded into a booking's QR code. Deterministic, so a verifier
/// holding the stored record can rebuild it and compare.
///
/// Format: `SMARTCARE|{appointment_id}|{patient}|{doctor}|{date}|{time}`.
/// Separator characters inside free-text fields are replaced with `/`.
pub fn qr_payload(details: &ReceiptDetails) -> String {
    [
        PAYLOAD_PREFIX.to_string(),
        details.appointment_id.to_string(),
        scrub(&details.patient_name),
        scrub(&details.doctor),
        details.date.format("%Y-%m-%d").to_string(),
        scrub(&details.time_slot),
    ]
    .join(&SEPARATOR.to_string())
}

/// Pulls the appointment id out of a scanned payload, if it has our shape.
pub fn payload_appointment_id(payload: &str) -> Option<Uuid> {
    let mut fields = payload.trim().split(SEPARATOR);
    if fields.next()? != PAYLOAD_PREFIX {
        return None;
    }
    Uuid::parse_str(fields.next()?).ok()
}

fn scrub(field: &str) -> String {
    field.replace(SEPARATOR, "/")
}

/// An encoded QR symbol: its module grid for drawing, plus an SVG rendering.
#[derive(Debug, Clone)]
pub struct QrArtifact {
    pub payload: String,
    pub width: usize,
    modules: Vec<bool>,
    pub svg: String,
}

impl QrArtifact {
    pub fn encode(payload: &str) -> Result<Self, NotificationError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| NotificationError::QrEncoding(e.to_string()))?;

        let width = code.width();
        let modules = code.to_colors().into_iter().map(|c| c == Color::Dark).collect();
        let svg = code
            .render::<svg::Color>()
            .min_dimensions(200, 200)
            .build();

        Ok(Self {
            payload: payload.to_string(),
            width,
            modules,
            svg,
        })
    }

    /// Whether the module at column `x`, row `y` (from the top left) is dark.
    pub fn is_dark(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.width && self.modules[y * self.width + x]
    }
}

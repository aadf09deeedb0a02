use chrono::NaiveDate;
use uuid::Uuid;

use notification_cell::models::ReceiptDetails;
use notification_cell::services::qr::{payload_appointment_id, qr_payload, QrArtifact};

fn details(name: &str) -> ReceiptDetails {
    ReceiptDetails {
        appointment_id: Uuid::parse_str("6f1c2a9e-3b4d-4e5f-8a9b-0c1d2e3f4a5b").unwrap(),
        patient_name: name.to_string(),
        patient_email: "p@example.com".to_string(),
        doctor: "Dr. Aisha".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
        time_slot: "3:00 PM".to_string(),
    }
}

#[test]
fn test_payload_format_is_stable() {
    assert_eq!(
        qr_payload(&details("Ravi Kumar")),
        "SMARTCARE|6f1c2a9e-3b4d-4e5f-8a9b-0c1d2e3f4a5b|Ravi Kumar|Dr. Aisha|2024-03-09|3:00 PM"
    );
}

#[test]
fn test_payload_scrubs_separator_in_free_text() {
    let payload = qr_payload(&details("Ravi|Kumar"));

    assert!(payload.contains("|Ravi/Kumar|"));
    assert_eq!(payload.split('|').count(), 6);
}

#[test]
fn test_payload_appointment_id_round_trips() {
    let details = details("Ravi Kumar");

    assert_eq!(
        payload_appointment_id(&qr_payload(&details)),
        Some(details.appointment_id)
    );
    assert_eq!(payload_appointment_id("Ravi-Dr. Aisha-2024-03-09-3:00 PM"), None);
    assert_eq!(payload_appointment_id("SMARTCARE|not-a-uuid|x"), None);
    assert_eq!(payload_appointment_id(""), None);
}

#[test]
fn test_encode_produces_square_module_grid_and_svg() {
    let qr = QrArtifact::encode(&qr_payload(&details("Ravi Kumar"))).unwrap();

    assert!(qr.width >= 21);
    assert!(qr.svg.contains("<svg"));
    // Finder pattern corners are always dark.
    assert!(qr.is_dark(0, 0));
    assert!(qr.is_dark(qr.width - 1, 0));
    assert!(qr.is_dark(0, qr.width - 1));
    assert!(!qr.is_dark(qr.width, 0));
}

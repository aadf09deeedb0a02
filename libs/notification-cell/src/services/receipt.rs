use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

use crate::models::{NotificationError, ReceiptDetails};
use crate::services::qr::QrArtifact;

// A4 in points.
const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 72;
const MAX_MODULE_SIZE: i64 = 4;
const QR_BOTTOM: i64 = 420;
// Room between the QR baseline and the appointment id line.
const QR_MAX_HEIGHT: i64 = 230;

/// Renders the one-page appointment receipt. The QR code is drawn as filled
/// squares when one is supplied; without it the receipt still carries every
/// booking field.
pub fn render_receipt(
    details: &ReceiptDetails,
    qr: Option<&QrArtifact>,
) -> Result<Vec<u8>, NotificationError> {
    let mut operations = Vec::new();

    text_line(&mut operations, 16, 190, 780, "SmartCare Appointment Receipt");
    text_line(&mut operations, 12, MARGIN, 730, &format!("Name: {}", details.patient_name));
    text_line(&mut operations, 12, MARGIN, 710, &format!("Doctor: {}", details.doctor));
    text_line(
        &mut operations,
        12,
        MARGIN,
        690,
        &format!(
            "Date & Time: {} at {}",
            details.date.format("%Y-%m-%d"),
            details.time_slot
        ),
    );
    text_line(
        &mut operations,
        9,
        MARGIN,
        665,
        &format!("Appointment ID: {}", details.appointment_id),
    );

    if let Some(qr) = qr {
        draw_qr(&mut operations, qr);
        text_line(&mut operations, 10, MARGIN, QR_BOTTOM - 20, "Scan to verify");
    }

    build_document(Content { operations })
}

fn text_line(operations: &mut Vec<Operation>, size: i64, x: i64, y: i64, text: &str) {
    operations.push(Operation::new("BT", vec![]));
    operations.push(Operation::new(
        "Tf",
        vec![Object::Name(b"F1".to_vec()), Object::Integer(size)],
    ));
    operations.push(Operation::new("Td", vec![Object::Integer(x), Object::Integer(y)]));
    operations.push(Operation::new(
        "Tj",
        vec![Object::String(win_ansi(text), StringFormat::Literal)],
    ));
    operations.push(Operation::new("ET", vec![]));
}

/// Encodes `text` for the WinAnsiEncoding font. Characters outside it become '?'.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c as u32 {
            0x20..=0x7E | 0xA0..=0xFF => c as u32 as u8,
            _ => match c {
                '€' => 0x80,
                '‚' => 0x82,
                '„' => 0x84,
                '…' => 0x85,
                '‘' => 0x91,
                '’' => 0x92,
                '“' => 0x93,
                '”' => 0x94,
                '•' => 0x95,
                '–' => 0x96,
                '—' => 0x97,
                '™' => 0x99,
                _ => b'?',
            },
        })
        .collect()
}

/// Largest whole-point module that keeps the symbol inside its area.
fn module_size(width: usize) -> i64 {
    (QR_MAX_HEIGHT / width.max(1) as i64).clamp(1, MAX_MODULE_SIZE)
}

fn draw_qr(operations: &mut Vec<Operation>, qr: &QrArtifact) {
    let module = module_size(qr.width);
    let top = QR_BOTTOM + qr.width as i64 * module;

    operations.push(Operation::new(
        "rg",
        vec![Object::Integer(0), Object::Integer(0), Object::Integer(0)],
    ));
    for y in 0..qr.width {
        for x in 0..qr.width {
            if !qr.is_dark(x, y) {
                continue;
            }
            operations.push(Operation::new(
                "re",
                vec![
                    Object::Integer(MARGIN + x as i64 * module),
                    Object::Integer(top - (y as i64 + 1) * module),
                    Object::Integer(module),
                    Object::Integer(module),
                ],
            ));
        }
    }
    operations.push(Operation::new("f", vec![]));
}

fn build_document(content: Content) -> Result<Vec<u8>, NotificationError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let encoded = content
        .encode()
        .map_err(|e| NotificationError::Receipt(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => Object::Integer(1),
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| NotificationError::Receipt(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_size_shrinks_for_large_symbols() {
        assert_eq!(module_size(25), 4);
        assert_eq!(module_size(77), 2);
        assert_eq!(module_size(177), 1);
        assert!(module_size(177) * 177 <= QR_MAX_HEIGHT);
    }
}

// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use tracing::info;

use notification_cell::NotificationPipeline;

use crate::models::{AppointmentError, BookingOutcome, NewAppointment};
use crate::services::ledger::BookingLedger;
use crate::services::queue::position_for;
use crate::state::AppointmentState;

pub struct BookingService {
    ledger: Arc<BookingLedger>,
    pipeline: Arc<NotificationPipeline>,
}

impl BookingService {
    pub fn new(state: &AppointmentState) -> Self {
        Self::with_parts(Arc::clone(&state.ledger), Arc::clone(&state.pipeline))
    }

    pub fn with_parts(ledger: Arc<BookingLedger>, pipeline: Arc<NotificationPipeline>) -> Self {
        Self { ledger, pipeline }
    }

    /// Validate, persist, rank, then confirm.
    ///
    /// Only validation and storage failures are returned as errors. Once the
    /// record is stored the booking stands; confirmation problems show up in
    /// `BookingOutcome::notifications`.
    pub async fn book(&self, request: NewAppointment) -> Result<BookingOutcome, AppointmentError> {
        let (appointment, snapshot) = self.ledger.append_with_snapshot(request).await?;
        let queue_position = position_for(&appointment, &snapshot);

        info!("Appointment {} is number {} in the queue for {} on {}",
              appointment.id, queue_position, appointment.doctor_id, appointment.date);

        let notifications = self.pipeline.run(&appointment.receipt_details()).await;

        Ok(BookingOutcome {
            appointment,
            queue_position,
            notifications,
        })
    }
}

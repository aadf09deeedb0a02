// libs/appointment-cell/src/state.rs
use std::sync::Arc;

use doctor_cell::SlotCatalog;
use notification_cell::NotificationPipeline;
use shared_config::AppConfig;

use crate::services::ledger::BookingLedger;

/// Shared handles for the appointment routes, built once in `main`.
pub struct AppointmentState {
    pub config: Arc<AppConfig>,
    pub ledger: Arc<BookingLedger>,
    pub pipeline: Arc<NotificationPipeline>,
}

impl AppointmentState {
    pub fn new(config: Arc<AppConfig>, catalog: Arc<SlotCatalog>) -> Self {
        let ledger = Arc::new(BookingLedger::new(config.appointments_file.clone(), catalog));
        let pipeline = Arc::new(NotificationPipeline::from_config(&config));

        Self::with_parts(config, ledger, pipeline)
    }

    pub fn with_parts(
        config: Arc<AppConfig>,
        ledger: Arc<BookingLedger>,
        pipeline: Arc<NotificationPipeline>,
    ) -> Self {
        Self {
            config,
            ledger,
            pipeline,
        }
    }
}

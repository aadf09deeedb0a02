// libs/appointment-cell/src/services/admin.rs
use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::models::{AnalyticsReport, AppointmentError, AppointmentRecord};
use crate::services::ledger::BookingLedger;

/// Staff-side operations over the ledger. Holds no listing of its own:
/// callers re-query after a cancellation.
pub struct AdminConsole {
    ledger: Arc<BookingLedger>,
}

impl AdminConsole {
    pub fn new(ledger: Arc<BookingLedger>) -> Self {
        Self { ledger }
    }

    pub async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        self.ledger.find_by_date(date).await
    }

    pub async fn cancel(&self, id: Uuid) -> Result<bool, AppointmentError> {
        let cancelled = self.ledger.delete_by_id(id).await?;
        info!("Admin cancellation of {} (removed: {})", id, cancelled);
        Ok(cancelled)
    }

    pub async fn analytics(&self) -> Result<AnalyticsReport, AppointmentError> {
        let records = self.ledger.list_all().await?;

        Ok(AnalyticsReport {
            total: records.len(),
            by_doctor: analytics_by_doctor(&records),
            by_date: analytics_by_date(&records),
        })
    }
}

pub fn analytics_by_doctor(records: &[AppointmentRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.doctor_id.clone()).or_insert(0) += 1;
    }
    counts
}

/// Booking counts per date. Dates without bookings are absent, not zero.
pub fn analytics_by_date(records: &[AppointmentRecord]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.date).or_insert(0) += 1;
    }
    counts
}

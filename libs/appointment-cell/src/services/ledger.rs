// libs/appointment-cell/src/services/ledger.rs
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use doctor_cell::SlotCatalog;
use shared_database::{CsvTable, TableChange};

use crate::models::{AppointmentError, AppointmentRecord, AppointmentRow, NewAppointment};

/// Durable record of bookings, keyed by a stable id rather than row position.
///
/// Every call re-reads the table under its lock; nothing is cached, so a view
/// returned after a cancellation never contains the cancelled record.
pub struct BookingLedger {
    table: CsvTable<AppointmentRow>,
    catalog: Arc<SlotCatalog>,
}

impl BookingLedger {
    pub fn new(path: impl Into<PathBuf>, catalog: Arc<SlotCatalog>) -> Self {
        Self {
            table: CsvTable::new(path),
            catalog,
        }
    }

    /// Validates and stores a booking. Double-booking a doctor/date/slot is allowed.
    pub async fn append(&self, candidate: NewAppointment) -> Result<AppointmentRecord, AppointmentError> {
        let (record, _) = self.append_with_snapshot(candidate).await?;
        Ok(record)
    }

    /// Like [`append`](Self::append), also returning the full ledger as it
    /// stood right after the write.
    #[instrument(skip(self, candidate), fields(doctor = %candidate.doctor_id, date = %candidate.date))]
    pub async fn append_with_snapshot(
        &self,
        candidate: NewAppointment,
    ) -> Result<(AppointmentRecord, Vec<AppointmentRecord>), AppointmentError> {
        let candidate = validate(candidate, &self.catalog)?;

        let (record, snapshot) = self
            .table
            .update(move |rows| {
                assign_missing_identities(rows);

                let created_at = next_created_at(rows);
                let record = AppointmentRecord {
                    id: Uuid::new_v4(),
                    patient_name: candidate.patient_name,
                    patient_email: candidate.patient_email,
                    doctor_id: candidate.doctor_id,
                    date: candidate.date,
                    time_slot: candidate.time_slot,
                    created_at,
                };
                rows.push(AppointmentRow::from(&record));

                TableChange::Commit((record, records_of(rows)))
            })
            .await?;

        info!("Appointment {} booked with {} on {} at {}",
              record.id, record.doctor_id, record.date, record.time_slot);
        Ok((record, snapshot))
    }

    pub async fn list_all(&self) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        let records = self
            .table
            .update(|rows| {
                let migrated = assign_missing_identities(rows);
                let records = records_of(rows);
                if migrated > 0 {
                    TableChange::Commit(records)
                } else {
                    TableChange::Discard(records)
                }
            })
            .await?;

        Ok(records)
    }

    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        let records: Vec<AppointmentRecord> = self
            .list_all()
            .await?
            .into_iter()
            .filter(|record| record.date == date)
            .collect();

        debug!("Found {} appointments on {}", records.len(), date);
        Ok(records)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AppointmentRecord>, AppointmentError> {
        Ok(self.list_all().await?.into_iter().find(|record| record.id == id))
    }

    /// Removes the record with `id`. Returns false, without writing, if no
    /// such record exists.
    #[instrument(skip(self))]
    pub async fn delete_by_id(&self, id: Uuid) -> Result<bool, AppointmentError> {
        let removed = self
            .table
            .update(move |rows| {
                let migrated = assign_missing_identities(rows);
                let before = rows.len();
                rows.retain(|row| row.id != Some(id));
                let removed = rows.len() < before;

                if removed || migrated > 0 {
                    TableChange::Commit(removed)
                } else {
                    TableChange::Discard(removed)
                }
            })
            .await?;

        if removed {
            info!("Appointment {} cancelled", id);
        } else {
            debug!("Cancellation of unknown appointment {} ignored", id);
        }
        Ok(removed)
    }
}

fn validate(candidate: NewAppointment, catalog: &SlotCatalog) -> Result<NewAppointment, AppointmentError> {
    let candidate = NewAppointment {
        patient_name: candidate.patient_name.trim().to_string(),
        patient_email: candidate.patient_email.trim().to_string(),
        ..candidate
    };

    if candidate.patient_name.is_empty() {
        return Err(AppointmentError::EmptyField("patient_name"));
    }
    if candidate.patient_email.is_empty() {
        return Err(AppointmentError::EmptyField("patient_email"));
    }
    if candidate.doctor_id.is_empty() {
        return Err(AppointmentError::EmptyField("doctor_id"));
    }
    if candidate.time_slot.is_empty() {
        return Err(AppointmentError::EmptyField("time_slot"));
    }
    if !candidate.patient_email.contains('@') {
        return Err(AppointmentError::InvalidEmail(candidate.patient_email));
    }
    if !catalog.contains_doctor(&candidate.doctor_id) {
        return Err(AppointmentError::UnknownDoctor(candidate.doctor_id));
    }
    if !catalog.is_valid_slot(&candidate.doctor_id, &candidate.time_slot) {
        return Err(AppointmentError::InvalidSlot {
            doctor_id: candidate.doctor_id,
            time_slot: candidate.time_slot,
        });
    }

    Ok(candidate)
}

/// Gives rows from files that predate the id/created_at columns a permanent
/// identity. Timestamps follow row order so queue positions stay meaningful.
fn assign_missing_identities(rows: &mut [AppointmentRow]) -> usize {
    let mut assigned = 0;
    let mut previous: Option<DateTime<Utc>> = None;

    for row in rows.iter_mut() {
        if row.id.is_none() {
            row.id = Some(Uuid::new_v4());
            assigned += 1;
        }
        if row.created_at.is_none() {
            let stamp = match previous {
                Some(prev) => prev + Duration::microseconds(1),
                None => Utc::now(),
            };
            row.created_at = Some(stamp);
            assigned += 1;
        }
        previous = row.created_at;
    }

    if assigned > 0 {
        warn!("Assigned identities to {} legacy ledger fields", assigned);
    }
    assigned
}

/// Strictly later than every stored timestamp, so same-day queue order never ties.
fn next_created_at(rows: &[AppointmentRow]) -> DateTime<Utc> {
    let now = Utc::now();
    match rows.iter().filter_map(|row| row.created_at).max() {
        Some(latest) if latest >= now => latest + Duration::microseconds(1),
        _ => now,
    }
}

fn records_of(rows: &[AppointmentRow]) -> Vec<AppointmentRecord> {
    rows.iter().filter_map(AppointmentRow::to_record).collect()
}

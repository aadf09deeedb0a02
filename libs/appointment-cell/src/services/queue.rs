// libs/appointment-cell/src/services/queue.rs
use crate::models::AppointmentRecord;

/// 1-based rank of `record` among bookings for the same doctor on the same
/// date, ordered by `created_at`. `record` always counts itself, whether or
/// not `snapshot` already contains it; later bookings never move it.
pub fn position_for(record: &AppointmentRecord, snapshot: &[AppointmentRecord]) -> usize {
    let ahead = snapshot
        .iter()
        .filter(|other| other.id != record.id)
        .filter(|other| other.doctor_id == record.doctor_id && other.date == record.date)
        .filter(|other| other.created_at <= record.created_at)
        .count();

    ahead + 1
}

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{info, instrument, warn};

use shared_database::{CsvTable, TableChange};

use crate::models::{ContactError, ContactMessage, ContactRow, ContactSubmission};

/// Append-only store of contact form messages.
pub struct ContactLedger {
    table: CsvTable<ContactRow>,
}

impl ContactLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            table: CsvTable::new(path),
        }
    }

    #[instrument(skip(self, submission))]
    pub async fn append(&self, submission: ContactSubmission) -> Result<ContactMessage, ContactError> {
        let name = required("name", submission.name)?;
        let email = required("email", submission.email)?;
        let message = required("message", submission.message)?;

        let stored = self
            .table
            .update(move |rows| {
                stamp_missing(rows);
                let stored = ContactMessage {
                    name,
                    email,
                    message,
                    timestamp: Utc::now(),
                };
                rows.push(ContactRow::from(&stored));
                TableChange::Commit(stored)
            })
            .await?;

        info!("Contact message stored from {}", stored.email);
        Ok(stored)
    }

    /// Messages in the order they were received.
    pub async fn list_all(&self) -> Result<Vec<ContactMessage>, ContactError> {
        let messages = self
            .table
            .update(|rows| {
                let stamped = stamp_missing(rows);
                let messages = rows.iter().filter_map(ContactRow::to_message).collect();
                if stamped > 0 {
                    TableChange::Commit(messages)
                } else {
                    TableChange::Discard(messages)
                }
            })
            .await?;

        Ok(messages)
    }
}

fn required(field: &'static str, value: String) -> Result<String, ContactError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ContactError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Gives rows from files without a timestamp column one that follows row order.
fn stamp_missing(rows: &mut [ContactRow]) -> usize {
    let mut stamped = 0;
    let mut previous: Option<DateTime<Utc>> = None;

    for row in rows.iter_mut() {
        if row.timestamp.is_none() {
            row.timestamp = Some(match previous {
                Some(prev) => prev + Duration::microseconds(1),
                None => Utc::now(),
            });
            stamped += 1;
        }
        previous = row.timestamp;
    }

    if stamped > 0 {
        warn!("Stamped {} legacy contact messages", stamped);
    }
    stamped
}

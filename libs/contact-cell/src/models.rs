use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shared_database::StoreError;

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// One contact file row. `timestamp` is optional only so that files written
/// before the column existed can still be read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRow {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl ContactRow {
    /// `None` until the row has been stamped.
    pub fn to_message(&self) -> Option<ContactMessage> {
        Some(ContactMessage {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
            timestamp: self.timestamp?,
        })
    }
}

impl From<&ContactMessage> for ContactRow {
    fn from(message: &ContactMessage) -> Self {
        Self {
            name: message.name.clone(),
            email: message.email.clone(),
            message: message.message.clone(),
            timestamp: Some(message.timestamp),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ContactError {
    #[error("Required field is empty: {0}")]
    EmptyField(&'static str),

    #[error("Contact storage error: {0}")]
    Persistence(#[from] StoreError),
}

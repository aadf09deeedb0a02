use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One catalog entry: a doctor and the slots they offer, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSlots {
    pub doctor_id: String,
    pub slots: Vec<String>,
}

impl DoctorSlots {
    pub fn new(doctor_id: impl Into<String>, slots: &[&str]) -> Self {
        Self {
            doctor_id: doctor_id.into(),
            slots: slots.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub doctors: Vec<DoctorSlots>,
    pub total: usize,
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unknown doctor: {0}")]
    UnknownDoctor(String),

    #[error("Invalid slot catalog: {0}")]
    InvalidCatalog(String),

    #[error("Failed to read slot catalog {path}: {source}")]
    Load {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse slot catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

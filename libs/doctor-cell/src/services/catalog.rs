use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info};

use shared_config::AppConfig;

use crate::models::{CatalogError, DoctorSlots};

/// Fixed mapping of doctor to offerable time slots.
///
/// Built once at startup and shared read-only. Extending it is a
/// configuration change (`SLOT_CATALOG_FILE`), never a runtime operation.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    doctors: Vec<DoctorSlots>,
}

impl Default for SlotCatalog {
    fn default() -> Self {
        Self {
            doctors: vec![
                DoctorSlots::new("Dr. Sharma", &["10:00 AM", "11:00 AM"]),
                DoctorSlots::new("Dr. Verma", &["12:00 PM", "3:00 PM"]),
                DoctorSlots::new("Dr. Aisha", &["10:00 AM", "3:00 PM"]),
            ],
        }
    }
}

impl SlotCatalog {
    pub fn new(doctors: Vec<DoctorSlots>) -> Result<Self, CatalogError> {
        if doctors.is_empty() {
            return Err(CatalogError::InvalidCatalog("catalog lists no doctors".to_string()));
        }

        let mut seen_doctors = HashSet::new();
        for entry in &doctors {
            if entry.doctor_id.trim().is_empty() {
                return Err(CatalogError::InvalidCatalog("doctor id cannot be empty".to_string()));
            }
            if !seen_doctors.insert(entry.doctor_id.as_str()) {
                return Err(CatalogError::InvalidCatalog(format!(
                    "doctor {} is listed twice",
                    entry.doctor_id
                )));
            }
            if entry.slots.is_empty() {
                return Err(CatalogError::InvalidCatalog(format!(
                    "doctor {} offers no slots",
                    entry.doctor_id
                )));
            }

            let mut seen_slots = HashSet::new();
            for slot in &entry.slots {
                if slot.trim().is_empty() {
                    return Err(CatalogError::InvalidCatalog(format!(
                        "doctor {} has an empty slot",
                        entry.doctor_id
                    )));
                }
                if !seen_slots.insert(slot.as_str()) {
                    return Err(CatalogError::InvalidCatalog(format!(
                        "doctor {} lists slot {} twice",
                        entry.doctor_id, slot
                    )));
                }
            }
        }

        Ok(Self { doctors })
    }

    /// Reads a JSON array of `{"doctor_id": ..., "slots": [...]}` entries.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Load {
            path: path.display().to_string(),
            source,
        })?;
        let doctors: Vec<DoctorSlots> = serde_json::from_str(&raw)?;
        Self::new(doctors)
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.slot_catalog_file {
            Some(path) => {
                info!("Loading slot catalog from {}", path.display());
                Self::from_json_file(path)?
            }
            None => Self::default(),
        };

        info!("Slot catalog ready with {} doctors", catalog.doctors.len());
        Ok(catalog)
    }

    pub fn doctors(&self) -> &[DoctorSlots] {
        &self.doctors
    }

    pub fn contains_doctor(&self, doctor_id: &str) -> bool {
        self.entry(doctor_id).is_some()
    }

    pub fn slots_for(&self, doctor_id: &str) -> Result<&[String], CatalogError> {
        self.entry(doctor_id)
            .map(|entry| entry.slots.as_slice())
            .ok_or_else(|| CatalogError::UnknownDoctor(doctor_id.to_string()))
    }

    pub fn is_valid_slot(&self, doctor_id: &str, time_slot: &str) -> bool {
        let valid = self
            .entry(doctor_id)
            .map(|entry| entry.slots.iter().any(|slot| slot == time_slot))
            .unwrap_or(false);

        if !valid {
            debug!("Slot {} is not offered by {}", time_slot, doctor_id);
        }
        valid
    }

    fn entry(&self, doctor_id: &str) -> Option<&DoctorSlots> {
        self.doctors.iter().find(|entry| entry.doctor_id == doctor_id)
    }
}

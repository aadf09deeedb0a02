use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::error::AppError;

use crate::models::{CatalogError, CatalogResponse};
use crate::services::SlotCatalog;

#[axum::debug_handler]
pub async fn list_doctors(
    State(catalog): State<Arc<SlotCatalog>>,
) -> Result<Json<CatalogResponse>, AppError> {
    let doctors = catalog.doctors().to_vec();

    Ok(Json(CatalogResponse {
        total: doctors.len(),
        doctors,
    }))
}

#[axum::debug_handler]
pub async fn get_doctor_slots(
    State(catalog): State<Arc<SlotCatalog>>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let slots = catalog.slots_for(&doctor_id).map_err(|e| match e {
        CatalogError::UnknownDoctor(id) => AppError::NotFound(format!("Unknown doctor: {}", id)),
        other => AppError::Internal(other.to_string()),
    })?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "slots": slots,
    })))
}

// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;
use uuid::Uuid;

use notification_cell::models::ArtifactKind;
use notification_cell::services::qr::{payload_appointment_id, qr_payload};
use shared_models::error::AppError;

use crate::models::{
    AnalyticsReport, AppointmentError, AppointmentRecord, BookingOutcome, CancelResponse,
    DateQuery, NewAppointment, VerifyRequest, VerifyResponse,
};
use crate::services::{AdminConsole, BookingService};
use crate::state::AppointmentState;

fn to_app_error(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::Persistence(err) => AppError::Database(err.to_string()),
        other => AppError::ValidationError(other.to_string()),
    }
}

// ==============================================================================
// PATIENT-FACING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppointmentState>>,
    Json(request): Json<NewAppointment>,
) -> Result<(StatusCode, Json<BookingOutcome>), AppError> {
    let booking_service = BookingService::new(&state);

    let outcome = booking_service.book(request).await.map_err(to_app_error)?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

#[axum::debug_handler]
pub async fn get_receipt(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Response, AppError> {
    serve_artifact(&state, appointment_id, ArtifactKind::Receipt).await
}

#[axum::debug_handler]
pub async fn get_qr_code(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Response, AppError> {
    serve_artifact(&state, appointment_id, ArtifactKind::QrCode).await
}

#[axum::debug_handler]
pub async fn get_audio(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Response, AppError> {
    serve_artifact(&state, appointment_id, ArtifactKind::Audio).await
}

async fn serve_artifact(
    state: &AppointmentState,
    appointment_id: Uuid,
    kind: ArtifactKind,
) -> Result<Response, AppError> {
    // Artifacts are only served while the booking exists.
    if state.ledger.find_by_id(appointment_id).await.map_err(to_app_error)?.is_none() {
        return Err(AppError::NotFound(format!("Appointment {} not found", appointment_id)));
    }

    let bytes = state
        .pipeline
        .artifacts()
        .load(appointment_id, kind)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or_else(|| {
            AppError::NotFound(format!("No {} for appointment {}", kind.file_name(), appointment_id))
        })?;

    let disposition = format!("inline; filename=\"{}\"", kind.file_name());
    Ok((
        [
            (header::CONTENT_TYPE, kind.content_type().to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        bytes,
    )
        .into_response())
}

/// Checks a scanned QR payload against the ledger.
#[axum::debug_handler]
pub async fn verify_payload(
    State(state): State<Arc<AppointmentState>>,
    Json(request): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, AppError> {
    let Some(appointment_id) = payload_appointment_id(&request.payload) else {
        return Ok(Json(VerifyResponse { valid: false, appointment: None }));
    };

    let record = state
        .ledger
        .find_by_id(appointment_id)
        .await
        .map_err(to_app_error)?;

    let response = match record {
        Some(record) if qr_payload(&record.receipt_details()) == request.payload.trim() => {
            VerifyResponse { valid: true, appointment: Some(record) }
        }
        _ => VerifyResponse { valid: false, appointment: None },
    };

    Ok(Json(response))
}

// ==============================================================================
// ADMIN CONSOLE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_for_date(
    State(state): State<Arc<AppointmentState>>,
    Query(query): Query<DateQuery>,
) -> Result<Json<Vec<AppointmentRecord>>, AppError> {
    let console = AdminConsole::new(Arc::clone(&state.ledger));

    let appointments = console.list_for_date(query.date).await.map_err(to_app_error)?;

    Ok(Json(appointments))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<AppointmentState>>,
    Path(appointment_id): Path<Uuid>,
) -> Result<Json<CancelResponse>, AppError> {
    let console = AdminConsole::new(Arc::clone(&state.ledger));

    let cancelled = console.cancel(appointment_id).await.map_err(to_app_error)?;

    if cancelled {
        if let Err(e) = state.pipeline.artifacts().remove(appointment_id).await {
            warn!("Failed to remove artifacts of cancelled appointment {}: {}", appointment_id, e);
        }
    }

    Ok(Json(CancelResponse {
        id: appointment_id,
        cancelled,
    }))
}

#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<Arc<AppointmentState>>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let console = AdminConsole::new(Arc::clone(&state.ledger));

    let report = console.analytics().await.map_err(to_app_error)?;

    Ok(Json(report))
}

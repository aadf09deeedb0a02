use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use shared_models::error::AppError;

use crate::models::{ContactError, ContactMessage, ContactSubmission};
use crate::state::ContactState;

fn to_app_error(e: ContactError) -> AppError {
    match e {
        ContactError::Persistence(err) => AppError::Database(err.to_string()),
        other => AppError::ValidationError(other.to_string()),
    }
}

#[axum::debug_handler]
pub async fn submit_message(
    State(state): State<Arc<ContactState>>,
    Json(submission): Json<ContactSubmission>,
) -> Result<(StatusCode, Json<ContactMessage>), AppError> {
    let message = state.ledger.append(submission).await.map_err(to_app_error)?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<ContactState>>,
) -> Result<Json<Vec<ContactMessage>>, AppError> {
    let messages = state.ledger.list_all().await.map_err(to_app_error)?;

    Ok(Json(messages))
}

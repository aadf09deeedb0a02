use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use shared_config::AppConfig;
use shared_models::error::AppError;

pub const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

// Shared-secret gate for the admin console. Plain string comparison: no
// sessions, no hashing, no lockout.
pub async fn admin_gate(
    State(config): State<Arc<AppConfig>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let supplied = request
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .ok_or_else(|| AppError::Auth("Missing admin secret header".to_string()))?
        .to_str()
        .map_err(|_| AppError::Auth("Invalid admin secret header format".to_string()))?;

    if !is_admin_secret(&config, supplied) {
        warn!("Admin access denied for {}", request.uri().path());
        return Err(AppError::Auth("Access denied".to_string()));
    }

    Ok(next.run(request).await)
}

pub fn is_admin_secret(config: &AppConfig, supplied: &str) -> bool {
    !config.admin_password.is_empty() && supplied == config.admin_password
}

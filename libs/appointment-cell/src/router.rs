// libs/appointment-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::admin_gate;

use crate::handlers;
use crate::state::AppointmentState;

pub fn appointment_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/verify", post(handlers::verify_payload))
        .route("/{appointment_id}/receipt", get(handlers::get_receipt))
        .route("/{appointment_id}/qr", get(handlers::get_qr_code))
        .route("/{appointment_id}/audio", get(handlers::get_audio))
        .with_state(state)
}

pub fn admin_routes(state: Arc<AppointmentState>) -> Router {
    Router::new()
        .route("/appointments", get(handlers::list_for_date))
        .route("/appointments/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/analytics", get(handlers::get_analytics))
        .layer(middleware::from_fn_with_state(state.config.clone(), admin_gate))
        .with_state(state)
}

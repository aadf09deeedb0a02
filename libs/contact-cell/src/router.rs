use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_utils::extractor::admin_gate;

use crate::handlers::{list_messages, submit_message};
use crate::state::ContactState;

pub fn contact_routes(state: Arc<ContactState>) -> Router {
    Router::new()
        .route("/", post(submit_message))
        .with_state(state)
}

/// Mounted under `/admin` next to the appointment console.
pub fn contact_admin_routes(state: Arc<ContactState>) -> Router {
    Router::new()
        .route("/contact-messages", get(list_messages))
        .layer(middleware::from_fn_with_state(state.config.clone(), admin_gate))
        .with_state(state)
}

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::services::SlotCatalog;

pub fn doctor_routes(catalog: Arc<SlotCatalog>) -> Router {
    // The catalog is public: patients need it to pick a slot.
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{doctor_id}/slots", get(handlers::get_doctor_slots))
        .with_state(catalog)
}

use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::{admin_routes, appointment_routes, AppointmentState};
use contact_cell::{contact_admin_routes, contact_routes, ContactState};
use doctor_cell::{doctor_routes, SlotCatalog};
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>, catalog: Arc<SlotCatalog>) -> Router {
    let appointments = Arc::new(AppointmentState::new(config.clone(), catalog.clone()));
    let contact = Arc::new(ContactState::new(config));

    Router::new()
        .route("/", get(|| async { "SmartCare API is running!" }))
        .nest("/doctors", doctor_routes(catalog))
        .nest("/appointments", appointment_routes(appointments.clone()))
        .nest("/contact", contact_routes(contact.clone()))
        .nest(
            "/admin",
            admin_routes(appointments).merge(contact_admin_routes(contact)),
        )
}

pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod state;

pub use models::*;
pub use router::{contact_admin_routes, contact_routes};
pub use services::ContactLedger;
pub use state::ContactState;

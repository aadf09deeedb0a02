use std::sync::Arc;

use shared_config::AppConfig;

use crate::services::ContactLedger;

pub struct ContactState {
    pub config: Arc<AppConfig>,
    pub ledger: Arc<ContactLedger>,
}

impl ContactState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let ledger = Arc::new(ContactLedger::new(config.contact_file.clone()));
        Self { config, ledger }
    }
}

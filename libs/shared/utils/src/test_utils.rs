use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use shared_config::{AppConfig, MailTls};

pub const TEST_ADMIN_PASSWORD: &str = "test-admin-secret";

/// An `AppConfig` whose data and artifact paths live in a private temp dir.
/// The directory is removed when the `TestConfig` is dropped, so keep it alive
/// for as long as anything built from the config is in use.
pub struct TestConfig {
    pub data_dir: TempDir,
    pub tts_base_url: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub step_timeout: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            data_dir: tempfile::tempdir().expect("failed to create temp data dir"),
            tts_base_url: "http://127.0.0.1:9/translate_tts".to_string(),
            smtp_host: "127.0.0.1".to_string(),
            // Nothing listens on the discard port, so sends fail fast.
            smtp_port: 9,
            smtp_username: String::new(),
            smtp_password: String::new(),
            step_timeout: Duration::from_secs(5),
        }
    }
}

impl TestConfig {
    pub fn with_tts(mut self, base_url: impl Into<String>) -> Self {
        self.tts_base_url = base_url.into();
        self
    }

    /// Configures relay credentials so the email step is attempted.
    pub fn with_mail_credentials(mut self) -> Self {
        self.smtp_username = "clinic@example.com".to_string();
        self.smtp_password = "app-password".to_string();
        self
    }

    pub fn admin_password(&self) -> &str {
        TEST_ADMIN_PASSWORD
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.data_dir.path().join(name)
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            server_port: 0,
            appointments_file: self.path("appointments.csv"),
            contact_file: self.path("contact_messages.csv"),
            artifacts_dir: self.path("artifacts"),
            slot_catalog_file: None,
            admin_password: TEST_ADMIN_PASSWORD.to_string(),
            tts_base_url: self.tts_base_url.clone(),
            tts_language: "en".to_string(),
            notify_step_timeout: self.step_timeout,
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            smtp_tls: MailTls::None,
            smtp_username: self.smtp_username.clone(),
            smtp_password: self.smtp_password.clone(),
            mail_from: String::new(),
            smtp_timeout: self.step_timeout,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

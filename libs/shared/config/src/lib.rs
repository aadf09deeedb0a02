use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

/// How the SMTP connection to the mail relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTls {
    /// Implicit TLS, usually port 465.
    Wrapper,
    StartTls,
    /// Plain connection. Only meant for local relays and tests.
    None,
}

impl MailTls {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wrapper" | "tls" | "ssl" => Some(Self::Wrapper),
            "starttls" => Some(Self::StartTls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub appointments_file: PathBuf,
    pub contact_file: PathBuf,
    pub artifacts_dir: PathBuf,
    pub slot_catalog_file: Option<PathBuf>,
    pub admin_password: String,
    pub tts_base_url: String,
    pub tts_language: String,
    pub notify_step_timeout: Duration,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_tls: MailTls,
    pub smtp_username: String,
    pub smtp_password: String,
    pub mail_from: String,
    pub smtp_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let data_dir = PathBuf::from(env::var("DATA_DIR").unwrap_or_else(|_| {
            warn!("DATA_DIR not set, using ./data");
            "data".to_string()
        }));

        let config = Self {
            server_port: parse_or("SERVER_PORT", 3000),
            appointments_file: env::var("APPOINTMENTS_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("appointments.csv")),
            contact_file: env::var("CONTACT_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("contact_messages.csv")),
            artifacts_dir: env::var("ARTIFACTS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| data_dir.join("artifacts")),
            slot_catalog_file: env::var("SLOT_CATALOG_FILE").ok().map(PathBuf::from),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
                warn!("ADMIN_PASSWORD not set, using the built-in default");
                "smartcare123".to_string()
            }),
            tts_base_url: env::var("TTS_BASE_URL").unwrap_or_else(|_| {
                warn!("TTS_BASE_URL not set, using default");
                "https://translate.google.com/translate_tts".to_string()
            }),
            tts_language: env::var("TTS_LANGUAGE").unwrap_or_else(|_| "en".to_string()),
            notify_step_timeout: Duration::from_secs(parse_or("NOTIFY_STEP_TIMEOUT_SECS", 10)),
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| {
                warn!("SMTP_HOST not set, using default");
                "smtp.gmail.com".to_string()
            }),
            smtp_port: parse_or("SMTP_PORT", 465),
            smtp_tls: env::var("SMTP_TLS")
                .ok()
                .and_then(|value| {
                    let parsed = MailTls::parse(&value);
                    if parsed.is_none() {
                        warn!("SMTP_TLS has unknown value {:?}, using wrapper", value);
                    }
                    parsed
                })
                .unwrap_or(MailTls::Wrapper),
            smtp_username: env::var("SMTP_USERNAME").unwrap_or_else(|_| {
                warn!("SMTP_USERNAME not set, using empty value");
                String::new()
            }),
            smtp_password: env::var("SMTP_PASSWORD").unwrap_or_else(|_| {
                warn!("SMTP_PASSWORD not set, using empty value");
                String::new()
            }),
            mail_from: env::var("MAIL_FROM").unwrap_or_default(),
            smtp_timeout: Duration::from_secs(parse_or("SMTP_TIMEOUT_SECS", 10)),
        };

        if !config.is_mail_configured() {
            warn!("Mail relay not fully configured - confirmation emails will be skipped");
        }

        config
    }

    /// True when relay credentials and a sender are present.
    pub fn is_mail_configured(&self) -> bool {
        !self.smtp_host.is_empty()
            && !self.smtp_username.is_empty()
            && !self.smtp_password.is_empty()
            && !self.sender_address().is_empty()
    }

    /// The From address; falls back to the relay username, as most relays require.
    pub fn sender_address(&self) -> &str {
        if self.mail_from.is_empty() {
            &self.smtp_username
        } else {
            &self.mail_from
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has invalid value {:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

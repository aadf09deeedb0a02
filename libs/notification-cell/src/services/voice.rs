use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use shared_config::AppConfig;

use crate::models::NotificationError;

pub fn confirmation_sentence(doctor: &str, time_slot: &str, date: NaiveDate) -> String {
    format!(
        "Appointment booked with {} at {} on {}",
        doctor,
        time_slot,
        date.format("%Y-%m-%d")
    )
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Returns encoded audio (MP3) for `text`.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, NotificationError>;
}

/// Text-to-speech over a plain HTTP GET endpoint that answers with MP3 bytes,
/// in the style of the public translate TTS service.
pub struct HttpSpeechSynthesizer {
    client: Client,
    base_url: String,
    language: String,
}

impl HttpSpeechSynthesizer {
    pub fn new(base_url: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.tts_base_url.clone(), config.tts_language.clone())
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeechSynthesizer {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, NotificationError> {
        debug!("Requesting speech synthesis from {}", self.base_url);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("ie", "UTF-8"),
                ("q", text),
                ("tl", self.language.as_str()),
                ("client", "tw-ob"),
            ])
            .send()
            .await
            .map_err(|e| NotificationError::Synthesis(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(NotificationError::Synthesis(format!(
                "TTS service returned {}: {}",
                status, error_text
            )));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| NotificationError::Synthesis(e.to_string()))?;

        if audio.is_empty() {
            return Err(NotificationError::Synthesis("TTS service returned no audio".to_string()));
        }

        Ok(audio.to_vec())
    }
}

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, instrument, warn};

use shared_config::AppConfig;

use crate::models::{ArtifactKind, NotificationError, PipelineReport, ReceiptDetails, StepStatus};
use crate::services::artifacts::ArtifactStore;
use crate::services::email::{confirmation_mail, MailTransport, SmtpMailTransport};
use crate::services::qr::{qr_payload, QrArtifact};
use crate::services::receipt::render_receipt;
use crate::services::voice::{confirmation_sentence, HttpSpeechSynthesizer, SpeechSynthesizer};

/// Voice, QR, receipt and email for a booking that is already persisted.
///
/// Every step is bounded by its own timeout and every failure is reported
/// through [`PipelineReport`]; `run` itself cannot fail.
pub struct NotificationPipeline {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mailer: Option<Arc<dyn MailTransport>>,
    artifacts: ArtifactStore,
    step_timeout: Duration,
    mail_timeout: Duration,
}

impl NotificationPipeline {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        mailer: Option<Arc<dyn MailTransport>>,
        artifacts: ArtifactStore,
        step_timeout: Duration,
        mail_timeout: Duration,
    ) -> Self {
        Self {
            synthesizer,
            mailer,
            artifacts,
            step_timeout,
            mail_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mailer: Option<Arc<dyn MailTransport>> = if config.is_mail_configured() {
            match SmtpMailTransport::from_config(config) {
                Ok(transport) => Some(Arc::new(transport)),
                Err(e) => {
                    warn!("Mail relay disabled: {}", e);
                    None
                }
            }
        } else {
            None
        };

        Self::new(
            Arc::new(HttpSpeechSynthesizer::from_config(config)),
            mailer,
            ArtifactStore::new(config.artifacts_dir.clone()),
            config.notify_step_timeout,
            config.smtp_timeout,
        )
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    #[instrument(skip(self, details), fields(appointment_id = %details.appointment_id))]
    pub async fn run(&self, details: &ReceiptDetails) -> PipelineReport {
        let voice = self.voice_step(details).await;
        let (qr, qr_code) = self.qr_step(details).await;
        let (receipt, receipt_pdf) = self.receipt_step(details, qr_code).await;
        let email = self.email_step(details, receipt_pdf).await;

        let report = PipelineReport {
            voice,
            qr,
            receipt,
            email,
        };

        if report.all_ok() {
            info!("Confirmation pipeline completed");
        } else {
            warn!(?report, "Confirmation pipeline completed with degraded steps");
        }
        report
    }

    async fn voice_step(&self, details: &ReceiptDetails) -> StepStatus {
        let sentence = confirmation_sentence(&details.doctor, &details.time_slot, details.date);

        let result = bounded("voice", self.step_timeout, async {
            let audio = self.synthesizer.synthesize(&sentence).await?;
            self.artifacts
                .save(details.appointment_id, ArtifactKind::Audio, &audio)
                .await
        })
        .await;

        status_of("voice", result).0
    }

    async fn qr_step(&self, details: &ReceiptDetails) -> (StepStatus, Option<QrArtifact>) {
        let payload = qr_payload(details);

        let result = bounded("qr", self.step_timeout, async {
            let qr = tokio::task::spawn_blocking(move || QrArtifact::encode(&payload))
                .await
                .map_err(|e| NotificationError::QrEncoding(e.to_string()))??;
            self.artifacts
                .save(details.appointment_id, ArtifactKind::QrCode, qr.svg.as_bytes())
                .await?;
            Ok(qr)
        })
        .await;

        status_of("qr", result)
    }

    async fn receipt_step(
        &self,
        details: &ReceiptDetails,
        qr: Option<QrArtifact>,
    ) -> (StepStatus, Option<Vec<u8>>) {
        let owned = details.clone();

        let result = bounded("receipt", self.step_timeout, async {
            let pdf = tokio::task::spawn_blocking(move || render_receipt(&owned, qr.as_ref()))
                .await
                .map_err(|e| NotificationError::Receipt(e.to_string()))??;
            self.artifacts
                .save(details.appointment_id, ArtifactKind::Receipt, &pdf)
                .await?;
            Ok(pdf)
        })
        .await;

        status_of("receipt", result)
    }

    async fn email_step(&self, details: &ReceiptDetails, receipt_pdf: Option<Vec<u8>>) -> StepStatus {
        let Some(mailer) = &self.mailer else {
            return StepStatus::Skipped("mail relay not configured".to_string());
        };

        let mail = confirmation_mail(details, receipt_pdf);
        let result = bounded("email", self.mail_timeout, mailer.send(mail)).await;

        status_of("email", result).0
    }
}

async fn bounded<T, F>(step: &'static str, limit: Duration, work: F) -> Result<T, NotificationError>
where
    F: Future<Output = Result<T, NotificationError>>,
{
    match timeout(limit, work).await {
        Ok(result) => result,
        Err(_) => Err(NotificationError::Timeout {
            step,
            timeout_ms: limit.as_millis(),
        }),
    }
}

fn status_of<T>(step: &'static str, result: Result<T, NotificationError>) -> (StepStatus, Option<T>) {
    match result {
        Ok(value) => (StepStatus::Ok, Some(value)),
        Err(e) => {
            warn!(step, error = %e, "Confirmation step failed");
            (StepStatus::Failed(e.to_string()), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    use crate::models::OutgoingMail;
    use crate::services::email::MockMailTransport;
    use crate::services::voice::MockSpeechSynthesizer;

    fn details() -> ReceiptDetails {
        ReceiptDetails {
            appointment_id: Uuid::new_v4(),
            patient_name: "Asha Rao".to_string(),
            patient_email: "asha@example.com".to_string(),
            doctor: "Dr. Sharma".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            time_slot: "10:00 AM".to_string(),
        }
    }

    fn speaking_synth() -> MockSpeechSynthesizer {
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_synthesize()
            .withf(|text| text == "Appointment booked with Dr. Sharma at 10:00 AM on 2024-01-05")
            .times(1)
            .returning(|_| Ok(b"ID3fake-mp3".to_vec()));
        synth
    }

    fn pipeline(
        synth: MockSpeechSynthesizer,
        mailer: Option<MockMailTransport>,
        root: &std::path::Path,
    ) -> NotificationPipeline {
        NotificationPipeline::new(
            Arc::new(synth),
            mailer.map(|m| Arc::new(m) as Arc<dyn MailTransport>),
            ArtifactStore::new(root),
            Duration::from_secs(5),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_all_steps_succeed_and_receipt_is_attached() {
        let dir = tempfile::tempdir().unwrap();
        let mut mailer = MockMailTransport::new();
        mailer
            .expect_send()
            .withf(|mail: &OutgoingMail| {
                mail.to == "asha@example.com"
                    && mail.subject == "Appointment Confirmation"
                    && mail
                        .attachment
                        .as_ref()
                        .map(|a| a.content.starts_with(b"%PDF-"))
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| Ok(()));

        let details = details();
        let pipeline = pipeline(speaking_synth(), Some(mailer), dir.path());
        let report = pipeline.run(&details).await;

        assert!(report.all_ok(), "unexpected report: {:?}", report);
        for kind in [ArtifactKind::Audio, ArtifactKind::QrCode, ArtifactKind::Receipt] {
            assert!(pipeline.artifacts().path_for(details.appointment_id, kind).exists());
        }
    }

    #[tokio::test]
    async fn test_mail_failure_is_reported_per_step() {
        let dir = tempfile::tempdir().unwrap();
        let mut mailer = MockMailTransport::new();
        mailer
            .expect_send()
            .times(1)
            .returning(|_| Err(NotificationError::Mail("relay unreachable".to_string())));

        let report = pipeline(speaking_synth(), Some(mailer), dir.path())
            .run(&details())
            .await;

        assert_eq!(report.voice, StepStatus::Ok);
        assert_eq!(report.qr, StepStatus::Ok);
        assert_eq!(report.receipt, StepStatus::Ok);
        assert!(report.email.is_failed());
    }

    #[tokio::test]
    async fn test_voice_failure_does_not_block_later_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut synth = MockSpeechSynthesizer::new();
        synth
            .expect_synthesize()
            .returning(|_| Err(NotificationError::Synthesis("tts down".to_string())));
        let mut mailer = MockMailTransport::new();
        mailer.expect_send().times(1).returning(|_| Ok(()));

        let details = details();
        let pipeline = pipeline(synth, Some(mailer), dir.path());
        let report = pipeline.run(&details).await;

        assert!(report.voice.is_failed());
        assert!(report.qr.is_ok());
        assert!(report.receipt.is_ok());
        assert!(report.email.is_ok());
        assert!(!pipeline
            .artifacts()
            .path_for(details.appointment_id, ArtifactKind::Audio)
            .exists());
    }

    #[tokio::test]
    async fn test_missing_mailer_skips_email() {
        let dir = tempfile::tempdir().unwrap();

        let report = pipeline(speaking_synth(), None, dir.path()).run(&details()).await;

        assert!(report.receipt.is_ok());
        assert!(matches!(report.email, StepStatus::Skipped(_)));
    }

    struct StalledMailer;

    #[async_trait::async_trait]
    impl MailTransport for StalledMailer {
        async fn send(&self, _mail: OutgoingMail) -> Result<(), NotificationError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_stalled_relay_times_out_without_affecting_receipt() {
        let dir = tempfile::tempdir().unwrap();
        let details = details();
        let pipeline = NotificationPipeline::new(
            Arc::new(speaking_synth()),
            Some(Arc::new(StalledMailer)),
            ArtifactStore::new(dir.path()),
            Duration::from_secs(5),
            Duration::from_millis(100),
        );

        let started = std::time::Instant::now();
        let report = pipeline.run(&details).await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(report.voice, StepStatus::Ok);
        assert_eq!(report.qr, StepStatus::Ok);
        assert_eq!(report.receipt, StepStatus::Ok);
        match &report.email {
            StepStatus::Failed(detail) => assert!(detail.contains("email"), "{}", detail),
            other => panic!("expected timed out email, got {:?}", other),
        }
        assert!(pipeline
            .artifacts()
            .path_for(details.appointment_id, ArtifactKind::Receipt)
            .exists());
    }

    #[tokio::test]
    async fn test_bounded_converts_elapsed_time_into_timeout() {
        let result: Result<(), NotificationError> =
            bounded("email", Duration::from_millis(20), async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(NotificationError::Timeout { step: "email", .. })));
    }
}

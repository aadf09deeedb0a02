use async_trait::async_trait;
use lettre::message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use shared_config::{AppConfig, MailTls};

use crate::models::{MailAttachment, NotificationError, OutgoingMail, ReceiptDetails};

pub const CONFIRMATION_SUBJECT: &str = "Appointment Confirmation";
pub const RECEIPT_FILENAME: &str = "appointment_receipt.pdf";

/// The confirmation mail for a booking, with the receipt attached when there is one.
pub fn confirmation_mail(details: &ReceiptDetails, receipt_pdf: Option<Vec<u8>>) -> OutgoingMail {
    OutgoingMail {
        to: details.patient_email.clone(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        body: format!(
            "Hi {},\nYour appointment with {} is confirmed for {} at {}.",
            details.patient_name,
            details.doctor,
            details.date.format("%Y-%m-%d"),
            details.time_slot
        ),
        attachment: receipt_pdf.map(|content| MailAttachment {
            filename: RECEIPT_FILENAME.to_string(),
            content_type: "application/pdf".to_string(),
            content,
        }),
    }
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError>;
}

/// Authenticated SMTP relay.
#[derive(Debug)]
pub struct SmtpMailTransport {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailTransport {
    pub fn from_config(config: &AppConfig) -> Result<Self, NotificationError> {
        let builder = match config.smtp_tls {
            MailTls::Wrapper => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| NotificationError::Mail(e.to_string()))?,
            MailTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
                    .map_err(|e| NotificationError::Mail(e.to_string()))?
            }
            MailTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host),
        };

        let transport = builder
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.smtp_username.clone(),
                config.smtp_password.clone(),
            ))
            .timeout(Some(config.smtp_timeout))
            .build();

        let from = config
            .sender_address()
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Mail(format!("invalid sender address: {}", e)))?;

        Ok(Self { transport, from })
    }

    fn build_message(&self, mail: OutgoingMail) -> Result<Message, NotificationError> {
        let to = mail
            .to
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::Mail(format!("invalid recipient {}: {}", mail.to, e)))?;

        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(mail.subject);
        let text = SinglePart::plain(mail.body);

        let message = match mail.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| NotificationError::Mail(e.to_string()))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(text)
                        .singlepart(
                            Attachment::new(attachment.filename)
                                .body(attachment.content, content_type),
                        ),
                )
            }
            None => builder.singlepart(text),
        };

        message.map_err(|e| NotificationError::Mail(e.to_string()))
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, mail: OutgoingMail) -> Result<(), NotificationError> {
        let recipient = mail.to.clone();
        let message = self.build_message(mail)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotificationError::Mail(e.to_string()))?;

        debug!("Confirmation mail accepted by relay for {}", recipient);
        Ok(())
    }
}

pub mod artifacts;
pub mod email;
pub mod pipeline;
pub mod qr;
pub mod receipt;
pub mod voice;

pub use artifacts::ArtifactStore;
pub use email::{MailTransport, SmtpMailTransport};
pub use pipeline::NotificationPipeline;
pub use qr::QrArtifact;
pub use voice::{HttpSpeechSynthesizer, SpeechSynthesizer};

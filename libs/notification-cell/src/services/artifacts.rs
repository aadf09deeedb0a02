use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::debug;
use uuid::Uuid;

use crate::models::{ArtifactKind, NotificationError};

/// Per-appointment directory of generated confirmation files:
/// `{root}/{appointment_id}/{confirm.mp3|qr.svg|receipt.pdf}`.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, appointment_id: Uuid, kind: ArtifactKind) -> PathBuf {
        self.root
            .join(appointment_id.to_string())
            .join(kind.file_name())
    }

    pub async fn save(
        &self,
        appointment_id: Uuid,
        kind: ArtifactKind,
        bytes: &[u8],
    ) -> Result<PathBuf, NotificationError> {
        let path = self.path_for(appointment_id, kind);
        if let Some(dir) = path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        debug!("Stored {:?} artifact at {}", kind, path.display());
        Ok(path)
    }

    /// `None` when the artifact was never produced.
    pub async fn load(
        &self,
        appointment_id: Uuid,
        kind: ArtifactKind,
    ) -> Result<Option<Vec<u8>>, NotificationError> {
        match tokio::fs::read(self.path_for(appointment_id, kind)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Deletes every artifact of an appointment. Missing directories are fine.
    pub async fn remove(&self, appointment_id: Uuid) -> Result<(), NotificationError> {
        let dir = self.root.join(appointment_id.to_string());
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!("Removed artifacts at {}", dir.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

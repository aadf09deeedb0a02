use uuid::Uuid;

use notification_cell::models::ArtifactKind;
use notification_cell::services::ArtifactStore;

#[tokio::test]
async fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path().join("artifacts"));
    let id = Uuid::new_v4();

    let path = store.save(id, ArtifactKind::Receipt, b"%PDF-1.5").await.unwrap();

    assert!(path.ends_with(format!("{}/receipt.pdf", id)));
    assert_eq!(
        store.load(id, ArtifactKind::Receipt).await.unwrap(),
        Some(b"%PDF-1.5".to_vec())
    );
}

#[tokio::test]
async fn test_load_missing_artifact_is_none() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());

    assert_eq!(store.load(Uuid::new_v4(), ArtifactKind::Audio).await.unwrap(), None);
}

#[test]
fn test_artifact_names_and_content_types() {
    assert_eq!(ArtifactKind::Audio.file_name(), "confirm.mp3");
    assert_eq!(ArtifactKind::QrCode.content_type(), "image/svg+xml");
    assert_eq!(ArtifactKind::Receipt.content_type(), "application/pdf");
}

#[tokio::test]
async fn test_remove_deletes_all_artifacts_and_tolerates_missing() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArtifactStore::new(dir.path());
    let id = Uuid::new_v4();
    let other = Uuid::new_v4();
    store.save(id, ArtifactKind::Receipt, b"%PDF-1.5").await.unwrap();
    store.save(id, ArtifactKind::QrCode, b"<svg/>").await.unwrap();
    store.save(other, ArtifactKind::Receipt, b"%PDF-1.5").await.unwrap();

    store.remove(id).await.unwrap();

    assert!(!dir.path().join(id.to_string()).exists());
    assert_eq!(store.load(id, ArtifactKind::Receipt).await.unwrap(), None);
    assert!(store.load(other, ArtifactKind::Receipt).await.unwrap().is_some());
    store.remove(id).await.unwrap();
}

use bytes::Bytes;
use media_archive::catalog::models::Category;
use media_archive::store::{LocalStore, MediaStore, StoreError};

#[tokio::test]
async fn test_stage_then_promote() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let staged = store
        .stage(Category::Manuscript, "report.pdf", Bytes::from("content"))
        .await
        .unwrap();
    assert!(staged.exists());
    // Not visible at the final path until promoted
    assert!(!store.exists(Category::Manuscript, "report.pdf").await.unwrap());

    store.promote(Category::Manuscript, "report.pdf").await.unwrap();
    assert!(!staged.exists());
    assert!(store.exists(Category::Manuscript, "report.pdf").await.unwrap());

    let data = store.read(Category::Manuscript, "report.pdf").await.unwrap();
    assert_eq!(data, Bytes::from("content"));
}

#[tokio::test]
async fn test_discard_removes_staged_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let staged = store
        .stage(Category::Audio, "clip.mp3", Bytes::from("junk"))
        .await
        .unwrap();
    assert!(staged.exists());

    store.discard(Category::Audio, "clip.mp3").await.unwrap();
    assert!(!staged.exists());
    assert!(!store.exists(Category::Audio, "clip.mp3").await.unwrap());
}

#[tokio::test]
async fn test_discard_nonexistent() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    // Discarding a file that was never staged should not error
    store.discard(Category::Manuscript, "ghost.pdf").await.unwrap();
}

#[tokio::test]
async fn test_remove_promoted_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    store
        .stage(Category::Audio, "gone.mp3", Bytes::from("data"))
        .await
        .unwrap();
    store.promote(Category::Audio, "gone.mp3").await.unwrap();
    assert!(store.exists(Category::Audio, "gone.mp3").await.unwrap());

    store.remove(Category::Audio, "gone.mp3").await.unwrap();
    assert!(!store.exists(Category::Audio, "gone.mp3").await.unwrap());
}

#[tokio::test]
async fn test_read_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    let result = store.read(Category::Manuscript, "missing.pdf").await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn test_categories_are_separate_roots() {
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();

    store
        .stage(Category::Manuscript, "same_name", Bytes::from("manuscript"))
        .await
        .unwrap();
    store.promote(Category::Manuscript, "same_name").await.unwrap();

    assert!(store.exists(Category::Manuscript, "same_name").await.unwrap());
    assert!(!store.exists(Category::Audio, "same_name").await.unwrap());
}

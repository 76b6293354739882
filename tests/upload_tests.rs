use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use media_archive::catalog::models::{Category, ManuscriptRecord};
use media_archive::catalog::Catalog;
use media_archive::store::{LocalStore, MediaStore, StoreError};
use media_archive::upload::{
    filename, probe, AudioUpload, ManuscriptUpload, UploadError, Uploader,
};

struct TestHarness {
    _dir: tempfile::TempDir,
    catalog: Catalog,
    store: Arc<LocalStore>,
    uploader: Uploader,
    upload_root: std::path::PathBuf,
}

fn harness() -> TestHarness {
    let dir = tempfile::tempdir().unwrap();
    let upload_root = dir.path().join("uploads");
    let catalog = Catalog::open(dir.path().join("data")).unwrap();
    let store = Arc::new(LocalStore::new(&upload_root).unwrap());
    let uploader = Uploader::new(catalog.clone(), store.clone() as Arc<dyn MediaStore>);
    TestHarness {
        _dir: dir,
        catalog,
        store,
        uploader,
        upload_root,
    }
}

fn dir_entries(path: &Path) -> Vec<String> {
    let mut entries: Vec<String> = std::fs::read_dir(path)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    entries.sort();
    entries
}

fn pdf_bytes() -> Bytes {
    Bytes::from_static(b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< >>\n%%EOF\n")
}

/// Windows executable magic with a .pdf name: the extension-spoofing case.
fn exe_bytes() -> Bytes {
    Bytes::from_static(b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xff\xff\x00\x00")
}

/// Valid RIFF/WAVE magic followed by garbage: passes the sniff, defeats the
/// duration probe.
fn malformed_wav_bytes() -> Bytes {
    let mut data = Vec::new();
    data.extend_from_slice(b"RIFF\x24\x08\x00\x00WAVE");
    data.extend_from_slice(&[0xAB; 64]);
    Bytes::from(data)
}

fn manuscript_upload(data: Bytes) -> ManuscriptUpload {
    ManuscriptUpload {
        title: "Report".to_string(),
        author: "A. Smith".to_string(),
        description: None,
        filename: "report.pdf".to_string(),
        data,
    }
}

// ============================================================================
// Success paths
// ============================================================================

#[tokio::test]
async fn test_manuscript_upload_success() {
    let h = harness();
    let data = pdf_bytes();

    let record = h.uploader.upload_manuscript(manuscript_upload(data.clone())).await.unwrap();

    assert_eq!(record.title, "Report");
    assert_eq!(record.author, "A. Smith");
    assert_eq!(record.file_type, "pdf");
    assert_eq!(record.original_filename, "report.pdf");
    assert!(record.file_size > 0);
    assert_eq!(record.file_size, data.len() as u64);

    // The record is durable and the file sits at its final path
    let stored = h.catalog.get_manuscript(&record.id).unwrap().unwrap();
    assert_eq!(stored.stored_filename, record.stored_filename);
    assert!(h
        .store
        .exists(Category::Manuscript, &record.stored_filename)
        .await
        .unwrap());

    // Staging area is empty once the upload completes
    assert!(dir_entries(&h.upload_root.join(".staging")).is_empty());
}

#[tokio::test]
async fn test_download_round_trip_size() {
    let h = harness();
    let data = pdf_bytes();

    let record = h.uploader.upload_manuscript(manuscript_upload(data.clone())).await.unwrap();

    let served = h
        .store
        .read(Category::Manuscript, &record.stored_filename)
        .await
        .unwrap();
    assert_eq!(served.len() as u64, record.file_size);
    assert_eq!(served, data);
}

#[tokio::test]
async fn test_audio_upload_with_unreadable_duration() {
    let h = harness();

    let record = h
        .uploader
        .upload_audio(AudioUpload {
            title: "Chapter One".to_string(),
            narrator: "B. Jones".to_string(),
            description: Some("  ".to_string()),
            filename: "chapter1.wav".to_string(),
            data: malformed_wav_bytes(),
        })
        .await
        .expect("duration failure must not block the upload");

    assert_eq!(record.file_type, "wav");
    assert_eq!(record.duration_secs, None);
    // Whitespace-only description normalizes away
    assert_eq!(record.description, None);
    assert!(h.catalog.get_audio(&record.id).unwrap().is_some());
}

#[tokio::test]
async fn test_description_is_kept() {
    let h = harness();
    let mut upload = manuscript_upload(pdf_bytes());
    upload.description = Some("Quarterly report".to_string());

    let record = h.uploader.upload_manuscript(upload).await.unwrap();
    assert_eq!(record.description, Some("Quarterly report".to_string()));
}

// ============================================================================
// Rejection paths: no file, no record
// ============================================================================

#[tokio::test]
async fn test_blank_required_fields_rejected_before_io() {
    let h = harness();

    let mut upload = manuscript_upload(pdf_bytes());
    upload.title = "   ".to_string();
    let result = h.uploader.upload_manuscript(upload).await;
    assert!(matches!(result, Err(UploadError::Validation(_))));

    let mut upload = manuscript_upload(pdf_bytes());
    upload.author = String::new();
    let result = h.uploader.upload_manuscript(upload).await;
    assert!(matches!(result, Err(UploadError::Validation(_))));

    // Nothing reached the filesystem
    assert!(dir_entries(&h.upload_root.join("manuscripts")).is_empty());
    assert!(dir_entries(&h.upload_root.join(".staging")).is_empty());
    assert_eq!(h.catalog.count_manuscripts().unwrap(), 0);
}

#[tokio::test]
async fn test_empty_file_rejected() {
    let h = harness();
    let result = h.uploader.upload_manuscript(manuscript_upload(Bytes::new())).await;
    assert!(matches!(result, Err(UploadError::Validation(_))));
    assert_eq!(h.catalog.count_manuscripts().unwrap(), 0);
}

#[tokio::test]
async fn test_disallowed_extension_rejected_without_write() {
    let h = harness();
    let mut upload = manuscript_upload(pdf_bytes());
    upload.filename = "report.txt".to_string();

    let result = h.uploader.upload_manuscript(upload).await;
    assert!(matches!(result, Err(UploadError::Validation(_))));

    assert!(dir_entries(&h.upload_root.join("manuscripts")).is_empty());
    assert!(dir_entries(&h.upload_root.join(".staging")).is_empty());
}

#[tokio::test]
async fn test_spoofed_extension_rejected_and_rolled_back() {
    let h = harness();

    // Snapshot the storage roots before the attempt
    let before_manuscripts = dir_entries(&h.upload_root.join("manuscripts"));

    // Executable bytes renamed to .pdf pass the extension gate but not the sniff
    let result = h.uploader.upload_manuscript(manuscript_upload(exe_bytes())).await;
    assert!(matches!(result, Err(UploadError::Validation(_))));

    // Strictly the same set of files as before; nothing staged either
    assert_eq!(dir_entries(&h.upload_root.join("manuscripts")), before_manuscripts);
    assert!(dir_entries(&h.upload_root.join(".staging")).is_empty());
    assert_eq!(h.catalog.count_manuscripts().unwrap(), 0);
}

#[tokio::test]
async fn test_audio_category_rejects_manuscript_bytes() {
    let h = harness();

    let result = h
        .uploader
        .upload_audio(AudioUpload {
            title: "Not Audio".to_string(),
            narrator: "B. Jones".to_string(),
            description: None,
            filename: "fake.mp3".to_string(),
            data: pdf_bytes(),
        })
        .await;

    assert!(matches!(result, Err(UploadError::Validation(_))));
    assert!(dir_entries(&h.upload_root.join("audio")).is_empty());
    assert_eq!(h.catalog.count_audio().unwrap(), 0);
}

// ============================================================================
// Storage-failure cleanup
// ============================================================================

/// Delegates to a LocalStore but fails every promote, standing in for a
/// filesystem error between validation and commit.
struct FailingPromoteStore {
    inner: LocalStore,
}

#[async_trait]
impl MediaStore for FailingPromoteStore {
    async fn stage(
        &self,
        category: Category,
        name: &str,
        data: Bytes,
    ) -> Result<std::path::PathBuf, StoreError> {
        self.inner.stage(category, name, data).await
    }

    async fn promote(&self, _category: Category, _name: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "simulated rename failure",
        )))
    }

    async fn discard(&self, category: Category, name: &str) -> Result<(), StoreError> {
        self.inner.discard(category, name).await
    }

    async fn read(&self, category: Category, name: &str) -> Result<Bytes, StoreError> {
        self.inner.read(category, name).await
    }

    async fn remove(&self, category: Category, name: &str) -> Result<(), StoreError> {
        self.inner.remove(category, name).await
    }

    async fn exists(&self, category: Category, name: &str) -> Result<bool, StoreError> {
        self.inner.exists(category, name).await
    }
}

/// Delegates to a LocalStore but claims each promoted filename in the catalog
/// before returning, so the orchestrator's own insert collides with the
/// filename index. Stands in for a persistence failure after the file has
/// reached its final path.
struct ClaimingPromoteStore {
    inner: LocalStore,
    catalog: Catalog,
}

#[async_trait]
impl MediaStore for ClaimingPromoteStore {
    async fn stage(
        &self,
        category: Category,
        name: &str,
        data: Bytes,
    ) -> Result<std::path::PathBuf, StoreError> {
        self.inner.stage(category, name, data).await
    }

    async fn promote(&self, category: Category, name: &str) -> Result<(), StoreError> {
        self.inner.promote(category, name).await?;
        let competing = ManuscriptRecord {
            id: uuid::Uuid::new_v4().to_string(),
            title: "Claimed First".to_string(),
            author: "C. Other".to_string(),
            stored_filename: name.to_string(),
            original_filename: "claimed.pdf".to_string(),
            file_size: 1,
            file_type: "pdf".to_string(),
            upload_date: Utc::now(),
            description: None,
        };
        self.catalog.insert_manuscript(&competing).unwrap();
        Ok(())
    }

    async fn discard(&self, category: Category, name: &str) -> Result<(), StoreError> {
        self.inner.discard(category, name).await
    }

    async fn read(&self, category: Category, name: &str) -> Result<Bytes, StoreError> {
        self.inner.read(category, name).await
    }

    async fn remove(&self, category: Category, name: &str) -> Result<(), StoreError> {
        self.inner.remove(category, name).await
    }

    async fn exists(&self, category: Category, name: &str) -> Result<bool, StoreError> {
        self.inner.exists(category, name).await
    }
}

#[tokio::test]
async fn test_persist_failure_removes_promoted_file() {
    let dir = tempfile::tempdir().unwrap();
    let upload_root = dir.path().join("uploads");
    let catalog = Catalog::open(dir.path().join("data")).unwrap();
    let store = Arc::new(ClaimingPromoteStore {
        inner: LocalStore::new(&upload_root).unwrap(),
        catalog: catalog.clone(),
    });
    let uploader = Uploader::new(catalog.clone(), store as Arc<dyn MediaStore>);

    let result = uploader.upload_manuscript(manuscript_upload(pdf_bytes())).await;
    assert!(matches!(result, Err(UploadError::Storage(_))));

    // The promoted file is rolled back; only the competing record remains
    assert!(dir_entries(&upload_root.join("manuscripts")).is_empty());
    assert!(dir_entries(&upload_root.join(".staging")).is_empty());
    assert_eq!(catalog.count_manuscripts().unwrap(), 1);
}

#[tokio::test]
async fn test_promote_failure_cleans_staging_and_creates_no_record() {
    let dir = tempfile::tempdir().unwrap();
    let upload_root = dir.path().join("uploads");
    let catalog = Catalog::open(dir.path().join("data")).unwrap();
    let store = Arc::new(FailingPromoteStore {
        inner: LocalStore::new(&upload_root).unwrap(),
    });
    let uploader = Uploader::new(catalog.clone(), store as Arc<dyn MediaStore>);

    let result = uploader.upload_manuscript(manuscript_upload(pdf_bytes())).await;
    assert!(matches!(result, Err(UploadError::Storage(_))));

    assert!(dir_entries(&upload_root.join(".staging")).is_empty());
    assert!(dir_entries(&upload_root.join("manuscripts")).is_empty());
    assert_eq!(catalog.count_manuscripts().unwrap(), 0);
}

// ============================================================================
// Duration probe
// ============================================================================

#[tokio::test]
async fn test_duration_probe_yields_none_for_unparseable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.wav");
    std::fs::write(&path, malformed_wav_bytes()).unwrap();

    assert_eq!(probe::audio_duration_secs(&path).await, None);
}

// ============================================================================
// Filename sanitizer/allocator
// ============================================================================

#[test]
fn test_sanitize_strips_paths_and_odd_characters() {
    assert_eq!(filename::sanitize("../../etc/passwd"), "passwd");
    assert_eq!(filename::sanitize("C:\\docs\\report.pdf"), "report.pdf");
    assert_eq!(filename::sanitize("my report (final).pdf"), "my_report_final.pdf");
    assert_eq!(filename::sanitize(".hidden.pdf"), "hidden.pdf");
}

#[test]
fn test_sanitize_never_returns_empty() {
    assert_eq!(filename::sanitize(""), "upload");
    assert_eq!(filename::sanitize("///"), "upload");
    assert_eq!(filename::sanitize("@#$%"), "upload");
    assert_eq!(filename::sanitize("   "), "upload");
}

#[test]
fn test_allocated_names_preserve_extension() {
    let name = filename::allocate_stored_name("report.pdf");
    assert!(name.starts_with("report_"));
    assert!(name.ends_with(".pdf"));
    assert!(name.len() > "report.pdf".len());
}

#[test]
fn test_allocated_names_never_collide() {
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let name = filename::allocate_stored_name("report.pdf");
        assert!(seen.insert(name), "allocator produced a duplicate name");
    }
}

#[test]
fn test_extension_is_lowercased() {
    assert_eq!(filename::extension("REPORT.PDF"), Some("pdf".to_string()));
    assert_eq!(filename::extension("noext"), None);
    assert_eq!(filename::extension(".bashrc"), None);
}

use std::path::PathBuf;

use media_archive::catalog::models::Category;
use media_archive::upload::validate;

fn write_fixture(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_extension_gate_manuscripts() {
    for ok in ["report.pdf", "report.PDF", "notes.docx", "old.doc"] {
        assert!(
            validate::allowed_extension(Category::Manuscript, ok).is_some(),
            "{ok} should pass"
        );
    }
    for bad in ["report.txt", "report.exe", "report", "report.", ".pdf", "song.mp3"] {
        assert!(
            validate::allowed_extension(Category::Manuscript, bad).is_none(),
            "{bad} should fail"
        );
    }
}

#[test]
fn test_extension_gate_audio() {
    for ok in ["a.mp3", "b.wav", "c.flac", "d.m4a", "e.MP3"] {
        assert!(validate::allowed_extension(Category::Audio, ok).is_some());
    }
    for bad in ["a.ogg", "b.aac", "noext", "d.pdf"] {
        assert!(validate::allowed_extension(Category::Audio, bad).is_none());
    }
}

#[test]
fn test_extension_gate_lowercases() {
    assert_eq!(
        validate::allowed_extension(Category::Manuscript, "REPORT.PDF"),
        Some("pdf".to_string())
    );
}

#[tokio::test]
async fn test_sniff_accepts_pdf_for_manuscripts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "real.pdf", b"%PDF-1.7\nsome content\n%%EOF");

    let mime = validate::sniff_content(Category::Manuscript, &path).await.unwrap();
    assert_eq!(mime, Some("application/pdf".to_string()));
}

#[tokio::test]
async fn test_sniff_rejects_executable_for_manuscripts() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        &dir,
        "fake.pdf",
        b"MZ\x90\x00\x03\x00\x00\x00\x04\x00\x00\x00\xff\xff\x00\x00",
    );

    let mime = validate::sniff_content(Category::Manuscript, &path).await.unwrap();
    assert_eq!(mime, None);
}

#[tokio::test]
async fn test_sniff_rejects_unrecognized_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "noise.pdf", &[0x00, 0x01, 0x02, 0x03, 0x04, 0x05]);

    let mime = validate::sniff_content(Category::Manuscript, &path).await.unwrap();
    assert_eq!(mime, None);
}

#[tokio::test]
async fn test_sniff_accepts_wav_and_flac_for_audio() {
    let dir = tempfile::tempdir().unwrap();

    let mut wav = Vec::new();
    wav.extend_from_slice(b"RIFF\x24\x08\x00\x00WAVE");
    wav.extend_from_slice(&[0u8; 32]);
    let path = write_fixture(&dir, "a.wav", &wav);
    assert!(validate::sniff_content(Category::Audio, &path).await.unwrap().is_some());

    let mut flac = Vec::new();
    flac.extend_from_slice(b"fLaC");
    flac.extend_from_slice(&[0u8; 32]);
    let path = write_fixture(&dir, "b.flac", &flac);
    assert!(validate::sniff_content(Category::Audio, &path).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sniff_accepts_id3_tagged_mp3() {
    let dir = tempfile::tempdir().unwrap();
    let mut mp3 = Vec::new();
    mp3.extend_from_slice(b"ID3\x04\x00\x00\x00\x00\x00\x00");
    mp3.extend_from_slice(&[0u8; 32]);
    let path = write_fixture(&dir, "c.mp3", &mp3);

    let mime = validate::sniff_content(Category::Audio, &path).await.unwrap();
    assert_eq!(mime, Some("audio/mpeg".to_string()));
}

#[tokio::test]
async fn test_sniff_rejects_pdf_for_audio() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "fake.mp3", b"%PDF-1.7\ncontent");

    let mime = validate::sniff_content(Category::Audio, &path).await.unwrap();
    assert_eq!(mime, None);
}

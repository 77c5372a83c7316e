use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{bail, Result};
use gazette_archiver::{
    ArchiveStore, FileOutcome, OcrSettings, Rasterizer, RecognitionBatch, TextRecognizer,
};

/// 把 PDF 内容原样拷贝成"图像"
struct FakeRasterizer;

impl Rasterizer for FakeRasterizer {
    async fn first_page(&self, pdf: &Path, work_dir: &Path) -> Result<PathBuf> {
        let bytes = tokio::fs::read(pdf).await?;
        if bytes.starts_with(b"rotto") {
            bail!("pdftoppm: Syntax Error");
        }
        let image = work_dir.join("page.png");
        tokio::fs::write(&image, bytes).await?;
        Ok(image)
    }
}

/// 返回"图像"内容并记录收到的参数
#[derive(Default)]
struct FakeRecognizer {
    seen: Mutex<Vec<OcrSettings>>,
}

impl TextRecognizer for FakeRecognizer {
    async fn recognize(&self, image: &Path, settings: &OcrSettings) -> Result<String> {
        self.seen.lock().unwrap().push(settings.clone());
        let bytes = tokio::fs::read(image).await?;
        Ok(format!("TESTO: {}\n\n", String::from_utf8_lossy(&bytes)))
    }

    async fn version(&self) -> Result<String> {
        Ok("fake 1.0".to_string())
    }
}

fn batch() -> RecognitionBatch<FakeRasterizer, FakeRecognizer> {
    RecognitionBatch::new(
        FakeRasterizer,
        FakeRecognizer::default(),
        OcrSettings::default(),
    )
}

#[tokio::test]
async fn test_writes_sibling_transcript() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("480103-1.pdf"), b"pagina uno").unwrap();
    let store = ArchiveStore::new(dir.path());

    let batch = batch();
    let report = batch.recognize_all(&store).await.unwrap();

    assert_eq!(report.total(), 1);
    assert_eq!(report.transcribed(), 1);
    // 文本原样写出，不做规整
    assert_eq!(
        std::fs::read_to_string(dir.path().join("480103-1.txt")).unwrap(),
        "TESTO: pagina uno\n\n"
    );
    // PDF 不变
    assert_eq!(
        std::fs::read(dir.path().join("480103-1.pdf")).unwrap(),
        b"pagina uno"
    );
    assert_eq!(
        batch.recognizer().seen.lock().unwrap().as_slice(),
        &[OcrSettings::default()]
    );
}

#[tokio::test]
async fn test_failure_does_not_stop_batch() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("480103-1.pdf"), b"rotto").unwrap();
    std::fs::write(dir.path().join("480104-1.pdf"), b"pagina due").unwrap();
    let store = ArchiveStore::new(dir.path());

    let report = batch().recognize_all(&store).await.unwrap();

    assert_eq!(report.total(), 2);
    assert_eq!(report.transcribed(), 1);
    let failed: Vec<_> = report.failed().collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].0, dir.path().join("480103-1.pdf"));
    assert!(failed[0].1.contains("Syntax Error"));

    assert!(!dir.path().join("480103-1.txt").exists());
    assert!(dir.path().join("480104-1.txt").exists());

    let missing = store.missing_transcripts().await.unwrap();
    assert_eq!(missing, vec![dir.path().join("480103-1.pdf")]);
}

#[tokio::test]
async fn test_existing_transcript_is_overwritten_by_default() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("480103-1.pdf"), b"nuovo").unwrap();
    std::fs::write(dir.path().join("480103-1.txt"), b"vecchio").unwrap();
    let store = ArchiveStore::new(dir.path());

    batch().recognize_all(&store).await.unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("480103-1.txt")).unwrap(),
        "TESTO: nuovo\n\n"
    );
}

#[tokio::test]
async fn test_skip_existing_transcripts() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("480103-1.pdf"), b"uno").unwrap();
    std::fs::write(dir.path().join("480103-1.txt"), b"vecchio").unwrap();
    std::fs::write(dir.path().join("480104-1.pdf"), b"due").unwrap();
    let store = ArchiveStore::new(dir.path());

    let report = batch()
        .skip_existing(true)
        .recognize_all(&store)
        .await
        .unwrap();

    assert_eq!(report.skipped(), 1);
    assert_eq!(report.transcribed(), 1);
    assert_eq!(report.files[0].1, FileOutcome::Skipped);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("480103-1.txt")).unwrap(),
        "vecchio"
    );
}

#[tokio::test]
async fn test_missing_archive_dir_fails_batch() {
    let dir = tempfile::tempdir().unwrap();
    let store = ArchiveStore::new(dir.path().join("gazette_archives"));

    assert!(batch().recognize_all(&store).await.is_err());
}

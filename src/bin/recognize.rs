use anyhow::Result;
use gazette_archiver::services::{Pdftoppm, Tesseract};
use gazette_archiver::utils::logging;
use gazette_archiver::{ArchiveStore, Config, RecognitionBatch, TextRecognizer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::load()?;
    let store = ArchiveStore::new(&config.archive_dir);

    let batch = RecognitionBatch::new(
        Pdftoppm::new(&config.pdftoppm_path).with_dpi(config.raster_dpi),
        Tesseract::new(&config.tesseract_path),
        config.ocr_settings(),
    )
    .skip_existing(config.skip_existing_transcripts);

    match batch.recognizer().version().await {
        Ok(version) => info!("OCR 引擎: {}", version),
        Err(e) => warn!("无法获取 OCR 引擎版本: {:#}", e),
    }

    let report = batch.recognize_all(&store).await?;

    // 列出仍缺少识别文本的 PDF，便于重跑
    let missing = store.missing_transcripts().await?;
    if missing.is_empty() {
        info!("所有 PDF 均已有识别文本");
    } else {
        warn!("仍有 {} 个 PDF 没有识别文本:", missing.len());
        for path in &missing {
            warn!("  {}", path.display());
        }
    }

    if report.failed().next().is_some() {
        std::process::exit(1);
    }
    Ok(())
}

//! 单文件 OCR 诊断：识别一个 PDF 的第一页并打印前 500 个字符

use std::path::PathBuf;

use anyhow::{Context, Result};
use gazette_archiver::services::{Pdftoppm, Tesseract};
use gazette_archiver::utils::logging::{self, truncate_text};
use gazette_archiver::{Config, Rasterizer, TextRecognizer};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::load()?;
    let pdf = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("test.pdf"));

    let rasterizer = Pdftoppm::new(&config.pdftoppm_path).with_dpi(config.raster_dpi);
    let recognizer = Tesseract::new(&config.tesseract_path);

    let work_dir = tempfile::tempdir().context("无法创建临时目录")?;
    let image = rasterizer.first_page(&pdf, work_dir.path()).await?;
    let text = recognizer
        .recognize(&image, &config.ocr_settings())
        .await?;

    println!("前 500 个字符:");
    println!("{}", truncate_text(&text, 500));

    println!("\nTesseract 版本:");
    println!("{}", recognizer.version().await?);

    Ok(())
}

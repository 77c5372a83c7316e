//! 批量识别 - 编排层
//!
//! ## 职责
//!
//! 在开始时一次性列出存档目录中的全部 PDF，逐个：
//! 渲染第一页 → OCR → 把文本原样写到同名 txt。
//!
//! 单个文件失败只记录在报告中，批处理继续；只有存档目录本身无法读取时
//! 整个批次才失败。

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{error, info, warn};

use crate::services::{ArchiveStore, OcrSettings, Rasterizer, TextRecognizer};
use crate::utils::logging::{log_banner, now};

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// 已写出识别文本
    Transcribed { chars: usize, elapsed: Duration },
    /// 已有 txt 且配置为跳过
    Skipped,
    /// 失败原因
    Failed(String),
}

/// 批量识别报告
#[derive(Debug, Default)]
pub struct RecognitionReport {
    pub files: Vec<(PathBuf, FileOutcome)>,
}

impl RecognitionReport {
    pub fn total(&self) -> usize {
        self.files.len()
    }

    pub fn transcribed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Transcribed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped))
    }

    pub fn failed(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().filter_map(|(path, outcome)| match outcome {
            FileOutcome::Failed(reason) => Some((path.as_path(), reason.as_str())),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// 批量识别器
pub struct RecognitionBatch<R, T> {
    rasterizer: R,
    recognizer: T,
    settings: OcrSettings,
    skip_existing: bool,
}

impl<R: Rasterizer, T: TextRecognizer> RecognitionBatch<R, T> {
    pub fn new(rasterizer: R, recognizer: T, settings: OcrSettings) -> Self {
        Self {
            rasterizer,
            recognizer,
            settings,
            skip_existing: false,
        }
    }

    /// 已有 txt 的 PDF 是否跳过（默认每次都覆盖）
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    pub fn recognizer(&self) -> &T {
        &self.recognizer
    }

    /// 识别存档目录中的全部 PDF
    pub async fn recognize_all(&self, store: &ArchiveStore) -> Result<RecognitionReport> {
        let payloads = store.list_payloads().await?;
        let total = payloads.len();

        log_banner(&format!("🔍 开始识别 {} 个 PDF", total));
        info!("开始时间: {}", now());
        info!(
            "OCR 参数: --oem {} --psm {} -l {}",
            self.settings.engine_mode, self.settings.page_segmentation_mode, self.settings.language
        );

        let mut report = RecognitionReport::default();

        for (i, pdf) in payloads.into_iter().enumerate() {
            let name = pdf
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            let outcome = if self.skip_existing
                && fs::try_exists(ArchiveStore::transcript_path(&pdf))
                    .await
                    .unwrap_or(false)
            {
                info!("[{}/{}] {} 已有识别文本，跳过", i + 1, total, name);
                FileOutcome::Skipped
            } else {
                let started = Instant::now();
                match self.recognize_one(&pdf).await {
                    Ok(chars) => {
                        let elapsed = started.elapsed();
                        info!(
                            "[{}/{}] ✓ {} 识别完成，{} 个字符，用时 {:.2} 秒",
                            i + 1,
                            total,
                            name,
                            chars,
                            elapsed.as_secs_f64()
                        );
                        FileOutcome::Transcribed { chars, elapsed }
                    }
                    Err(e) => {
                        error!("[{}/{}] ❌ {} 识别失败: {:#}", i + 1, total, name, e);
                        FileOutcome::Failed(format!("{:#}", e))
                    }
                }
            };
            report.files.push((pdf, outcome));
        }

        log_report(&report);
        Ok(report)
    }

    /// 识别单个 PDF，返回写出的字符数
    pub async fn recognize_one(&self, pdf: &Path) -> Result<usize> {
        let work_dir = tempfile::Builder::new()
            .prefix("gazette-ocr-")
            .tempdir()
            .context("无法创建临时目录")?;

        let image = self
            .rasterizer
            .first_page(pdf, work_dir.path())
            .await
            .with_context(|| format!("渲染第一页失败: {}", pdf.display()))?;

        let text = self
            .recognizer
            .recognize(&image, &self.settings)
            .await
            .with_context(|| format!("OCR 失败: {}", pdf.display()))?;

        let transcript = ArchiveStore::transcript_path(pdf);
        fs::write(&transcript, &text)
            .await
            .with_context(|| format!("无法写入: {}", transcript.display()))?;

        Ok(text.chars().count())
    }
}

// ========== 日志辅助函数 ==========

fn log_report(report: &RecognitionReport) {
    info!("\n{}", "=".repeat(60));
    info!("📊 识别完成统计");
    info!("完成时间: {}", now());
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", report.transcribed(), report.total());
    info!("⏭️ 跳过: {}", report.skipped());
    let failed: Vec<_> = report.failed().collect();
    info!("❌ 失败: {}", failed.len());
    for (path, reason) in failed {
        warn!("  {}: {}", path.display(), reason);
    }
    info!("{}", "=".repeat(60));
}

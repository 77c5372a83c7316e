//! 存档目录 - 业务能力层
//!
//! 扁平目录：`YYMMDD-N.pdf` 载荷与同名 `.txt` 识别结果

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use crate::models::{EditionName, PAYLOAD_EXTENSION, TRANSCRIPT_EXTENSION};

/// 存档目录
#[derive(Debug, Clone)]
pub struct ArchiveStore {
    root: PathBuf,
}

impl ArchiveStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 确保目录存在
    pub async fn ensure_exists(&self) -> Result<()> {
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("无法创建存档目录: {}", self.root.display()))?;
        info!("存档目录: {}", self.root.display());
        Ok(())
    }

    /// 某一版公报的 PDF 路径
    pub fn payload_path(&self, edition: &EditionName) -> PathBuf {
        self.root.join(edition.payload_file_name())
    }

    /// 载荷对应的识别文本路径（同目录、同基名、扩展名换成 txt）
    ///
    /// 不符合 `YYMMDD-N.pdf` 命名的文件（例如手动放入的 PDF）同样按基名处理。
    pub fn transcript_path(payload: &Path) -> PathBuf {
        match EditionName::from_payload_path(payload) {
            Some(edition) => payload.with_file_name(edition.transcript_file_name()),
            None => payload.with_extension(TRANSCRIPT_EXTENSION),
        }
    }

    /// 这一版是否已经下载过
    pub async fn contains(&self, edition: &EditionName) -> Result<bool> {
        let path = self.payload_path(edition);
        fs::try_exists(&path)
            .await
            .with_context(|| format!("无法检查文件: {}", path.display()))
    }

    /// 列出目录中所有 PDF，按文件名排序
    pub async fn list_payloads(&self) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .with_context(|| format!("无法读取存档目录: {}", self.root.display()))?;

        let mut payloads = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some(PAYLOAD_EXTENSION)
                && entry.file_type().await?.is_file()
            {
                payloads.push(path);
            }
        }
        payloads.sort();
        Ok(payloads)
    }

    /// 还没有识别文本的 PDF
    pub async fn missing_transcripts(&self) -> Result<Vec<PathBuf>> {
        let mut missing = Vec::new();
        for payload in self.list_payloads().await? {
            if !fs::try_exists(Self::transcript_path(&payload)).await? {
                missing.push(payload);
            }
        }
        Ok(missing)
    }
}

//! OCR 能力 - 业务能力层
//!
//! 只负责"图像 → 文本"，不关心文件从哪来、写到哪去

use std::path::Path;

use anyhow::Result;

use crate::services::external_tool::run_tool;

/// OCR 参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// 引擎模式（--oem），3 = 默认引擎
    pub engine_mode: u8,
    /// 版面分析模式（--psm），6 = 单一均匀文本块
    pub page_segmentation_mode: u8,
    /// 语言代码
    pub language: String,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            engine_mode: 3,
            page_segmentation_mode: 6,
            language: "ita".to_string(),
        }
    }
}

impl OcrSettings {
    /// 转换为 tesseract 命令行参数
    pub fn to_args(&self) -> Vec<String> {
        vec![
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_segmentation_mode.to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }
}

/// 文本识别
#[allow(async_fn_in_trait)]
pub trait TextRecognizer {
    /// 识别图像中的文本，原样返回
    async fn recognize(&self, image: &Path, settings: &OcrSettings) -> Result<String>;

    /// 引擎版本（仅用于诊断）
    async fn version(&self) -> Result<String>;
}

/// 本地 tesseract 命令行
#[derive(Debug, Clone)]
pub struct Tesseract {
    program: String,
}

impl Tesseract {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Tesseract {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl TextRecognizer for Tesseract {
    async fn recognize(&self, image: &Path, settings: &OcrSettings) -> Result<String> {
        let mut args = vec![
            image.as_os_str().to_os_string(),
            "stdout".into(),
        ];
        args.extend(settings.to_args().into_iter().map(Into::into));

        let output = run_tool(&self.program, args).await?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn version(&self) -> Result<String> {
        let output = run_tool(&self.program, ["--version"]).await?;
        Ok(parse_version(&output.stdout, &output.stderr))
    }
}

/// 旧版 tesseract 把版本信息写到 stderr
fn parse_version(stdout: &[u8], stderr: &[u8]) -> String {
    let text = if stdout.iter().any(|b| !b.is_ascii_whitespace()) {
        stdout
    } else {
        stderr
    };
    String::from_utf8_lossy(text)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        assert_eq!(
            OcrSettings::default().to_args(),
            vec!["--oem", "3", "--psm", "6", "-l", "ita"]
        );
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version(b"tesseract 5.3.0\n leptonica-1.82.0\n", b""),
            "tesseract 5.3.0"
        );
        assert_eq!(parse_version(b"", b"tesseract 4.1.1\n"), "tesseract 4.1.1");
        assert_eq!(parse_version(b"", b""), "");
    }
}

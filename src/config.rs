use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::services::{OcrSettings, DEFAULT_RASTER_DPI};

/// 默认配置文件名（位于工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "gazette.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 要下载的年份
    pub year: u16,
    /// 存档目录（PDF 与识别出的 txt 放在同一目录）
    pub archive_dir: PathBuf,
    /// 普通公报系列的检索页
    pub search_url: String,
    /// 浏览器调试端口，设置后连接已打开的浏览器，否则自行启动
    pub browser_debug_port: Option<u16>,
    /// 是否以无头模式启动浏览器
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时由 chromiumoxide 自动查找
    pub chrome_executable: Option<PathBuf>,
    /// 检索结果加载后的等待时间（毫秒）
    pub settle_delay_ms: u64,
    /// 每次下载完成后的等待时间（毫秒）
    pub download_delay_ms: u64,
    /// 单个下载的超时时间（秒）
    pub download_timeout_secs: u64,
    /// 下载结束后是否等待回车再关闭浏览器
    pub hold_browser_open: bool,
    // --- OCR 配置 ---
    pub ocr_language: String,
    pub ocr_psm: u8,
    pub ocr_oem: u8,
    pub pdftoppm_path: String,
    pub tesseract_path: String,
    /// 第一页渲染分辨率（DPI）
    pub raster_dpi: u32,
    /// 已有 txt 的 PDF 是否跳过识别
    pub skip_existing_transcripts: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            year: 1948,
            archive_dir: PathBuf::from("gazette_archives"),
            search_url:
                "https://www.gazzettaufficiale.it/ricerca/pdf/foglio_ordinario2/2/0/0?reset=true"
                    .to_string(),
            browser_debug_port: None,
            headless: false,
            chrome_executable: None,
            settle_delay_ms: 2000,
            download_delay_ms: 2000,
            download_timeout_secs: 120,
            hold_browser_open: false,
            ocr_language: "ita".to_string(),
            ocr_psm: 6,
            ocr_oem: 3,
            pdftoppm_path: "pdftoppm".to_string(),
            tesseract_path: "tesseract".to_string(),
            raster_dpi: DEFAULT_RASTER_DPI,
            skip_existing_transcripts: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → TOML 文件（`GAZETTE_CONFIG` 或 `gazette.toml`）→ 环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("GAZETTE_CONFIG") {
            Ok(path) => Self::from_toml_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_toml_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 用 `lookup` 提供的变量覆盖配置项
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "GAZETTE_YEAR", "u16")? {
            self.year = v;
        }
        if let Some(v) = lookup("ARCHIVE_DIR") {
            self.archive_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("SEARCH_URL") {
            self.search_url = v;
        }
        if let Some(v) = parse_var(&lookup, "BROWSER_DEBUG_PORT", "u16")? {
            self.browser_debug_port = Some(v);
        }
        if let Some(v) = parse_var(&lookup, "HEADLESS", "bool")? {
            self.headless = v;
        }
        if let Some(v) = lookup("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(PathBuf::from(v));
        }
        if let Some(v) = parse_var(&lookup, "SETTLE_DELAY_MS", "u64")? {
            self.settle_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DOWNLOAD_DELAY_MS", "u64")? {
            self.download_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "DOWNLOAD_TIMEOUT_SECS", "u64")? {
            self.download_timeout_secs = v;
        }
        if let Some(v) = parse_var(&lookup, "HOLD_BROWSER_OPEN", "bool")? {
            self.hold_browser_open = v;
        }
        if let Some(v) = lookup("OCR_LANGUAGE") {
            self.ocr_language = v;
        }
        if let Some(v) = parse_var(&lookup, "OCR_PSM", "u8")? {
            self.ocr_psm = v;
        }
        if let Some(v) = parse_var(&lookup, "OCR_OEM", "u8")? {
            self.ocr_oem = v;
        }
        if let Some(v) = lookup("PDFTOPPM_PATH") {
            self.pdftoppm_path = v;
        }
        if let Some(v) = lookup("TESSERACT_PATH") {
            self.tesseract_path = v;
        }
        if let Some(v) = parse_var(&lookup, "RASTER_DPI", "u32")? {
            self.raster_dpi = v;
        }
        if let Some(v) = parse_var(&lookup, "SKIP_EXISTING_TRANSCRIPTS", "bool")? {
            self.skip_existing_transcripts = v;
        }
        Ok(self)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    /// OCR 调用参数
    pub fn ocr_settings(&self) -> OcrSettings {
        OcrSettings {
            engine_mode: self.ocr_oem,
            page_segmentation_mode: self.ocr_psm,
            language: self.ocr_language.clone(),
        }
    }
}

fn parse_var<T, F>(
    lookup: &F,
    var_name: &str,
    expected_type: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type,
            }),
    }
}

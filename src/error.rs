//! 错误类型
//!
//! 业务流程统一使用 `anyhow::Result`，这里只定义外部协作方（浏览器、下载、
//! OCR 工具、配置）边界上的具体错误，便于日志中区分失败来源。

use std::path::PathBuf;

use chromiumoxide::error::CdpError;
use thiserror::Error;

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: CdpError,
    },
    /// 浏览器配置或启动失败
    #[error("启动浏览器失败: {0}")]
    LaunchFailed(String),
    /// 导航失败
    #[error("导航到 {url} 失败: {source}")]
    NavigationFailed {
        url: String,
        #[source]
        source: CdpError,
    },
    /// 页面上找不到元素
    #[error("未找到元素: {selector}")]
    ElementNotFound { selector: String },
    /// 下拉框中没有对应的选项
    #[error("下拉框 {selector} 中没有值为 {value} 的选项")]
    OptionNotFound { selector: String, value: String },
    /// 条目索引越界
    #[error("条目索引 {index} 超出范围 (共 {total} 个)")]
    EntryOutOfRange { index: usize, total: usize },
}

/// 下载错误
#[derive(Debug, Error)]
pub enum DownloadError {
    /// 等待下载完成超时
    #[error("等待下载完成超时 ({secs} 秒)")]
    Timeout { secs: u64 },
    /// 浏览器取消了下载
    #[error("下载被取消: {guid}")]
    Canceled { guid: String },
    /// 事件流提前关闭
    #[error("下载事件流已关闭")]
    EventStreamClosed,
    /// 保存文件失败
    #[error("保存下载文件失败 ({}): {source}", .path.display())]
    SaveFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 外部识别工具（pdftoppm / tesseract）错误
#[derive(Debug, Error)]
pub enum RecognitionError {
    /// 工具未安装
    #[error("找不到外部工具 {tool}，请确认已安装并在 PATH 中")]
    ToolNotFound { tool: String },
    /// 启动进程失败
    #[error("运行 {tool} 失败: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    /// 进程返回非零退出码
    #[error("{tool} 执行失败 (退出码 {code:?}): {stderr}")]
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
    /// 栅格化没有生成图像
    #[error("未能为 {} 生成第一页图像", .pdf.display())]
    NoPageImage { pdf: PathBuf },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 读取配置文件失败
    #[error("读取配置文件失败 ({}): {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 配置文件解析失败
    #[error("配置文件解析失败 ({}): {source}", .path.display())]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

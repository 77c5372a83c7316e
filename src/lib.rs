//! # Gazette Archiver
//!
//! 从 Gazzetta Ufficiale 公开档案下载扫描版公报 PDF，并对第一页做 OCR
//!
//! ## 架构设计
//!
//! 两个互相独立的组件，只通过存档目录衔接：
//!
//! - **下载**（`gazette_archiver` 可执行文件）：打开年度检索结果，按标题中的
//!   日期生成 `YYMMDD-N.pdf` 文件名，每个版次只下载一次
//! - **识别**（`recognize` 可执行文件）：把每个 PDF 第一页的 OCR 文本写到
//!   同名 `.txt`
//!
//! ### ① 基础设施层（Infrastructure）
//! - `browser/` - 连接 / 启动浏览器，捕获下载
//! - `infrastructure/` - `JsExecutor`，唯一的 page owner
//!
//! ### ② 业务能力层（Services）
//! - `ListingSource` / `GazettePage` - 检索列表能力
//! - `ArchiveStore` - 存档目录
//! - `Rasterizer` / `TextRecognizer` - 栅格化与 OCR 能力
//!
//! ### ③ 流程层（Workflow）
//! - `EntryFlow` - 单个条目：解析日期 → 计数 → 查重 → 下载
//!
//! ### ④ 编排层（Orchestration）
//! - `FetchApp` / `fetch_year` - 年度下载
//! - `RecognitionBatch` - 批量识别

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use infrastructure::JsExecutor;
pub use models::{DateCounter, DateKey, EditionName};
pub use orchestrator::{
    fetch_year, FetchApp, FetchSummary, FileOutcome, RecognitionBatch, RecognitionReport,
};
pub use services::{ArchiveStore, ListingSource, OcrSettings, Rasterizer, TextRecognizer};
pub use workflow::{EntryCtx, EntryFlow, EntryOutcome};

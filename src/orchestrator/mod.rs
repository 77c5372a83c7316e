//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `fetch_app` - 下载应用
//! - 管理浏览器生命周期（连接 / 启动、关闭）
//! - 组装检索页与下载监视器
//!
//! ### `year_fetcher` - 年度下载器
//! - 遍历检索结果条目
//! - 委托 `workflow::EntryFlow` 处理单个条目
//! - 汇总统计
//!
//! ### `recognition_batch` - 批量识别
//! - 遍历存档目录中的 PDF
//! - 栅格化第一页 + OCR，写出 txt
//! - 单个文件失败不影响其余文件
//!
//! ## 层次关系
//!
//! ```text
//! fetch_app ──> year_fetcher ──> workflow::EntryFlow ──> services ──> infrastructure
//! recognition_batch ──────────────────────────────────> services
//! ```

pub mod fetch_app;
pub mod recognition_batch;
pub mod year_fetcher;

pub use fetch_app::FetchApp;
pub use recognition_batch::{FileOutcome, RecognitionBatch, RecognitionReport};
pub use year_fetcher::{fetch_year, FetchSummary};

//! 年度下载器 - 编排层
//!
//! ## 职责
//!
//! 打开一个年份的检索结果，按文档顺序逐个处理条目，汇总统计。
//!
//! ## 错误分级
//!
//! - 打开检索页失败：整次运行失败，直接返回错误
//! - 单个条目失败（标题读取、下载、保存）：记录日志后跳过，继续下一个

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{error, info};

use crate::models::DateCounter;
use crate::services::{ArchiveStore, ListingSource};
use crate::utils::logging::{log_banner, now};
use crate::workflow::{EntryCtx, EntryFlow, EntryOutcome};

/// 下载统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub year: u16,
    /// 列表中的条目总数
    pub total_entries: usize,
    /// 出现过的不同日期数量
    pub dates_processed: usize,
    /// 能解析出日期的条目数量，即各日期计数之和（含已存在跳过和下载失败的）
    pub dated_entries: u32,
    /// 本次运行实际下载的版次数量
    pub editions_downloaded: usize,
    /// 文件已存在而跳过的数量
    pub already_present: usize,
    /// 标题中没有日期的数量
    pub unparsed: usize,
    /// 处理出错的数量
    pub failed: usize,
}

/// 下载某一年的全部公报
///
/// # 参数
/// - `source`: 检索列表（真实浏览器或测试替身）
/// - `store`: 存档目录
/// - `year`: 年份
/// - `download_delay`: 每次下载完成后的等待时间
pub async fn fetch_year<S: ListingSource>(
    source: &mut S,
    store: &ArchiveStore,
    year: u16,
    download_delay: Duration,
) -> Result<FetchSummary> {
    log_banner(&format!("📅 开始下载 {} 年的公报", year));

    let total = source
        .open_year(year)
        .await
        .with_context(|| format!("无法打开 {} 年的检索结果", year))?;
    info!("✓ 共找到 {} 个条目", total);

    let flow = EntryFlow::new(store, download_delay);
    let mut counter = DateCounter::new();
    let mut summary = FetchSummary {
        year,
        total_entries: total,
        ..Default::default()
    };

    for index in 0..total {
        let ctx = EntryCtx::new(index, total);
        info!("\n{} {}", ctx, "─".repeat(30));

        match flow.run(source, &mut counter, &ctx).await {
            Ok(EntryOutcome::Downloaded(_)) => summary.editions_downloaded += 1,
            Ok(EntryOutcome::AlreadyPresent(_)) => summary.already_present += 1,
            Ok(EntryOutcome::Unparsed) => summary.unparsed += 1,
            Err(e) => {
                error!("{} ❌ 处理失败: {:#}", ctx, e);
                summary.failed += 1;
            }
        }
    }

    summary.dates_processed = counter.distinct_dates();
    summary.dated_entries = counter.total();
    log_summary(&summary);

    Ok(summary)
}

// ========== 日志辅助函数 ==========

fn log_summary(summary: &FetchSummary) {
    info!("\n{}", "=".repeat(60));
    info!("📊 {} 年下载完成统计", summary.year);
    info!("完成时间: {}", now());
    info!("{}", "=".repeat(60));
    info!("条目总数: {}", summary.total_entries);
    info!("日期数量: {}", summary.dates_processed);
    info!("有日期的条目: {}", summary.dated_entries);
    info!("✅ 新下载: {}", summary.editions_downloaded);
    info!("⏭️ 已存在: {}", summary.already_present);
    info!("⚠️ 无日期: {}", summary.unparsed);
    info!("❌ 失败: {}", summary.failed);
    info!("{}", "=".repeat(60));
}

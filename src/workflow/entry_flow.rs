//! 条目处理流程 - 流程层
//!
//! 核心职责：定义"一个条目"的完整处理流程
//!
//! 流程顺序：
//! 1. 读标题 → 解析日期（失败则跳过，不计数）
//! 2. 日期计数 → 生成文件名
//! 3. 文件已存在 → 跳过
//! 4. 触发下载 → 保存 → 节流等待

use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::models::{DateCounter, DateKey, EditionName};
use crate::services::{ArchiveStore, ListingSource};
use crate::utils::logging::truncate_text;
use crate::workflow::entry_ctx::EntryCtx;

/// 条目处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    /// 本次运行新下载
    Downloaded(EditionName),
    /// 文件已存在，跳过下载
    AlreadyPresent(EditionName),
    /// 标题中没有日期
    Unparsed,
}

/// 条目处理流程
///
/// - 持有存档目录与节流间隔
/// - 不持有浏览器资源，只通过 ListingSource 访问条目
pub struct EntryFlow<'a> {
    store: &'a ArchiveStore,
    download_delay: Duration,
}

impl<'a> EntryFlow<'a> {
    pub fn new(store: &'a ArchiveStore, download_delay: Duration) -> Self {
        Self {
            store,
            download_delay,
        }
    }

    pub async fn run<S: ListingSource>(
        &self,
        source: &mut S,
        counter: &mut DateCounter,
        ctx: &EntryCtx,
    ) -> Result<EntryOutcome> {
        let title = source.entry_title(ctx.index).await?;
        info!("{} 标题: {}", ctx, truncate_text(&title, 80));

        let Some(key) = DateKey::from_title(&title) else {
            warn!("{} ⚠️ 无法从标题解析日期，跳过", ctx);
            return Ok(EntryOutcome::Unparsed);
        };

        let edition = EditionName::new(key, counter.next(key));
        let dest = self.store.payload_path(&edition);

        if self.store.contains(&edition).await? {
            info!("{} 已存在 {}，跳过", ctx, edition.payload_file_name());
            return Ok(EntryOutcome::AlreadyPresent(edition));
        }

        info!("{} 📥 正在下载到: {}", ctx, dest.display());
        let size = source.download_entry(ctx.index, &dest).await?;
        info!(
            "{} ✓ 已下载 {} ({} 字节)",
            ctx,
            edition.payload_file_name(),
            size
        );

        // 下载之间等待，避免请求过快
        sleep(self.download_delay).await;

        Ok(EntryOutcome::Downloaded(edition))
    }
}

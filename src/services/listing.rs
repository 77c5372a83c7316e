//! 检索列表能力 - 业务能力层
//!
//! 下载流程只依赖这个 trait，真实实现见 `GazettePage`，测试中可用假实现
//! 回放固定的标题和载荷。

use std::path::Path;

use anyhow::Result;

/// 公报检索结果列表
#[allow(async_fn_in_trait)]
pub trait ListingSource {
    /// 打开指定年份的检索结果，返回条目数量
    async fn open_year(&mut self, year: u16) -> Result<usize>;

    /// 读取第 `index` 个条目（从 0 开始）的标题
    async fn entry_title(&mut self, index: usize) -> Result<String>;

    /// 触发第 `index` 个条目的下载并把载荷保存到 `dest`
    ///
    /// # 返回
    /// 返回保存的字节数
    async fn download_entry(&mut self, index: usize, dest: &Path) -> Result<u64>;
}

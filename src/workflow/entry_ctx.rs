//! 条目处理上下文
//!
//! 封装"我正在处理列表中的第几个条目"这一信息

use std::fmt::Display;

/// 条目处理上下文
#[derive(Debug, Clone, Copy)]
pub struct EntryCtx {
    /// 条目在列表中的索引（从0开始，传给 ListingSource）
    pub index: usize,

    /// 条目总数（仅用于日志显示）
    pub total: usize,
}

impl EntryCtx {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }

    /// 从 1 开始的序号
    pub fn position(&self) -> usize {
        self.index + 1
    }
}

impl Display for EntryCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[条目 {}/{}]", self.position(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_one_based() {
        assert_eq!(EntryCtx::new(0, 120).to_string(), "[条目 1/120]");
        assert_eq!(EntryCtx::new(119, 120).position(), 120);
    }
}

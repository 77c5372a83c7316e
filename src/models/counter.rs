use std::collections::HashMap;

use super::date_key::DateKey;

/// 日期计数表
///
/// 仅在一次运行内有效：同一日期每出现一次加一，从不回退。
#[derive(Debug, Default)]
pub struct DateCounter {
    counts: HashMap<DateKey, u32>,
}

impl DateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次出现并返回当前序号（首次为 1）
    pub fn next(&mut self, key: DateKey) -> u32 {
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        *count
    }

    /// 出现过的不同日期数量
    pub fn distinct_dates(&self) -> usize {
        self.counts.len()
    }

    /// 所有能解析出日期的条目数量
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_per_date() {
        let a: DateKey = "480103".parse().unwrap();
        let b: DateKey = "480104".parse().unwrap();
        let mut counter = DateCounter::new();

        assert_eq!(counter.next(a), 1);
        assert_eq!(counter.next(b), 1);
        assert_eq!(counter.next(a), 2);
        assert_eq!(counter.next(a), 3);

        assert_eq!(counter.distinct_dates(), 2);
        assert_eq!(counter.total(), 4);
    }

    #[test]
    fn test_empty_counter() {
        let counter = DateCounter::new();
        assert_eq!(counter.distinct_dates(), 0);
        assert_eq!(counter.total(), 0);
    }
}

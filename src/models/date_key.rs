//! 日期键（`YYMMDD`）
//!
//! 从条目标题中形如 `del DD-MM-YYYY` 的片段推导出来，既用于同日多版的计数，
//! 也作为文件名前缀。

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

/// 日期键
///
/// 只保留年份的后两位，月、日按标题中的原样数字保存，不做日历校验。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateKey {
    pub yy: u8,
    pub month: u8,
    pub day: u8,
}

fn title_date_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"del ([0-9]{2})-([0-9]{2})-([0-9]{4})").expect("标题日期正则表达式无效")
    })
}

impl DateKey {
    /// 从条目标题中提取日期
    ///
    /// 标题中没有 `del DD-MM-YYYY` 时返回 `None`。
    pub fn from_title(title: &str) -> Option<Self> {
        let caps = title_date_regex().captures(title)?;
        let day: u8 = caps.get(1)?.as_str().parse().ok()?;
        let month: u8 = caps.get(2)?.as_str().parse().ok()?;
        let year: u16 = caps.get(3)?.as_str().parse().ok()?;

        Some(Self {
            yy: (year % 100) as u8,
            month,
            day,
        })
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}", self.yy, self.month, self.day)
    }
}

/// 解析失败：不是 6 位数字
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("无效的日期键: {0}")]
pub struct InvalidDateKey(pub String);

impl FromStr for DateKey {
    type Err = InvalidDateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidDateKey(s.to_string()));
        }
        let field = |range: std::ops::Range<usize>| {
            s[range]
                .parse::<u8>()
                .map_err(|_| InvalidDateKey(s.to_string()))
        };
        Ok(Self {
            yy: field(0..2)?,
            month: field(2..4)?,
            day: field(4..6)?,
        })
    }
}

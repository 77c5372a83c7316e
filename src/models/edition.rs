use std::fmt;
use std::path::Path;
use std::str::FromStr;

use super::date_key::DateKey;

/// 载荷文件扩展名
pub const PAYLOAD_EXTENSION: &str = "pdf";
/// 识别文本扩展名
pub const TRANSCRIPT_EXTENSION: &str = "txt";

/// 某一天的某一版公报，对应文件基名 `YYMMDD-N`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EditionName {
    pub key: DateKey,
    /// 当天第几版，从 1 开始
    pub sequence: u32,
}

impl EditionName {
    pub fn new(key: DateKey, sequence: u32) -> Self {
        Self { key, sequence }
    }

    /// `YYMMDD-N.pdf`
    pub fn payload_file_name(&self) -> String {
        format!("{}.{}", self, PAYLOAD_EXTENSION)
    }

    /// `YYMMDD-N.txt`
    pub fn transcript_file_name(&self) -> String {
        format!("{}.{}", self, TRANSCRIPT_EXTENSION)
    }

    /// 从 `.../YYMMDD-N.pdf` 这样的路径反推版次
    pub fn from_payload_path(path: &Path) -> Option<Self> {
        if path.extension()? != PAYLOAD_EXTENSION {
            return None;
        }
        path.file_stem()?.to_str()?.parse().ok()
    }
}

impl fmt::Display for EditionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key, self.sequence)
    }
}

impl FromStr for EditionName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, sequence) = s
            .split_once('-')
            .ok_or_else(|| format!("缺少版次分隔符: {}", s))?;

        let key: DateKey = key.parse().map_err(|e| format!("{}", e))?;

        // 版次为不带前导零的正整数
        if sequence.is_empty()
            || sequence.starts_with('0')
            || !sequence.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(format!("无效的版次: {}", s));
        }
        let sequence = sequence
            .parse()
            .map_err(|_| format!("无效的版次: {}", s))?;

        Ok(Self { key, sequence })
    }
}

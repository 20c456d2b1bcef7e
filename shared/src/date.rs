//! 时间类型模块
//!
//! `Timestamp`: 可序列化的毫秒时间戳，用于事件传输；
//! RFC3339 字符串的解析与格式化由 chrono 承担。

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// 毫秒时间戳
///
/// 内部存储为 `i64`，表示自 Unix 纪元以来的毫秒数
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    #[inline]
    pub const fn new(ms: i64) -> Self {
        Self(ms)
    }

    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn as_secs(&self) -> i64 {
        self.0 / 1000
    }

    /// 解析 RFC3339 字符串（服务端事件时间格式）
    pub fn parse_rfc3339(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| Self(dt.timestamp_millis()))
    }

    /// 格式化为 RFC3339 字符串（UTC，毫秒精度）
    ///
    /// 超出 chrono 可表示范围时返回 `None`
    pub fn to_rfc3339(&self) -> Option<String> {
        DateTime::<Utc>::from_timestamp_millis(self.0)
            .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self(ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc3339_round_trip() {
        let ts = Timestamp::parse_rfc3339("2026-03-01T10:30:00.500Z").unwrap();
        assert_eq!(ts.to_rfc3339().unwrap(), "2026-03-01T10:30:00.500Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(Timestamp::parse_rfc3339("pas une date").is_none());
    }

    #[test]
    fn secs_truncates_millis() {
        assert_eq!(Timestamp::new(1999).as_secs(), 1);
        assert_eq!(Timestamp::new(1999).as_millis(), 1999);
    }
}

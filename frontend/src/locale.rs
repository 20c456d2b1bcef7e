//! 语言区域模块
//!
//! 语言由 URL 路径前缀决定：`/en/...` 为英文，无前缀为默认的法文。
//! 所有导航原语（链接、重定向、预取）都要经过 `localize` 还原前缀。

/// 支持的语言区域（闭合集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// 法文，默认语言（无路径前缀）
    #[default]
    Fr,
    /// 英文（`/en` 前缀）
    En,
}

impl Locale {
    pub const ALL: &'static [Locale] = &[Locale::Fr, Locale::En];

    /// 路径前缀片段；默认语言没有前缀
    pub fn prefix(&self) -> Option<&'static str> {
        match self {
            Locale::Fr => None,
            Locale::En => Some("en"),
        }
    }

    /// 从完整路径中分离语言与剩余路径
    ///
    /// 剩余路径始终以 `/` 开头；`/en` 单独出现等价于 `/en/`。
    pub fn split_path(path: &str) -> (Locale, String) {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let (head, rest) = match trimmed.split_once('/') {
            Some((head, rest)) => (head, rest),
            None => (trimmed, ""),
        };

        for locale in Self::ALL {
            if Some(head) == locale.prefix() {
                return (*locale, format!("/{}", rest));
            }
        }
        (Locale::default(), format!("/{}", trimmed))
    }

    /// 给路径加回语言前缀
    pub fn localize(&self, path: &str) -> String {
        match self.prefix() {
            None => path.to_string(),
            Some(prefix) => {
                if path == "/" {
                    format!("/{}", prefix)
                } else {
                    format!("/{}{}", prefix, path)
                }
            }
        }
    }
}

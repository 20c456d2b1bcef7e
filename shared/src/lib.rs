use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// LocalStorage 中会话持久化使用的键
pub const STORAGE_SESSION_KEY: &str = "portalis_session";
/// 认证请求头
pub const HEADER_AUTH: &str = "Authorization";
/// 自动化事件在 Socket 信封中的事件名
pub const EVENT_AUTOMATION_TRIGGERED: &str = "automation-triggered";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 员工标识
///
/// 非空字符串的 newtype 封装，构造时校验。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeId(String);

impl EmployeeId {
    /// 创建员工标识，空字符串返回 `None`
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 已认证用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub display_name: String,
    /// 账号是否启用
    #[serde(default)]
    pub active: bool,
    /// 邮箱是否已验证
    #[serde(default)]
    pub verified: bool,
}

/// 员工门户的功能模块
///
/// 闭合枚举；路由层解析出明确的模块参数，消费方不再做字符串模式匹配。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleKey {
    Commercial,
    Finances,
    Management,
    Projects,
    Reseau,
}

impl ModuleKey {
    pub const ALL: &'static [ModuleKey] = &[
        ModuleKey::Commercial,
        ModuleKey::Finances,
        ModuleKey::Management,
        ModuleKey::Projects,
        ModuleKey::Reseau,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModuleKey::Commercial => "commercial",
            ModuleKey::Finances => "finances",
            ModuleKey::Management => "management",
            ModuleKey::Projects => "projects",
            ModuleKey::Reseau => "reseau",
        }
    }

    /// 从 URL 片段解析模块名
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|m| m.as_str() == slug)
    }

    /// 该模块是否受权限保护
    ///
    /// `Reseau`（内部通讯录）对所有员工开放，其余模块按访问表判定。
    pub fn is_protected(&self) -> bool {
        !matches!(self, ModuleKey::Reseau)
    }
}

impl fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 按模块的访问布尔表
///
/// 服务端对单个员工返回的权限快照；缺省字段视为无权限。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleAccessMap {
    pub commercial: bool,
    pub finances: bool,
    pub management: bool,
    pub projects: bool,
    pub reseau: bool,
}

impl ModuleAccessMap {
    pub fn allows(&self, module: ModuleKey) -> bool {
        match module {
            ModuleKey::Commercial => self.commercial,
            ModuleKey::Finances => self.finances,
            ModuleKey::Management => self.management,
            ModuleKey::Projects => self.projects,
            ModuleKey::Reseau => self.reseau,
        }
    }

    /// 全部授予或全部拒绝的快照
    pub fn uniform(granted: bool) -> Self {
        Self {
            commercial: granted,
            finances: granted,
            management: granted,
            projects: granted,
            reseau: granted,
        }
    }

    pub fn with(mut self, module: ModuleKey, granted: bool) -> Self {
        match module {
            ModuleKey::Commercial => self.commercial = granted,
            ModuleKey::Finances => self.finances = granted,
            ModuleKey::Management => self.management = granted,
            ModuleKey::Projects => self.projects = granted,
            ModuleKey::Reseau => self.reseau = granted,
        }
        self
    }
}

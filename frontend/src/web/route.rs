//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑层，不依赖 DOM 或 web_sys。路由解析同时产出语言区域
//! 与显式的路由参数（员工 id、模块名），下游组件不再接触原始路径。

use crate::dashboard::ContextKey;
use crate::locale::Locale;
use portalis_shared::{EmployeeId, ModuleKey};

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PortalRoute {
    /// 登录页面（默认路由）
    #[default]
    Login,
    /// 工作区仪表盘（`main` 即工作区根）
    Dashboard(ContextKey),
    /// 员工门户的嵌套模块页
    ///
    /// 员工 id 对每个嵌套路由都是强制的；解析不到时保留 `None`，
    /// 由布局层走致命的「identifiant invalide」分支。
    EmployeePortal {
        employee_id: Option<EmployeeId>,
        module: ModuleKey,
    },
    /// 页面未找到
    NotFound,
}

impl PortalRoute {
    /// 将完整 URL path 解析为 (语言, 路由)
    pub fn parse(path: &str) -> (Locale, Self) {
        let (locale, rest) = Locale::split_path(path);
        let segments: Vec<&str> = rest
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        let route = match segments.as_slice() {
            [] | ["login"] => Self::Login,
            ["tableau"] => Self::Dashboard(ContextKey::Main),
            ["tableau", slug] => match ContextKey::from_slug(slug) {
                Some(key) => Self::Dashboard(key),
                None => Self::NotFound,
            },
            // 两段形式：id 缺失但模块名可识别，保留致命分支
            ["portail", slug] => match ModuleKey::from_slug(slug) {
                Some(module) => Self::EmployeePortal {
                    employee_id: None,
                    module,
                },
                None => Self::NotFound,
            },
            ["portail", id, slug] => match ModuleKey::from_slug(slug) {
                Some(module) => Self::EmployeePortal {
                    employee_id: EmployeeId::new(*id),
                    module,
                },
                None => Self::NotFound,
            },
            _ => Self::NotFound,
        };
        (locale, route)
    }

    /// 生成带语言前缀的 URL path
    pub fn to_path(&self, locale: Locale) -> String {
        let path = match self {
            Self::Login => "/".to_string(),
            Self::Dashboard(ContextKey::Main) => "/tableau".to_string(),
            Self::Dashboard(key) => format!("/tableau/{}", key.as_str()),
            Self::EmployeePortal {
                employee_id: Some(id),
                module,
            } => format!("/portail/{}/{}", id, module),
            Self::EmployeePortal {
                employee_id: None,
                module,
            } => format!("/portail/{}", module),
            Self::NotFound => "/404".to_string(),
        };
        locale.localize(&path)
    }

    /// **核心守卫逻辑：该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Dashboard(_) | Self::EmployeePortal { .. })
    }

    /// 已认证用户是否应该离开此路由（登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard(ContextKey::Main)
    }

    /// 工作区根（权限拒绝时的落点）
    pub fn workspace_root() -> Self {
        Self::Dashboard(ContextKey::Main)
    }
}

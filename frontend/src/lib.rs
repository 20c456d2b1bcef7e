//! Portalis 前端应用
//!
//! ERP/CRM 门户的客户端协调层，Context-Driven 的高内聚低耦合架构：
//! - `locale` + `web::route` + `web::router`: 语言前缀路由与守卫引擎
//! - `session`: 持久化会话存储（唯一的进程级可变资源）
//! - `permission`: 员工门户的模块访问解析
//! - `dashboard`: 工作区上下文存储
//! - `prefetch`: 空闲路由预取调度
//! - `notify`: Socket 事件到 toast 的通知桥
//! - `components`: UI 组件层

mod api;
mod components {
    pub mod login;
    pub mod portal;
    pub mod toast;
    pub mod workspace;
}
mod dashboard;
mod error;
mod locale;
mod notify;
mod permission;
mod prefetch;
mod session;

// 原生 Web API 封装模块
// 对浏览器原生 API 的轻量封装，替代 gloo-* 系列 crate 以减小
// WASM 体积；HTTP 仍走 gloo-net。
pub(crate) mod web {
    pub mod route;
    pub mod router;
    mod socket;
    mod storage;
    mod timer;

    pub use socket::{EventSocket, default_socket_url};
    pub use storage::LocalStorage;
    pub use timer::Timeout;
}

use std::rc::Rc;

use crate::components::login::LoginPage;
use crate::components::portal::EmployeePortalPage;
use crate::components::toast::ToastHost;
use crate::components::workspace::{
    FinancesDashboardPage, MainDashboardPage, ManagementDashboardPage, ProjectsDashboardPage,
    ReseauDashboardPage,
};
use crate::dashboard::{ContextKey, DashboardStore, WebContextInit};
use crate::notify::{AutomationListener, ToastStore};
use crate::permission::PermissionStore;
use crate::prefetch::PrefetchMount;
use crate::session::{SessionStore, WebSessionStorage};
use crate::web::route::PortalRoute;
use crate::web::router::{Router, RouterOutlet};

use leptos::prelude::*;
use send_wrapper::SendWrapper;

/// 路由匹配函数
///
/// 根据 PortalRoute 枚举返回对应的视图组件。
fn route_matcher(route: PortalRoute) -> AnyView {
    match route {
        PortalRoute::Login => view! { <LoginPage /> }.into_any(),
        PortalRoute::Dashboard(ContextKey::Main) => view! { <MainDashboardPage /> }.into_any(),
        PortalRoute::Dashboard(ContextKey::Finances) => {
            view! { <FinancesDashboardPage /> }.into_any()
        }
        PortalRoute::Dashboard(ContextKey::Management) => {
            view! { <ManagementDashboardPage /> }.into_any()
        }
        PortalRoute::Dashboard(ContextKey::Projects) => {
            view! { <ProjectsDashboardPage /> }.into_any()
        }
        PortalRoute::Dashboard(ContextKey::Reseau) => view! { <ReseauDashboardPage /> }.into_any(),
        PortalRoute::EmployeePortal {
            employee_id,
            module,
        } => view! { <EmployeePortalPage employee_id module /> }.into_any(),
        PortalRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page introuvable"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建各存储并注入 Context（显式持有，而不是环境单例）
    let session = SessionStore::new(Rc::new(WebSessionStorage));
    provide_context(SendWrapper::new(session.clone()));
    provide_context(SendWrapper::new(ToastStore::new()));
    provide_context(PermissionStore::new());
    provide_context(SendWrapper::new(DashboardStore::new(Rc::new(WebContextInit))));

    // 2. 认证信号注入路由服务实现守卫（解耦）
    let is_authenticated = session.is_authenticated_signal();

    view! {
        <Router is_authenticated=is_authenticated>
            // 认证期间才存在的副作用组件：路由预取与通知桥
            <Show when=move || is_authenticated.get()>
                <PrefetchMount />
                <AutomationListener />
            </Show>
            <RouterOutlet matcher=route_matcher />
            <ToastHost />
        </Router>
    }
}

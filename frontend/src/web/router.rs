//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，高内聚：所有对 window.history 的
//! 操作都集中在此模块。导航流程为「监听 -> 验证 -> 处理 -> 加载」，
//! 认证信号由外部注入实现解耦；语言前缀在进出时统一还原/附加。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::PortalRoute;
use crate::locale::Locale;

/// 权限拒绝重定向使用的查询参数
pub const ERROR_QUERY_KEY: &str = "error";
pub const ERROR_ACCESS_DENIED: &str = "access-denied";

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 获取当前查询串（含 `?` 前缀，可能为空）
fn current_search() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

/// 推送 History 状态
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 从查询串中取出指定参数的值
///
/// 纯函数，便于脱离浏览器测试。
pub fn query_param(search: &str, key: &str) -> Option<String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    for pair in search.split('&') {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        if k == key {
            return Some(v.to_string());
        }
    }
    None
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；认证检查信号由外部注入。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<PortalRoute>,
    set_route: WriteSignal<PortalRoute>,
    locale: ReadSignal<Locale>,
    set_locale: WriteSignal<Locale>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        // 初始路由与语言均来自当前 URL
        let (initial_locale, initial_route) = PortalRoute::parse(&current_path());
        let (current_route, set_route) = signal(initial_route);
        let (locale, set_locale) = signal(initial_locale);

        Self {
            current_route,
            set_route,
            locale,
            set_locale,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<PortalRoute> {
        self.current_route
    }

    pub fn locale(&self) -> ReadSignal<Locale> {
        self.locale
    }

    /// **核心方法：导航与守卫**（pushState）
    pub fn navigate(&self, route: PortalRoute) {
        self.navigate_to_route(route, true);
    }

    /// 客户端重定向（replaceState，不产生历史记录）
    pub fn redirect(&self, route: PortalRoute) {
        self.navigate_to_route(route, false);
    }

    /// 权限拒绝：重定向到工作区根并带上错误查询参数
    pub fn redirect_access_denied(&self) {
        let locale = self.locale.get_untracked();
        let root = PortalRoute::workspace_root();
        let path = format!(
            "{}?{}={}",
            root.to_path(locale),
            ERROR_QUERY_KEY,
            ERROR_ACCESS_DENIED
        );
        leptos::logging::warn!("[Router] accès refusé, retour à {}", path);
        replace_history_state(&path);
        self.set_route.set(root);
    }

    /// 当前 URL 是否携带权限拒绝标记
    pub fn has_access_denied_flag(&self) -> bool {
        query_param(&current_search(), ERROR_QUERY_KEY).as_deref() == Some(ERROR_ACCESS_DENIED)
    }

    /// 切换语言：同一路由在新前缀下重新进入
    pub fn switch_locale(&self, locale: Locale) {
        if self.locale.get_untracked() == locale {
            return;
        }
        self.set_locale.set(locale);
        let route = self.current_route.get_untracked();
        replace_history_state(&route.to_path(locale));
    }

    fn navigate_to_route(&self, target_route: PortalRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();
        let locale = self.locale.get_untracked();

        // --- Step 1: 验证目标路由 ---
        if target_route.requires_auth() && !is_auth {
            leptos::logging::log!("[Router] non authentifié, retour à la connexion");
            let redirect = PortalRoute::auth_failure_redirect();
            let path = redirect.to_path(locale);
            if use_push {
                push_history_state(&path);
            } else {
                replace_history_state(&path);
            }
            self.set_route.set(redirect);
            return;
        }

        if target_route.should_redirect_when_authenticated() && is_auth {
            leptos::logging::log!("[Router] déjà authentifié, direction tableau de bord");
            let redirect = PortalRoute::auth_success_redirect();
            let path = redirect.to_path(locale);
            if use_push {
                push_history_state(&path);
            } else {
                replace_history_state(&path);
            }
            self.set_route.set(redirect);
            return;
        }

        // --- Step 2: 加载页面（更新状态） ---
        let path = target_route.to_path(locale);
        if use_push {
            push_history_state(&path);
        } else {
            replace_history_state(&path);
        }
        self.set_route.set(target_route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let set_locale = self.set_locale;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let (locale, target_route) = PortalRoute::parse(&current_path());
            set_locale.set(locale);

            // popstate 时同样执行守卫逻辑
            if target_route.requires_auth() && !is_authenticated.get_untracked() {
                let redirect = PortalRoute::auth_failure_redirect();
                replace_history_state(&redirect.to_path(locale));
                set_route.set(redirect);
            } else {
                set_route.set(target_route);
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时的自动重定向
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let locale = self.locale;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();
            let locale = locale.get_untracked();

            if is_auth {
                if route.should_redirect_when_authenticated() {
                    let redirect = PortalRoute::auth_success_redirect();
                    push_history_state(&redirect.to_path(locale));
                    set_route.set(redirect);
                    leptos::logging::log!("[Router] connexion réussie, tableau de bord");
                }
            } else if route.requires_auth() {
                let redirect = PortalRoute::auth_failure_redirect();
                push_history_state(&redirect.to_path(locale));
                set_route.set(redirect);
                leptos::logging::log!("[Router] session terminée, retour à la connexion");
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(PortalRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

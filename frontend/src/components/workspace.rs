use crate::dashboard::{
    ContextKey, DashboardStore, use_finances_dashboard, use_main_dashboard,
    use_management_dashboard, use_projects_dashboard, use_reseau_dashboard,
};
use crate::locale::Locale;
use crate::notify::{ToastLevel, use_toasts};
use crate::session::use_session;
use crate::web::route::PortalRoute;
use crate::web::router::use_router;
use leptos::prelude::*;

/// 工作区页面骨架
///
/// 导航栏在工作区之间整页跳转（整棵组件树重新挂载）；搜索框写回
/// 工作区的瞬态状态，切换上下文后自动清空。
#[component]
fn WorkspaceView(
    title: &'static str,
    store: DashboardStore,
    context: ContextKey,
) -> impl IntoView {
    let router = use_router();
    let session = use_session();

    let (search, set_search) = signal(
        store
            .state_of(context)
            .map(|s| s.search)
            .unwrap_or_default(),
    );
    let on_search = {
        let store = store.clone();
        move |ev| {
            let value = event_target_value(&ev);
            set_search.set(value.clone());
            store.update_state(context, |s| s.search = value.clone());
        }
    };
    let on_logout = move |_| session.logout();

    view! {
        <section class="p-6">
            <header class="flex items-center justify-between mb-4">
                <nav class="flex gap-2">
                    {ContextKey::ALL
                        .iter()
                        .map(|key| {
                            let key = *key;
                            let active = if key == context { "btn-active" } else { "" };
                            view! {
                                <button
                                    class=format!("btn btn-sm {}", active)
                                    on:click=move |_| router.navigate(PortalRoute::Dashboard(key))
                                >
                                    {key.as_str()}
                                </button>
                            }
                        })
                        .collect_view()}
                </nav>
                <div class="flex gap-2">
                    <div class="join">
                        <button
                            class="btn btn-xs join-item"
                            on:click=move |_| router.switch_locale(Locale::Fr)
                        >
                            "FR"
                        </button>
                        <button
                            class="btn btn-xs join-item"
                            on:click=move |_| router.switch_locale(Locale::En)
                        >
                            "EN"
                        </button>
                    </div>
                    <button class="btn btn-xs btn-ghost" on:click=on_logout>
                        "Déconnexion"
                    </button>
                </div>
            </header>
            <h1 class="text-2xl font-bold">{title}</h1>
            <input
                type="search"
                class="input input-bordered mt-4 w-full max-w-xs"
                placeholder="Rechercher..."
                prop:value=search
                on:input=on_search
            />
        </section>
    }
}

/// 工作区根（`main`）
///
/// 权限拒绝重定向的落点：发现错误参数时提示一次。
#[component]
pub fn MainDashboardPage() -> impl IntoView {
    let store = use_main_dashboard();
    let router = use_router();

    if router.has_access_denied_flag() {
        use_toasts().push(
            "Accès refusé au module demandé".to_string(),
            ToastLevel::Warning,
        );
    }

    view! { <WorkspaceView title="Vue d'ensemble" store context=ContextKey::Main /> }
}

#[component]
pub fn FinancesDashboardPage() -> impl IntoView {
    let store = use_finances_dashboard();
    view! { <WorkspaceView title="Finances" store context=ContextKey::Finances /> }
}

#[component]
pub fn ManagementDashboardPage() -> impl IntoView {
    let store = use_management_dashboard();
    view! { <WorkspaceView title="Gestion" store context=ContextKey::Management /> }
}

#[component]
pub fn ProjectsDashboardPage() -> impl IntoView {
    let store = use_projects_dashboard();
    view! { <WorkspaceView title="Projets" store context=ContextKey::Projects /> }
}

#[component]
pub fn ReseauDashboardPage() -> impl IntoView {
    let store = use_reseau_dashboard();
    view! { <WorkspaceView title="Réseau" store context=ContextKey::Reseau /> }
}

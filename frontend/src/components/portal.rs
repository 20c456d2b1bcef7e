use crate::api::{API_BASE_URL, PortalApi};
use crate::permission::{AccessState, use_permissions};
use crate::session::use_session;
use crate::web::router::use_router;
use leptos::prelude::*;
use portalis_shared::{EmployeeId, ModuleKey};

/// 员工门户模块页
///
/// 嵌套路由的前置条件：员工 id 必须存在。缺失即本次渲染的致命错误，
/// 只显示「identifiant invalide」，永不渲染子内容。
///
/// id 存在时按 (员工, 模块) 解析访问权：快照未到显示加载占位
/// （绝不提前否定），拒绝则重定向到工作区根并附带错误参数。
#[component]
pub fn EmployeePortalPage(employee_id: Option<EmployeeId>, module: ModuleKey) -> impl IntoView {
    let Some(employee_id) = employee_id else {
        return view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div role="alert" class="alert alert-error max-w-md">
                    <span>"Identifiant employé invalide"</span>
                </div>
            </div>
        }
        .into_any();
    };

    let session = use_session();
    let permissions = use_permissions();
    let router = use_router();

    let token = session.state().get_untracked().token;
    permissions.ensure_loaded(
        PortalApi::new(API_BASE_URL).with_token(token),
        employee_id.clone(),
    );

    let access = permissions.access_signal(module);

    Effect::new(move |_| {
        if access.get() == AccessState::Denied {
            router.redirect_access_denied();
        }
    });

    view! {
        <Show
            when=move || access.get() == AccessState::Granted
            fallback=|| {
                view! {
                    <div class="flex justify-center p-12">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            }
        >
            <section class="p-6">
                <h1 class="text-2xl font-bold capitalize">{module.as_str()}</h1>
                <p class="text-base-content/70 mt-2">
                    {format!("Espace employé {}", employee_id)}
                </p>
            </section>
        </Show>
    }
    .into_any()
}

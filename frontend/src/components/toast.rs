use crate::notify::{Toast, ToastLevel, use_toasts};
use crate::web::Timeout;
use leptos::prelude::*;

/// toast 容器
///
/// 渲染即消费：每条 toast 到期自动消失，无持久化。
#[component]
pub fn ToastHost() -> impl IntoView {
    let toasts = use_toasts();
    let list = toasts.toasts();

    view! {
        <div class="toast toast-end z-50">
            <For each=move || list.get() key=|t| t.id let:toast>
                <ToastItem toast />
            </For>
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast) -> impl IntoView {
    let toasts = use_toasts();
    let id = toast.id;

    // 固定展示时长；提前卸载时定时器随之清除
    let timer = send_wrapper::SendWrapper::new(Timeout::new(toast.duration_ms, move || {
        toasts.dismiss(id)
    }));
    on_cleanup(move || drop(timer));

    let class = match toast.level {
        ToastLevel::Success => "alert alert-success",
        ToastLevel::Warning => "alert alert-warning",
    };

    view! {
        <div role="alert" class=class>
            <span>{toast.message}</span>
        </div>
    }
}

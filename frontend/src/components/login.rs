use crate::api::{API_BASE_URL, PortalApi};
use crate::session::use_session;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 登录页面
///
/// 提交后调用认证端点并写入会话；跳转由路由服务监听认证信号完成，
/// 这里不做手动导航。
#[component]
pub fn LoginPage() -> impl IntoView {
    let session = use_session();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if email.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Veuillez renseigner tous les champs".to_string()));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        let session = session.clone();
        spawn_local(async move {
            let api = PortalApi::new(API_BASE_URL);
            match api
                .login(email.get_untracked(), password.get_untracked())
                .await
            {
                Ok(response) => session.login(response.user, response.token),
                Err(e) => set_error_msg.set(Some(format!("Connexion impossible: {}", e))),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <h1 class="text-3xl font-bold">"Portalis"</h1>
                    <p class="text-base-content/70">"Connectez-vous à votre espace"</p>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"Adresse e-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                placeholder="prenom.nom@entreprise.fr"
                                on:input=move |ev| set_email.set(event_target_value(&ev))
                                prop:value=email
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Mot de passe"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-4">
                            <button class="btn btn-primary" disabled=is_submitting>
                                <Show when=move || is_submitting.get() fallback=|| "Connexion">
                                    <span class="loading loading-spinner loading-sm"></span>
                                </Show>
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}

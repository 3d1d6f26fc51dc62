//! Login and registration forms.

use booking_contract::{RegisterRequest, Role};
use leptos::*;
use leptos_router::{use_navigate, A};

use crate::context::{use_booking, ToastKind};

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_booking();
    let username = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let navigate = use_navigate();

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let navigate = navigate.clone();
        spawn_local(async move {
            let result = ctx
                .session_store()
                .login(&username.get_untracked(), &password.get_untracked())
                .await;
            if result.is_ok() {
                let target = match ctx.session.with_untracked(|s| s.role()) {
                    Some(Role::SalonOwner) => "/owner",
                    _ => "/salons",
                };
                navigate(target, Default::default());
            }
        });
    };

    view! {
        <section class="auth-form">
            <h1>"Log in"</h1>
            {move || {
                ctx.session
                    .with(|s| s.error.clone())
                    .map(|message| view! { <p class="banner banner-error">{message}</p> })
            }}
            <form on:submit=submit>
                <label class="field">
                    <span>"Username"</span>
                    <input
                        type="text"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Password"</span>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <button
                    class="button"
                    type="submit"
                    disabled=move || ctx.session.with(|s| s.loading)
                >
                    {move || {
                        if ctx.session.with(|s| s.loading) { "Signing in..." } else { "Log in" }
                    }}
                </button>
            </form>
            <p class="auth-switch">
                "No account yet? " <A href="/register">"Register"</A>
            </p>
        </section>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_booking();
    let username = create_rw_signal(String::new());
    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let role = create_rw_signal(Role::Customer);
    let first_name = create_rw_signal(String::new());
    let last_name = create_rw_signal(String::new());
    let phone = create_rw_signal(String::new());
    let navigate = use_navigate();

    let optional = |value: String| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let navigate = navigate.clone();
        let payload = RegisterRequest {
            username: username.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
            role: role.get_untracked(),
            first_name: optional(first_name.get_untracked()),
            last_name: optional(last_name.get_untracked()),
            phone: optional(phone.get_untracked()),
        };
        spawn_local(async move {
            if ctx.session_store().register(payload).await.is_ok() {
                ctx.toast(ToastKind::Success, "Account created, you can log in now");
                navigate("/login", Default::default());
            }
        });
    };

    view! {
        <section class="auth-form">
            <h1>"Create an account"</h1>
            {move || {
                ctx.session
                    .with(|s| s.error.clone())
                    .map(|message| view! { <p class="banner banner-error">{message}</p> })
            }}
            <form on:submit=submit>
                <label class="field">
                    <span>"Username"</span>
                    <input
                        type="text"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Email"</span>
                    <input
                        type="email"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Password"</span>
                    <input
                        type="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"I want to"</span>
                    <select on:change=move |ev| {
                        role.set(
                            if event_target_value(&ev) == "salon_owner" {
                                Role::SalonOwner
                            } else {
                                Role::Customer
                            },
                        )
                    }>
                        <option value="customer" selected=move || role.get() == Role::Customer>
                            "Book appointments"
                        </option>
                        <option
                            value="salon_owner"
                            selected=move || role.get() == Role::SalonOwner
                        >
                            "Run a salon"
                        </option>
                    </select>
                </label>
                <label class="field">
                    <span>"First name (optional)"</span>
                    <input
                        type="text"
                        prop:value=move || first_name.get()
                        on:input=move |ev| first_name.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Last name (optional)"</span>
                    <input
                        type="text"
                        prop:value=move || last_name.get()
                        on:input=move |ev| last_name.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Phone (optional)"</span>
                    <input
                        type="tel"
                        prop:value=move || phone.get()
                        on:input=move |ev| phone.set(event_target_value(&ev))
                    />
                </label>
                <button
                    class="button"
                    type="submit"
                    disabled=move || ctx.session.with(|s| s.loading)
                >
                    "Register"
                </button>
            </form>
            <p class="auth-switch">
                "Already registered? " <A href="/login">"Log in"</A>
            </p>
        </section>
    }
}

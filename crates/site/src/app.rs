//! Application shell: router, navbar, and the toast stack.

use booking_contract::Role;
use leptos::*;
use leptos_meta::*;
use leptos_router::*;

use crate::{
    context::{use_booking, BookingProvider, ToastKind},
    pages,
};

/// Root component mounted by the browser entrypoint.
#[component]
pub fn BookingApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="SalonBook" />
        <Meta name="description" content="Find nearby salons and book appointments." />

        <Router>
            <BookingProvider>
                <Navbar />
                <ToastStack />
                <main class="page">
                    <Routes>
                        <Route path="/" view=pages::LandingPage />
                        <Route path="/salons" view=pages::BrowsePage />
                        <Route path="/salons/:id" view=pages::SalonDetailPage />
                        <Route path="/login" view=pages::LoginPage />
                        <Route path="/register" view=pages::RegisterPage />
                        <Route path="/book/:salon_id/:service_id" view=pages::BookServicePage />
                        <Route path="/my-bookings" view=pages::MyBookingsPage />
                        <Route path="/owner" view=pages::OwnerDashboardPage />
                        <Route path="/owner/bookings" view=pages::OwnerBookingsPage />
                        <Route path="/owner/earnings" view=pages::OwnerEarningsPage />
                        <Route path="/owner/salons/new" view=pages::SalonFormPage />
                        <Route path="/owner/salons/:id/edit" view=pages::SalonFormPage />
                        <Route path="/owner/salons/:id/services" view=pages::SalonServicesPage />
                    </Routes>
                </main>
            </BookingProvider>
        </Router>
    }
}

#[component]
fn Navbar() -> impl IntoView {
    let ctx = use_booking();
    let navigate = use_navigate();
    let logout = move |_| {
        let navigate = navigate.clone();
        spawn_local(async move {
            ctx.session_store().logout().await;
            navigate("/login", Default::default());
        });
    };

    view! {
        <nav class="navbar">
            <A href="/salons" class="brand">"SalonBook"</A>
            <div class="nav-links">
                <A href="/salons">"Browse"</A>
                {move || {
                    ctx.session
                        .with(|s| match s.role() {
                            Some(Role::SalonOwner) => {
                                view! {
                                    <A href="/owner">"Dashboard"</A>
                                    <A href="/owner/bookings">"Bookings"</A>
                                    <A href="/owner/earnings">"Earnings"</A>
                                }
                                    .into_view()
                            }
                            Some(_) => view! { <A href="/my-bookings">"My bookings"</A> }.into_view(),
                            None => ().into_view(),
                        })
                }}
            </div>
            <div class="nav-session">
                {move || {
                    if ctx.session.with(|s| s.is_authenticated()) {
                        let username = ctx
                            .session
                            .with(|s| s.user.as_ref().map(|u| u.username.clone()))
                            .unwrap_or_default();
                        view! {
                            <span class="nav-username">{username}</span>
                            <button class="nav-logout" on:click=logout.clone()>"Log out"</button>
                        }
                            .into_view()
                    } else {
                        view! {
                            <A href="/login">"Log in"</A>
                            <A href="/register">"Register"</A>
                        }
                            .into_view()
                    }
                }}
            </div>
        </nav>
    }
}

#[component]
fn ToastStack() -> impl IntoView {
    let ctx = use_booking();
    view! {
        <div class="toasts">
            <For
                each=move || ctx.toasts.get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                    };
                    view! {
                        <div
                            class=class
                            on:click=move |_| ctx.toasts.update(|list| list.retain(|t| t.id != id))
                        >
                            {toast.message}
                        </div>
                    }
                }
            />
        </div>
    }
}

//! Provider and context wiring for the booking client.
//!
//! [`BookingProvider`] assembles the concrete HTTP adapter and localStorage
//! preference store, wraps them in the two stores, and bridges store
//! publications into reactive signals. Everything below it reads state
//! through [`BookingContext`] and never touches the adapters directly.

use std::rc::Rc;

use booking_contract::Role;
use booking_runtime::{BookingListState, BookingStore, SessionState, SessionStore};
use leptos::*;
use leptos_router::Redirect;
use platform_api::{AuthApi, BookingsApi, HttpApi, PaymentsApi, PrefsStore, SalonsApi, WebPrefsStore};

/// Severity of a transient toast message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    /// An action succeeded.
    Success,
    /// An action failed.
    Error,
}

/// One transient feedback message.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    /// Stable key for list rendering and dismissal.
    pub id: u64,
    /// Severity, drives styling.
    pub kind: ToastKind,
    /// Display text.
    pub message: String,
}

/// Leptos context for reading session/booking state and reaching the stores.
#[derive(Clone, Copy)]
pub struct BookingContext {
    /// Published session state.
    pub session: RwSignal<SessionState>,
    /// Published booking list state.
    pub bookings: RwSignal<BookingListState>,
    /// Live toast messages, newest last.
    pub toasts: RwSignal<Vec<Toast>>,
    /// False until the persisted session restore has completed; guards wait
    /// for it before redirecting.
    pub restored: RwSignal<bool>,
    next_toast_id: StoredValue<u64>,
    session_store: StoredValue<SessionStore>,
    booking_store: StoredValue<BookingStore>,
    api: StoredValue<HttpApi>,
}

impl BookingContext {
    /// Handle on the session store.
    pub fn session_store(&self) -> SessionStore {
        self.session_store.get_value()
    }

    /// Handle on the booking list store.
    pub fn booking_store(&self) -> BookingStore {
        self.booking_store.get_value()
    }

    /// Catalog collaborator (salons and services).
    pub fn salons(&self) -> Rc<dyn SalonsApi> {
        Rc::new(self.api.get_value())
    }

    /// Booking collaborator, for reads outside the store (availability).
    pub fn bookings_api(&self) -> Rc<dyn BookingsApi> {
        Rc::new(self.api.get_value())
    }

    /// Shows a toast for a few seconds.
    pub fn toast(&self, kind: ToastKind, message: impl Into<String>) {
        let id = self.next_toast_id.get_value();
        self.next_toast_id.set_value(id + 1);
        let toast = Toast {
            id,
            kind,
            message: message.into(),
        };
        let toasts = self.toasts;
        toasts.update(|list| list.push(toast));
        set_timeout(
            move || toasts.update(|list| list.retain(|t| t.id != id)),
            std::time::Duration::from_secs(4),
        );
    }
}

fn api_base() -> String {
    #[cfg(target_arch = "wasm32")]
    if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
        return origin;
    }
    String::new()
}

/// Provides [`BookingContext`] to descendant components and restores the
/// persisted session once.
#[component]
pub fn BookingProvider(children: Children) -> impl IntoView {
    let session = create_rw_signal(SessionState::default());
    let bookings = create_rw_signal(BookingListState::default());
    let toasts = create_rw_signal(Vec::<Toast>::new());
    let restored = create_rw_signal(false);

    let prefs: Rc<dyn PrefsStore> = Rc::new(WebPrefsStore);
    let api = HttpApi::new(api_base(), Rc::clone(&prefs));

    let auth: Rc<dyn AuthApi> = Rc::new(api.clone());
    let session_store = SessionStore::new(
        auth,
        prefs,
        Rc::new(move |state: &SessionState| session.set(state.clone())),
    );

    let bookings_api: Rc<dyn BookingsApi> = Rc::new(api.clone());
    let payments_api: Rc<dyn PaymentsApi> = Rc::new(api.clone());
    let booking_store = BookingStore::new(
        bookings_api,
        payments_api,
        Rc::new(move |state: &BookingListState| bookings.set(state.clone())),
    );

    let context = BookingContext {
        session,
        bookings,
        toasts,
        restored,
        next_toast_id: store_value(0),
        session_store: store_value(session_store.clone()),
        booking_store: store_value(booking_store),
        api: store_value(api),
    };
    provide_context(context);

    spawn_local(async move {
        session_store.restore().await;
        restored.set(true);
    });

    children().into_view()
}

/// Returns the current [`BookingContext`].
///
/// # Panics
///
/// Panics if called outside [`BookingProvider`].
pub fn use_booking() -> BookingContext {
    use_context::<BookingContext>().expect("BookingContext not provided")
}

/// Renders its children only for authenticated visitors; everyone else is
/// sent to the login page. Renders nothing while the session restore is
/// still in flight.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let ctx = use_booking();
    let children = store_value(children);
    move || {
        if !ctx.restored.get() {
            ().into_view()
        } else if ctx.session.with(|s| s.is_authenticated()) {
            children.with_value(|children| children()).into_view()
        } else {
            view! { <Redirect path="/login" /> }.into_view()
        }
    }
}

/// Renders its children only for the given role; mismatches land on the
/// browse page.
#[component]
pub fn RequireRole(
    /// Role the visitor must hold.
    role: Role,
    children: ChildrenFn,
) -> impl IntoView {
    let ctx = use_booking();
    let children = store_value(children);
    move || {
        if !ctx.restored.get() {
            ().into_view()
        } else if ctx.session.with(|s| s.role()) == Some(role) {
            children.with_value(|children| children()).into_view()
        } else {
            view! { <Redirect path="/salons" /> }.into_view()
        }
    }
}

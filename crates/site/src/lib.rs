mod app;
mod context;
mod pages;

pub use app::BookingApp;
pub use context::{use_booking, BookingContext, BookingProvider, Toast, ToastKind};

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <BookingApp /> })
}

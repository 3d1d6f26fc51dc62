//! Customer booking list with cancellation.

use booking_runtime::catalog;
use leptos::*;

use super::{cancellable, method_label, payment_status_label, status_label};
use crate::context::{use_booking, RequireAuth, ToastKind};

#[component]
pub fn MyBookingsPage() -> impl IntoView {
    view! {
        <RequireAuth>
            <MyBookingsList />
        </RequireAuth>
    }
}

#[component]
fn MyBookingsList() -> impl IntoView {
    let ctx = use_booking();
    spawn_local(async move {
        // Failures publish into the booking state; the banner below shows them.
        if let Err(err) = ctx.booking_store().fetch_all().await {
            logging::warn!("booking refresh failed: {err}");
        }
    });

    let cancel = move |id: u64| {
        spawn_local(async move {
            match ctx.booking_store().cancel(id).await {
                Ok(_) => ctx.toast(ToastKind::Success, "Booking cancelled"),
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };

    view! {
        <section class="my-bookings">
            <h1>"My bookings"</h1>
            {move || {
                ctx.bookings
                    .with(|state| state.error.clone())
                    .map(|message| view! { <p class="banner banner-error">{message}</p> })
            }}
            {move || {
                let state = ctx.bookings.get();
                // Cancelled bookings stay listed with their badge; only the
                // action is withheld.
                let items = state.items;
                if state.loading && items.is_empty() {
                    return view! { <p class="muted">"Loading bookings..."</p> }.into_view();
                }
                if items.is_empty() {
                    return view! { <p class="muted">"You have no bookings yet."</p> }
                        .into_view();
                }
                items
                    .into_iter()
                    .map(|booking| {
                        let id = booking.id;
                        let cancellable = cancellable(booking.status);
                        view! {
                            <article class="booking-card">
                                <h2>{booking.salon.name.clone()}</h2>
                                <p>{booking.service.name.clone()}</p>
                                <p>
                                    {catalog::format_day(&booking.start_time)}
                                    " · "
                                    {catalog::format_time_range(
                                        &booking.start_time,
                                        booking.end_time.as_deref(),
                                    )}
                                </p>
                                <span class="badge">{status_label(booking.status)}</span>
                                {booking
                                    .payment
                                    .as_ref()
                                    .map(|payment| {
                                        view! {
                                            <p class="payment-line">
                                                {method_label(payment.method)}
                                                " · "
                                                {payment_status_label(payment.status)}
                                            </p>
                                        }
                                    })}
                                {cancellable
                                    .then(|| {
                                        view! {
                                            <button
                                                class="button button-danger"
                                                on:click=move |_| cancel(id)
                                            >
                                                "Cancel"
                                            </button>
                                        }
                                    })}
                            </article>
                        }
                    })
                    .collect_view()
                    .into_view()
            }}
        </section>
    }
}

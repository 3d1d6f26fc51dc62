//! Booking form: pick a date, pick an available slot, confirm with a
//! payment method.

use booking_contract::{AvailabilityQuery, CreateBookingRequest, PaymentMethod, Slot};
use booking_runtime::{catalog, mark_slot_unavailable};
use chrono::Local;
use leptos::*;
use leptos_router::{use_navigate, use_params_map};

use super::param_u64;
use crate::context::{use_booking, RequireAuth, ToastKind};

#[component]
pub fn BookServicePage() -> impl IntoView {
    view! {
        <RequireAuth>
            <BookServiceForm />
        </RequireAuth>
    }
}

#[component]
fn BookServiceForm() -> impl IntoView {
    let ctx = use_booking();
    let params = use_params_map();
    let salon_id = params.with_untracked(|map| param_u64(map, "salon_id"));
    let service_id = params.with_untracked(|map| param_u64(map, "service_id"));

    let date = create_rw_signal(Local::now().date_naive().to_string());
    let slots = create_rw_signal(Vec::<Slot>::new());
    let slots_loading = create_rw_signal(false);
    let chosen = create_rw_signal(None::<Slot>);
    let method = create_rw_signal(PaymentMethod::Cod);
    let navigate = use_navigate();

    let service = create_local_resource(
        || (),
        move |_| async move {
            let api = ctx.salons();
            api.get_service(service_id).await
        },
    );

    let load_slots = move |date: String| {
        slots_loading.set(true);
        spawn_local(async move {
            let api = ctx.bookings_api();
            match api
                .availability(AvailabilityQuery {
                    salon_id,
                    service_id,
                    date,
                })
                .await
            {
                Ok(list) => slots.set(list),
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
            slots_loading.set(false);
        });
    };
    create_effect(move |_| load_slots(date.get()));

    let confirm = move |_| {
        let Some(slot) = chosen.get_untracked() else {
            return;
        };
        let navigate = navigate.clone();
        spawn_local(async move {
            let store = ctx.booking_store();
            let payload = CreateBookingRequest {
                salon_id,
                service_id,
                start_time: slot.start.clone(),
            };
            match store.book_with_payment(payload, method.get_untracked()).await {
                Ok(_) => {
                    slots.update(|list| mark_slot_unavailable(list, &slot.start));
                    chosen.set(None);
                    ctx.toast(ToastKind::Success, "Booking placed");
                    navigate("/my-bookings", Default::default());
                }
                Err(err) => {
                    chosen.set(None);
                    ctx.toast(ToastKind::Error, err.message);
                }
            }
        });
    };

    view! {
        <section class="booking-form">
            <header>
                {move || {
                    match service.get() {
                        Some(Ok(service)) => {
                            view! { <h1>{format!("Book: {}", service.name)}</h1> }.into_view()
                        }
                        Some(Err(err)) => {
                            view! { <p class="banner banner-error">{err.message}</p> }.into_view()
                        }
                        None => view! { <h1>"Book"</h1> }.into_view(),
                    }
                }}
            </header>

            <label class="field">
                <span>"Date"</span>
                <input
                    type="date"
                    prop:value=move || date.get()
                    on:input=move |ev| date.set(event_target_value(&ev))
                />
            </label>

            <div class="slot-grid">
                {move || {
                    if slots_loading.get() {
                        return view! { <p class="muted">"Loading slots..."</p> }.into_view();
                    }
                    let list = slots.get();
                    if list.is_empty() {
                        return view! { <p class="muted">"No slots for this date."</p> }
                            .into_view();
                    }
                    list.into_iter()
                        .map(|slot| {
                            let label = catalog::format_time_range(&slot.start, Some(&slot.end));
                            let available = slot.available;
                            view! {
                                <button
                                    class=if available { "slot" } else { "slot slot-taken" }
                                    disabled=!available
                                    on:click=move |_| chosen.set(Some(slot.clone()))
                                >
                                    {label}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>

            {move || {
                chosen
                    .get()
                    .map(|slot| {
                        let when = format!(
                            "{} {}",
                            catalog::format_day(&slot.start),
                            catalog::format_time_range(&slot.start, Some(&slot.end)),
                        );
                        view! {
                            <div class="modal-backdrop">
                                <div class="modal">
                                    <h2>"Confirm booking"</h2>
                                    <p>{when}</p>
                                    <label class="field">
                                        <span>"Payment method"</span>
                                        <select on:change=move |ev| {
                                            method
                                                .set(
                                                    if event_target_value(&ev) == "card" {
                                                        PaymentMethod::Card
                                                    } else {
                                                        PaymentMethod::Cod
                                                    },
                                                )
                                        }>
                                            <option value="cod" selected=move || method.get() == PaymentMethod::Cod>
                                                "Cash on delivery"
                                            </option>
                                            <option value="card" selected=move || method.get() == PaymentMethod::Card>
                                                "Card (coming soon)"
                                            </option>
                                        </select>
                                    </label>
                                    <div class="modal-actions">
                                        <button class="button" on:click=confirm.clone()>"Confirm"</button>
                                        <button on:click=move |_| chosen.set(None)>"Back"</button>
                                    </div>
                                </div>
                            </div>
                        }
                    })
            }}
        </section>
    }
}

//! Owner views: dashboard, booking management, earnings, and salon/service
//! editing. All routes here require the salon-owner role.

use booking_contract::{
    BookingStatus, PaymentMethod, PaymentStatus, Role, Salon, SalonDraft, ServiceDraft,
};
use booking_runtime::catalog::{
    self, booking_counts, bookings_for_salons, earnings_summary, filter_owner_bookings,
    owner_salons, OwnerBookingFilter, SortOrder,
};
use leptos::*;
use leptos_router::{use_navigate, use_params_map, A};

use super::{format_currency, method_label, param_u64, payment_status_label, status_label};
use crate::context::{use_booking, RequireAuth, RequireRole, ToastKind};

/// Wraps owner content in the auth and role guards.
#[component]
fn OwnerGate(children: ChildrenFn) -> impl IntoView {
    let children = store_value(children);
    view! {
        <RequireAuth>
            <RequireRole role=Role::SalonOwner>
                {children.with_value(|children| children())}
            </RequireRole>
        </RequireAuth>
    }
}

fn my_salons_resource() -> Resource<(), Result<Vec<Salon>, platform_api::ApiError>> {
    let ctx = use_booking();
    create_local_resource(
        || (),
        move |_| async move {
            let api = ctx.salons();
            let all = api.list().await?;
            let owner_id = ctx.session.with_untracked(|s| s.user.as_ref().map(|u| u.id));
            Ok(owner_salons(&all, owner_id.unwrap_or(0)))
        },
    )
}

#[component]
pub fn OwnerDashboardPage() -> impl IntoView {
    view! {
        <OwnerGate>
            <OwnerDashboard />
        </OwnerGate>
    }
}

#[component]
fn OwnerDashboard() -> impl IntoView {
    let ctx = use_booking();
    let salons = my_salons_resource();
    spawn_local(async move {
        if let Err(err) = ctx.booking_store().fetch_all().await {
            logging::warn!("booking refresh failed: {err}");
        }
    });

    let scoped = move || {
        let mine = salons.get().and_then(|r| r.ok()).unwrap_or_default();
        ctx.bookings.with(|state| bookings_for_salons(&state.items, &mine))
    };

    view! {
        <section class="owner-dashboard">
            <h1>"Dashboard"</h1>
            {move || {
                let bookings = scoped();
                let counts = booking_counts(&bookings);
                let earnings = earnings_summary(&bookings);
                view! {
                    <div class="stat-grid">
                        <div class="stat-card">
                            <span class="stat-label">"Pending"</span>
                            <span class="stat-value">{counts.pending}</span>
                        </div>
                        <div class="stat-card">
                            <span class="stat-label">"Confirmed"</span>
                            <span class="stat-value">{counts.confirmed}</span>
                        </div>
                        <div class="stat-card">
                            <span class="stat-label">"Cancelled"</span>
                            <span class="stat-value">{counts.cancelled}</span>
                        </div>
                        <div class="stat-card">
                            <span class="stat-label">"Total earnings"</span>
                            <span class="stat-value">{format_currency(earnings.total)}</span>
                        </div>
                    </div>
                }
            }}

            <header class="section-header">
                <h2>"My salons"</h2>
                <A class="button" href="/owner/salons/new">"New salon"</A>
            </header>
            {move || {
                match salons.get() {
                    None => view! { <p class="muted">"Loading salons..."</p> }.into_view(),
                    Some(Err(err)) => {
                        view! { <p class="banner banner-error">{err.message}</p> }.into_view()
                    }
                    Some(Ok(mine)) if mine.is_empty() => {
                        view! { <p class="muted">"You have no salons yet."</p> }.into_view()
                    }
                    Some(Ok(mine)) => {
                        mine.into_iter()
                            .map(|salon| {
                                view! {
                                    <article class="salon-row">
                                        <span>{salon.name.clone()}</span>
                                        <span class="salon-address">{salon.address.clone()}</span>
                                        <A href=format!("/owner/salons/{}/edit", salon.id)>
                                            "Edit"
                                        </A>
                                        <A href=format!("/owner/salons/{}/services", salon.id)>
                                            "Services"
                                        </A>
                                    </article>
                                }
                            })
                            .collect_view()
                    }
                }
            }}
        </section>
    }
}

#[component]
pub fn OwnerBookingsPage() -> impl IntoView {
    view! {
        <OwnerGate>
            <OwnerBookings />
        </OwnerGate>
    }
}

fn parse_status(value: &str) -> Option<BookingStatus> {
    match value {
        "pending" => Some(BookingStatus::Pending),
        "confirmed" => Some(BookingStatus::Confirmed),
        "cancelled" => Some(BookingStatus::Cancelled),
        "completed" => Some(BookingStatus::Completed),
        _ => None,
    }
}

fn parse_payment_status(value: &str) -> Option<PaymentStatus> {
    match value {
        "pending" => Some(PaymentStatus::Pending),
        "completed" => Some(PaymentStatus::Completed),
        "failed" => Some(PaymentStatus::Failed),
        _ => None,
    }
}

#[component]
fn OwnerBookings() -> impl IntoView {
    let ctx = use_booking();
    let salons = my_salons_resource();
    spawn_local(async move {
        if let Err(err) = ctx.booking_store().fetch_all().await {
            logging::warn!("booking refresh failed: {err}");
        }
    });

    let search = create_rw_signal(String::new());
    let status = create_rw_signal(String::from("all"));
    let payment = create_rw_signal(String::from("all"));
    let salon = create_rw_signal(String::from("all"));
    let sort = create_rw_signal(String::from("newest"));

    let filtered = move || {
        let mine = salons.get().and_then(|r| r.ok()).unwrap_or_default();
        let scoped = ctx.bookings.with(|state| bookings_for_salons(&state.items, &mine));
        let filter = OwnerBookingFilter {
            search: search.get(),
            status: status.with(|v| parse_status(v)),
            payment: payment.with(|v| parse_payment_status(v)),
            salon: salon.with(|v| v.parse().ok()),
            sort: if sort.with(|v| v == "oldest") {
                SortOrder::OldestFirst
            } else {
                SortOrder::NewestFirst
            },
        };
        filter_owner_bookings(&scoped, &filter)
    };

    let confirm = move |id: u64| {
        spawn_local(async move {
            match ctx.booking_store().confirm(id).await {
                Ok(_) => ctx.toast(ToastKind::Success, "Booking confirmed"),
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };
    let cancel = move |id: u64| {
        spawn_local(async move {
            match ctx.booking_store().cancel(id).await {
                Ok(_) => ctx.toast(ToastKind::Success, "Booking cancelled"),
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };
    let mark_paid = move |payment_id: u64| {
        spawn_local(async move {
            match ctx.booking_store().mark_payment_received(payment_id).await {
                Ok(_) => ctx.toast(ToastKind::Success, "Payment completed"),
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };

    let clear = move |_| {
        search.set(String::new());
        status.set("all".to_string());
        payment.set("all".to_string());
        salon.set("all".to_string());
        sort.set("newest".to_string());
    };

    view! {
        <section class="owner-bookings">
            <h1>"Bookings"</h1>

            <div class="filter-bar">
                <input
                    type="search"
                    placeholder="Search id, customer, service, salon"
                    prop:value=move || search.get()
                    on:input=move |ev| search.set(event_target_value(&ev))
                />
                <select on:change=move |ev| status.set(event_target_value(&ev))>
                    <option value="all">"All statuses"</option>
                    <option value="pending">"Pending"</option>
                    <option value="confirmed">"Confirmed"</option>
                    <option value="cancelled">"Cancelled"</option>
                    <option value="completed">"Completed"</option>
                </select>
                <select on:change=move |ev| payment.set(event_target_value(&ev))>
                    <option value="all">"All payments"</option>
                    <option value="pending">"Payment pending"</option>
                    <option value="completed">"Paid"</option>
                    <option value="failed">"Payment failed"</option>
                </select>
                <select on:change=move |ev| salon.set(event_target_value(&ev))>
                    <option value="all">"All salons"</option>
                    {move || {
                        salons
                            .get()
                            .and_then(|r| r.ok())
                            .unwrap_or_default()
                            .into_iter()
                            .map(|s| {
                                view! { <option value=s.id.to_string()>{s.name.clone()}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <select on:change=move |ev| sort.set(event_target_value(&ev))>
                    <option value="newest">"Newest first"</option>
                    <option value="oldest">"Oldest first"</option>
                </select>
                <button on:click=clear>"Clear"</button>
            </div>

            {move || {
                ctx.bookings
                    .with(|state| state.error.clone())
                    .map(|message| view! { <p class="banner banner-error">{message}</p> })
            }}

            {move || {
                let rows = filtered();
                if rows.is_empty() {
                    return view! { <p class="muted">"No bookings match the filters."</p> }
                        .into_view();
                }
                rows.into_iter()
                    .map(|booking| {
                        let id = booking.id;
                        let customer = booking
                            .customer
                            .as_ref()
                            .map(|c| c.username.clone())
                            .unwrap_or_else(|| "unknown".to_string());
                        let confirmable = booking.status == BookingStatus::Pending;
                        let cancellable = matches!(
                            booking.status,
                            BookingStatus::Pending | BookingStatus::Confirmed
                        );
                        let payable = booking
                            .payment
                            .as_ref()
                            .filter(|p| {
                                p.status == PaymentStatus::Pending
                                    && p.method == PaymentMethod::Cod
                            })
                            .map(|p| p.id);
                        view! {
                            <article class="booking-row">
                                <span class="booking-id">{format!("#{id}")}</span>
                                <span>{customer}</span>
                                <span>{booking.service.name.clone()}</span>
                                <span>{booking.salon.name.clone()}</span>
                                <span>
                                    {catalog::format_day(&booking.start_time)}
                                    " "
                                    {catalog::format_time_range(
                                        &booking.start_time,
                                        booking.end_time.as_deref(),
                                    )}
                                </span>
                                <span class="badge">{status_label(booking.status)}</span>
                                {booking
                                    .payment
                                    .as_ref()
                                    .map(|payment| {
                                        view! {
                                            <span class="payment-line">
                                                {format_currency(payment.amount)}
                                                " · "
                                                {method_label(payment.method)}
                                                " · "
                                                {payment_status_label(payment.status)}
                                            </span>
                                        }
                                    })}
                                <span class="row-actions">
                                    {confirmable
                                        .then(|| {
                                            view! {
                                                <button
                                                    class="button"
                                                    on:click=move |_| confirm(id)
                                                >
                                                    "Confirm"
                                                </button>
                                            }
                                        })}
                                    {payable
                                        .map(|payment_id| {
                                            view! {
                                                <button on:click=move |_| mark_paid(payment_id)>
                                                    "Mark paid"
                                                </button>
                                            }
                                        })}
                                    {cancellable
                                        .then(|| {
                                            view! {
                                                <button
                                                    class="button-danger"
                                                    on:click=move |_| cancel(id)
                                                >
                                                    "Cancel"
                                                </button>
                                            }
                                        })}
                                </span>
                            </article>
                        }
                    })
                    .collect_view()
                    .into_view()
            }}
        </section>
    }
}

#[component]
pub fn OwnerEarningsPage() -> impl IntoView {
    view! {
        <OwnerGate>
            <OwnerEarnings />
        </OwnerGate>
    }
}

#[component]
fn OwnerEarnings() -> impl IntoView {
    let ctx = use_booking();
    let salons = my_salons_resource();
    spawn_local(async move {
        if let Err(err) = ctx.booking_store().fetch_all().await {
            logging::warn!("booking refresh failed: {err}");
        }
    });

    view! {
        <section class="owner-earnings">
            <h1>"Earnings"</h1>
            {move || {
                let mine = salons.get().and_then(|r| r.ok()).unwrap_or_default();
                let scoped = ctx
                    .bookings
                    .with(|state| bookings_for_salons(&state.items, &mine));
                let earnings = earnings_summary(&scoped);
                view! {
                    <div class="stat-grid">
                        <div class="stat-card">
                            <span class="stat-label">"Total"</span>
                            <span class="stat-value">{format_currency(earnings.total)}</span>
                        </div>
                        <div class="stat-card">
                            <span class="stat-label">"Pending"</span>
                            <span class="stat-value">{format_currency(earnings.pending)}</span>
                        </div>
                        <div class="stat-card">
                            <span class="stat-label">"Cleared"</span>
                            <span class="stat-value">{format_currency(earnings.cleared)}</span>
                        </div>
                    </div>
                }
            }}
        </section>
    }
}

#[component]
pub fn SalonFormPage() -> impl IntoView {
    view! {
        <OwnerGate>
            <SalonForm />
        </OwnerGate>
    }
}

#[component]
fn SalonForm() -> impl IntoView {
    let ctx = use_booking();
    let params = use_params_map();
    // Absent on the /owner/salons/new route.
    let editing = params.with_untracked(|map| {
        map.get("id").and_then(|raw| raw.parse::<u64>().ok())
    });

    let name = create_rw_signal(String::new());
    let address = create_rw_signal(String::new());
    let lat = create_rw_signal(String::new());
    let lng = create_rw_signal(String::new());
    let open_time = create_rw_signal(String::new());
    let close_time = create_rw_signal(String::new());
    let navigate = use_navigate();

    if let Some(id) = editing {
        spawn_local(async move {
            let api = ctx.salons();
            match api.get(id).await {
                Ok(salon) => {
                    name.set(salon.name);
                    address.set(salon.address);
                    lat.set(salon.lat.map(|v| v.to_string()).unwrap_or_default());
                    lng.set(salon.lng.map(|v| v.to_string()).unwrap_or_default());
                    open_time.set(salon.open_time.unwrap_or_default());
                    close_time.set(salon.close_time.unwrap_or_default());
                }
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    }

    let optional = |value: String| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let navigate = navigate.clone();
        let draft = SalonDraft {
            name: name.get_untracked(),
            address: address.get_untracked(),
            lat: lat.get_untracked().trim().parse().ok(),
            lng: lng.get_untracked().trim().parse().ok(),
            open_time: optional(open_time.get_untracked()),
            close_time: optional(close_time.get_untracked()),
        };
        spawn_local(async move {
            let api = ctx.salons();
            let result = match editing {
                Some(id) => api.update_salon(id, draft).await,
                None => api.create_salon(draft).await,
            };
            match result {
                Ok(_) => {
                    ctx.toast(ToastKind::Success, "Salon saved");
                    navigate("/owner", Default::default());
                }
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };

    view! {
        <section class="salon-form">
            <h1>{if editing.is_some() { "Edit salon" } else { "New salon" }}</h1>
            <form on:submit=submit>
                <label class="field">
                    <span>"Name"</span>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Address"</span>
                    <input
                        type="text"
                        prop:value=move || address.get()
                        on:input=move |ev| address.set(event_target_value(&ev))
                    />
                </label>
                <div class="field-pair">
                    <label class="field">
                        <span>"Latitude"</span>
                        <input
                            type="text"
                            prop:value=move || lat.get()
                            on:input=move |ev| lat.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Longitude"</span>
                        <input
                            type="text"
                            prop:value=move || lng.get()
                            on:input=move |ev| lng.set(event_target_value(&ev))
                        />
                    </label>
                </div>
                <div class="field-pair">
                    <label class="field">
                        <span>"Opens"</span>
                        <input
                            type="time"
                            prop:value=move || open_time.get()
                            on:input=move |ev| open_time.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Closes"</span>
                        <input
                            type="time"
                            prop:value=move || close_time.get()
                            on:input=move |ev| close_time.set(event_target_value(&ev))
                        />
                    </label>
                </div>
                <button class="button" type="submit">"Save"</button>
            </form>
        </section>
    }
}

#[component]
pub fn SalonServicesPage() -> impl IntoView {
    view! {
        <OwnerGate>
            <SalonServices />
        </OwnerGate>
    }
}

#[component]
fn SalonServices() -> impl IntoView {
    let ctx = use_booking();
    let params = use_params_map();
    let salon_id = params.with_untracked(|map| param_u64(map, "id"));

    // Bumped after every mutation to refetch the list.
    let version = create_rw_signal(0u32);
    let services = create_local_resource(
        move || version.get(),
        move |_| async move {
            let api = ctx.salons();
            api.services_for_salon(salon_id).await
        },
    );

    let editing = create_rw_signal(None::<u64>);
    let name = create_rw_signal(String::new());
    let description = create_rw_signal(String::new());
    let duration = create_rw_signal(String::from("30"));
    let price = create_rw_signal(String::new());
    let home_service = create_rw_signal(false);

    let reset_form = move || {
        editing.set(None);
        name.set(String::new());
        description.set(String::new());
        duration.set("30".to_string());
        price.set(String::new());
        home_service.set(false);
    };

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let draft = ServiceDraft {
            name: name.get_untracked(),
            description: description.get_untracked(),
            duration_minutes: duration.get_untracked().trim().parse().unwrap_or(30),
            price: price.get_untracked().trim().parse().unwrap_or(0.0),
            is_home_service: home_service.get_untracked(),
        };
        spawn_local(async move {
            let api = ctx.salons();
            let result = match editing.get_untracked() {
                Some(id) => api.update_service(id, draft).await,
                None => api.create_service(salon_id, draft).await,
            };
            match result {
                Ok(_) => {
                    ctx.toast(ToastKind::Success, "Service saved");
                    reset_form();
                    version.update(|v| *v += 1);
                }
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };

    let remove = move |id: u64| {
        spawn_local(async move {
            let api = ctx.salons();
            match api.delete_service(id).await {
                Ok(()) => {
                    ctx.toast(ToastKind::Success, "Service removed");
                    version.update(|v| *v += 1);
                }
                Err(err) => ctx.toast(ToastKind::Error, err.message),
            }
        });
    };

    view! {
        <section class="salon-services">
            <h1>"Services"</h1>

            {move || {
                match services.get() {
                    None => view! { <p class="muted">"Loading services..."</p> }.into_view(),
                    Some(Err(err)) => {
                        view! { <p class="banner banner-error">{err.message}</p> }.into_view()
                    }
                    Some(Ok(list)) if list.is_empty() => {
                        view! { <p class="muted">"No services yet."</p> }.into_view()
                    }
                    Some(Ok(list)) => {
                        list.into_iter()
                            .map(|service| {
                                let id = service.id;
                                let fill = {
                                    let service = service.clone();
                                    move |_| {
                                        editing.set(Some(service.id));
                                        name.set(service.name.clone());
                                        description.set(service.description.clone());
                                        duration.set(service.duration_minutes.to_string());
                                        price.set(service.price.to_string());
                                        home_service.set(service.is_home_service);
                                    }
                                };
                                view! {
                                    <article class="service-row">
                                        <span>{service.name.clone()}</span>
                                        <span>
                                            {format!("{} min", service.duration_minutes)}
                                            " · "
                                            {format_currency(service.price)}
                                        </span>
                                        <button on:click=fill>"Edit"</button>
                                        <button
                                            class="button-danger"
                                            on:click=move |_| remove(id)
                                        >
                                            "Delete"
                                        </button>
                                    </article>
                                }
                            })
                            .collect_view()
                    }
                }
            }}

            <h2>
                {move || {
                    if editing.get().is_some() { "Edit service" } else { "Add a service" }
                }}
            </h2>
            <form on:submit=submit>
                <label class="field">
                    <span>"Name"</span>
                    <input
                        type="text"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
                </label>
                <label class="field">
                    <span>"Description"</span>
                    <input
                        type="text"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    />
                </label>
                <div class="field-pair">
                    <label class="field">
                        <span>"Duration (minutes)"</span>
                        <input
                            type="number"
                            prop:value=move || duration.get()
                            on:input=move |ev| duration.set(event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Price"</span>
                        <input
                            type="number"
                            step="0.01"
                            prop:value=move || price.get()
                            on:input=move |ev| price.set(event_target_value(&ev))
                        />
                    </label>
                </div>
                <label class="field field-checkbox">
                    <input
                        type="checkbox"
                        prop:checked=move || home_service.get()
                        on:change=move |ev| home_service.set(event_target_checked(&ev))
                    />
                    <span>"Offered at the customer's home"</span>
                </label>
                <div class="form-actions">
                    <button class="button" type="submit">"Save"</button>
                    {move || {
                        editing
                            .get()
                            .is_some()
                            .then(|| {
                                view! {
                                    <button type="button" on:click=move |_| reset_form()>
                                        "Cancel edit"
                                    </button>
                                }
                            })
                    }}
                </div>
            </form>
        </section>
    }
}

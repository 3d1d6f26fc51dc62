//! Browse page: salon list with search, optional distance sort, and
//! operating-hours badges.

use booking_runtime::catalog;
use chrono::Local;
use leptos::*;
use leptos_router::A;

use crate::context::use_booking;

#[component]
pub fn BrowsePage() -> impl IntoView {
    let ctx = use_booking();
    let search = create_rw_signal(String::new());
    let location = create_rw_signal(None::<(f64, f64)>);
    let geo_error = create_rw_signal(None::<String>);

    let salons = create_local_resource(
        || (),
        move |_| async move {
            let api = ctx.salons();
            api.list().await
        },
    );

    let visible = move || {
        let mut list = match salons.get() {
            Some(Ok(list)) => list,
            _ => Vec::new(),
        };
        search.with(|query| list.retain(|salon| catalog::matches_search(salon, query)));
        if let Some((lat, lng)) = location.get() {
            catalog::sort_salons_by_distance(&mut list, lat, lng);
        }
        list
    };

    view! {
        <section class="browse">
            <header class="browse-header">
                <h1>"Find a salon"</h1>
                <div class="browse-controls">
                    <input
                        type="search"
                        placeholder="Search by name or address"
                        prop:value=move || search.get()
                        on:input=move |ev| search.set(event_target_value(&ev))
                    />
                    <button on:click=move |_| detect_location(location, geo_error)>
                        "Sort by distance"
                    </button>
                </div>
                {move || geo_error.get().map(|message| view! { <p class="banner banner-error">{message}</p> })}
            </header>

            {move || {
                match salons.get() {
                    None => view! { <p class="muted">"Loading salons..."</p> }.into_view(),
                    Some(Err(err)) => {
                        view! { <p class="banner banner-error">{err.message}</p> }.into_view()
                    }
                    Some(Ok(_)) => {
                        let list = visible();
                        if list.is_empty() {
                            view! { <p class="muted">"No salons match your search."</p> }
                                .into_view()
                        } else {
                            list.into_iter()
                                .map(|salon| {
                                    let now = Local::now().naive_local();
                                    let open = catalog::is_open_now(
                                        salon.open_time.as_deref(),
                                        salon.close_time.as_deref(),
                                        now,
                                    );
                                    let badge = catalog::open_badge(
                                        salon.open_time.as_deref(),
                                        salon.close_time.as_deref(),
                                        now,
                                    );
                                    let distance = location
                                        .get()
                                        .and_then(|(lat, lng)| {
                                            catalog::salon_distance_km(&salon, lat, lng)
                                        })
                                        .map(|km| format!("{km:.1} km away"));
                                    view! {
                                        <article class="salon-card">
                                            <h2>
                                                <A href=format!("/salons/{}", salon.id)>
                                                    {salon.name.clone()}
                                                </A>
                                            </h2>
                                            <p class="salon-address">{salon.address.clone()}</p>
                                            {distance.map(|text| view! { <p class="salon-distance">{text}</p> })}
                                            {badge
                                                .map(|text| {
                                                    view! {
                                                        <span class=if open {
                                                            "badge badge-open"
                                                        } else {
                                                            "badge badge-closed"
                                                        }>{text}</span>
                                                    }
                                                })}
                                        </article>
                                    }
                                })
                                .collect_view()
                        }
                    }
                }
            }}
        </section>
    }
}

#[cfg(target_arch = "wasm32")]
fn detect_location(location: RwSignal<Option<(f64, f64)>>, error: RwSignal<Option<String>>) {
    use wasm_bindgen::{closure::Closure, JsCast};

    error.set(None);
    let geolocation = web_sys::window().and_then(|w| w.navigator().geolocation().ok());
    let Some(geolocation) = geolocation else {
        error.set(Some("Geolocation is not supported by your browser.".to_string()));
        return;
    };

    let on_ok = Closure::<dyn FnMut(web_sys::GeolocationPosition)>::new(
        move |pos: web_sys::GeolocationPosition| {
            let coords = pos.coords();
            location.set(Some((coords.latitude(), coords.longitude())));
        },
    );
    let on_err = Closure::<dyn FnMut(web_sys::GeolocationPositionError)>::new(
        move |_err: web_sys::GeolocationPositionError| {
            error.set(Some("Could not get your location.".to_string()));
        },
    );

    if geolocation
        .get_current_position_with_error_callback(
            on_ok.as_ref().unchecked_ref(),
            Some(on_err.as_ref().unchecked_ref()),
        )
        .is_err()
    {
        error.set(Some("Could not get your location.".to_string()));
    }

    // The browser invokes these callbacks after this frame returns.
    on_ok.forget();
    on_err.forget();
}

#[cfg(not(target_arch = "wasm32"))]
fn detect_location(_location: RwSignal<Option<(f64, f64)>>, error: RwSignal<Option<String>>) {
    error.set(Some("Geolocation is not supported by your browser.".to_string()));
}

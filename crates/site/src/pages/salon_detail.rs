//! Salon detail page: one salon and its bookable services.

use booking_contract::{Salon, Service};
use leptos::*;
use leptos_router::{use_params_map, A};
use platform_api::ApiError;

use super::{format_currency, param_u64};
use crate::context::use_booking;

#[component]
pub fn SalonDetailPage() -> impl IntoView {
    let ctx = use_booking();
    let params = use_params_map();
    let salon_id = move || params.with(|map| param_u64(map, "id"));

    let detail = create_local_resource(salon_id, move |id| async move {
        let api = ctx.salons();
        let salon = api.get(id).await?;
        let services = api.services_for_salon(id).await?;
        Ok::<(Salon, Vec<Service>), ApiError>((salon, services))
    });

    view! {
        <section class="salon-detail">
            {move || {
                match detail.get() {
                    None => view! { <p class="muted">"Loading..."</p> }.into_view(),
                    Some(Err(err)) => {
                        view! { <p class="banner banner-error">{err.message}</p> }.into_view()
                    }
                    Some(Ok((salon, services))) => {
                        view! {
                            <header>
                                <h1>{salon.name.clone()}</h1>
                                <p class="salon-address">{salon.address.clone()}</p>
                            </header>
                            <h2>"Services"</h2>
                            {if services.is_empty() {
                                view! { <p class="muted">"This salon has not listed any services yet."</p> }
                                    .into_view()
                            } else {
                                services
                                    .into_iter()
                                    .map(|service| {
                                        view! {
                                            <article class="service-card">
                                                <h3>{service.name.clone()}</h3>
                                                <p class="service-description">
                                                    {service.description.clone()}
                                                </p>
                                                <p class="service-meta">
                                                    {format!("{} min", service.duration_minutes)}
                                                    " · "
                                                    {format_currency(service.price)}
                                                    {service
                                                        .is_home_service
                                                        .then_some(" · Home service available")}
                                                </p>
                                                <A
                                                    class="button"
                                                    href=format!("/book/{}/{}", salon.id, service.id)
                                                >
                                                    "Book"
                                                </A>
                                            </article>
                                        }
                                    })
                                    .collect_view()
                            }}
                        }
                            .into_view()
                    }
                }
            }}
        </section>
    }
}

//! Landing page shown at `/`. Static hero and feature copy; the salon list
//! itself lives at `/salons`.

use leptos::*;
use leptos_router::A;

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <div class="landing">
            <section class="landing-hero">
                <h1>"Discover and book salons near you"</h1>
                <p>
                    "From trending hairstyles to quick grooming services, book \
                     appointments instantly at the best salons in your city."
                </p>
                <A href="/salons" class="button button-primary">"Browse salons"</A>
            </section>

            <section class="landing-features">
                <article>
                    <h3>"Nearby discovery"</h3>
                    <p>"Instantly find salons closest to your current location."</p>
                </article>
                <article>
                    <h3>"Effortless booking"</h3>
                    <p>"Reserve your time slot in a few clicks, no calls needed."</p>
                </article>
                <article>
                    <h3>"Live salon status"</h3>
                    <p>"Check which salons are open right now and plan ahead."</p>
                </article>
            </section>

            <section class="landing-cta">
                <h2>"Ready for your next look?"</h2>
                <A href="/register" class="button">"Create an account"</A>
            </section>
        </div>
    }
}

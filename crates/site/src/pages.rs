//! Route views. Pages read state through [`crate::context::BookingContext`]
//! and keep only short-lived UI state (form fields, filter selections,
//! fetched catalog data) in local signals.

mod auth;
mod book;
mod browse;
mod home;
mod my_bookings;
mod owner;
mod salon_detail;

pub use auth::{LoginPage, RegisterPage};
pub use book::BookServicePage;
pub use browse::BrowsePage;
pub use home::LandingPage;
pub use my_bookings::MyBookingsPage;
pub use owner::{
    OwnerBookingsPage, OwnerDashboardPage, OwnerEarningsPage, SalonFormPage, SalonServicesPage,
};
pub use salon_detail::SalonDetailPage;

use booking_contract::{BookingStatus, PaymentMethod, PaymentStatus};
use leptos_router::ParamsMap;

/// Reads a route parameter as an id; absent or malformed values become 0,
/// which no server record uses.
fn param_u64(params: &ParamsMap, key: &str) -> u64 {
    params
        .get(key)
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(0)
}

/// Whether a booking still accepts the customer cancel action. Cancelled and
/// completed bookings remain listed but offer no action.
fn cancellable(status: BookingStatus) -> bool {
    matches!(status, BookingStatus::Pending | BookingStatus::Confirmed)
}

fn status_label(status: BookingStatus) -> &'static str {
    match status {
        BookingStatus::Pending => "Pending",
        BookingStatus::Confirmed => "Confirmed",
        BookingStatus::Cancelled => "Cancelled",
        BookingStatus::Completed => "Completed",
    }
}

fn payment_status_label(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "Payment pending",
        PaymentStatus::Completed => "Paid",
        PaymentStatus::Failed => "Payment failed",
    }
}

fn method_label(method: PaymentMethod) -> &'static str {
    match method {
        PaymentMethod::Cod => "Cash on delivery",
        PaymentMethod::Card => "Card",
    }
}

fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_bookings_offer_no_cancel_action() {
        assert!(cancellable(BookingStatus::Pending));
        assert!(cancellable(BookingStatus::Confirmed));
        assert!(!cancellable(BookingStatus::Cancelled));
        assert!(!cancellable(BookingStatus::Completed));
    }

    #[test]
    fn param_u64_rejects_malformed_ids() {
        let mut params = ParamsMap::new();
        params.insert("id".to_string(), "17".to_string());
        assert_eq!(param_u64(&params, "id"), 17);
        params.insert("id".to_string(), "seventeen".to_string());
        assert_eq!(param_u64(&params, "id"), 0);
        assert_eq!(param_u64(&params, "missing"), 0);
    }
}

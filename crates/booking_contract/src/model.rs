//! Serde models for the backend's JSON wire shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Account role claim issued by the backend. The client trusts it for view
/// gating only; authorization is enforced server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Books services.
    #[serde(rename = "customer")]
    Customer,
    /// Manages salons, services, bookings, and earnings.
    #[serde(rename = "salon_owner")]
    SalonOwner,
    /// Backend administrator; no dedicated client views.
    #[serde(rename = "superadmin")]
    SuperAdmin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Customer
    }
}

/// Authenticated user record returned by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Server-assigned user id.
    pub id: u64,
    /// Login name, also shown in owner booking lists.
    pub username: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Role claim used for view gating.
    #[serde(default)]
    pub role: Role,
    /// Optional contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Access/refresh credential pair issued by the auth endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Bearer credential attached to every authenticated request.
    pub access: String,
    /// Renewal credential; persisted but not otherwise used by this client.
    pub refresh: String,
}

/// The persisted session snapshot: one JSON blob under
/// [`crate::SESSION_PREF_KEY`].
///
/// `user` is absent between the token exchange and the identity fetch during
/// login, and in snapshots written by that intermediate phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Access credential.
    pub access: String,
    /// Refresh credential.
    pub refresh: String,
    /// Identity record, once fetched.
    #[serde(default)]
    pub user: Option<UserProfile>,
}

/// Registration payload for the account-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Desired login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Plain-text password, sent over TLS only.
    pub password: String,
    /// Requested role.
    pub role: Role,
    /// Given name.
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default)]
    pub last_name: Option<String>,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Booking lifecycle status. `Cancelled` is terminal: the client offers no
/// further cancel/confirm actions once it is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting owner confirmation.
    Pending,
    /// Confirmed by the owner.
    Confirmed,
    /// Terminal; no client actions remain.
    Cancelled,
    /// Service delivered.
    Completed,
}

/// Settlement method. Card is advertised but not implemented backend-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Cash on delivery, settled in person.
    Cod,
    /// Card; placeholder only.
    Card,
}

/// Settlement status for a payment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Awaiting settlement (initial state for COD).
    Pending,
    /// Settled.
    Completed,
    /// Settlement failed or was voided.
    Failed,
}

/// Payment record embedded in its booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Server-assigned payment id.
    pub id: u64,
    /// Owning booking id.
    #[serde(default)]
    pub booking: Option<u64>,
    /// Amount due; the backend serializes decimals as strings.
    #[serde(deserialize_with = "de_f64_lenient", default)]
    pub amount: f64,
    /// Settlement method.
    pub method: PaymentMethod,
    /// Settlement status.
    pub status: PaymentStatus,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last update timestamp (RFC 3339).
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Salon catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Salon {
    /// Server-assigned salon id.
    pub id: u64,
    /// Owning user id.
    pub owner: u64,
    /// Display name.
    pub name: String,
    /// Street address, searchable.
    #[serde(default)]
    pub address: String,
    /// Latitude; decimal-as-string on the wire.
    #[serde(deserialize_with = "de_opt_f64_lenient", default)]
    pub lat: Option<f64>,
    /// Longitude; decimal-as-string on the wire.
    #[serde(deserialize_with = "de_opt_f64_lenient", default)]
    pub lng: Option<f64>,
    /// Opening time, `HH:MM[:SS]`.
    #[serde(default)]
    pub open_time: Option<String>,
    /// Closing time, `HH:MM[:SS]`; may wrap past midnight.
    #[serde(default)]
    pub close_time: Option<String>,
}

/// Service catalog record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    /// Server-assigned service id.
    pub id: u64,
    /// Owning salon id.
    pub salon: u64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Appointment length in minutes.
    pub duration_minutes: u32,
    /// Price; decimal-as-string on the wire.
    #[serde(deserialize_with = "de_f64_lenient", default)]
    pub price: f64,
    /// Whether the service is offered at the customer's home.
    #[serde(default)]
    pub is_home_service: bool,
}

/// One reservation, with salon/service/customer fragments denormalized by the
/// backend serializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Server-assigned booking id, immutable once created.
    pub id: u64,
    /// Customer record; owner-facing lists rely on the username.
    #[serde(default)]
    pub customer: Option<UserProfile>,
    /// Denormalized salon record.
    pub salon: Salon,
    /// Denormalized service record.
    pub service: Service,
    /// Slot start (RFC 3339).
    pub start_time: String,
    /// Slot end; the backend derives it from the service duration.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Lifecycle status.
    pub status: BookingStatus,
    /// Embedded payment, once one exists.
    #[serde(default)]
    pub payment: Option<Payment>,
    /// Creation timestamp (RFC 3339).
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Candidate bookable window returned by the availability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    /// Window start (RFC 3339).
    pub start: String,
    /// Window end (RFC 3339).
    pub end: String,
    /// Whether the window is still bookable. The server re-checks on create.
    pub available: bool,
}

/// Payload for the booking-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    /// Target salon.
    pub salon_id: u64,
    /// Target service.
    pub service_id: u64,
    /// Chosen slot start (RFC 3339).
    pub start_time: String,
}

/// Payload for the payment-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    /// Booking being settled.
    pub booking_id: u64,
    /// Settlement method.
    pub method: PaymentMethod,
}

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Target salon.
    pub salon_id: u64,
    /// Target service (determines slot length).
    pub service_id: u64,
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
}

/// Owner-editable salon fields for create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalonDraft {
    /// Display name.
    pub name: String,
    /// Street address.
    #[serde(default)]
    pub address: String,
    /// Latitude.
    #[serde(default)]
    pub lat: Option<f64>,
    /// Longitude.
    #[serde(default)]
    pub lng: Option<f64>,
    /// Opening time, `HH:MM`.
    #[serde(default)]
    pub open_time: Option<String>,
    /// Closing time, `HH:MM`.
    #[serde(default)]
    pub close_time: Option<String>,
}

/// Owner-editable service fields for create/update calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceDraft {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Appointment length in minutes.
    pub duration_minutes: u32,
    /// Price.
    pub price: f64,
    /// Whether offered at the customer's home.
    #[serde(default)]
    pub is_home_service: bool,
}

// The backend serializes DecimalField values as JSON strings ("25.00") unless
// coercion is disabled, in which case they arrive as numbers. Accept both.
fn lenient_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn de_f64_lenient<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    lenient_f64(&value)
        .ok_or_else(|| serde::de::Error::custom(format!("expected numeric value, got {value}")))
}

fn de_opt_f64_lenient<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(v) => Ok(lenient_f64(&v)),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn role_uses_backend_wire_names() {
        assert_eq!(serde_json::to_value(Role::SalonOwner).unwrap(), json!("salon_owner"));
        assert_eq!(serde_json::to_value(Role::SuperAdmin).unwrap(), json!("superadmin"));
        let role: Role = serde_json::from_value(json!("customer")).unwrap();
        assert_eq!(role, Role::Customer);
    }

    #[test]
    fn salon_accepts_decimal_strings_and_numbers() {
        let salon: Salon = serde_json::from_value(json!({
            "id": 5,
            "owner": 2,
            "name": "Shear Genius",
            "address": "12 High St",
            "lat": "51.501364000000000",
            "lng": -0.14189,
            "open_time": "09:00:00",
            "close_time": "18:00:00"
        }))
        .unwrap();
        assert!((salon.lat.unwrap() - 51.501364).abs() < 1e-9);
        assert!((salon.lng.unwrap() + 0.14189).abs() < 1e-9);
    }

    #[test]
    fn salon_tolerates_missing_coordinates() {
        let salon: Salon = serde_json::from_value(json!({
            "id": 5,
            "owner": 2,
            "name": "Shear Genius"
        }))
        .unwrap();
        assert_eq!(salon.lat, None);
        assert_eq!(salon.address, "");
    }

    #[test]
    fn payment_amount_parses_from_string() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 7,
            "booking": 42,
            "amount": "35.50",
            "method": "cod",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(payment.amount, 35.5);
        assert_eq!(payment.method, PaymentMethod::Cod);
    }

    #[test]
    fn booking_round_trips_with_embedded_payment() {
        let wire = json!({
            "id": 42,
            "customer": {"id": 1, "username": "alice", "role": "customer"},
            "salon": {"id": 5, "owner": 2, "name": "Shear Genius", "address": "12 High St"},
            "service": {
                "id": 9,
                "salon": 5,
                "name": "Cut",
                "duration_minutes": 30,
                "price": "25.00"
            },
            "start_time": "2024-01-01T10:00:00Z",
            "end_time": "2024-01-01T10:30:00Z",
            "status": "pending",
            "payment": {"id": 7, "amount": 25.0, "method": "cod", "status": "pending"}
        });
        let booking: Booking = serde_json::from_value(wire).unwrap();
        assert_eq!(booking.id, 42);
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.service.price, 25.0);
        assert_eq!(booking.payment.as_ref().unwrap().id, 7);
        assert_eq!(booking.customer.as_ref().unwrap().username, "alice");
    }

    #[test]
    fn stored_session_without_user_is_valid() {
        let snap: StoredSession =
            serde_json::from_value(json!({"access": "A1", "refresh": "R1"})).unwrap();
        assert_eq!(snap.user, None);
    }
}

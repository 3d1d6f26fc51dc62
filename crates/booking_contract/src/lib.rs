//! Shared wire-level contract for the salon booking client.
//!
//! This crate is the typed boundary between the REST backend and the client
//! stores: serde models matching the backend's JSON shapes, request payloads,
//! and decode helpers for the endpoints whose response shape is ambiguous
//! (acknowledgement vs. full record, wrapped vs. bare payment).
//!
//! # Example
//!
//! ```rust
//! use booking_contract::{decode_mutation_outcome, MutationOutcome};
//! use serde_json::json;
//!
//! let outcome = decode_mutation_outcome(json!({"status": "cancelled"}), "cancel")
//!     .expect("ack decodes");
//! assert_eq!(outcome, MutationOutcome::Ack);
//! ```

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod decode;
mod model;

pub use decode::{decode_mutation_outcome, decode_payment_response, DecodeError, MutationOutcome};
pub use model::{
    AvailabilityQuery, Booking, BookingStatus, CreateBookingRequest, CreatePaymentRequest,
    Payment, PaymentMethod, PaymentStatus, RegisterRequest, Role, Salon, SalonDraft, Service,
    ServiceDraft, Slot, StoredSession, TokenPair, UserProfile,
};

/// localStorage key holding the persisted [`StoredSession`] snapshot.
///
/// The Session Store is the only writer; the HTTP adapter reads it to attach
/// the bearer credential. Absence or a corrupt value means "no session".
pub const SESSION_PREF_KEY: &str = "salonbook.auth.v1";

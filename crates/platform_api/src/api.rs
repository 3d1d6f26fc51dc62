//! Object-safe API traits the stores are written against.
//!
//! Futures are boxed and non-`Send`: the client runs on the single-threaded
//! wasm event loop, and keeping the bound off lets in-memory test adapters
//! share `Rc` state.

use std::{future::Future, pin::Pin};

use booking_contract::{
    AvailabilityQuery, Booking, CreateBookingRequest, CreatePaymentRequest, MutationOutcome,
    Payment, PaymentStatus, RegisterRequest, Salon, SalonDraft, Service, ServiceDraft, Slot,
    TokenPair, UserProfile,
};

use crate::error::ApiError;

/// Boxed future returned by the API trait methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + 'a>>;

/// Authentication collaborator: credential exchange, identity, registration.
pub trait AuthApi {
    /// Exchanges username/password for an access/refresh credential pair.
    fn login(&self, username: String, password: String) -> ApiFuture<'_, TokenPair>;

    /// Fetches the current identity. Requires a bearer credential.
    fn current_user(&self) -> ApiFuture<'_, UserProfile>;

    /// Creates an account. Does not authenticate it.
    fn register(&self, payload: RegisterRequest) -> ApiFuture<'_, UserProfile>;
}

/// Booking collaborator: list, create, mutate, availability.
pub trait BookingsApi {
    /// Lists the bookings visible to the current actor.
    fn list(&self) -> ApiFuture<'_, Vec<Booking>>;

    /// Fetches one booking by id.
    fn get(&self, id: u64) -> ApiFuture<'_, Booking>;

    /// Creates a booking; the server allocates the id and checks the slot.
    fn create(&self, payload: CreateBookingRequest) -> ApiFuture<'_, Booking>;

    /// Cancels a booking. The response may be a full record or an ack.
    fn cancel(&self, id: u64) -> ApiFuture<'_, MutationOutcome>;

    /// Confirms a booking (owner action). Same response ambiguity as cancel.
    fn confirm(&self, id: u64) -> ApiFuture<'_, MutationOutcome>;

    /// Fetches candidate slots for a salon/service/date combination.
    fn availability(&self, query: AvailabilityQuery) -> ApiFuture<'_, Vec<Slot>>;
}

/// Payment collaborator.
pub trait PaymentsApi {
    /// Creates a payment record tied to a booking.
    fn create(&self, payload: CreatePaymentRequest) -> ApiFuture<'_, Payment>;

    /// Advances a payment's settlement status.
    fn update_status(&self, id: u64, status: PaymentStatus) -> ApiFuture<'_, Payment>;
}

/// Salon/service catalog collaborator, including owner CRUD.
pub trait SalonsApi {
    /// Lists all salons.
    fn list(&self) -> ApiFuture<'_, Vec<Salon>>;

    /// Fetches one salon by id.
    fn get(&self, id: u64) -> ApiFuture<'_, Salon>;

    /// Lists the services offered by a salon.
    fn services_for_salon(&self, salon_id: u64) -> ApiFuture<'_, Vec<Service>>;

    /// Fetches one service by id.
    fn get_service(&self, id: u64) -> ApiFuture<'_, Service>;

    /// Creates a salon owned by the current actor.
    fn create_salon(&self, draft: SalonDraft) -> ApiFuture<'_, Salon>;

    /// Updates a salon.
    fn update_salon(&self, id: u64, draft: SalonDraft) -> ApiFuture<'_, Salon>;

    /// Creates a service under a salon.
    fn create_service(&self, salon_id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service>;

    /// Updates a service.
    fn update_service(&self, id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service>;

    /// Deletes a service.
    fn delete_service(&self, id: u64) -> ApiFuture<'_, ()>;
}

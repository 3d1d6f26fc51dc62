//! Service boundary between the booking stores and the outside world.
//!
//! This crate hosts the object-safe API traits the stores are written
//! against, the normalized [`ApiError`] shape, the preference-store contract
//! used for the persisted session snapshot (with localStorage and in-memory
//! adapters), and the concrete `reqwest`-backed HTTP implementation of the
//! REST collaborator. Stores never see transport details; every failure
//! reaches them as an [`ApiError`].

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod api;
mod error;
mod http;
mod memory;
mod prefs;

pub use api::{ApiFuture, AuthApi, BookingsApi, PaymentsApi, SalonsApi};
pub use error::ApiError;
pub use http::HttpApi;
pub use memory::{
    demo_customer, demo_salon, demo_service, MemoryAuthApi, MemoryBookingsApi, MemoryPaymentsApi,
    MemorySalonsApi,
};
pub use prefs::{
    load_typed, save_typed, MemoryPrefsStore, NoopPrefsStore, PrefsFuture, PrefsStore,
    WebPrefsStore,
};

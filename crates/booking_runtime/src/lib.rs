//! Client-side state containers for the salon booking app.
//!
//! Two stores own all authoritative client state: the [`SessionStore`]
//! (identity + credential pair, persisted as one localStorage snapshot) and
//! the [`BookingStore`] (the booking list projection, reconciled from server
//! responses after every mutating call). Both are plain structs over the
//! `platform_api` traits so they run unchanged against the HTTP adapter in
//! the browser and the in-memory doubles in native tests. [`catalog`] holds
//! the pure helpers the pages derive their views with.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod catalog;

mod bookings;
mod session;

pub use bookings::{
    apply_booking_event, mark_slot_unavailable, BookingListEvent, BookingListState, BookingStore,
};
pub use session::{apply_session_event, SessionEvent, SessionState, SessionStore};

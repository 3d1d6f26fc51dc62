//! The booking list store: the client's projection of "bookings relevant to
//! the current actor", reconciled from server responses after every
//! mutating call.

use std::{cell::RefCell, rc::Rc};

use booking_contract::{
    Booking, CreateBookingRequest, CreatePaymentRequest, MutationOutcome, Payment, PaymentMethod,
    PaymentStatus, Slot,
};
use platform_api::{ApiError, BookingsApi, PaymentsApi};

/// Published booking list state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookingListState {
    /// Bookings in server-reported order; `create` prepends.
    pub items: Vec<Booking>,
    /// Whether an operation is in flight.
    pub loading: bool,
    /// Last operation failure, for inline display.
    pub error: Option<String>,
}

/// Transition event for [`apply_booking_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum BookingListEvent {
    /// An operation started.
    Start,
    /// Full replacement from a list fetch.
    Set(Vec<Booking>),
    /// A freshly created booking; prepended regardless of its start time.
    Add(Booking),
    /// Replacement of one entry, keyed by id. Unknown ids are ignored.
    Update(Booking),
    /// Replacement of the embedded payment on the booking whose payment id
    /// matches.
    UpdatePayment(Payment),
    /// An operation failed.
    Fail(String),
}

/// Applies a [`BookingListEvent`] to the list state.
///
/// `Update` and `UpdatePayment` are idempotent: applying the same event twice
/// leaves the list identical to applying it once.
pub fn apply_booking_event(state: &mut BookingListState, event: BookingListEvent) {
    match event {
        BookingListEvent::Start => {
            state.loading = true;
            state.error = None;
        }
        BookingListEvent::Set(items) => {
            state.items = items;
            state.loading = false;
        }
        BookingListEvent::Add(booking) => {
            state.items.insert(0, booking);
            state.loading = false;
        }
        BookingListEvent::Update(booking) => {
            for item in &mut state.items {
                if item.id == booking.id {
                    *item = booking.clone();
                }
            }
            state.loading = false;
        }
        BookingListEvent::UpdatePayment(payment) => {
            for item in &mut state.items {
                if item.payment.as_ref().map(|p| p.id) == Some(payment.id) {
                    item.payment = Some(payment.clone());
                }
            }
            state.loading = false;
        }
        BookingListEvent::Fail(message) => {
            state.loading = false;
            state.error = Some(message);
        }
    }
}

/// Marks the slot starting at `start` unavailable in a page-local slot list.
///
/// This backs the optimistic toggle after a successful booking so the UI does
/// not re-offer the slot before the next availability fetch. The list is a
/// short-lived UI cache, never store state.
pub fn mark_slot_unavailable(slots: &mut [Slot], start: &str) {
    for slot in slots {
        if slot.start == start {
            slot.available = false;
        }
    }
}

/// Owns the booking list and its operations over the booking and payment
/// collaborators. Every state change goes through `publish`.
#[derive(Clone)]
pub struct BookingStore {
    bookings: Rc<dyn BookingsApi>,
    payments: Rc<dyn PaymentsApi>,
    state: Rc<RefCell<BookingListState>>,
    publish: Rc<dyn Fn(&BookingListState)>,
}

impl BookingStore {
    /// Creates a store publishing through `publish`.
    pub fn new(
        bookings: Rc<dyn BookingsApi>,
        payments: Rc<dyn PaymentsApi>,
        publish: Rc<dyn Fn(&BookingListState)>,
    ) -> Self {
        Self {
            bookings,
            payments,
            state: Rc::new(RefCell::new(BookingListState::default())),
            publish,
        }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> BookingListState {
        self.state.borrow().clone()
    }

    fn emit(&self, event: BookingListEvent) {
        let mut state = self.state.borrow_mut();
        apply_booking_event(&mut state, event);
        (self.publish)(&state);
    }

    fn fail(&self, err: ApiError) -> ApiError {
        self.emit(BookingListEvent::Fail(err.message.clone()));
        err
    }

    /// Replaces the list with the server's result for the current actor.
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    pub async fn fetch_all(&self) -> Result<Vec<Booking>, ApiError> {
        self.emit(BookingListEvent::Start);
        match self.bookings.list().await {
            Ok(items) => {
                self.emit(BookingListEvent::Set(items.clone()));
                Ok(items)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Creates a booking and prepends it to the list.
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    pub async fn create(&self, payload: CreateBookingRequest) -> Result<Booking, ApiError> {
        self.emit(BookingListEvent::Start);
        match self.bookings.create(payload).await {
            Ok(booking) => {
                self.emit(BookingListEvent::Add(booking.clone()));
                Ok(booking)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Cancels a booking and reconciles the list entry.
    ///
    /// Acknowledgement-only responses trigger a follow-up fetch by id, since
    /// the list entry must reflect the server's record either way.
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    pub async fn cancel(&self, id: u64) -> Result<Booking, ApiError> {
        self.emit(BookingListEvent::Start);
        let outcome = match self.bookings.cancel(id).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(err)),
        };
        self.reconcile_mutation(id, outcome).await
    }

    /// Confirms a booking (owner action); same reconciliation as [`cancel`].
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    ///
    /// [`cancel`]: BookingStore::cancel
    pub async fn confirm(&self, id: u64) -> Result<Booking, ApiError> {
        self.emit(BookingListEvent::Start);
        let outcome = match self.bookings.confirm(id).await {
            Ok(outcome) => outcome,
            Err(err) => return Err(self.fail(err)),
        };
        self.reconcile_mutation(id, outcome).await
    }

    async fn reconcile_mutation(
        &self,
        id: u64,
        outcome: MutationOutcome,
    ) -> Result<Booking, ApiError> {
        let booking = match outcome {
            MutationOutcome::Updated(booking) => booking,
            MutationOutcome::Ack => match self.bookings.get(id).await {
                Ok(fresh) => fresh,
                Err(err) => return Err(self.fail(err)),
            },
        };
        self.emit(BookingListEvent::Update(booking.clone()));
        Ok(booking)
    }

    /// Advances a payment's status and replaces it inside its booking.
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    pub async fn update_payment_status(
        &self,
        payment_id: u64,
        status: PaymentStatus,
    ) -> Result<Payment, ApiError> {
        self.emit(BookingListEvent::Start);
        match self.payments.update_status(payment_id, status).await {
            Ok(payment) => {
                self.emit(BookingListEvent::UpdatePayment(payment.clone()));
                Ok(payment)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    /// Marks a COD payment as received (owner's "Mark Paid" action).
    ///
    /// # Errors
    ///
    /// Publishes and propagates the collaborator failure.
    pub async fn mark_payment_received(&self, payment_id: u64) -> Result<Payment, ApiError> {
        self.update_payment_status(payment_id, PaymentStatus::Completed)
            .await
    }

    /// The booking-creation flow: create the booking, then create its payment
    /// record when the method requires one.
    ///
    /// A payment-creation failure whose message contains "already exists"
    /// (case-insensitive) is treated as success: the record was created by an
    /// earlier submission of the same booking. Any other payment failure
    /// propagates, leaving the created booking in the list; the next
    /// `fetch_all` reconciles that intermediate state.
    ///
    /// # Errors
    ///
    /// Propagates the booking-creation failure, or a non-duplicate
    /// payment-creation failure.
    pub async fn book_with_payment(
        &self,
        payload: CreateBookingRequest,
        method: PaymentMethod,
    ) -> Result<Booking, ApiError> {
        let booking = self.create(payload).await?;
        if method == PaymentMethod::Cod {
            if let Err(err) = self
                .payments
                .create(CreatePaymentRequest {
                    booking_id: booking.id,
                    method,
                })
                .await
            {
                if !err.message.to_lowercase().contains("already exists") {
                    return Err(self.fail(err));
                }
            }
        }
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use booking_contract::BookingStatus;
    use futures::executor::block_on;
    use platform_api::{MemoryBookingsApi, MemoryPaymentsApi};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Harness {
        bookings: MemoryBookingsApi,
        payments: MemoryPaymentsApi,
        store: BookingStore,
        published: Rc<RefCell<Vec<BookingListState>>>,
    }

    fn harness() -> Harness {
        let bookings = MemoryBookingsApi::default();
        let payments = MemoryPaymentsApi::default();
        let published: Rc<RefCell<Vec<BookingListState>>> = Rc::default();
        let sink = Rc::clone(&published);
        let store = BookingStore::new(
            Rc::new(bookings.clone()),
            Rc::new(payments.clone()),
            Rc::new(move |state: &BookingListState| sink.borrow_mut().push(state.clone())),
        );
        Harness {
            bookings,
            payments,
            store,
            published,
        }
    }

    fn create_request(start_time: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            salon_id: 5,
            service_id: 9,
            start_time: start_time.to_string(),
        }
    }

    fn seeded(h: &Harness, starts: &[&str]) {
        for start in starts {
            block_on(h.store.create(create_request(start))).expect("seed booking");
        }
    }

    #[test]
    fn fetch_all_replaces_rather_than_merges() {
        let h = harness();
        seeded(&h, &["2024-01-01T10:00:00Z"]);

        // Simulate another client shrinking the server-side list.
        h.bookings.bookings.borrow_mut().clear();
        let items = block_on(h.store.fetch_all()).expect("fetch");
        assert_eq!(items, Vec::new());
        assert_eq!(h.store.current().items, Vec::new());
    }

    #[test]
    fn create_prepends_regardless_of_start_time() {
        let h = harness();
        seeded(&h, &["2024-01-02T10:00:00Z"]);
        let earlier = block_on(h.store.create(create_request("2024-01-01T08:00:00Z")))
            .expect("create earlier booking");

        let state = h.store.current();
        assert_eq!(state.items[0].id, earlier.id);
        assert_eq!(state.items.len(), 2);
    }

    #[test]
    fn create_followed_by_fetch_all_equals_server_list() {
        let h = harness();
        h.bookings.set_next_id(42);
        block_on(h.store.create(create_request("2024-01-01T10:00:00Z"))).expect("create");

        let server = h.bookings.bookings.borrow().clone();
        let items = block_on(h.store.fetch_all()).expect("fetch");
        assert_eq!(items, server);
        assert_eq!(h.store.current().items, server);
    }

    #[test]
    fn update_reconciliation_is_idempotent_by_id() {
        let h = harness();
        seeded(&h, &["2024-01-01T10:00:00Z", "2024-01-02T10:00:00Z"]);
        let mut updated = h.store.current().items[0].clone();
        updated.status = BookingStatus::Confirmed;

        let mut once = h.store.current();
        apply_booking_event(&mut once, BookingListEvent::Update(updated.clone()));
        let mut twice = once.clone();
        apply_booking_event(&mut twice, BookingListEvent::Update(updated));
        assert_eq!(once, twice);
    }

    #[test]
    fn cancel_with_full_record_replaces_in_place() {
        let h = harness();
        h.bookings.set_next_id(42);
        seeded(&h, &["2024-01-01T10:00:00Z"]);

        let cancelled = block_on(h.store.cancel(42)).expect("cancel");
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(h.store.current().items[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn cancel_ack_triggers_follow_up_fetch() {
        let h = harness();
        h.bookings.set_next_id(42);
        seeded(&h, &["2024-01-01T10:00:00Z"]);
        h.bookings.cancel_acks.set(true);

        let cancelled = block_on(h.store.cancel(42)).expect("cancel");
        assert_eq!(cancelled.id, 42);
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert_eq!(h.store.current().items[0].status, BookingStatus::Cancelled);
    }

    #[test]
    fn confirm_ack_triggers_follow_up_fetch() {
        let h = harness();
        seeded(&h, &["2024-01-01T10:00:00Z"]);
        h.bookings.confirm_acks.set(true);

        let confirmed = block_on(h.store.confirm(1)).expect("confirm");
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        assert_eq!(h.store.current().items[0].status, BookingStatus::Confirmed);
    }

    #[test]
    fn payment_update_replaces_the_embedded_record() {
        let h = harness();
        seeded(&h, &["2024-01-01T10:00:00Z"]);
        // Attach a pending payment with id 7 to the only booking, both
        // server-side and in the projection.
        let payment = Payment {
            id: 7,
            booking: Some(1),
            amount: 25.0,
            method: PaymentMethod::Cod,
            status: PaymentStatus::Pending,
            created_at: None,
            updated_at: None,
        };
        h.payments.payments.borrow_mut().push(payment.clone());
        h.bookings.bookings.borrow_mut()[0].payment = Some(payment);
        block_on(h.store.fetch_all()).expect("fetch");

        let updated = block_on(
            h.store
                .update_payment_status(7, PaymentStatus::Completed),
        )
        .expect("update");
        assert_eq!(updated.status, PaymentStatus::Completed);
        let state = h.store.current();
        assert_eq!(
            state.items[0].payment.as_ref().map(|p| p.status),
            Some(PaymentStatus::Completed)
        );
    }

    #[test]
    fn failed_fetch_publishes_error_and_propagates() {
        let h = harness();
        *h.bookings.list_failure.borrow_mut() = Some(ApiError::from_response(500, None));
        let err = block_on(h.store.fetch_all()).expect_err("must fail");
        let state = h.store.current();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(err.message.as_str()));
    }

    #[test]
    fn operations_publish_loading_transitions() {
        let h = harness();
        block_on(h.store.fetch_all()).expect("fetch");
        let published = h.published.borrow();
        assert!(published.first().expect("start").loading);
        assert!(!published.last().expect("final").loading);
    }

    #[test]
    fn cod_flow_tolerates_duplicate_payment() {
        let h = harness();
        *h.payments.create_failure.borrow_mut() =
            Some(ApiError::local("Payment Already Exists for this booking"));

        let booking = block_on(
            h.store
                .book_with_payment(create_request("2024-01-01T10:00:00Z"), PaymentMethod::Cod),
        )
        .expect("duplicate payment is tolerated");
        assert_eq!(h.store.current().items[0].id, booking.id);
    }

    #[test]
    fn cod_flow_propagates_other_payment_failures() {
        let h = harness();
        *h.payments.create_failure.borrow_mut() = Some(ApiError::local("amount mismatch"));

        let err = block_on(
            h.store
                .book_with_payment(create_request("2024-01-01T10:00:00Z"), PaymentMethod::Cod),
        )
        .expect_err("must fail");
        assert_eq!(err.message, "amount mismatch");
        // Known limitation: the created booking stays in the list until the
        // next fetch reconciles it.
        assert_eq!(h.store.current().items.len(), 1);
    }

    #[test]
    fn cod_flow_creates_a_payment_record() {
        let h = harness();
        block_on(
            h.store
                .book_with_payment(create_request("2024-01-01T10:00:00Z"), PaymentMethod::Cod),
        )
        .expect("flow");
        assert_eq!(h.payments.payments.borrow().len(), 1);
    }

    #[test]
    fn slot_toggle_marks_only_the_chosen_start() {
        let mut slots = vec![
            Slot {
                start: "2024-01-01T10:00:00Z".to_string(),
                end: "2024-01-01T10:30:00Z".to_string(),
                available: true,
            },
            Slot {
                start: "2024-01-01T10:30:00Z".to_string(),
                end: "2024-01-01T11:00:00Z".to_string(),
                available: true,
            },
        ];
        mark_slot_unavailable(&mut slots, "2024-01-01T10:00:00Z");
        assert!(!slots[0].available);
        assert!(slots[1].available);
    }
}

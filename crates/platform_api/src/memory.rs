//! Scriptable in-memory API implementations for native store tests.
//!
//! Each mock holds its data behind `Rc<RefCell<...>>` so a test can keep a
//! handle and observe or reshape the "server" state between calls. Failure
//! fields inject the next error a method returns.

use std::{cell::Cell, cell::RefCell, rc::Rc};

use booking_contract::{
    AvailabilityQuery, Booking, BookingStatus, CreateBookingRequest, CreatePaymentRequest,
    MutationOutcome, Payment, PaymentMethod, PaymentStatus, RegisterRequest, Role, Salon,
    SalonDraft, Service, ServiceDraft, Slot, TokenPair, UserProfile,
};

use crate::{
    api::{ApiFuture, AuthApi, BookingsApi, PaymentsApi, SalonsApi},
    error::ApiError,
};

fn scripted_failure(slot: &RefCell<Option<ApiError>>) -> Option<ApiError> {
    slot.borrow_mut().take()
}

/// Auth collaborator double.
#[derive(Debug, Clone, Default)]
pub struct MemoryAuthApi {
    /// Token pair returned by `login` when no failure is scripted.
    pub tokens: Rc<RefCell<Option<TokenPair>>>,
    /// Identity returned by `current_user` when no failure is scripted.
    pub user: Rc<RefCell<Option<UserProfile>>>,
    /// Next `login` failure.
    pub login_failure: Rc<RefCell<Option<ApiError>>>,
    /// Next `current_user` failure.
    pub identity_failure: Rc<RefCell<Option<ApiError>>>,
    /// Next `register` failure.
    pub register_failure: Rc<RefCell<Option<ApiError>>>,
    /// Registrations received, newest last.
    pub registered: Rc<RefCell<Vec<RegisterRequest>>>,
}

impl MemoryAuthApi {
    /// Double that answers `login` with the given pair and `current_user`
    /// with the given identity.
    pub fn with_account(tokens: TokenPair, user: UserProfile) -> Self {
        let api = Self::default();
        *api.tokens.borrow_mut() = Some(tokens);
        *api.user.borrow_mut() = Some(user);
        api
    }
}

impl AuthApi for MemoryAuthApi {
    fn login(&self, _username: String, _password: String) -> ApiFuture<'_, TokenPair> {
        let failure = scripted_failure(&self.login_failure);
        let tokens = self.tokens.borrow().clone();
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            tokens.ok_or_else(|| ApiError::from_response(401, None))
        })
    }

    fn current_user(&self) -> ApiFuture<'_, UserProfile> {
        let failure = scripted_failure(&self.identity_failure);
        let user = self.user.borrow().clone();
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            user.ok_or_else(|| ApiError::from_response(401, None))
        })
    }

    fn register(&self, payload: RegisterRequest) -> ApiFuture<'_, UserProfile> {
        let failure = scripted_failure(&self.register_failure);
        let registered = Rc::clone(&self.registered);
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            let profile = UserProfile {
                id: registered.borrow().len() as u64 + 1,
                username: payload.username.clone(),
                email: Some(payload.email.clone()),
                role: payload.role,
                phone: payload.phone.clone(),
                first_name: payload.first_name.clone(),
                last_name: payload.last_name.clone(),
            };
            registered.borrow_mut().push(payload);
            Ok(profile)
        })
    }
}

/// Booking collaborator double. Created bookings reuse the configured salon
/// and service records, matching the backend's denormalized responses.
#[derive(Debug, Clone)]
pub struct MemoryBookingsApi {
    /// Server-side booking list.
    pub bookings: Rc<RefCell<Vec<Booking>>>,
    /// Salon attached to created bookings.
    pub salon: Salon,
    /// Service attached to created bookings.
    pub service: Service,
    /// Slots returned by `availability`.
    pub slots: Rc<RefCell<Vec<Slot>>>,
    /// When set, `cancel` answers with an acknowledgement instead of the
    /// updated record.
    pub cancel_acks: Rc<Cell<bool>>,
    /// When set, `confirm` answers with an acknowledgement.
    pub confirm_acks: Rc<Cell<bool>>,
    /// Next `list` failure.
    pub list_failure: Rc<RefCell<Option<ApiError>>>,
    /// Next `create` failure.
    pub create_failure: Rc<RefCell<Option<ApiError>>>,
    next_id: Rc<Cell<u64>>,
}

impl Default for MemoryBookingsApi {
    fn default() -> Self {
        Self {
            bookings: Rc::default(),
            salon: demo_salon(),
            service: demo_service(),
            slots: Rc::default(),
            cancel_acks: Rc::default(),
            confirm_acks: Rc::default(),
            list_failure: Rc::default(),
            create_failure: Rc::default(),
            next_id: Rc::new(Cell::new(1)),
        }
    }
}

impl MemoryBookingsApi {
    fn allocate_id(&self) -> u64 {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id
    }

    /// Sets the id the next created booking receives.
    pub fn set_next_id(&self, id: u64) {
        self.next_id.set(id);
    }

    fn set_status(&self, id: u64, status: BookingStatus) -> Result<Booking, ApiError> {
        let mut bookings = self.bookings.borrow_mut();
        let booking = bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| ApiError::from_response(404, None))?;
        booking.status = status;
        Ok(booking.clone())
    }
}

impl BookingsApi for MemoryBookingsApi {
    fn list(&self) -> ApiFuture<'_, Vec<Booking>> {
        let failure = scripted_failure(&self.list_failure);
        let items = self.bookings.borrow().clone();
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            Ok(items)
        })
    }

    fn get(&self, id: u64) -> ApiFuture<'_, Booking> {
        let found = self.bookings.borrow().iter().find(|b| b.id == id).cloned();
        Box::pin(async move { found.ok_or_else(|| ApiError::from_response(404, None)) })
    }

    fn create(&self, payload: CreateBookingRequest) -> ApiFuture<'_, Booking> {
        if let Some(err) = scripted_failure(&self.create_failure) {
            return Box::pin(async move { Err(err) });
        }
        let booking = Booking {
            id: self.allocate_id(),
            customer: None,
            salon: self.salon.clone(),
            service: self.service.clone(),
            start_time: payload.start_time,
            end_time: None,
            status: BookingStatus::Pending,
            payment: None,
            created_at: None,
        };
        self.bookings.borrow_mut().push(booking.clone());
        Box::pin(async move { Ok(booking) })
    }

    fn cancel(&self, id: u64) -> ApiFuture<'_, MutationOutcome> {
        let result = self.set_status(id, BookingStatus::Cancelled);
        let ack = self.cancel_acks.get();
        Box::pin(async move {
            let booking = result?;
            Ok(if ack {
                MutationOutcome::Ack
            } else {
                MutationOutcome::Updated(booking)
            })
        })
    }

    fn confirm(&self, id: u64) -> ApiFuture<'_, MutationOutcome> {
        let result = self.set_status(id, BookingStatus::Confirmed);
        let ack = self.confirm_acks.get();
        Box::pin(async move {
            let booking = result?;
            Ok(if ack {
                MutationOutcome::Ack
            } else {
                MutationOutcome::Updated(booking)
            })
        })
    }

    fn availability(&self, _query: AvailabilityQuery) -> ApiFuture<'_, Vec<Slot>> {
        let slots = self.slots.borrow().clone();
        Box::pin(async move { Ok(slots) })
    }
}

/// Payment collaborator double.
#[derive(Debug, Clone, Default)]
pub struct MemoryPaymentsApi {
    /// Server-side payment list.
    pub payments: Rc<RefCell<Vec<Payment>>>,
    /// Next `create` failure.
    pub create_failure: Rc<RefCell<Option<ApiError>>>,
    /// Next `update_status` failure.
    pub update_failure: Rc<RefCell<Option<ApiError>>>,
}

impl PaymentsApi for MemoryPaymentsApi {
    fn create(&self, payload: CreatePaymentRequest) -> ApiFuture<'_, Payment> {
        let failure = scripted_failure(&self.create_failure);
        let payments = Rc::clone(&self.payments);
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            let payment = Payment {
                id: payments.borrow().len() as u64 + 1,
                booking: Some(payload.booking_id),
                amount: 0.0,
                method: payload.method,
                status: PaymentStatus::Pending,
                created_at: None,
                updated_at: None,
            };
            payments.borrow_mut().push(payment.clone());
            Ok(payment)
        })
    }

    fn update_status(&self, id: u64, status: PaymentStatus) -> ApiFuture<'_, Payment> {
        let failure = scripted_failure(&self.update_failure);
        let payments = Rc::clone(&self.payments);
        Box::pin(async move {
            if let Some(err) = failure {
                return Err(err);
            }
            let mut payments = payments.borrow_mut();
            let payment = payments
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or_else(|| ApiError::from_response(404, None))?;
            payment.status = status;
            Ok(payment.clone())
        })
    }
}

/// Catalog collaborator double.
#[derive(Debug, Clone, Default)]
pub struct MemorySalonsApi {
    /// Server-side salon list.
    pub salons: Rc<RefCell<Vec<Salon>>>,
    /// Server-side service list.
    pub services: Rc<RefCell<Vec<Service>>>,
    /// Owner id assigned to created salons.
    pub acting_owner: Rc<Cell<u64>>,
}

impl SalonsApi for MemorySalonsApi {
    fn list(&self) -> ApiFuture<'_, Vec<Salon>> {
        let items = self.salons.borrow().clone();
        Box::pin(async move { Ok(items) })
    }

    fn get(&self, id: u64) -> ApiFuture<'_, Salon> {
        let found = self.salons.borrow().iter().find(|s| s.id == id).cloned();
        Box::pin(async move { found.ok_or_else(|| ApiError::from_response(404, None)) })
    }

    fn services_for_salon(&self, salon_id: u64) -> ApiFuture<'_, Vec<Service>> {
        let items: Vec<Service> = self
            .services
            .borrow()
            .iter()
            .filter(|s| s.salon == salon_id)
            .cloned()
            .collect();
        Box::pin(async move { Ok(items) })
    }

    fn get_service(&self, id: u64) -> ApiFuture<'_, Service> {
        let found = self.services.borrow().iter().find(|s| s.id == id).cloned();
        Box::pin(async move { found.ok_or_else(|| ApiError::from_response(404, None)) })
    }

    fn create_salon(&self, draft: SalonDraft) -> ApiFuture<'_, Salon> {
        let salon = Salon {
            id: self.salons.borrow().len() as u64 + 1,
            owner: self.acting_owner.get(),
            name: draft.name,
            address: draft.address,
            lat: draft.lat,
            lng: draft.lng,
            open_time: draft.open_time,
            close_time: draft.close_time,
        };
        self.salons.borrow_mut().push(salon.clone());
        Box::pin(async move { Ok(salon) })
    }

    fn update_salon(&self, id: u64, draft: SalonDraft) -> ApiFuture<'_, Salon> {
        let mut salons = self.salons.borrow_mut();
        let result = salons
            .iter_mut()
            .find(|s| s.id == id)
            .map(|salon| {
                salon.name = draft.name.clone();
                salon.address = draft.address.clone();
                salon.lat = draft.lat;
                salon.lng = draft.lng;
                salon.open_time = draft.open_time.clone();
                salon.close_time = draft.close_time.clone();
                salon.clone()
            })
            .ok_or_else(|| ApiError::from_response(404, None));
        Box::pin(async move { result })
    }

    fn create_service(&self, salon_id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service> {
        let service = Service {
            id: self.services.borrow().len() as u64 + 1,
            salon: salon_id,
            name: draft.name,
            description: draft.description,
            duration_minutes: draft.duration_minutes,
            price: draft.price,
            is_home_service: draft.is_home_service,
        };
        self.services.borrow_mut().push(service.clone());
        Box::pin(async move { Ok(service) })
    }

    fn update_service(&self, id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service> {
        let mut services = self.services.borrow_mut();
        let result = services
            .iter_mut()
            .find(|s| s.id == id)
            .map(|service| {
                service.name = draft.name.clone();
                service.description = draft.description.clone();
                service.duration_minutes = draft.duration_minutes;
                service.price = draft.price;
                service.is_home_service = draft.is_home_service;
                service.clone()
            })
            .ok_or_else(|| ApiError::from_response(404, None));
        Box::pin(async move { result })
    }

    fn delete_service(&self, id: u64) -> ApiFuture<'_, ()> {
        self.services.borrow_mut().retain(|s| s.id != id);
        Box::pin(async move { Ok(()) })
    }
}

/// Salon record used by the booking double.
pub fn demo_salon() -> Salon {
    Salon {
        id: 5,
        owner: 2,
        name: "Shear Genius".to_string(),
        address: "12 High St".to_string(),
        lat: Some(51.5014),
        lng: Some(-0.1419),
        open_time: Some("09:00:00".to_string()),
        close_time: Some("18:00:00".to_string()),
    }
}

/// Service record used by the booking double.
pub fn demo_service() -> Service {
    Service {
        id: 9,
        salon: 5,
        name: "Cut".to_string(),
        description: String::new(),
        duration_minutes: 30,
        price: 25.0,
        is_home_service: false,
    }
}

/// Customer identity used across store tests.
pub fn demo_customer() -> UserProfile {
    UserProfile {
        id: 1,
        username: "alice".to_string(),
        email: Some("alice@example.com".to_string()),
        role: Role::Customer,
        phone: None,
        first_name: None,
        last_name: None,
    }
}

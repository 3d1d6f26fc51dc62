//! `reqwest`-backed implementation of the API traits.
//!
//! On wasm32 `reqwest` compiles down to the browser `fetch` API. The adapter
//! attaches `Authorization: Bearer <access>` from the persisted session
//! snapshot when one is present; it reads the snapshot and never writes it.
//! A dropped future aborts the underlying request; no additional timeout or
//! cancellation policy is layered on top.

use std::rc::Rc;

use booking_contract::{
    decode_mutation_outcome, decode_payment_response, AvailabilityQuery, Booking,
    CreateBookingRequest, CreatePaymentRequest, MutationOutcome, Payment, PaymentStatus,
    RegisterRequest, Salon, SalonDraft, Service, ServiceDraft, Slot, StoredSession, TokenPair,
    UserProfile, SESSION_PREF_KEY,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::{
    api::{ApiFuture, AuthApi, BookingsApi, PaymentsApi, SalonsApi},
    error::ApiError,
    prefs::{load_typed, PrefsStore},
};

/// HTTP adapter over the REST backend. Clone-cheap; holds the shared
/// `reqwest` client and a read-only handle to the preference store.
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    base_url: String,
    prefs: Rc<dyn PrefsStore>,
}

impl HttpApi {
    /// Creates an adapter rooted at `base_url` (no trailing slash).
    pub fn new(base_url: impl Into<String>, prefs: Rc<dyn PrefsStore>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            prefs,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Reads the access credential from the persisted snapshot. Corrupt or
    /// absent snapshots simply mean "no credential".
    async fn bearer(&self) -> Option<String> {
        let snapshot: Option<StoredSession> =
            load_typed(&*self.prefs, SESSION_PREF_KEY).await.ok()?;
        snapshot.map(|s| s.access)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let builder = match self.bearer().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<Value>().await.ok();
            return Err(ApiError::from_response(status.as_u16(), payload));
        }
        response.json::<T>().await.map_err(|e| ApiError {
            message: format!("response decode failed: {e}"),
            status: Some(status.as_u16()),
            payload: None,
        })
    }

    /// Variant for endpoints that answer with an empty body (204).
    async fn execute_unit(&self, builder: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let builder = match self.bearer().await {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let payload = response.json::<Value>().await.ok();
            return Err(ApiError::from_response(status.as_u16(), payload));
        }
        Ok(())
    }
}

impl AuthApi for HttpApi {
    fn login(&self, username: String, password: String) -> ApiFuture<'_, TokenPair> {
        let req = self
            .http
            .post(self.url("/api/auth/login/"))
            .json(&json!({ "username": username, "password": password }));
        Box::pin(async move { self.execute(req).await })
    }

    fn current_user(&self) -> ApiFuture<'_, UserProfile> {
        let req = self.http.get(self.url("/api/auth/me/"));
        Box::pin(async move { self.execute(req).await })
    }

    fn register(&self, payload: RegisterRequest) -> ApiFuture<'_, UserProfile> {
        let req = self.http.post(self.url("/api/auth/register/")).json(&payload);
        Box::pin(async move { self.execute(req).await })
    }
}

impl BookingsApi for HttpApi {
    fn list(&self) -> ApiFuture<'_, Vec<Booking>> {
        let req = self.http.get(self.url("/api/bookings/bookings/"));
        Box::pin(async move { self.execute(req).await })
    }

    fn get(&self, id: u64) -> ApiFuture<'_, Booking> {
        let req = self.http.get(self.url(&format!("/api/bookings/bookings/{id}/")));
        Box::pin(async move { self.execute(req).await })
    }

    fn create(&self, payload: CreateBookingRequest) -> ApiFuture<'_, Booking> {
        let req = self
            .http
            .post(self.url("/api/bookings/bookings/"))
            .json(&payload);
        Box::pin(async move { self.execute(req).await })
    }

    fn cancel(&self, id: u64) -> ApiFuture<'_, MutationOutcome> {
        let req = self
            .http
            .post(self.url(&format!("/api/bookings/bookings/{id}/cancel/")));
        Box::pin(async move {
            let value: Value = self.execute(req).await?;
            Ok(decode_mutation_outcome(value, "cancel")?)
        })
    }

    fn confirm(&self, id: u64) -> ApiFuture<'_, MutationOutcome> {
        let req = self
            .http
            .post(self.url(&format!("/api/bookings/bookings/{id}/confirm/")));
        Box::pin(async move {
            let value: Value = self.execute(req).await?;
            Ok(decode_mutation_outcome(value, "confirm")?)
        })
    }

    fn availability(&self, query: AvailabilityQuery) -> ApiFuture<'_, Vec<Slot>> {
        let req = self
            .http
            .get(self.url("/api/bookings/bookings/availability/"))
            .query(&query);
        Box::pin(async move { self.execute(req).await })
    }
}

impl PaymentsApi for HttpApi {
    fn create(&self, payload: CreatePaymentRequest) -> ApiFuture<'_, Payment> {
        let req = self.http.post(self.url("/api/payments/")).json(&payload);
        Box::pin(async move { self.execute(req).await })
    }

    fn update_status(&self, id: u64, status: PaymentStatus) -> ApiFuture<'_, Payment> {
        let req = self
            .http
            .patch(self.url(&format!("/api/payments/{id}/")))
            .json(&json!({ "status": status }));
        Box::pin(async move {
            let value: Value = self.execute(req).await?;
            Ok(decode_payment_response(value)?)
        })
    }
}

impl SalonsApi for HttpApi {
    fn list(&self) -> ApiFuture<'_, Vec<Salon>> {
        let req = self.http.get(self.url("/api/salons/salons/"));
        Box::pin(async move { self.execute(req).await })
    }

    fn get(&self, id: u64) -> ApiFuture<'_, Salon> {
        let req = self.http.get(self.url(&format!("/api/salons/salons/{id}/")));
        Box::pin(async move { self.execute(req).await })
    }

    fn services_for_salon(&self, salon_id: u64) -> ApiFuture<'_, Vec<Service>> {
        let req = self
            .http
            .get(self.url("/api/salons/services/"))
            .query(&[("salon", salon_id)]);
        Box::pin(async move { self.execute(req).await })
    }

    fn get_service(&self, id: u64) -> ApiFuture<'_, Service> {
        let req = self.http.get(self.url(&format!("/api/salons/services/{id}/")));
        Box::pin(async move { self.execute(req).await })
    }

    fn create_salon(&self, draft: SalonDraft) -> ApiFuture<'_, Salon> {
        let req = self.http.post(self.url("/api/salons/salons/")).json(&draft);
        Box::pin(async move { self.execute(req).await })
    }

    fn update_salon(&self, id: u64, draft: SalonDraft) -> ApiFuture<'_, Salon> {
        let req = self
            .http
            .put(self.url(&format!("/api/salons/salons/{id}/")))
            .json(&draft);
        Box::pin(async move { self.execute(req).await })
    }

    fn create_service(&self, salon_id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service> {
        // The service create route takes the owning salon in the body.
        let mut body = json!(&draft);
        body["salon"] = json!(salon_id);
        let req = self.http.post(self.url("/api/salons/services/")).json(&body);
        Box::pin(async move { self.execute(req).await })
    }

    fn update_service(&self, id: u64, draft: ServiceDraft) -> ApiFuture<'_, Service> {
        let req = self
            .http
            .put(self.url(&format!("/api/salons/services/{id}/")))
            .json(&draft);
        Box::pin(async move { self.execute(req).await })
    }

    fn delete_service(&self, id: u64) -> ApiFuture<'_, ()> {
        let req = self.http.delete(self.url(&format!("/api/salons/services/{id}/")));
        Box::pin(async move { self.execute_unit(req).await })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::prefs::MemoryPrefsStore;

    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpApi::new(
            "https://salon.example/",
            Rc::new(MemoryPrefsStore::default()),
        );
        assert_eq!(api.url("/api/auth/me/"), "https://salon.example/api/auth/me/");
    }
}

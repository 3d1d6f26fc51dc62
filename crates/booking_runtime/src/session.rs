//! The session store: who is logged in, with what credential pair.

use std::{cell::RefCell, rc::Rc};

use booking_contract::{RegisterRequest, StoredSession, UserProfile, SESSION_PREF_KEY};
use platform_api::{load_typed, save_typed, ApiError, AuthApi, PrefsStore};

/// Published session state. Invariant: `access` and `refresh` are both
/// present or both absent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    /// Authenticated identity; absent when unauthenticated.
    pub user: Option<UserProfile>,
    /// Access credential.
    pub access: Option<String>,
    /// Refresh credential.
    pub refresh: Option<String>,
    /// Whether an operation is in flight.
    pub loading: bool,
    /// Last operation failure, for inline display.
    pub error: Option<String>,
}

impl SessionState {
    /// Whether a credential pair is held.
    pub fn is_authenticated(&self) -> bool {
        self.access.is_some()
    }

    /// The current role claim, when an identity is held.
    pub fn role(&self) -> Option<booking_contract::Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

/// Transition event for [`apply_session_event`].
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// An operation started.
    Start,
    /// A snapshot became authoritative (login success or restore).
    Establish(StoredSession),
    /// The session ended or never began (logout, registration success).
    SignedOut,
    /// An operation failed. Clears the credential pair so the published
    /// state never pairs an error with stale credentials.
    Fail(String),
}

/// Applies a [`SessionEvent`] to the session state.
pub fn apply_session_event(state: &mut SessionState, event: SessionEvent) {
    match event {
        SessionEvent::Start => {
            state.loading = true;
            state.error = None;
        }
        SessionEvent::Establish(snapshot) => {
            state.user = snapshot.user;
            state.access = Some(snapshot.access);
            state.refresh = Some(snapshot.refresh);
            state.loading = false;
            state.error = None;
        }
        SessionEvent::SignedOut => {
            state.user = None;
            state.access = None;
            state.refresh = None;
            state.loading = false;
            state.error = None;
        }
        SessionEvent::Fail(message) => {
            state.user = None;
            state.access = None;
            state.refresh = None;
            state.loading = false;
            state.error = Some(message);
        }
    }
}

/// Owns the session state, its persistence, and the auth operations.
///
/// The store is the only writer of the persisted snapshot; the HTTP adapter
/// reads it for the bearer credential. Every state change goes through
/// `publish` so the UI layer can mirror it into a reactive signal.
#[derive(Clone)]
pub struct SessionStore {
    auth: Rc<dyn AuthApi>,
    prefs: Rc<dyn PrefsStore>,
    state: Rc<RefCell<SessionState>>,
    publish: Rc<dyn Fn(&SessionState)>,
}

impl SessionStore {
    /// Creates a store publishing through `publish`.
    pub fn new(
        auth: Rc<dyn AuthApi>,
        prefs: Rc<dyn PrefsStore>,
        publish: Rc<dyn Fn(&SessionState)>,
    ) -> Self {
        Self {
            auth,
            prefs,
            state: Rc::new(RefCell::new(SessionState::default())),
            publish,
        }
    }

    /// Snapshot of the current state.
    pub fn current(&self) -> SessionState {
        self.state.borrow().clone()
    }

    fn emit(&self, event: SessionEvent) {
        let mut state = self.state.borrow_mut();
        apply_session_event(&mut state, event);
        (self.publish)(&state);
    }

    /// Hydrates the session from the persisted snapshot at process start.
    ///
    /// Absent or corrupt snapshots degrade silently to the empty session;
    /// this never fails.
    pub async fn restore(&self) {
        match load_typed::<StoredSession>(&*self.prefs, SESSION_PREF_KEY).await {
            Ok(Some(snapshot)) => self.emit(SessionEvent::Establish(snapshot)),
            Ok(None) | Err(_) => self.emit(SessionEvent::SignedOut),
        }
    }

    /// Two-phase login: exchange credentials for a token pair, persist it so
    /// the identity fetch can authenticate, then persist and publish the
    /// combined snapshot.
    ///
    /// On failure at either phase the persisted snapshot is erased and the
    /// published state is unauthenticated with the failure message. This
    /// matches the backend client it replaces: a failed re-login while a
    /// session is active also clears that session.
    ///
    /// # Errors
    ///
    /// Propagates the phase failure after publishing it.
    pub async fn login(&self, username: &str, password: &str) -> Result<StoredSession, ApiError> {
        self.emit(SessionEvent::Start);
        match self.login_phases(username, password).await {
            Ok(snapshot) => {
                self.emit(SessionEvent::Establish(snapshot.clone()));
                Ok(snapshot)
            }
            Err(err) => {
                let _ = self.prefs.delete(SESSION_PREF_KEY).await;
                self.emit(SessionEvent::Fail(err.message.clone()));
                Err(err)
            }
        }
    }

    async fn login_phases(
        &self,
        username: &str,
        password: &str,
    ) -> Result<StoredSession, ApiError> {
        let tokens = self
            .auth
            .login(username.to_string(), password.to_string())
            .await?;

        // The identity endpoint authenticates via the persisted snapshot, so
        // the credential pair must be durable before the next call.
        let partial = StoredSession {
            access: tokens.access,
            refresh: tokens.refresh,
            user: None,
        };
        save_typed(&*self.prefs, SESSION_PREF_KEY, &partial)
            .await
            .map_err(ApiError::local)?;

        let user = self.auth.current_user().await?;
        let snapshot = StoredSession {
            user: Some(user),
            ..partial
        };
        save_typed(&*self.prefs, SESSION_PREF_KEY, &snapshot)
            .await
            .map_err(ApiError::local)?;
        Ok(snapshot)
    }

    /// Creates an account without authenticating it. Success publishes an
    /// explicit signed-out state; the user logs in separately.
    ///
    /// # Errors
    ///
    /// Propagates the collaborator failure after publishing it.
    pub async fn register(&self, payload: RegisterRequest) -> Result<UserProfile, ApiError> {
        self.emit(SessionEvent::Start);
        match self.auth.register(payload).await {
            Ok(profile) => {
                self.emit(SessionEvent::SignedOut);
                Ok(profile)
            }
            Err(err) => {
                self.emit(SessionEvent::Fail(err.message.clone()));
                Err(err)
            }
        }
    }

    /// Clears the in-memory session and erases the persisted snapshot.
    /// Cannot fail; a storage error still leaves the session signed out.
    pub async fn logout(&self) {
        self.emit(SessionEvent::SignedOut);
        let _ = self.prefs.delete(SESSION_PREF_KEY).await;
    }
}

#[cfg(test)]
mod tests {
    use booking_contract::{Role, TokenPair};
    use futures::executor::block_on;
    use platform_api::{demo_customer, MemoryAuthApi, MemoryPrefsStore};
    use pretty_assertions::assert_eq;

    use super::*;

    struct Harness {
        auth: MemoryAuthApi,
        prefs: MemoryPrefsStore,
        store: SessionStore,
        published: Rc<RefCell<Vec<SessionState>>>,
    }

    fn harness(auth: MemoryAuthApi) -> Harness {
        let prefs = MemoryPrefsStore::default();
        let published: Rc<RefCell<Vec<SessionState>>> = Rc::default();
        let sink = Rc::clone(&published);
        let store = SessionStore::new(
            Rc::new(auth.clone()),
            Rc::new(prefs.clone()),
            Rc::new(move |state: &SessionState| sink.borrow_mut().push(state.clone())),
        );
        Harness {
            auth,
            prefs,
            store,
            published,
        }
    }

    fn alice_account() -> MemoryAuthApi {
        MemoryAuthApi::with_account(
            TokenPair {
                access: "A1".to_string(),
                refresh: "R1".to_string(),
            },
            demo_customer(),
        )
    }

    #[test]
    fn restore_of_missing_snapshot_yields_empty_session() {
        let h = harness(MemoryAuthApi::default());
        block_on(h.store.restore());
        let state = h.store.current();
        assert_eq!(state.user, None);
        assert_eq!(state.access, None);
        assert!(!state.loading);
    }

    #[test]
    fn restore_of_corrupt_snapshot_degrades_silently() {
        let h = harness(MemoryAuthApi::default());
        block_on(h.prefs.save(SESSION_PREF_KEY, "{not json".to_string())).expect("seed");
        block_on(h.store.restore());
        assert_eq!(h.store.current(), SessionState::default());
    }

    #[test]
    fn restore_hydrates_a_valid_snapshot() {
        let h = harness(MemoryAuthApi::default());
        let snapshot = StoredSession {
            access: "A1".to_string(),
            refresh: "R1".to_string(),
            user: Some(demo_customer()),
        };
        block_on(save_typed(&h.prefs, SESSION_PREF_KEY, &snapshot)).expect("seed");
        block_on(h.store.restore());
        let state = h.store.current();
        assert_eq!(state.access.as_deref(), Some("A1"));
        assert_eq!(state.user.as_ref().map(|u| u.role), Some(Role::Customer));
    }

    #[test]
    fn login_persists_tokens_then_identity() {
        let h = harness(alice_account());
        let snapshot = block_on(h.store.login("alice", "pw")).expect("login");

        assert_eq!(snapshot.access, "A1");
        assert_eq!(snapshot.refresh, "R1");
        assert_eq!(snapshot.user.as_ref().map(|u| u.username.as_str()), Some("alice"));

        let state = h.store.current();
        assert!(state.is_authenticated());
        assert_eq!(state.error, None);

        let persisted: StoredSession =
            serde_json::from_str(&h.prefs.raw(SESSION_PREF_KEY).expect("persisted")).expect("json");
        assert_eq!(persisted, snapshot);
    }

    #[test]
    fn login_failure_at_token_phase_leaves_no_credentials() {
        let h = harness(MemoryAuthApi::default());
        *h.auth.login_failure.borrow_mut() =
            Some(ApiError::from_response(401, Some(serde_json::json!({"detail": "bad creds"}))));

        let err = block_on(h.store.login("alice", "nope")).expect_err("must fail");
        assert_eq!(err.message, "bad creds");

        let state = h.store.current();
        assert_eq!(state.access, None);
        assert_eq!(state.refresh, None);
        assert_eq!(state.error.as_deref(), Some("bad creds"));
        assert_eq!(h.prefs.raw(SESSION_PREF_KEY), None);
    }

    #[test]
    fn login_failure_at_identity_phase_discards_partial_credentials() {
        let h = harness(alice_account());
        *h.auth.identity_failure.borrow_mut() = Some(ApiError::from_response(500, None));

        block_on(h.store.login("alice", "pw")).expect_err("must fail");

        // Phase one persisted a token-only snapshot; the failure path must
        // have erased it again.
        assert_eq!(h.prefs.raw(SESSION_PREF_KEY), None);
        let state = h.store.current();
        assert_eq!(state.access, None);
        assert!(state.error.is_some());
    }

    #[test]
    fn login_publishes_loading_then_final_state() {
        let h = harness(alice_account());
        block_on(h.store.login("alice", "pw")).expect("login");
        let published = h.published.borrow();
        assert!(published.first().expect("start state").loading);
        assert!(!published.last().expect("final state").loading);
    }

    #[test]
    fn register_success_stays_signed_out() {
        let h = harness(MemoryAuthApi::default());
        let payload = RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::Customer,
            first_name: None,
            last_name: None,
            phone: None,
        };
        let profile = block_on(h.store.register(payload)).expect("register");
        assert_eq!(profile.username, "bob");

        let state = h.store.current();
        assert!(!state.is_authenticated());
        assert_eq!(state.error, None);
        assert_eq!(h.auth.registered.borrow().len(), 1);
    }

    #[test]
    fn register_failure_publishes_and_propagates() {
        let h = harness(MemoryAuthApi::default());
        *h.auth.register_failure.borrow_mut() = Some(ApiError::local("username taken"));
        let payload = RegisterRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: "pw".to_string(),
            role: Role::SalonOwner,
            first_name: None,
            last_name: None,
            phone: None,
        };
        let err = block_on(h.store.register(payload)).expect_err("must fail");
        assert_eq!(err.message, "username taken");
        assert_eq!(h.store.current().error.as_deref(), Some("username taken"));
    }

    #[test]
    fn logout_clears_memory_and_snapshot() {
        let h = harness(alice_account());
        block_on(h.store.login("alice", "pw")).expect("login");
        assert!(h.prefs.raw(SESSION_PREF_KEY).is_some());

        block_on(h.store.logout());
        assert_eq!(h.store.current(), SessionState::default());
        assert_eq!(h.prefs.raw(SESSION_PREF_KEY), None);
    }
}

//! The session repository: owns the current session and everything that
//! changes it.
//!
//! It is responsible for:
//! - Rehydrating the persisted session once at start-up
//! - Running logins through verify → persist → commit
//! - Logging out (delete, then reset)
//! - Publishing a [`SessionSnapshot`] after every change
//!
//! # Concurrency note
//!
//! The repository is cheap to clone (one `Arc`) and every method takes
//! `&self`, so screens and background tasks each hold their own clone.
//! Writers are serialized by one async mutex held across persist + commit:
//! two commits can never interleave, and the record is always replaced as a
//! whole. The network step of a staff login runs OUTSIDE that mutex, so a
//! slow server never blocks a logout.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use hostel_protocol::{
    Codec, DEMO_STUDENT_ID, JsonCodec, Role, SessionRecord, StudentProfile,
};
use hostel_storage::SessionStore;
use secrecy::ExposeSecret;
use tokio::sync::{Mutex, watch};

use crate::{
    Authenticator, DemoStudentDirectory, LoginRequest, SessionConfig,
    SessionError, SessionSnapshot, StaffCredentials, StudentDirectory,
};

/// Owns the canonical in-memory session and keeps it in sync with durable
/// storage.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ rehydrate() ──→ login() ──→ logout() ──→ login() ...
///  │             │              │            │
///  ▼             ▼              ▼            ▼
/// [None,      [stored or     [logged in]  [logged out,
///  rehydrating] logged out]                storage empty]
/// ```
///
/// ## Type parameters
///
/// - `S` — where the record is persisted ([`SessionStore`])
/// - `A` — who verifies staff credentials ([`Authenticator`])
/// - `C` — how the record is encoded (defaults to [`JsonCodec`])
pub struct SessionRepository<S, A, C = JsonCodec> {
    inner: Arc<Inner<S, A, C>>,
}

/// `#[derive(Clone)]` would demand `S: Clone, A: Clone, C: Clone`; we only
/// clone the `Arc`.
impl<S, A, C> Clone for SessionRepository<S, A, C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<S, A, C> {
    store: S,
    auth: A,
    codec: C,
    directory: Arc<dyn StudentDirectory>,
    config: SessionConfig,

    /// Current snapshot + change notification. Screens hold receivers.
    state: watch::Sender<SessionSnapshot>,

    /// Serializes persist + commit for login, logout, and rehydration.
    commit: Mutex<CommitState>,

    /// Source of login tickets, in call order.
    next_ticket: AtomicU64,

    /// Logins currently between "called" and "settled".
    logins_in_flight: AtomicUsize,
}

/// Bookkeeping guarded by the commit mutex.
#[derive(Debug, Default)]
struct CommitState {
    /// Ticket of the most recently committed login (0 = none yet).
    last_login_ticket: u64,

    /// Whether the one-time storage read has run.
    rehydrated: bool,
}

// ---------------------------------------------------------------------------
// Login pipeline stages
// ---------------------------------------------------------------------------

/// A record that passed validation and (for staff) the server.
/// Can only become [`Persisted`] by going through storage.
struct Verified(SessionRecord);

/// A record that is durably stored. Only this can be committed.
struct Persisted(SessionRecord);

impl<S, A> SessionRepository<S, A>
where
    S: SessionStore,
    A: Authenticator,
{
    /// Creates a repository with the JSON codec and the demo student
    /// directory. The session stays `None` (rehydrating) until
    /// [`rehydrate`](Self::rehydrate) runs.
    pub fn new(store: S, auth: A, config: SessionConfig) -> Self {
        Self::with_codec(store, auth, JsonCodec, config)
    }

    /// Creates a repository and immediately rehydrates it.
    pub async fn open(store: S, auth: A, config: SessionConfig) -> Self {
        let repository = Self::new(store, auth, config);
        repository.rehydrate().await;
        repository
    }
}

impl<S, A, C> SessionRepository<S, A, C>
where
    S: SessionStore,
    A: Authenticator,
    C: Codec,
{
    /// Creates a repository with a custom codec.
    pub fn with_codec(store: S, auth: A, codec: C, config: SessionConfig) -> Self {
        let (state, _) = watch::channel(SessionSnapshot::initial());
        Self {
            inner: Arc::new(Inner {
                store,
                auth,
                codec,
                directory: Arc::new(DemoStudentDirectory),
                config,
                state,
                commit: Mutex::new(CommitState::default()),
                next_ticket: AtomicU64::new(0),
                logins_in_flight: AtomicUsize::new(0),
            }),
        }
    }

    /// Replaces the student directory. Call before sharing the repository;
    /// clones made earlier keep the previous directory.
    pub fn with_directory(self, directory: impl StudentDirectory) -> Self {
        let directory: Arc<dyn StudentDirectory> = Arc::new(directory);
        match Arc::try_unwrap(self.inner) {
            Ok(mut inner) => {
                inner.directory = directory;
                Self {
                    inner: Arc::new(inner),
                }
            }
            Err(shared) => {
                tracing::warn!(
                    "repository already shared, keeping the previous student directory"
                );
                Self { inner: shared }
            }
        }
    }

    // =====================================================================
    // Read side (the consumer contract)
    // =====================================================================

    /// The last-resolved session, or `None` while rehydration is
    /// outstanding.
    pub fn current(&self) -> Option<SessionRecord> {
        self.inner.state.borrow().session.clone()
    }

    /// Returns `true` until the initial storage read completes.
    pub fn is_rehydrating(&self) -> bool {
        self.inner.state.borrow().rehydrating
    }

    /// Returns `true` while a login is in flight.
    pub fn is_login_loading(&self) -> bool {
        self.inner.state.borrow().login_loading
    }

    /// Returns `true` if a logged-in session is current.
    pub fn is_logged_in(&self) -> bool {
        self.inner.state.borrow().is_logged_in()
    }

    /// A copy of the full current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Subscribes to snapshot changes.
    ///
    /// The receiver sees the current snapshot immediately and is woken on
    /// every transition: rehydration complete, login commit, logout, and
    /// loading-flag flips.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.state.subscribe()
    }

    /// Waits until rehydration has completed and returns the session.
    pub async fn rehydrated(&self) -> SessionRecord {
        let mut rx = self.subscribe();
        match rx.wait_for(|snapshot| !snapshot.rehydrating).await {
            Ok(snapshot) => snapshot.session.clone().unwrap_or_default(),
            // Unreachable while `self` holds the sender.
            Err(_) => SessionRecord::logged_out(),
        }
    }

    /// The profile of the logged-in student, if the current session is a
    /// student session.
    pub fn student_profile(&self) -> Option<StudentProfile> {
        let student_id = {
            let state = self.inner.state.borrow();
            let session = state.session.as_ref()?;
            if !session.is_logged_in || session.role != Some(Role::Student) {
                return None;
            }
            session.student_id.clone()?
        };
        self.inner.directory.lookup(&student_id)
    }

    /// The login configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    // =====================================================================
    // Rehydration
    // =====================================================================

    /// Reads the persisted session once and makes it current.
    ///
    /// Never fails: absent, unreadable, or corrupt storage all yield the
    /// logged-out record. If a login or logout already committed, its
    /// result is kept. Calling this again is a no-op.
    pub async fn rehydrate(&self) {
        let mut commit = self.inner.commit.lock().await;
        if commit.rehydrated {
            return;
        }

        let loaded = self.load_persisted().await;
        commit.rehydrated = true;

        self.inner.state.send_modify(|snapshot| {
            snapshot.rehydrating = false;
            if snapshot.session.is_none() {
                snapshot.session = Some(loaded);
            }
        });

        tracing::info!(
            logged_in = self.is_logged_in(),
            "session rehydrated"
        );
    }

    async fn load_persisted(&self) -> SessionRecord {
        let bytes = match self.inner.store.read().await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return SessionRecord::logged_out(),
            Err(e) => {
                tracing::warn!(error = %e, "session storage unreadable, starting logged out");
                return SessionRecord::logged_out();
            }
        };

        let record = self
            .inner
            .codec
            .decode::<SessionRecord>(&bytes)
            .and_then(|record| record.validate().map(|()| record));

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt stored session");
                return SessionRecord::logged_out();
            }
        };

        if record.role == Some(Role::Student) {
            let known = record
                .student_id
                .as_deref()
                .and_then(|id| self.inner.directory.lookup(id))
                .is_some();
            if !known {
                tracing::warn!(
                    student_id = record.student_id.as_deref().unwrap_or_default(),
                    "discarding stored session of an unknown student"
                );
                return SessionRecord::logged_out();
            }
        }
        record
    }

    // =====================================================================
    // Login
    // =====================================================================

    /// Logs in and returns the committed session.
    ///
    /// Steps, strictly in order: validate the request, verify with the
    /// server (staff flow only), write the record to storage, make it
    /// current and notify subscribers. A failure at any step leaves the
    /// current session untouched.
    ///
    /// # Errors
    /// - [`SessionError::Validation`] — wrong flow for the role or missing
    ///   credentials; nothing else ran
    /// - [`SessionError::Authentication`] / [`SessionError::Network`] —
    ///   the staff-login call failed
    /// - [`SessionError::Storage`] — the record couldn't be persisted
    /// - [`SessionError::Superseded`] — a login called after this one
    ///   committed first
    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<SessionRecord, SessionError> {
        // Tickets are taken in call order: 1, 2, 3, ...
        let ticket = self.inner.next_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        let role = request.role().clone();
        let _loading =
            LoadingGuard::enter(&self.inner.state, &self.inner.logins_in_flight);

        tracing::debug!(%role, ticket, "login started");

        let result = self.run_login(ticket, request).await;
        match &result {
            Ok(record) => tracing::info!(
                %role,
                mock = record.is_mock(),
                "login committed"
            ),
            Err(e) => tracing::warn!(%role, error = %e, "login failed"),
        }
        result
    }

    async fn run_login(
        &self,
        ticket: u64,
        request: LoginRequest,
    ) -> Result<SessionRecord, SessionError> {
        let verified = self.verify(request).await?;
        let mut commit = self.inner.commit.lock().await;
        let persisted = self.persist(ticket, &mut commit, verified).await?;
        Ok(self.commit(persisted))
    }

    /// Step 1: validation, then the server (staff) or local synthesis.
    async fn verify(
        &self,
        request: LoginRequest,
    ) -> Result<Verified, SessionError> {
        if request.role().as_str().is_empty() {
            return Err(SessionError::Validation("a role is required to sign in".into()));
        }
        match request {
            LoginRequest::StaffCredentials {
                role,
                staff_id,
                password,
                hostel,
            } => {
                if !role.is_staff() {
                    return Err(SessionError::Validation(
                        "students sign in without a staff id or password".into(),
                    ));
                }
                let staff_id = staff_id.trim().to_string();
                if staff_id.is_empty() || password.expose_secret().is_empty() {
                    return Err(SessionError::Validation(format!(
                        "staff id and password are required to sign in as {role}"
                    )));
                }

                let credentials = StaffCredentials { staff_id, password };
                tracing::debug!(%role, staff_id = %credentials.staff_id, "verifying staff credentials");
                let response = self.inner.auth.verify_staff(&credentials).await?;

                let record = SessionRecord::staff(response, hostel);
                record.validate()?;
                Ok(Verified(record))
            }
            LoginRequest::RoleOnly { role, hostel } => {
                if role.is_staff() {
                    if !self.inner.config.allow_mock_staff {
                        return Err(SessionError::Validation(format!(
                            "a staff id and password are required to sign in as {role}"
                        )));
                    }
                    tracing::warn!(
                        %role,
                        "issuing unverified local session for a staff role"
                    );
                } else if self.inner.directory.lookup(DEMO_STUDENT_ID).is_none() {
                    return Err(SessionError::Validation(
                        "no student profile is available for local sign-in".into(),
                    ));
                }
                Ok(Verified(SessionRecord::mock(role, hostel)))
            }
        }
    }

    /// Step 2: exactly one durable write, unless a later login already won.
    async fn persist(
        &self,
        ticket: u64,
        commit: &mut CommitState,
        Verified(record): Verified,
    ) -> Result<Persisted, SessionError> {
        if ticket < commit.last_login_ticket {
            tracing::debug!(ticket, winner = commit.last_login_ticket, "login superseded");
            return Err(SessionError::Superseded);
        }

        let bytes = self.inner.codec.encode(&record)?;
        self.inner.store.write(&bytes).await?;
        commit.last_login_ticket = ticket;
        Ok(Persisted(record))
    }

    /// Step 3: make the persisted record current and notify.
    fn commit(&self, Persisted(record): Persisted) -> SessionRecord {
        self.inner.state.send_modify(|snapshot| {
            snapshot.session = Some(record.clone());
        });
        record
    }

    // =====================================================================
    // Logout
    // =====================================================================

    /// Deletes the persisted session, then resets the in-memory one.
    ///
    /// Idempotent: logging out while logged out succeeds without
    /// notifying subscribers.
    ///
    /// # Errors
    /// [`SessionError::Storage`] if the stored record couldn't be deleted.
    /// In that case the in-memory session is left as it was, so what the
    /// user sees keeps matching what the next start will rehydrate.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let _commit = self.inner.commit.lock().await;

        if let Err(e) = self.inner.store.delete().await {
            tracing::warn!(error = %e, "could not delete stored session, logout skipped");
            return Err(e.into());
        }

        let changed = self.inner.state.send_if_modified(|snapshot| {
            let logged_out = Some(SessionRecord::logged_out());
            if snapshot.session == logged_out {
                false
            } else {
                snapshot.session = logged_out;
                true
            }
        });

        if changed {
            tracing::info!("logged out");
        } else {
            tracing::debug!("logout while already logged out");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LoadingGuard
// ---------------------------------------------------------------------------

/// Keeps `login_loading` true while alive; dropping the last guard turns it
/// off on every exit path.
///
/// The counter is only touched inside the watch update closure, which runs
/// under the watch's write lock, so the count and the published flag can't
/// disagree. `send_if_modified` never awaits, so `Drop` can call it.
struct LoadingGuard<'a> {
    state: &'a watch::Sender<SessionSnapshot>,
    in_flight: &'a AtomicUsize,
}

impl<'a> LoadingGuard<'a> {
    fn enter(
        state: &'a watch::Sender<SessionSnapshot>,
        in_flight: &'a AtomicUsize,
    ) -> Self {
        state.send_if_modified(|snapshot| {
            in_flight.fetch_add(1, Ordering::SeqCst);
            let was_loading = snapshot.login_loading;
            snapshot.login_loading = true;
            !was_loading
        });
        Self { state, in_flight }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let in_flight = self.in_flight;
        self.state.send_if_modified(|snapshot| {
            let remaining = in_flight.fetch_sub(1, Ordering::SeqCst) - 1;
            let loading = remaining > 0;
            let changed = snapshot.login_loading != loading;
            snapshot.login_loading = loading;
            changed
        });
    }
}

//! `Portal` builder and the wiring between the layers.
//!
//! This is the entry point for an app screen. It ties together all the
//! layers: storage → session → HTTP client → announcement board.

use std::path::PathBuf;

use hostel_announcements::AnnouncementBoard;
use hostel_client::{
    BaseUrl, ClientConfig, DEFAULT_API_PORT, HttpClient, RuntimeTarget, resolve_base_url,
};
use hostel_protocol::{Announcement, SessionRecord, StudentProfile};
use hostel_session::{LoginRequest, SessionConfig, SessionRepository, SessionSnapshot};
use hostel_storage::{FileStore, SESSION_KEY, SessionStore};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::HostelError;

/// Builder for configuring and opening a [`Portal`].
///
/// # Example
///
/// ```rust,no_run
/// use hostel::prelude::*;
///
/// # async fn run() -> Result<(), HostelError> {
/// let portal = Portal::builder()
///     .runtime_target(RuntimeTarget::Web)
///     .build()
///     .await?;
///
/// portal.login(LoginRequest::student()).await?;
/// assert!(portal.is_logged_in());
/// # Ok(())
/// # }
/// ```
///
/// Base URL, in order of precedence: [`base_url`](Self::base_url), then
/// [`runtime_target`](Self::runtime_target) with
/// [`api_port`](Self::api_port), then [`BaseUrl::from_env`].
pub struct PortalBuilder {
    base_url: Option<BaseUrl>,
    runtime_target: Option<RuntimeTarget>,
    api_port: u16,
    storage_dir: Option<PathBuf>,
    session_config: SessionConfig,
    client_config: ClientConfig,
}

impl PortalBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            runtime_target: None,
            api_port: DEFAULT_API_PORT,
            storage_dir: None,
            session_config: SessionConfig::default(),
            client_config: ClientConfig::default(),
        }
    }

    /// Uses an explicit API root, skipping resolution.
    pub fn base_url(mut self, base_url: BaseUrl) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Resolves the API root for where the portal runs.
    pub fn runtime_target(mut self, target: RuntimeTarget) -> Self {
        self.runtime_target = Some(target);
        self
    }

    /// Sets the API port used with [`runtime_target`](Self::runtime_target).
    pub fn api_port(mut self, port: u16) -> Self {
        self.api_port = port;
        self
    }

    /// Stores the session under `dir` instead of the platform data
    /// directory. Only used by [`build`](Self::build).
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the HTTP client configuration.
    pub fn client_config(mut self, config: ClientConfig) -> Self {
        self.client_config = config;
        self
    }

    /// Opens the portal with a [`FileStore`] and rehydrates the session.
    pub async fn build(self) -> Result<Portal<FileStore>, HostelError> {
        let store = match &self.storage_dir {
            Some(dir) => FileStore::new(dir, SESSION_KEY)?,
            None => FileStore::open_default()?,
        };
        tracing::debug!(path = %store.path().display(), "session file");
        self.build_with_store(store).await
    }

    /// Opens the portal over any [`SessionStore`] and rehydrates the
    /// session.
    pub async fn build_with_store<S: SessionStore>(
        self,
        store: S,
    ) -> Result<Portal<S>, HostelError> {
        let base_url = match (self.base_url, self.runtime_target) {
            (Some(url), _) => url,
            (None, Some(target)) => resolve_base_url(&target, self.api_port),
            (None, None) => BaseUrl::from_env()?,
        };
        tracing::info!(%base_url, "hostel API");

        let client = HttpClient::new(base_url, &self.client_config)?;
        let session = SessionRepository::new(store, client.clone(), self.session_config);
        let token_sync = spawn_token_sync(session.subscribe(), client.clone());

        session.rehydrate().await;
        forward_token(&session.subscribe().borrow(), &client);

        Ok(Portal {
            board: AnnouncementBoard::new(client.clone()),
            client,
            session,
            token_sync,
        })
    }
}

impl Default for PortalBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// An open portal: the rehydrated session, the HTTP client, and the
/// announcement board, wired together.
///
/// A background task forwards the session's token to the HTTP client
/// whenever the session changes, including changes made through clones of
/// [`session`](Self::session). It stops when the portal is dropped.
pub struct Portal<S = FileStore> {
    session: SessionRepository<S, HttpClient>,
    client: HttpClient,
    board: AnnouncementBoard<HttpClient>,
    token_sync: JoinHandle<()>,
}

impl Portal {
    /// Creates a new builder.
    pub fn builder() -> PortalBuilder {
        PortalBuilder::new()
    }
}

impl<S: SessionStore> Portal<S> {
    /// The session repository. Clone it to hand to screens.
    pub fn session(&self) -> &SessionRepository<S, HttpClient> {
        &self.session
    }

    /// The HTTP client, carrying the current session's bearer token.
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// The announcement board, backed by [`client`](Self::client).
    pub fn board(&self) -> &AnnouncementBoard<HttpClient> {
        &self.board
    }

    /// The current session; logged out if nothing is stored.
    pub fn current(&self) -> SessionRecord {
        self.session.current().unwrap_or_default()
    }

    /// Returns `true` if a logged-in session is current.
    pub fn is_logged_in(&self) -> bool {
        self.session.is_logged_in()
    }

    /// The logged-in student's profile; `None` for staff or when logged
    /// out.
    pub fn student_profile(&self) -> Option<StudentProfile> {
        self.session.student_profile()
    }

    /// Subscribes to session changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.session.subscribe()
    }

    /// Logs in. The client carries the session's token when this returns.
    pub async fn login(&self, request: LoginRequest) -> Result<SessionRecord, HostelError> {
        let record = self.session.login(request).await?;
        self.sync_token();
        Ok(record)
    }

    /// Logs out. A storage failure is logged and otherwise ignored: the
    /// session simply stays as it was.
    pub async fn logout(&self) {
        if let Err(e) = self.session.logout().await {
            tracing::warn!(error = %e, "logout failed, session kept");
        }
        self.sync_token();
    }

    /// Reloads the announcement board from the server.
    pub async fn refresh_announcements(&self) -> Result<Vec<Announcement>, HostelError> {
        Ok(self.board.refresh().await?)
    }

    /// Copies the session's current token to the client now instead of
    /// waiting for the sync task.
    fn sync_token(&self) {
        forward_token(&self.session.subscribe().borrow(), &self.client);
    }
}

impl<S> Drop for Portal<S> {
    fn drop(&mut self) {
        self.token_sync.abort();
    }
}

/// Keeps the client's bearer token equal to the session's token.
fn spawn_token_sync(
    mut updates: watch::Receiver<SessionSnapshot>,
    client: HttpClient,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            forward_token(&updates.borrow_and_update(), &client);

            if updates.changed().await.is_err() {
                break;
            }
        }
        tracing::debug!("session closed, token sync stopped");
    })
}

/// Sets the client's token from `snapshot`.
///
/// Callers pass a borrowed watch value: the borrow holds the channel's read
/// lock, so no commit can land between reading the token and setting it.
/// Any later commit wakes the sync task, which writes again.
fn forward_token(snapshot: &SessionSnapshot, client: &HttpClient) {
    let token = snapshot
        .session
        .as_ref()
        .and_then(|record| record.token.clone());
    client.set_token(token);
}

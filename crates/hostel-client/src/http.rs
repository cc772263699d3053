//! The reqwest-backed client for the hostel API.
//!
//! One [`HttpClient`] serves both consumers:
//!
//! - the session layer, through [`Authenticator`] (`POST /auth/staff-login`)
//! - the announcement board, through [`AnnouncementApi`]
//!   (`GET/POST/PUT/DELETE /announcements[/{id}]`)
//!
//! Clones share the connection pool and the bearer token.

use std::sync::{Arc, PoisonError, RwLock};

use hostel_announcements::{AnnouncementApi, AnnouncementError};
use hostel_protocol::{
    Announcement, AnnouncementDraft, AnnouncementId, ErrorBody, MOCK_TOKEN, StaffLoginBody,
    StaffLoginResponse,
};
use hostel_session::{Authenticator, SessionError, StaffCredentials};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;

use crate::{BaseUrl, ClientConfig, ClientError};

/// Shown when the server rejects a staff login without saying why.
const LOGIN_FAILED: &str = "Login failed";

/// reqwest client for the hostel API. Clones share the connection pool and
/// the bearer token.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    base_url: BaseUrl,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpClient {
    /// Builds a client for `base_url` with the configured request timeout.
    pub fn new(base_url: BaseUrl, config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// The API root every endpoint is joined onto.
    pub fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Sets (or clears) the token sent as `Authorization: Bearer` on
    /// announcement calls. The mock sentinel is stored but never sent.
    pub fn set_token(&self, token: Option<String>) {
        // A panic while holding the lock can't leave an Option half-written.
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    /// Returns `true` if a token is set, the mock sentinel included.
    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|token| token != MOCK_TOKEN)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.bearer() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends an announcement request and maps every non-2xx answer.
    async fn announcement_call(
        &self,
        request: RequestBuilder,
        id: Option<&AnnouncementId>,
    ) -> Result<Response, AnnouncementError> {
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| AnnouncementError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if let (StatusCode::NOT_FOUND, Some(id)) = (status, id) {
            return Err(AnnouncementError::NotFound(id.clone()));
        }
        let message = error_message(response)
            .await
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| "request failed".to_string());
        Err(AnnouncementError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The token stays out of Debug output.
        f.debug_struct("HttpClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.has_token())
            .finish()
    }
}

impl Authenticator for HttpClient {
    async fn verify_staff(
        &self,
        credentials: &StaffCredentials,
    ) -> Result<StaffLoginResponse, SessionError> {
        let body = StaffLoginBody {
            staff_id: &credentials.staff_id,
            password: credentials.password.expose_secret(),
        };
        let response = self
            .client
            .post(self.base_url.join("/auth/staff-login"))
            .json(&body)
            .send()
            .await
            .map_err(|e| SessionError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<StaffLoginResponse>()
                .await
                .map_err(|e| SessionError::Network(format!("unreadable staff-login response: {e}")));
        }

        tracing::debug!(%status, staff_id = %credentials.staff_id, "staff login rejected");
        let message = error_message(response)
            .await
            .unwrap_or_else(|| LOGIN_FAILED.to_string());
        Err(SessionError::Authentication(message))
    }
}

impl AnnouncementApi for HttpClient {
    async fn list(&self) -> Result<Vec<Announcement>, AnnouncementError> {
        let request = self.client.get(self.base_url.join("/announcements"));
        decode(self.announcement_call(request, None).await?).await
    }

    async fn create(&self, draft: &AnnouncementDraft) -> Result<Announcement, AnnouncementError> {
        let request = self
            .client
            .post(self.base_url.join("/announcements"))
            .json(draft);
        decode(self.announcement_call(request, None).await?).await
    }

    async fn update(
        &self,
        id: &AnnouncementId,
        draft: &AnnouncementDraft,
    ) -> Result<Announcement, AnnouncementError> {
        let request = self
            .client
            .put(self.base_url.join(&format!("/announcements/{id}")))
            .json(draft);
        decode(self.announcement_call(request, Some(id)).await?).await
    }

    async fn delete(&self, id: &AnnouncementId) -> Result<(), AnnouncementError> {
        let request = self
            .client
            .delete(self.base_url.join(&format!("/announcements/{id}")));
        self.announcement_call(request, Some(id)).await?;
        Ok(())
    }
}

/// The `message` of a non-2xx body, if there is a non-blank one.
async fn error_message(response: Response) -> Option<String> {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .filter(|message| !message.trim().is_empty())
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AnnouncementError> {
    response
        .json::<T>()
        .await
        .map_err(|e| AnnouncementError::Network(format!("unreadable announcement response: {e}")))
}

//! Integration tests for the `Portal` facade: builder wiring, token
//! forwarding, logout degradation, and restarts.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use hostel::prelude::*;
use hostel_protocol::MOCK_TOKEN;
use serde_json::{Value, json};

// =========================================================================
// Test server
// =========================================================================

/// `Authorization` header of the last announcements request.
type SeenAuth = Arc<Mutex<Option<String>>>;

async fn serve(seen: SeenAuth) -> BaseUrl {
    let app = Router::new()
        .route(
            "/api/auth/staff-login",
            post(|Json(body): Json<Value>| async move {
                if body["password"] == "hostel@123" {
                    Json(json!({
                        "token": "jwt-abc",
                        "user": { "role": "admin", "subRole": "rector", "name": "Meera Iyer" }
                    }))
                    .into_response()
                } else {
                    (
                        StatusCode::UNAUTHORIZED,
                        Json(json!({ "message": "Invalid credentials" })),
                    )
                        .into_response()
                }
            }),
        )
        .route(
            "/api/announcements",
            get(move |headers: HeaderMap| async move {
                *seen.lock().unwrap() = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                Json(json!([])).into_response()
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    BaseUrl::new(format!("http://{addr}/api")).unwrap()
}

/// A base URL nothing listens on; fine for flows that never hit the network.
fn offline_url() -> BaseUrl {
    BaseUrl::new("http://127.0.0.1:9/api").unwrap()
}

async fn open(store: MemoryStore, base_url: BaseUrl) -> Portal<MemoryStore> {
    Portal::builder()
        .base_url(base_url)
        .build_with_store(store)
        .await
        .unwrap()
}

/// Yields until `check` holds; the token sync task runs on the same
/// runtime as the test.
async fn eventually(check: impl Fn() -> bool) {
    for _ in 0..100 {
        if check() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition never became true");
}

// =========================================================================
// Login and token forwarding
// =========================================================================

#[tokio::test]
async fn test_portal_student_login_resolves_profile() {
    let portal = open(MemoryStore::new(), offline_url()).await;
    assert!(!portal.is_logged_in());

    let record = portal.login(LoginRequest::student()).await.unwrap();

    assert!(portal.is_logged_in());
    assert_eq!(record.token.as_deref(), Some(MOCK_TOKEN));
    assert_eq!(portal.current(), record);
    assert_eq!(portal.student_profile(), Some(StudentProfile::demo()));
}

#[tokio::test]
async fn test_portal_staff_login_sends_bearer_on_announcements() {
    let seen = SeenAuth::default();
    let portal = open(MemoryStore::new(), serve(Arc::clone(&seen)).await).await;

    portal
        .login(LoginRequest::staff(Role::Admin, "wrdshwe1051", "hostel@123"))
        .await
        .unwrap();
    portal.refresh_announcements().await.unwrap();

    assert_eq!(seen.lock().unwrap().as_deref(), Some("Bearer jwt-abc"));
    assert_eq!(portal.current().sub_role.as_deref(), Some("rector"));
}

#[tokio::test]
async fn test_portal_mock_session_sends_no_bearer() {
    let seen = SeenAuth::default();
    let portal = open(MemoryStore::new(), serve(Arc::clone(&seen)).await).await;

    portal.login(LoginRequest::student()).await.unwrap();
    portal.refresh_announcements().await.unwrap();

    assert_eq!(*seen.lock().unwrap(), None);
}

#[tokio::test]
async fn test_portal_rejected_staff_login_keeps_session() {
    let portal = open(MemoryStore::new(), serve(SeenAuth::default()).await).await;
    portal.login(LoginRequest::student()).await.unwrap();

    let err = portal
        .login(LoginRequest::staff(Role::Admin, "wrdshwe1051", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HostelError::Session(SessionError::Authentication(ref m)) if m == "Invalid credentials"
    ));
    assert_eq!(portal.current().role, Some(Role::Student));
}

#[tokio::test]
async fn test_token_sync_follows_logout_through_cloned_session() {
    let portal = open(MemoryStore::new(), serve(SeenAuth::default()).await).await;
    portal
        .login(LoginRequest::staff(Role::Admin, "wrdshwe1051", "hostel@123"))
        .await
        .unwrap();
    assert!(portal.client().has_token());

    let screen = portal.session().clone();
    screen.logout().await.unwrap();

    eventually(|| !portal.client().has_token()).await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_token_settles_on_session_token_when_logout_races_login() {
    let portal = open(MemoryStore::new(), offline_url()).await;

    for _ in 0..50 {
        let screen = portal.session().clone();
        let logout = tokio::spawn(async move { screen.logout().await });
        portal.login(LoginRequest::student()).await.unwrap();
        logout.await.unwrap().unwrap();

        let mut settled = false;
        for _ in 0..200 {
            if portal.client().has_token() == portal.current().token.is_some() {
                settled = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(settled, "client token disagrees with {:?}", portal.current());
    }
}

// =========================================================================
// Logout and restarts
// =========================================================================

#[tokio::test]
async fn test_portal_logout_storage_failure_is_swallowed() {
    let store = MemoryStore::new();
    let portal = open(store.clone(), offline_url()).await;
    portal.login(LoginRequest::student()).await.unwrap();

    store.set_failing(true);
    portal.logout().await;

    assert!(portal.is_logged_in());
    assert!(portal.client().has_token());
}

#[tokio::test]
async fn test_portal_logout_clears_session_and_token() {
    let store = MemoryStore::new();
    let portal = open(store.clone(), offline_url()).await;
    portal.login(LoginRequest::student()).await.unwrap();

    portal.logout().await;

    assert!(!portal.is_logged_in());
    assert!(!portal.client().has_token());
    assert_eq!(store.read().await.unwrap(), None);
}

#[tokio::test]
async fn test_portal_restart_rehydrates_from_storage_dir() {
    let dir = tempfile::tempdir().unwrap();
    let build = || {
        Portal::builder()
            .base_url(offline_url())
            .storage_dir(dir.path())
            .build()
    };

    let first = build().await.unwrap();
    let record = first.login(LoginRequest::student()).await.unwrap();
    drop(first);

    let second = build().await.unwrap();
    assert_eq!(second.current(), record);
    assert!(second.client().has_token());
}

#[tokio::test]
async fn test_portal_builder_resolves_runtime_target() {
    let portal = Portal::builder()
        .runtime_target(RuntimeTarget::Device {
            platform: Platform::Android,
            debugger_host: None,
        })
        .api_port(5050)
        .build_with_store(MemoryStore::new())
        .await
        .unwrap();

    assert_eq!(portal.client().base_url().as_str(), "http://10.0.2.2:5050/api");
}

#[tokio::test]
async fn test_portal_mock_staff_needs_opt_in() {
    let portal = open(MemoryStore::new(), offline_url()).await;
    let err = portal
        .login(LoginRequest::role_only(Role::Admin))
        .await
        .unwrap_err();
    assert!(matches!(err, HostelError::Session(SessionError::Validation(_))));

    let permissive = Portal::builder()
        .base_url(offline_url())
        .session_config(SessionConfig {
            allow_mock_staff: true,
        })
        .build_with_store(MemoryStore::new())
        .await
        .unwrap();
    let record = permissive
        .login(LoginRequest::role_only(Role::Admin))
        .await
        .unwrap();
    assert_eq!(record.role, Some(Role::Admin));
}

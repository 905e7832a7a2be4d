//! End-to-end tests over a real HTTP round trip.
//!
//! A small axum server stands in for the MeetFlow API on an ephemeral
//! port; the client talks to it through the production `HttpTransport`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post, put};
use meetflow::{Config, Error, MeetFlow};
use meetflow_protocol::Profile;
use parking_lot::Mutex;
use serde_json::{Value, json};
use tempfile::TempDir;

#[derive(Clone)]
struct ServerState {
    profile: Arc<Mutex<Value>>,
    reject_updates: Arc<AtomicBool>,
}

impl ServerState {
    fn new() -> Self {
        Self {
            profile: Arc::new(Mutex::new(json!({
                "name": "Ana",
                "email": "ana@meetflow.app",
                "headLine": "Therapist",
                "photoUrl": null
            }))),
            reject_updates: Arc::new(AtomicBool::new(false)),
        }
    }
}

async fn login(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != "secret" || body["password"] != body["passwordConfirmation"] {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "invalid credentials", "statusCode": 401 })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "accessToken": "access-1",
            "refreshToken": "refresh-1",
            "user": { "_id": "u1", "email": body["email"], "role": "professional" }
        })),
    )
}

async fn whoami(headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let refresh = headers.get("refreshtoken").and_then(|v| v.to_str().ok());
    let bearer = headers.get("authorization").and_then(|v| v.to_str().ok());
    if refresh != Some("refresh-1") || bearer != Some("Bearer access-1") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "missing credentials", "statusCode": 401 })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "user": {
                "_id": "u1",
                "email": "ana@meetflow.app",
                "name": "Ana",
                "role": "professional",
                "active": true
            },
            "refreshToken": "refresh-1",
            "accessToken": "access-1"
        })),
    )
}

async fn get_profile(State(state): State<ServerState>, Path(_id): Path<String>) -> Json<Value> {
    Json(state.profile.lock().clone())
}

async fn update_profile(
    State(state): State<ServerState>,
    Path(_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if state.reject_updates.load(Ordering::SeqCst) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "invalid profile", "statusCode": 422 })),
        );
    }
    *state.profile.lock() = body;
    (StatusCode::OK, Json(Value::Null))
}

async fn spawn_server() -> (String, ServerState) {
    let state = ServerState::new();
    let app = Router::new()
        .route("/auth/login", post(login))
        .route("/account/whoami", get(whoami))
        .route("/profile/{id}", get(get_profile))
        .route("/profile/update/{id}", put(update_profile))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), state)
}

fn client_for(base_url: &str, tmp: &TempDir) -> MeetFlow {
    MeetFlow::new(Config::new(base_url, tmp.path().join("credentials.json"))).unwrap()
}

#[tokio::test]
async fn login_then_whoami_round_trips_credentials() {
    let (base_url, _state) = spawn_server().await;
    let tmp = TempDir::new().unwrap();
    let client = client_for(&base_url, &tmp);

    client.login("ana@meetflow.app", "secret").await.unwrap();
    assert!(client.session().is_authenticated());

    let account = client.whoami().await.unwrap();
    assert_eq!(account.user.name, "Ana");
    assert!(account.user.active);
}

#[tokio::test]
async fn rejected_login_maps_to_authentication_error() {
    let (base_url, _state) = spawn_server().await;
    let tmp = TempDir::new().unwrap();
    let client = client_for(&base_url, &tmp);

    let err = client.login("ana@meetflow.app", "wrong").await.unwrap_err();
    assert!(err.is_authentication());
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
async fn persisted_session_restores_in_a_new_process() {
    let (base_url, _state) = spawn_server().await;
    let tmp = TempDir::new().unwrap();

    let first = client_for(&base_url, &tmp);
    first.login("ana@meetflow.app", "secret").await.unwrap();
    drop(first);

    // Same credential file, fresh client: the session comes back.
    let second = client_for(&base_url, &tmp);
    second.restore_session();
    assert!(second.session().is_authenticated());
    second.whoami().await.unwrap();
}

#[tokio::test]
async fn optimistic_profile_update_confirms_against_the_server() {
    let (base_url, state) = spawn_server().await;
    let tmp = TempDir::new().unwrap();
    let client = client_for(&base_url, &tmp);
    client.login("ana@meetflow.app", "secret").await.unwrap();

    let mut profile = client.profile().await.unwrap();
    profile.head_line = Some("Updated line".to_string());
    let updated = client.update_profile(profile.clone()).await.unwrap();
    assert_eq!(updated, profile);

    // The server adopted the write.
    assert_eq!(state.profile.lock()["headLine"], "Updated line");
}

#[tokio::test]
async fn rejected_profile_update_rolls_back_to_server_truth() {
    let (base_url, state) = spawn_server().await;
    let tmp = TempDir::new().unwrap();
    let client = client_for(&base_url, &tmp);
    client.login("ana@meetflow.app", "secret").await.unwrap();

    let original = client.profile().await.unwrap();
    state.reject_updates.store(true, Ordering::SeqCst);

    let mut edited = original.clone();
    edited.head_line = Some("Rejected line".to_string());
    let err = client.update_profile(edited).await.unwrap_err();
    assert!(matches!(err, Error::Api { status: 422, .. }));

    let restored: Profile = client.profile().await.unwrap();
    assert_eq!(restored, original);
    assert_eq!(state.profile.lock()["headLine"], "Therapist");
}

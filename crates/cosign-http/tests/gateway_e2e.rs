use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use cosign_http::{
    ClientConfig, ConsoleApi, ConsoleError, Credential, FileStorage, GatewayClient, Identity,
    NavigationReason, SessionStore, View,
};
use cosign_http::types::UserRole;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tempfile::tempdir;

#[derive(Default)]
struct Signer {
    reject: AtomicBool,
    seen_auth: Mutex<Vec<Option<String>>>,
}

async fn login(Json(body): Json<Value>) -> Json<Value> {
    if body["password"] == "secret" {
        Json(json!({
            "code": 0,
            "message": "ok",
            "data": {"token": "tok-abc", "userId": "u-1", "expiresAt": "2030-01-01T00:00:00Z"}
        }))
    } else {
        Json(json!({"code": 1001, "message": "invalid username or password"}))
    }
}

async fn keys(State(signer): State<Arc<Signer>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(String::from);
    signer.seen_auth.lock().push(auth);

    if signer.reject.load(Ordering::SeqCst) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"code": 401, "message": "token expired"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"code": 0, "data": {"list": [
            {"id": "k1", "userId": "u-1", "publicKey": "04ab", "status": 1, "createdAt": "2024-01-01"}
        ], "total": 1, "page": 1, "pageSize": 20}})),
    )
}

async fn slow_user_info() -> Json<Value> {
    tokio::time::sleep(std::time::Duration::from_secs(2)).await;
    Json(json!({"code": 0, "data": {"id": "u-1", "username": "alice", "status": 1}}))
}

async fn health() -> Json<Value> {
    Json(json!({"code": 0, "data": {"status": "ok", "timestamp": "now"}}))
}

async fn spawn_signer() -> (String, Arc<Signer>) {
    let signer = Arc::new(Signer::default());
    let app = Router::new()
        .route("/api/login", post(login))
        .route("/mapi/keys", get(keys))
        .route("/mapi/health", get(health))
        .route("/api/user/info", get(slow_user_info))
        .with_state(signer.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}", addr), signer)
}

#[tokio::test]
async fn test_login_then_401_returns_to_login() {
    let (base_url, signer) = spawn_signer().await;
    let home = tempdir().unwrap();
    let storage = FileStorage::in_home(home.path());
    let session_file = storage.path().to_path_buf();

    let session = Arc::new(SessionStore::open(storage));
    let gateway = GatewayClient::new(
        ClientConfig::default().with_base_url(&base_url),
        session.clone(),
    )
    .unwrap();
    let api = ConsoleApi::new(gateway.clone());
    let mut events = gateway.navigator().subscribe();

    // 1. Login stores the server's token
    let resp = api.login("alice", "secret").await.unwrap();
    assert_eq!(resp.token, "tok-abc");
    assert!(session.is_authenticated());
    assert!(session_file.exists(), "session should be persisted");

    // 2. The next call carries it
    let keys = api.list_keys().await.unwrap();
    assert_eq!(keys[0].id, "k1");
    assert_eq!(
        signer.seen_auth.lock().last().cloned().flatten().as_deref(),
        Some("Bearer tok-abc")
    );

    // 3. The server now rejects the token
    signer.reject.store(true, Ordering::SeqCst);
    let err = api.list_keys().await.unwrap_err();
    assert_eq!(err, ConsoleError::AuthenticationRejected("token expired".into()));
    assert!(!session.is_authenticated());
    assert!(!session_file.exists(), "persisted session should be erased");

    // 4. The guard now keeps protected views out of reach
    let redirected = gateway.navigator().navigate("/keys");
    assert!(redirected.is_none(), "already on the login view");
    assert_eq!(gateway.navigator().current(), Some(View::Login));

    let first = events.recv().await.unwrap();
    assert_eq!(first.to, View::Dashboard);
    assert_eq!(first.reason, NavigationReason::LoggedIn);
    let second = events.recv().await.unwrap();
    assert_eq!(second.to, View::Login);
    assert_eq!(second.reason, NavigationReason::SessionInvalidated);
}

#[tokio::test]
async fn test_wrong_password_is_application_error() {
    let (base_url, signer) = spawn_signer().await;
    let session = Arc::new(SessionStore::in_memory());
    let gateway =
        GatewayClient::new(ClientConfig::default().with_base_url(&base_url), session.clone())
            .unwrap();
    let api = ConsoleApi::new(gateway);

    let err = api.login("alice", "guess").await.unwrap_err();
    assert_eq!(err.to_string(), "invalid username or password");
    assert!(!session.is_authenticated());
    assert!(signer.seen_auth.lock().is_empty());
}

#[tokio::test]
async fn test_session_survives_restart() {
    let (base_url, signer) = spawn_signer().await;
    let home = tempdir().unwrap();

    {
        let session = Arc::new(SessionStore::open(FileStorage::in_home(home.path())));
        let gateway =
            GatewayClient::new(ClientConfig::default().with_base_url(&base_url), session)
                .unwrap();
        ConsoleApi::new(gateway)
            .login("alice", "secret")
            .await
            .unwrap();
    }

    let session = Arc::new(SessionStore::open(FileStorage::in_home(home.path())));
    let current = session.current();
    assert_eq!(current.identity().unwrap().username, "alice");

    let gateway =
        GatewayClient::new(ClientConfig::default().with_base_url(&base_url), session).unwrap();
    ConsoleApi::new(gateway).list_keys().await.unwrap();
    assert_eq!(
        signer.seen_auth.lock().last().cloned().flatten().as_deref(),
        Some("Bearer tok-abc")
    );
}

#[tokio::test]
async fn test_unknown_route_is_transport_error() {
    let (base_url, _signer) = spawn_signer().await;
    let session = Arc::new(SessionStore::in_memory());
    let gateway =
        GatewayClient::new(ClientConfig::default().with_base_url(&base_url), session).unwrap();

    let err = ConsoleApi::new(gateway).stats().await.unwrap_err();
    assert_eq!(err, ConsoleError::Transport("Request failed with status code 404".into()));
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let session = Arc::new(SessionStore::in_memory());
    let gateway = GatewayClient::new(
        ClientConfig::default()
            .with_base_url(format!("http://{}", addr))
            .with_timeout_ms(2000),
        session,
    )
    .unwrap();

    let err = ConsoleApi::new(gateway).health().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error_and_keeps_session() {
    let (base_url, _signer) = spawn_signer().await;
    let session = Arc::new(SessionStore::in_memory());
    session
        .establish(
            Credential::new("tok-abc"),
            Identity::new("u-1", "alice", UserRole::User),
        )
        .unwrap();
    let gateway = GatewayClient::new(
        ClientConfig::default()
            .with_base_url(&base_url)
            .with_timeout_ms(100),
        session.clone(),
    )
    .unwrap();

    let err = ConsoleApi::new(gateway).user_info().await.unwrap_err();
    assert_eq!(err, ConsoleError::Transport("timeout of 100ms exceeded".into()));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_base_url_path_prefix_is_kept() {
    let prefixed = Router::new().nest(
        "/cosign",
        Router::new().route("/mapi/health", get(health)),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, prefixed).await.unwrap();
    });

    let session = Arc::new(SessionStore::in_memory());
    let gateway = GatewayClient::new(
        ClientConfig::default().with_base_url(format!("http://{}/cosign", addr)),
        session,
    )
    .unwrap();
    let health = ConsoleApi::new(gateway).health().await.unwrap();
    assert_eq!(health.status, "ok");
}

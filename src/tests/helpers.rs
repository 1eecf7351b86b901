use std::sync::Once;

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode},
};
use serde_json::Value;
use tower::ServiceExt;
use tracing::Level;

use crate::{
    AppState, create_router,
    config::Settings,
    db::CredentialStore,
    models::client::ApiClient,
};

pub const RONNIE_PASSWORD: &str = "ronnie1";
pub const BOBBY_PASSWORD: &str = "bobby2";

static INIT: Once = Once::new();

/// Initialize logging exactly once.
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_test_writer()
            .with_target(false)
            .with_max_level(Level::ERROR)
            .init();
    });
}

/// Seeded state handed back to tests so they can authenticate.
pub struct Fixtures {
    pub state: AppState,
    pub ronnie_client: ApiClient,
    pub bobby_client: ApiClient,
}

pub fn test_app() -> (Router, Fixtures) {
    test_app_with(Settings::default())
}

pub fn test_app_with(settings: Settings) -> (Router, Fixtures) {
    init_tracing();
    // low bcrypt cost keeps the suite fast
    let credentials = CredentialStore::seeded_demo(4);
    let ronnie_client = credentials.clients_for_user(1).remove(0);
    let bobby_client = credentials.clients_for_user(2).remove(0);
    let state = AppState::new(settings, credentials);
    let fixtures = Fixtures {
        state: state.clone(),
        ronnie_client,
        bobby_client,
    };
    (create_router(state), fixtures)
}

pub async fn send(
    app: Router,
    method: &str,
    uri: &str,
    content_type: Option<&str>,
    body: Body,
    headers: Option<HeaderMap>,
) -> (StatusCode, String, HeaderMap) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        request = request.header("content-type", content_type);
    }
    if let Some(custom_headers) = headers {
        for (key, value) in custom_headers.iter() {
            request = request.header(key, value);
        }
    }
    let request = request.body(body).unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = String::from_utf8(
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec(),
    )
    .unwrap();
    (status, body, headers)
}

pub async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
    headers: Option<HeaderMap>,
) -> (StatusCode, String, HeaderMap) {
    let (content_type, body) = match body {
        Some(json) => (
            Some("application/json"),
            Body::from(serde_json::to_string(&json).unwrap()),
        ),
        None => (None, Body::empty()),
    };
    send(app, method, uri, content_type, body, headers).await
}

pub async fn request_form(
    app: Router,
    method: &str,
    uri: &str,
    fields: &[(&str, &str)],
    headers: Option<HeaderMap>,
) -> (StatusCode, String, HeaderMap) {
    // field values in these tests are url-safe already
    let encoded = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    send(
        app,
        method,
        uri,
        Some("application/x-www-form-urlencoded"),
        Body::from(encoded),
        headers,
    )
    .await
}

/// Pulls the `name=value` pair for a cookie out of Set-Cookie headers,
/// ready to send back in a `cookie` request header.
pub fn cookie_pair(headers: &HeaderMap, name: &str) -> Option<String> {
    let prefix = format!("{name}=");
    headers
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|raw| raw.starts_with(&prefix))
        .and_then(|raw| raw.split(';').next())
        .map(str::to_string)
}

pub fn bearer_headers(access_token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "authorization",
        format!("Bearer {access_token}").parse().unwrap(),
    );
    headers
}

pub fn cookie_headers(pair: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("cookie", pair.parse().unwrap());
    headers
}

/// Logs in through the real endpoint and returns the session cookie pair.
pub async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, _, headers) = request_form(
        app.clone(),
        "POST",
        "/login",
        &[("username", username), ("password", password)],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    cookie_pair(&headers, "session").expect("login should set the session cookie")
}

/// Fetches a token pair through the real endpoint.
pub async fn issue_token(app: &Router, client: &ApiClient) -> Value {
    let (status, body, _) = request_form(
        app.clone(),
        "POST",
        "/token",
        &[
            ("grant_type", "client_credentials"),
            ("client_id", &client.client_id),
            ("client_secret", &client.client_secret),
        ],
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

use axum::{
    Json, Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use serde::Serialize;
use tower_cookies::CookieManagerLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

mod api;
mod config;
mod db;
mod middleware;
mod models;
mod services;
#[cfg(test)]
mod tests;

use config::Settings;
use db::{CredentialStore, TaskStore, TokenStore};
use services::{
    auth_service::AuthService, session_service::SessionService, token_service::TokenIssuer,
};

/// Everything the handlers and middleware share. Stores are constructed
/// here and handed in; nothing holds ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub credentials: CredentialStore,
    pub issuer: TokenIssuer,
    pub sessions: SessionService,
    pub auth: AuthService,
    pub tasks: TaskStore,
}

impl AppState {
    pub fn new(settings: Settings, credentials: CredentialStore) -> Self {
        let issuer = TokenIssuer::new(TokenStore::new(), settings.access_token_ttl_seconds);
        let sessions = SessionService::new(credentials.clone(), &settings);
        let auth = AuthService::new(credentials.clone(), issuer.clone(), sessions.clone());
        Self {
            settings,
            credentials,
            issuer,
            sessions,
            auth,
            tasks: TaskStore::new(),
        }
    }
}

#[derive(Serialize)]
struct Banner {
    description: &'static str,
}

async fn home() -> Json<Banner> {
    Json(Banner {
        description: "api-first example application",
    })
}

pub fn create_router(state: AppState) -> Router {
    let cors = if state.settings.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = state
            .settings
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api_routes = Router::new()
        .route("/tasks", get(api::tasks::list).post(api::tasks::create))
        .route("/tasks/:task_id", put(api::tasks::update))
        .route("/clients", get(api::clients::list))
        .route("/me", get(api::user::me))
        .route("/token-revoke", post(api::token::revoke))
        .route_layer(from_fn_with_state(
            state.clone(),
            middleware::auth::require_api,
        ));

    let app_routes = Router::new()
        .route("/logout", get(api::auth::logout))
        .route_layer(from_fn(middleware::auth::require_app));

    let admin_routes = Router::new()
        .route("/admin/users", get(api::admin::list_users))
        .route_layer(from_fn(middleware::auth::require_admin));

    Router::new()
        .route("/", get(home))
        .route("/login", get(api::auth::login_page).post(api::auth::login))
        .route("/token", post(api::token::issue))
        .route("/token-refresh", post(api::token::refresh))
        .merge(api_routes)
        .merge(app_routes)
        .merge(admin_routes)
        .layer(from_fn_with_state(
            state.clone(),
            middleware::auth::resolve_credentials,
        ))
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = Settings::from_env();
    let credentials = CredentialStore::seeded_demo(bcrypt::DEFAULT_COST);
    let addr = settings
        .bind_addr
        .parse::<std::net::SocketAddr>()
        .expect("BIND_ADDR must be host:port");
    let state = AppState::new(settings, credentials);
    let app = create_router(state);

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

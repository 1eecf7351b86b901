use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;
use tower_cookies::Cookies;
use tracing::debug;

use crate::{
    AppState,
    services::auth_service::{AuthContext, BearerRejection},
    services::scope::{self, Scope},
};

/// Resolves the request's credentials once and caches the outcome in
/// request extensions; the per-route guards below only read the cache.
pub async fn resolve_credentials(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let session = state.sessions.read(&cookies);
    let authorization = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .map(str::to_owned);

    let resolution = state.auth.resolve(session.as_ref(), authorization.as_deref());
    if resolution.clear_session {
        state.sessions.clear(&cookies);
    }
    if let Some(reason) = resolution.bearer_rejection {
        debug!(?reason, "bearer credentials rejected");
        request.extensions_mut().insert(reason);
    }
    request.extensions_mut().insert(resolution.context);
    next.run(request).await
}

/// Guard for JSON API routes: requires `api_auth`, denies with a status.
pub async fn require_api(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if scope::authorize(context(&request).scopes, Scope::ApiAuth) {
        return next.run(request).await;
    }
    // Expired and revoked stay indistinguishable from missing unless the
    // strict policy is switched on.
    if state.settings.strict_bearer_errors {
        if let Some(reason @ (BearerRejection::Expired | BearerRejection::Revoked)) =
            request.extensions().get::<BearerRejection>().copied()
        {
            debug!(?reason, "surfacing bearer rejection explicitly");
            return (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "invalid_token" })),
            )
                .into_response();
        }
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": "unauthorized" })),
    )
        .into_response()
}

/// Guard for browser routes: requires `app_auth`, denies by redirecting
/// to the login page with the original target preserved.
pub async fn require_app(request: Request, next: Next) -> Response {
    if scope::authorize(context(&request).scopes, Scope::AppAuth) {
        return next.run(request).await;
    }
    Redirect::to(&format!("/login?next={}", request.uri().path())).into_response()
}

/// Guard for the admin surface. `admin_auth` only ever comes from a
/// superuser session, so bearer callers land here too and get a 403.
pub async fn require_admin(request: Request, next: Next) -> Response {
    if scope::authorize(context(&request).scopes, Scope::AdminAuth) {
        return next.run(request).await;
    }
    (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "forbidden" })),
    )
        .into_response()
}

fn context(request: &Request) -> AuthContext {
    request
        .extensions()
        .get::<AuthContext>()
        .cloned()
        .unwrap_or_else(AuthContext::anonymous)
}

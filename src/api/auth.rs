use axum::{
    Form, Json,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::json;
use tower_cookies::Cookies;
use tracing::info;

use crate::AppState;

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

/// GET /login — the entry point the browser guards redirect to. No
/// templates in this build, so the page is a JSON prompt.
pub async fn login_page() -> Json<serde_json::Value> {
    Json(json!({ "message": "POST username and password to log in" }))
}

/// POST /login — verifies the password and starts a session, then sends
/// the browser back where it was headed.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = state.credentials.user_by_username(&form.username);
    let verified = user
        .as_ref()
        .is_some_and(|user| bcrypt::verify(&form.password, &user.password_hash).unwrap_or(false));
    let Some(user) = user.filter(|_| verified) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Incorrect username or password" })),
        )
            .into_response();
    };
    if !user.active {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "This account has been administratively deactivated. \
                          Please contact technical support."
            })),
        )
            .into_response();
    }

    state.sessions.write(&cookies, &user);
    info!(username = %user.username, "logged in");
    let next = query.next.as_deref().unwrap_or("/");
    Redirect::to(next).into_response()
}

/// GET /logout — drops the session keys. Guarded by `app_auth`.
pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    state.sessions.clear(&cookies);
    Redirect::to("/")
}

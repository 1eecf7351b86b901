use axum::{Extension, Json, http::StatusCode};
use serde::Serialize;

use crate::services::auth_service::AuthContext;

#[derive(Serialize)]
pub struct MeResponse {
    username: String,
    scopes: Vec<&'static str>,
}

/// GET /me — the resolved principal, exactly as the auth middleware saw it.
pub async fn me(
    Extension(context): Extension<AuthContext>,
) -> Result<Json<MeResponse>, StatusCode> {
    let user = context.user().ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(MeResponse {
        username: user.username.clone(),
        scopes: context.scopes.tags(),
    }))
}

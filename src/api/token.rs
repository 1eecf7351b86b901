use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState,
    models::token::TokenPair,
    services::token_service::{GrantType, TOKEN_SCOPE, TokenError},
};

#[derive(Deserialize)]
pub struct TokenRequest {
    grant_type: Option<String>,
    client_id: String,
    client_secret: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    grant_type: Option<String>,
    refresh_token: String,
}

#[derive(Deserialize)]
pub struct RevokeRequest {
    token: String,
}

#[derive(Serialize)]
pub struct TokenResponse {
    access_token: String,
    token_type: &'static str,
    refresh_token: String,
    expires_in: i64,
}

impl TokenResponse {
    fn new(pair: TokenPair, expires_in: i64) -> Self {
        Self {
            access_token: pair.access_token,
            token_type: "bearer",
            refresh_token: pair.refresh_token,
            expires_in,
        }
    }
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        // RFC 6749 error shapes; an unknown id and a wrong secret answer
        // identically.
        match self {
            TokenError::InvalidClient => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid_client" })),
            ),
            TokenError::InvalidGrant => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "invalid_grant" })),
            ),
        }
        .into_response()
    }
}

/// POST /token — client-credentials issuance.
pub async fn issue(
    State(state): State<AppState>,
    Form(form): Form<TokenRequest>,
) -> Result<Json<TokenResponse>, TokenError> {
    let client = state
        .credentials
        .client_by_id(&form.client_id)
        .filter(|client| client.client_secret == form.client_secret)
        .ok_or(TokenError::InvalidClient)?;
    let grant = form
        .grant_type
        .as_deref()
        .and_then(GrantType::parse)
        .ok_or(TokenError::InvalidGrant)?;

    let pair = state.issuer.create(&client, grant, TOKEN_SCOPE)?;
    Ok(Json(TokenResponse::new(pair, state.issuer.ttl_seconds())))
}

/// POST /token-refresh — rotates a refresh token for a new pair.
pub async fn refresh(
    State(state): State<AppState>,
    Form(form): Form<RefreshRequest>,
) -> Result<Json<TokenResponse>, TokenError> {
    match form.grant_type.as_deref().and_then(GrantType::parse) {
        Some(GrantType::RefreshToken) => {}
        _ => return Err(TokenError::InvalidGrant),
    }
    let pair = state.issuer.refresh(&form.refresh_token)?;
    Ok(Json(TokenResponse::new(pair, state.issuer.ttl_seconds())))
}

/// POST /token-revoke — best-effort revocation of an access token.
/// Unknown tokens are a no-op; the response says whether anything matched.
pub async fn revoke(
    State(state): State<AppState>,
    Form(form): Form<RevokeRequest>,
) -> Json<serde_json::Value> {
    let revoked = state.issuer.revoke(&form.token);
    Json(json!({ "revoked": revoked }))
}

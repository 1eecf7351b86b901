use axum::{Extension, Json, extract::State};
use serde::Serialize;

use crate::{AppState, services::auth_service::AuthContext};

#[derive(Serialize)]
pub struct ClientSummary {
    client_id: String,
}

/// GET /clients — the caller's provisioned clients. Secrets are shown
/// once at provisioning time and never echoed here.
pub async fn list(
    State(state): State<AppState>,
    Extension(context): Extension<AuthContext>,
) -> Json<Vec<ClientSummary>> {
    let clients = context
        .user()
        .map(|user| state.credentials.clients_for_user(user.id))
        .unwrap_or_default()
        .into_iter()
        .map(|client| ClientSummary {
            client_id: client.client_id,
        })
        .collect();
    Json(clients)
}

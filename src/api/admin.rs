use axum::{Json, extract::State};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct UserSummary {
    id: i64,
    username: String,
    active: bool,
    superuser: bool,
}

/// GET /admin/users — the user roster. Guarded by `admin_auth`.
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserSummary>> {
    let users = state
        .credentials
        .all_users()
        .into_iter()
        .map(|user| UserSummary {
            id: user.id,
            username: user.username,
            active: user.active,
            superuser: user.superuser,
        })
        .collect();
    Json(users)
}

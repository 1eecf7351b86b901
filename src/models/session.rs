use serde::{Deserialize, Serialize};

/// Typed payload of the signed session cookie.
///
/// Only the fields the auth core reads live here. Application data the
/// UI layer wants to stash across requests belongs in its own cookie,
/// not this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub user_id: i64,
    pub username: String,
}

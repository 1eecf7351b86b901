use serde::Serialize;

/// An account that can log in to the console or own API clients.
///
/// `active` and `superuser` are flipped administratively through the
/// credential store; everything else is fixed at seed time.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active: bool,
    pub superuser: bool,
}

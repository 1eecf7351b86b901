use time::Duration;
use tower_cookies::{Cookie, Cookies, Key, cookie::SameSite};
use tracing::warn;

use crate::{
    config::Settings,
    db::CredentialStore,
    models::{session::SessionData, user::User},
};

/// Outcome of resolving a decoded session payload against the store.
pub enum SessionState {
    Authenticated(User),
    /// The payload points at a user that does not exist. The caller must
    /// scrub the cookie so the browser cannot wedge itself into a
    /// permanently unauthenticated loop.
    Corrupt,
}

/// Reads and writes the signed session cookie and resolves its payload
/// to a user. Signature verification happens in the signed jar; this
/// service only ever sees verified content.
#[derive(Clone)]
pub struct SessionService {
    credentials: CredentialStore,
    key: Key,
    cookie_name: String,
    max_age_seconds: i64,
}

impl SessionService {
    pub fn new(credentials: CredentialStore, settings: &Settings) -> Self {
        Self {
            credentials,
            key: Key::derive_from(settings.secret_key.as_bytes()),
            cookie_name: settings.session_cookie.clone(),
            max_age_seconds: settings.session_expire_seconds,
        }
    }

    /// Decodes the session cookie, if present and its signature verifies.
    pub fn read(&self, cookies: &Cookies) -> Option<SessionData> {
        let cookie = cookies.signed(&self.key).get(&self.cookie_name)?;
        match serde_json::from_str(cookie.value()) {
            Ok(data) => Some(data),
            Err(err) => {
                warn!(error = %err, "session cookie payload unreadable");
                None
            }
        }
    }

    /// Starts a session for `user`.
    pub fn write(&self, cookies: &Cookies, user: &User) {
        let data = SessionData {
            user_id: user.id,
            username: user.username.clone(),
        };
        let payload = serde_json::to_string(&data).expect("session payload serializes");
        cookies.signed(&self.key).add(self.build_cookie(
            payload,
            Duration::seconds(self.max_age_seconds),
        ));
    }

    /// Drops the session keys (logout, or a corrupt-session scrub).
    pub fn clear(&self, cookies: &Cookies) {
        cookies
            .signed(&self.key)
            .remove(self.build_cookie(String::new(), Duration::ZERO));
    }

    /// Maps a verified payload to its user. A dangling `user_id` means the
    /// session is corrupt and the caller owes a scrub.
    pub fn resolve(&self, session: &SessionData) -> SessionState {
        match self.credentials.user_by_id(session.user_id) {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Corrupt,
        }
    }

    fn build_cookie(&self, value: String, max_age: Duration) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), value))
            .http_only(true)
            .same_site(SameSite::Strict)
            .path("/")
            .max_age(max_age)
            .build()
    }
}

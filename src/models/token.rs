use chrono::{DateTime, Utc};

/// An issued access/refresh token pair.
///
/// A pair is superseded, never mutated, when its refresh token is
/// exchanged. Revocation flips `revoked` in place so introspection can
/// still tell "revoked" from "never existed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub client_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl TokenPair {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

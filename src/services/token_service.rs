use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{Duration, Utc};
use rand::RngCore;
use tracing::{debug, instrument};

use crate::{
    db::TokenStore,
    models::{client::ApiClient, token::TokenPair},
};

/// The one scope value a client may request at the token endpoint.
pub const TOKEN_SCOPE: &str = "api";

/// Grant types this server understands. Adding one means adding a
/// variant and its handling, not editing string comparisons inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantType {
    ClientCredentials,
    RefreshToken,
}

impl GrantType {
    /// Parses the wire value. Anything unrecognized is an invalid grant,
    /// not a transport error.
    pub fn parse(value: &str) -> Option<GrantType> {
        match value {
            "client_credentials" => Some(GrantType::ClientCredentials),
            "refresh_token" => Some(GrantType::RefreshToken),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Unknown client id or mismatched secret. One variant on purpose:
    /// callers never learn which half was wrong.
    InvalidClient,
    /// Unsupported grant type or scope, or an unknown/consumed refresh token.
    InvalidGrant,
}

/// Generates a 32-byte url-safe opaque credential string.
pub fn random_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Issues, rotates, and revokes access/refresh token pairs.
#[derive(Clone)]
pub struct TokenIssuer {
    store: TokenStore,
    ttl_seconds: i64,
}

impl TokenIssuer {
    pub fn new(store: TokenStore, ttl_seconds: i64) -> Self {
        Self { store, ttl_seconds }
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl_seconds
    }

    /// Issues a fresh pair for `client`. The access and refresh tokens are
    /// independent random strings, not derived from each other.
    #[instrument(skip_all, fields(client_id = %client.client_id))]
    pub fn create(
        &self,
        client: &ApiClient,
        grant_type: GrantType,
        scope: &str,
    ) -> Result<TokenPair, TokenError> {
        if grant_type != GrantType::ClientCredentials || scope != TOKEN_SCOPE {
            return Err(TokenError::InvalidGrant);
        }
        let pair = self.mint(&client.client_id);
        self.store.insert(pair.clone());
        debug!("issued token pair");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair. Single use: a consumed
    /// refresh token fails exactly like an unknown one, and of two
    /// concurrent callers exactly one succeeds.
    #[instrument(skip_all)]
    pub fn refresh(&self, refresh_token: &str) -> Result<TokenPair, TokenError> {
        self.store
            .rotate(refresh_token, |old| self.mint(&old.client_id))
            .ok_or(TokenError::InvalidGrant)
    }

    /// Marks the pair revoked. Unknown tokens are a no-op; the return
    /// value reports whether anything was found.
    pub fn revoke(&self, access_token: &str) -> bool {
        self.store.revoke(access_token)
    }

    /// Raw store read. Expiry and revocation are the caller's policy to
    /// apply, not this lookup's.
    pub fn lookup_access_token(&self, access_token: &str) -> Option<TokenPair> {
        self.store.get_by_access(access_token)
    }

    fn mint(&self, client_id: &str) -> TokenPair {
        let issued_at = Utc::now();
        TokenPair {
            access_token: random_token(),
            refresh_token: random_token(),
            client_id: client_id.to_string(),
            issued_at,
            expires_at: issued_at + Duration::seconds(self.ttl_seconds),
            revoked: false,
        }
    }
}

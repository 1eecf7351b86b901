use chrono::Utc;
use tracing::debug;

use crate::{
    db::CredentialStore,
    models::{session::SessionData, user::User},
    services::{
        scope::ScopeSet,
        session_service::{SessionService, SessionState},
        token_service::TokenIssuer,
    },
};

/// Who the request is acting as.
#[derive(Debug, Clone)]
pub enum Principal {
    User(User),
    Anonymous,
}

/// Resolved credentials for one request. The auth middleware resolves
/// once and caches this in request extensions; route guards only read it.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub principal: Principal,
    pub scopes: ScopeSet,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            principal: Principal::Anonymous,
            scopes: ScopeSet::EMPTY,
        }
    }

    pub fn user(&self) -> Option<&User> {
        match &self.principal {
            Principal::User(user) => Some(user),
            Principal::Anonymous => None,
        }
    }
}

/// Why a presented bearer token was not honored. Audit material only:
/// every one of these surfaces to the caller as plain Anonymous.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BearerRejection {
    MalformedHeader,
    TokenNotFound,
    OwnerInactive,
    Expired,
    Revoked,
}

/// What the resolver decided, plus the side effects the caller owes.
pub struct Resolution {
    pub context: AuthContext,
    /// Set when the session payload was corrupt and must be scrubbed.
    pub clear_session: bool,
    /// Set when a bearer token was presented and rejected.
    pub bearer_rejection: Option<BearerRejection>,
}

impl Resolution {
    fn anonymous() -> Self {
        Self {
            context: AuthContext::anonymous(),
            clear_session: false,
            bearer_rejection: None,
        }
    }

    fn rejected(reason: BearerRejection) -> Self {
        Self {
            bearer_rejection: Some(reason),
            ..Self::anonymous()
        }
    }

    fn authenticated(user: User, scopes: ScopeSet) -> Self {
        Self {
            context: AuthContext {
                principal: Principal::User(user),
                scopes,
            },
            clear_session: false,
            bearer_rejection: None,
        }
    }
}

/// Resolves a request's credentials to a principal and scope set.
///
/// Session wins over bearer, always; the two are never merged. Every
/// failure path degrades to Anonymous here, and route guards decide
/// what Anonymous means for their route.
#[derive(Clone)]
pub struct AuthService {
    credentials: CredentialStore,
    issuer: TokenIssuer,
    sessions: SessionService,
}

impl AuthService {
    pub fn new(
        credentials: CredentialStore,
        issuer: TokenIssuer,
        sessions: SessionService,
    ) -> Self {
        Self {
            credentials,
            issuer,
            sessions,
        }
    }

    pub fn resolve(
        &self,
        session: Option<&SessionData>,
        authorization: Option<&str>,
    ) -> Resolution {
        if let Some(session) = session {
            return match self.sessions.resolve(session) {
                SessionState::Authenticated(user) => {
                    let scopes = ScopeSet::for_session(user.superuser);
                    debug!(username = %user.username, "session authenticated");
                    Resolution::authenticated(user, scopes)
                }
                SessionState::Corrupt => {
                    debug!(user_id = session.user_id, "session references unknown user, scrubbing");
                    Resolution {
                        clear_session: true,
                        ..Resolution::anonymous()
                    }
                }
            };
        }
        if let Some(header) = authorization {
            return self.resolve_bearer(header);
        }
        Resolution::anonymous()
    }

    fn resolve_bearer(&self, header: &str) -> Resolution {
        let mut parts = header.split_whitespace();
        let token = match (parts.next(), parts.next()) {
            (Some("Bearer"), Some(token)) => token,
            _ => return Resolution::rejected(BearerRejection::MalformedHeader),
        };

        let Some(pair) = self.issuer.lookup_access_token(token) else {
            return Resolution::rejected(BearerRejection::TokenNotFound);
        };
        let owner = self
            .credentials
            .client_by_id(&pair.client_id)
            .and_then(|client| self.credentials.user_by_id(client.user_id));
        let user = match owner {
            Some(user) => user,
            None => return Resolution::rejected(BearerRejection::TokenNotFound),
        };
        if !user.active {
            return Resolution::rejected(BearerRejection::OwnerInactive);
        }
        if pair.is_expired(Utc::now()) {
            return Resolution::rejected(BearerRejection::Expired);
        }
        if pair.revoked {
            return Resolution::rejected(BearerRejection::Revoked);
        }
        debug!(username = %user.username, client_id = %pair.client_id, "bearer authenticated");
        Resolution::authenticated(user, ScopeSet::for_bearer())
    }
}

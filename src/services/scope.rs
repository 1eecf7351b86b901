/// Capability tags a resolved principal may hold. A route declares
/// exactly one required scope; authorization is plain membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    AppAuth,
    ApiAuth,
    AdminAuth,
}

impl Scope {
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::AppAuth => "app_auth",
            Scope::ApiAuth => "api_auth",
            Scope::AdminAuth => "admin_auth",
        }
    }
}

/// The scopes granted to one request's principal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeSet(u8);

impl ScopeSet {
    pub const EMPTY: ScopeSet = ScopeSet(0);

    fn bit(scope: Scope) -> u8 {
        match scope {
            Scope::AppAuth => 1,
            Scope::ApiAuth => 1 << 1,
            Scope::AdminAuth => 1 << 2,
        }
    }

    pub fn insert(&mut self, scope: Scope) {
        self.0 |= Self::bit(scope);
    }

    pub fn contains(self, scope: Scope) -> bool {
        self.0 & Self::bit(scope) != 0
    }

    /// Scopes for a session-authenticated user. `admin_auth` rides along
    /// only for superusers.
    pub fn for_session(superuser: bool) -> ScopeSet {
        let mut scopes = ScopeSet::EMPTY;
        scopes.insert(Scope::AppAuth);
        scopes.insert(Scope::ApiAuth);
        if superuser {
            scopes.insert(Scope::AdminAuth);
        }
        scopes
    }

    /// Scopes for a bearer-authenticated client: `api_auth` and nothing
    /// else, superuser owner or not.
    pub fn for_bearer() -> ScopeSet {
        let mut scopes = ScopeSet::EMPTY;
        scopes.insert(Scope::ApiAuth);
        scopes
    }

    pub fn tags(self) -> Vec<&'static str> {
        [Scope::AppAuth, Scope::ApiAuth, Scope::AdminAuth]
            .into_iter()
            .filter(|scope| self.contains(*scope))
            .map(Scope::as_str)
            .collect()
    }
}

/// The authorization check: does the resolved set carry the route's
/// required scope.
pub fn authorize(granted: ScopeSet, required: Scope) -> bool {
    granted.contains(required)
}

use std::env;

use dotenv::dotenv;
use tracing::warn;

// Development fallback; the signing key must be at least 32 bytes and
// the same across processes that share sessions.
const DEFAULT_SECRET_KEY: &str = "supersecretsecret-development-only-0123456789";

/// Runtime configuration, read once at startup. Every value has a
/// development default; production overrides via the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: String,
    /// Signing key for the session cookie.
    pub secret_key: String,
    pub session_cookie: String,
    pub session_expire_seconds: i64,
    pub access_token_ttl_seconds: i64,
    /// Empty means any origin (development).
    pub cors_origins: Vec<String>,
    /// When set, API routes answer an expired or revoked bearer token
    /// with an explicit 403 instead of the default silent 401.
    pub strict_bearer_errors: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            session_cookie: "session".to_string(),
            session_expire_seconds: 60 * 60 * 24 * 10,
            access_token_ttl_seconds: 60 * 60,
            cors_origins: Vec::new(),
            strict_bearer_errors: false,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenv().ok();
        let defaults = Self::default();
        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            secret_key: env::var("SECRET_KEY").unwrap_or(defaults.secret_key),
            session_cookie: env::var("SESSION_COOKIE").unwrap_or(defaults.session_cookie),
            session_expire_seconds: env_i64(
                "SESSION_EXPIRE_SECONDS",
                defaults.session_expire_seconds,
            ),
            access_token_ttl_seconds: env_i64(
                "ACCESS_TOKEN_TIMEOUT_SECONDS",
                defaults.access_token_ttl_seconds,
            ),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
            strict_bearer_errors: env_flag("STRICT_BEARER_ERRORS"),
        }
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(name, %raw, "unparseable integer setting, using default");
            default
        }),
        Err(_) => default,
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|raw| raw == "1" || raw.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

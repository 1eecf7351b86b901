/// Client credentials for programmatic access to the API.
///
/// Provisioning happens outside the auth core (the demo seeds one client
/// per user at startup); the core only looks clients up by `client_id`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    pub client_id: String,
    pub client_secret: String,
    pub user_id: i64,
}

use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use tracing::info;

use crate::models::{client::ApiClient, user::User};

#[derive(Default)]
struct Inner {
    users: HashMap<i64, User>,
    clients: HashMap<String, ApiClient>,
}

/// Registry of users and API clients.
///
/// The auth core only reads from it. Seeding and the administrative
/// `active`/`superuser` flips go through the write methods below.
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Inner>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Demo fixtures: the two users the service has always shipped with,
    /// each provisioned one API client. Client credentials are logged so
    /// the demo CLI can pick them up.
    pub fn seeded_demo(bcrypt_cost: u32) -> Self {
        let store = Self::new();
        let seed = [
            (1, "ronnie", "ronnie1", true),
            (2, "bobby", "bobby2", false),
        ];
        for (id, username, password, superuser) in seed {
            let password_hash =
                bcrypt::hash(password, bcrypt_cost).expect("bcrypt rejected seed password");
            store.add_user(User {
                id,
                username: username.to_string(),
                password_hash,
                active: true,
                superuser,
            });
            let client = ApiClient {
                client_id: crate::services::token_service::random_token(),
                client_secret: crate::services::token_service::random_token(),
                user_id: id,
            };
            info!(
                username,
                client_id = %client.client_id,
                client_secret = %client.client_secret,
                "provisioned demo client"
            );
            store.add_client(client);
        }
        store
    }

    pub fn add_user(&self, user: User) {
        let mut inner = self.inner.write().expect("credential store lock poisoned");
        inner.users.insert(user.id, user);
    }

    pub fn add_client(&self, client: ApiClient) {
        let mut inner = self.inner.write().expect("credential store lock poisoned");
        inner.clients.insert(client.client_id.clone(), client);
    }

    pub fn user_by_id(&self, id: i64) -> Option<User> {
        let inner = self.inner.read().expect("credential store lock poisoned");
        inner.users.get(&id).cloned()
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        let inner = self.inner.read().expect("credential store lock poisoned");
        inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned()
    }

    pub fn all_users(&self) -> Vec<User> {
        let inner = self.inner.read().expect("credential store lock poisoned");
        let mut users: Vec<User> = inner.users.values().cloned().collect();
        users.sort_by_key(|user| user.id);
        users
    }

    pub fn client_by_id(&self, client_id: &str) -> Option<ApiClient> {
        let inner = self.inner.read().expect("credential store lock poisoned");
        inner.clients.get(client_id).cloned()
    }

    pub fn clients_for_user(&self, user_id: i64) -> Vec<ApiClient> {
        let inner = self.inner.read().expect("credential store lock poisoned");
        inner
            .clients
            .values()
            .filter(|client| client.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Administrative flip. Returns whether the user exists.
    pub fn set_active(&self, user_id: i64, active: bool) -> bool {
        let mut inner = self.inner.write().expect("credential store lock poisoned");
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.active = active;
                true
            }
            None => false,
        }
    }

    /// Administrative flip. Returns whether the user exists.
    pub fn set_superuser(&self, user_id: i64, superuser: bool) -> bool {
        let mut inner = self.inner.write().expect("credential store lock poisoned");
        match inner.users.get_mut(&user_id) {
            Some(user) => {
                user.superuser = superuser;
                true
            }
            None => false,
        }
    }
}

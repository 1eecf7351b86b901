use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use chrono::Utc;

use crate::models::token::TokenPair;

#[derive(Default)]
struct Index {
    by_access: HashMap<String, TokenPair>,
    // refresh token -> access-token key of the owning pair
    by_refresh: HashMap<String, String>,
}

/// In-process token index, keyed by both halves of each live pair.
///
/// Every write goes through the one lock, so a rotation is a single
/// atomic transition: readers see the old pair or the new one, never
/// half of each.
#[derive(Clone, Default)]
pub struct TokenStore {
    inner: Arc<RwLock<Index>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, pair: TokenPair) {
        let mut index = self.inner.write().expect("token store lock poisoned");
        index
            .by_refresh
            .insert(pair.refresh_token.clone(), pair.access_token.clone());
        index.by_access.insert(pair.access_token.clone(), pair);
    }

    pub fn get_by_access(&self, access_token: &str) -> Option<TokenPair> {
        let index = self.inner.read().expect("token store lock poisoned");
        index.by_access.get(access_token).cloned()
    }

    /// Removes the pair owning `refresh_token` and installs the pair built
    /// by `next`, all inside one write-locked critical section. `None` means
    /// the refresh token is unknown, already consumed, or belongs to a
    /// revoked or expired pair; of two concurrent callers presenting the
    /// same token, exactly one gets `Some`.
    pub fn rotate(
        &self,
        refresh_token: &str,
        next: impl FnOnce(&TokenPair) -> TokenPair,
    ) -> Option<TokenPair> {
        let mut index = self.inner.write().expect("token store lock poisoned");
        let access_key = index.by_refresh.get(refresh_token)?.clone();
        // Revoked and expired pairs are terminal: their refresh half dies
        // with them, and the record stays put for introspection.
        match index.by_access.get(&access_key) {
            Some(old) if !old.revoked && !old.is_expired(Utc::now()) => {}
            _ => return None,
        }
        index.by_refresh.remove(refresh_token);
        let old = index.by_access.remove(&access_key)?;
        let pair = next(&old);
        index
            .by_refresh
            .insert(pair.refresh_token.clone(), pair.access_token.clone());
        index.by_access.insert(pair.access_token.clone(), pair.clone());
        Some(pair)
    }

    /// Flips `revoked` on the pair owning `access_token`. Returns whether
    /// the token was known; revoking twice is the same as revoking once.
    pub fn revoke(&self, access_token: &str) -> bool {
        let mut index = self.inner.write().expect("token store lock poisoned");
        match index.by_access.get_mut(access_token) {
            Some(pair) => {
                pair.revoked = true;
                true
            }
            None => false,
        }
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::session::errors::CredentialStoreError;
use crate::domain::session::models::EmailAddress;
use crate::domain::session::models::User;
use crate::domain::session::models::UserId;
use crate::domain::session::ports::CredentialStore;

/// Process-local credential store.
///
/// Every operation holds the lock for its whole read-modify-write, which gives
/// the same per-record atomicity as the single-statement Postgres updates.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, CredentialStoreError> {
        let mut users = self.users.write().await;

        if users.values().any(|u| &u.email == email) {
            return Err(CredentialStoreError::DuplicateEmail(email.as_str().to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: email.clone(),
            password_hash: password_hash.to_string(),
            refresh_token_hash: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, CredentialStoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn set_refresh_hash(&self, id: &UserId, hash: &str) -> Result<(), CredentialStoreError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or_else(|| CredentialStoreError::NotFound(id.to_string()))?;

        user.refresh_token_hash = Some(hash.to_string());
        user.updated_at = Utc::now();

        Ok(())
    }

    async fn rotate_refresh_hash(
        &self,
        id: &UserId,
        expected: &str,
        new_hash: &str,
    ) -> Result<bool, CredentialStoreError> {
        let mut users = self.users.write().await;

        match users.get_mut(id) {
            Some(user) if user.refresh_token_hash.as_deref() == Some(expected) => {
                user.refresh_token_hash = Some(new_hash.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_refresh_hash(&self, id: &UserId) -> Result<bool, CredentialStoreError> {
        let mut users = self.users.write().await;

        match users.get_mut(id) {
            Some(user) if user.refresh_token_hash.is_some() => {
                user.refresh_token_hash = None;
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> EmailAddress {
        EmailAddress::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let store = InMemoryCredentialStore::new();

        let created = store.create_user(&email("a@x.com"), "hash").await.unwrap();
        assert!(!created.has_active_session());

        let by_email = store.find_by_email(&email("a@x.com")).await.unwrap();
        let by_id = store.find_by_id(&created.id).await.unwrap();

        assert_eq!(by_email, Some(created.clone()));
        assert_eq!(by_id, Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_email_case_insensitively() {
        let store = InMemoryCredentialStore::new();
        store.create_user(&email("a@x.com"), "hash").await.unwrap();

        let result = store.create_user(&email("A@X.COM"), "other").await;
        assert_eq!(
            result,
            Err(CredentialStoreError::DuplicateEmail("a@x.com".to_string()))
        );
    }

    #[tokio::test]
    async fn test_set_refresh_hash_unknown_user() {
        let store = InMemoryCredentialStore::new();

        let result = store.set_refresh_hash(&UserId::new(), "hash").await;
        assert!(matches!(result, Err(CredentialStoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_rotate_only_from_expected_hash() {
        let store = InMemoryCredentialStore::new();
        let user = store.create_user(&email("a@x.com"), "hash").await.unwrap();
        store.set_refresh_hash(&user.id, "h1").await.unwrap();

        assert!(!store.rotate_refresh_hash(&user.id, "h0", "h2").await.unwrap());
        assert!(store.rotate_refresh_hash(&user.id, "h1", "h2").await.unwrap());
        assert!(!store.rotate_refresh_hash(&user.id, "h1", "h3").await.unwrap());

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token_hash.as_deref(), Some("h2"));
    }

    #[tokio::test]
    async fn test_rotate_without_session_fails() {
        let store = InMemoryCredentialStore::new();
        let user = store.create_user(&email("a@x.com"), "hash").await.unwrap();

        assert!(!store.rotate_refresh_hash(&user.id, "h1", "h2").await.unwrap());
        assert!(!store.rotate_refresh_hash(&UserId::new(), "h1", "h2").await.unwrap());
    }

    #[tokio::test]
    async fn test_clear_refresh_hash_is_idempotent() {
        let store = InMemoryCredentialStore::new();
        let user = store.create_user(&email("a@x.com"), "hash").await.unwrap();
        store.set_refresh_hash(&user.id, "h1").await.unwrap();

        assert!(store.clear_refresh_hash(&user.id).await.unwrap());
        assert!(!store.clear_refresh_hash(&user.id).await.unwrap());
        assert!(!store.clear_refresh_hash(&UserId::new()).await.unwrap());

        let stored = store.find_by_id(&user.id).await.unwrap().unwrap();
        assert!(!stored.has_active_session());
    }
}

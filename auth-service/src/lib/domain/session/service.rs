use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::TokenPair;

use super::errors::AuthError;
use super::models::Credentials;
use super::models::User;
use super::models::UserId;
use super::ports::CredentialStore;
use super::ports::TokenServicePort;

/// Domain service implementation for the session lifecycle.
///
/// Every transition that issues tokens persists the hash of the new refresh
/// token, so a user has at most one usable refresh token at any time.
pub struct TokenService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> TokenService<CS>
where
    CS: CredentialStore,
{
    /// Create a new token service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Hashing and token signing
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }

    /// Run Argon2 work off the async workers.
    async fn run_blocking<T, F>(&self, f: F) -> Result<T, AuthError>
    where
        F: FnOnce(&Authenticator) -> Result<T, AuthError> + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || f(&authenticator))
            .await
            .map_err(|e| AuthError::Unknown(format!("hashing task failed: {}", e)))?
    }

    async fn hash_refresh_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let refresh_token = refresh_token.to_string();
        self.run_blocking(move |a| Ok(a.hash_refresh_token(&refresh_token)?))
            .await
    }

    /// Sign a pair for `user` and make its refresh token the live one.
    async fn open_session(&self, user: &User) -> Result<TokenPair, AuthError> {
        let tokens = self.authenticator.issue_pair(user.id, user.email.as_str())?;
        let refresh_hash = self.hash_refresh_token(&tokens.refresh_token).await?;

        self.store.set_refresh_hash(&user.id, &refresh_hash).await?;

        Ok(tokens)
    }
}

#[async_trait]
impl<CS> TokenServicePort for TokenService<CS>
where
    CS: CredentialStore,
{
    async fn signup(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        let Credentials { email, password } = credentials;
        let password_hash = self
            .run_blocking(move |a| Ok(a.hash_password(&password)?))
            .await?;

        let user = self
            .store
            .create_user(&email, &password_hash)
            .await
            .map_err(AuthError::from)
            .inspect_err(|e| {
                if matches!(e, AuthError::AlreadyExists(_)) {
                    tracing::warn!(email = %email, "Signup rejected: email already registered");
                }
            })?;

        let tokens = self.open_session(&user).await?;

        tracing::info!(user_id = %user.id, email = %user.email, "User signed up");
        Ok(tokens)
    }

    async fn signin(&self, credentials: Credentials) -> Result<TokenPair, AuthError> {
        let Credentials { email, password } = credentials;

        let Some(user) = self.store.find_by_email(&email).await? else {
            tracing::warn!(email = %email, "Signin rejected: unknown email");
            // Same Argon2 cost as a wrong password
            return self
                .run_blocking(move |a| Err(a.reject_unknown_account(&password).into()))
                .await;
        };

        let stored_hash = user.password_hash.clone();
        self.run_blocking(move |a| Ok(a.verify_password(&password, &stored_hash)?))
            .await
            .inspect_err(|e| {
                if matches!(e, AuthError::InvalidCredentials) {
                    tracing::warn!(user_id = %user.id, "Signin rejected: wrong password");
                }
            })?;

        let tokens = self.open_session(&user).await?;

        tracing::info!(
            user_id = %user.id,
            replaced_session = user.has_active_session(),
            "User signed in"
        );
        Ok(tokens)
    }

    async fn refresh(&self, user_id: &UserId, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let user = self.store.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id = %user_id, "Refresh rejected: unknown user");
            AuthError::InvalidCredentials
        })?;

        let current_hash = user.refresh_token_hash.clone().ok_or_else(|| {
            tracing::warn!(user_id = %user.id, "Refresh rejected: no active session");
            AuthError::InvalidCredentials
        })?;

        let presented = refresh_token.to_string();
        let stored_hash = current_hash.clone();
        self.run_blocking(move |a| Ok(a.verify_refresh_token_hash(&presented, &stored_hash)?))
            .await
            .inspect_err(|e| {
                if matches!(e, AuthError::InvalidCredentials) {
                    tracing::warn!(user_id = %user.id, "Refresh rejected: stale or unknown refresh token");
                }
            })?;

        let tokens = self.authenticator.issue_pair(user.id, user.email.as_str())?;
        let new_hash = self.hash_refresh_token(&tokens.refresh_token).await?;

        // Another refresh may have rotated the hash since it was read
        let rotated = self
            .store
            .rotate_refresh_hash(&user.id, &current_hash, &new_hash)
            .await?;

        if !rotated {
            tracing::warn!(user_id = %user.id, "Refresh rejected: token rotated concurrently");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(user_id = %user.id, "Refresh token rotated");
        Ok(tokens)
    }

    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError> {
        if self.store.clear_refresh_hash(user_id).await? {
            tracing::info!(user_id = %user_id, "User logged out");
        } else {
            tracing::debug!(user_id = %user_id, "Logout without active session");
        }

        Ok(())
    }
}

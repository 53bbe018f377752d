use async_trait::async_trait;
use auth::TokenPair;

use super::errors::AuthError;
use super::errors::CredentialStoreError;
use super::models::Credentials;
use super::models::EmailAddress;
use super::models::User;
use super::models::UserId;

/// Port for the session state transitions.
#[async_trait]
pub trait TokenServicePort: Send + Sync + 'static {
    /// Register a new user and open a session.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `DatabaseError` - Any other store failure
    async fn signup(&self, credentials: Credentials) -> Result<TokenPair, AuthError>;

    /// Verify credentials and open a session, replacing any previous one.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    async fn signin(&self, credentials: Credentials) -> Result<TokenPair, AuthError>;

    /// Exchange the live refresh token for a new pair. The presented token is
    /// unusable afterwards.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, no session, or stale/mismatched
    ///   token (including losing a concurrent rotation)
    async fn refresh(&self, user_id: &UserId, refresh_token: &str) -> Result<TokenPair, AuthError>;

    /// Close the user's session. Idempotent; an unknown user is a no-op.
    ///
    /// # Errors
    /// * `DatabaseError` - Store failure
    async fn logout(&self, user_id: &UserId) -> Result<(), AuthError>;
}

/// Persistence operations for user credentials.
///
/// Every operation is atomic for a single record.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new user. The store assigns the id and timestamps.
    ///
    /// # Errors
    /// * `DuplicateEmail` - Email is already registered
    /// * `Backend` - Storage failure
    async fn create_user(
        &self,
        email: &EmailAddress,
        password_hash: &str,
    ) -> Result<User, CredentialStoreError>;

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, CredentialStoreError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, CredentialStoreError>;

    /// Unconditionally overwrite the refresh token hash.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Backend` - Storage failure
    async fn set_refresh_hash(&self, id: &UserId, hash: &str) -> Result<(), CredentialStoreError>;

    /// Replace the refresh token hash only if it still equals `expected`.
    ///
    /// # Returns
    /// `true` if the swap happened, `false` if the stored hash had moved on
    async fn rotate_refresh_hash(
        &self,
        id: &UserId,
        expected: &str,
        new_hash: &str,
    ) -> Result<bool, CredentialStoreError>;

    /// Clear the refresh token hash if one is set.
    ///
    /// # Returns
    /// `true` if a live session was cleared, `false` if there was nothing to clear
    async fn clear_refresh_hash(&self, id: &UserId) -> Result<bool, CredentialStoreError>;
}

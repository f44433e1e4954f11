use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::AccessToken;
use crate::account::models::AuthenticatedIdentity;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCredentials;
use crate::account::models::Registration;
use crate::account::models::User;
use crate::account::models::Username;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// The new user is not logged in.
    ///
    /// # Errors
    /// * `InvalidUsername` / `InvalidEmail` / `InvalidPassword` - Input fails format rules
    /// * `Conflict` - Username or email is already taken
    /// * `Storage` - Repository operation failed
    /// * `Internal` - Password hashing failed
    async fn register(&self, registration: Registration) -> Result<(), AccountError>;

    /// Verify credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password (not distinguished)
    /// * `Storage` - Repository operation failed
    /// * `Internal` - Token generation failed
    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, AccountError>;

    /// Record a logout.
    ///
    /// Tokens are not tracked server-side, so nothing is revoked; the caller
    /// discards its copy of the token.
    fn logout(&self, identity: &AuthenticatedIdentity);

    /// Verify an access token and return the identity it asserts.
    ///
    /// # Errors
    /// * `Token` - Token is malformed, not signed by this service, or expired
    fn authenticate(&self, token: &str) -> Result<AuthenticatedIdentity, AccountError>;
}

/// Persistence operations for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError>;

    /// Retrieve user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `Storage` - Database operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError>;

    /// Persist a new user.
    ///
    /// # Errors
    /// * `Conflict` - Username or email was taken concurrently
    /// * `Storage` - Database operation failed
    async fn insert(&self, user: User) -> Result<(), AccountError>;
}

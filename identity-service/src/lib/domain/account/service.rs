use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::errors::CredentialField;
use crate::account::models::AccessToken;
use crate::account::models::AuthenticatedIdentity;
use crate::account::models::LoginCredentials;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::Registration;
use crate::account::models::RegistrationPolicy;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::Username;
use crate::account::ports::AccountServicePort;
use crate::account::ports::UserRepository;

/// Domain service implementation for registration, login and logout.
///
/// Holds no state across calls besides the repository. Password hashing and
/// verification run on the blocking thread pool.
pub struct AccountService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    policy: RegistrationPolicy,
}

impl<UR> AccountService<UR>
where
    UR: UserRepository,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token issuer built from configuration
    /// * `policy` - Deployment-specific registration rules
    pub fn new(
        repository: Arc<UR>,
        authenticator: Arc<Authenticator>,
        policy: RegistrationPolicy,
    ) -> Self {
        Self {
            repository,
            authenticator,
            policy,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, AccountError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| AccountError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| AccountError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<UR> AccountServicePort for AccountService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, registration: Registration) -> Result<(), AccountError> {
        let command = RegisterCommand::parse(registration, self.policy).inspect_err(|e| {
            tracing::info!(field = ?e.field(), error = %e, "Registration rejected: invalid input");
        })?;

        if self
            .repository
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::info!(username = %command.username, "Registration rejected: username taken");
            return Err(AccountError::Conflict(CredentialField::Username));
        }

        if let Some(email) = &command.email {
            if self.repository.find_by_email(email).await?.is_some() {
                tracing::info!(username = %command.username, "Registration rejected: email taken");
                return Err(AccountError::Conflict(CredentialField::Email));
            }
        }

        let RegisterCommand {
            username,
            email,
            password,
        } = command;

        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: UserId::new(),
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        };
        let user_id = user.id;
        let username = user.username.clone();

        self.repository.insert(user).await?;

        tracing::info!(user_id = %user_id, username = %username, "User registered");

        Ok(())
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<AccessToken, AccountError> {
        let LoginCredentials { username, password } = credentials;

        // A name that breaks the username rules cannot belong to any account.
        let Ok(username) = Username::new(username) else {
            return Err(AccountError::InvalidCredentials);
        };

        let Some(user) = self.repository.find_by_username(&username).await? else {
            tracing::info!(username = %username, "Login rejected: unknown user");
            return Err(AccountError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let stored_hash = user.password_hash.clone();
        let subject = user.username.as_str().to_string();

        let outcome = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &subject)
        })
        .await
        .map_err(|e| AccountError::Internal(format!("Password verification task failed: {}", e)))?;

        match outcome {
            Ok(result) => {
                if self.authenticator.needs_rehash(&user.password_hash) {
                    tracing::debug!(
                        user_id = %user.id,
                        "Stored password hash uses outdated parameters"
                    );
                }

                tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

                Ok(AccessToken {
                    token: result.access_token,
                    expires_at: result.expires_at,
                })
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::info!(username = %user.username, "Login rejected: wrong password");
                Err(AccountError::InvalidCredentials)
            }
            Err(AuthenticationError::PasswordError(e)) => {
                tracing::error!(
                    user_id = %user.id,
                    error = %e,
                    "Stored password hash could not be verified"
                );
                Err(AccountError::InvalidCredentials)
            }
            Err(AuthenticationError::JwtError(e)) => Err(AccountError::Internal(format!(
                "Token generation failed: {}",
                e
            ))),
        }
    }

    fn logout(&self, identity: &AuthenticatedIdentity) {
        tracing::info!(subject = %identity.subject, "User logged out");
    }

    fn authenticate(&self, token: &str) -> Result<AuthenticatedIdentity, AccountError> {
        let claims = self.authenticator.validate_token(token)?;
        tracing::debug!(subject = %claims.sub, "Access token verified");
        Ok(AuthenticatedIdentity::from(claims))
    }
}

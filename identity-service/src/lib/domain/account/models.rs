use std::fmt;
use std::sync::LazyLock;

use chrono::DateTime;
use chrono::Utc;
use regex::Regex;
use uuid::Uuid;

use crate::account::errors::AccountError;
use crate::account::errors::EmailError;
use crate::account::errors::PasswordPolicyError;
use crate::account::errors::UsernameError;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]{3,64}$").unwrap());

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,4}$").unwrap());

static PASSWORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9$!@_%^*&()]{8,64}$").unwrap());

/// Stored user record.
///
/// The password hash is produced by the password hasher only; the plaintext
/// is never part of this type.
#[derive(Clone)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: Option<EmailAddress>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-64 characters and contains only ASCII letters and digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 64;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 64 characters
    /// * `InvalidCharacters` - Contains anything other than ASCII letters and digits
    pub fn new(username: String) -> Result<Self, UsernameError> {
        Self::validate(&username)?;
        Ok(Self(username))
    }

    /// Whether `username` satisfies the username rules.
    pub fn is_valid(username: &str) -> bool {
        Self::validate(username).is_ok()
    }

    fn validate(username: &str) -> Result<(), UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !USERNAME_PATTERN.is_match(username) {
            return Err(UsernameError::InvalidCharacters);
        }
        Ok(())
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Checks the `local@domain.tld` shape only: lowercase local part of
/// `[a-z0-9._%+-]`, domain of `[a-z0-9.-]`, and a 2-4 letter lowercase TLD.
/// Full RFC 5322 syntax is not supported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not have the `local@domain.tld` shape
    pub fn new(email: String) -> Result<Self, EmailError> {
        if Self::is_valid(&email) {
            Ok(Self(email))
        } else {
            Err(EmailError::InvalidFormat)
        }
    }

    /// Whether `email` has the accepted `local@domain.tld` shape.
    pub fn is_valid(email: &str) -> bool {
        EMAIL_PATTERN.is_match(email)
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the password policy.
///
/// 8-64 characters drawn from ASCII letters, digits and `$!@_%^&*()`.
/// Passwords that would otherwise be strong but use other symbols (e.g. `#`)
/// are rejected. `Debug` never prints the value and the type is not `Clone`,
/// so the plaintext is dropped with the command that owns it.
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;
    const MAX_LENGTH: usize = 64;

    /// Create a new password that satisfies the policy.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    /// * `TooLong` - More than 64 characters
    /// * `InvalidCharacters` - Contains a character outside the allowed set
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        Self::validate(&password)?;
        Ok(Self(password))
    }

    /// Whether `password` satisfies the password policy.
    pub fn is_valid(password: &str) -> bool {
        Self::validate(password).is_ok()
    }

    fn validate(password: &str) -> Result<(), PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }
        if length > Self::MAX_LENGTH {
            return Err(PasswordPolicyError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            });
        }
        if !PASSWORD_PATTERN.is_match(password) {
            return Err(PasswordPolicyError::InvalidCharacters);
        }
        Ok(())
    }

    /// Plaintext, for handing to the password hasher only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Raw registration input as received from the caller
pub struct Registration {
    pub username: String,
    pub email: Option<String>,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Raw login input as received from the caller
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration rules that vary per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationPolicy {
    /// Whether an email address must be supplied
    pub require_email: bool,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            require_email: true,
        }
    }
}

/// Command to register a new user with validated fields
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: Option<EmailAddress>,
    pub password: Password,
}

impl RegisterCommand {
    /// Validate raw registration input.
    ///
    /// Fields are checked in order username, email, password; the first
    /// violation is returned. An empty email counts as absent.
    ///
    /// # Errors
    /// * `InvalidUsername` - Username violates the username rules
    /// * `InvalidEmail` - Email missing while required, or malformed
    /// * `InvalidPassword` - Password violates the password policy
    pub fn parse(
        registration: Registration,
        policy: RegistrationPolicy,
    ) -> Result<Self, AccountError> {
        let Registration {
            username,
            email,
            password,
        } = registration;

        let username = Username::new(username)?;

        let email = match email.filter(|e| !e.is_empty()) {
            Some(email) => Some(EmailAddress::new(email)?),
            None if policy.require_email => return Err(EmailError::Missing.into()),
            None => None,
        };

        let password = Password::new(password)?;

        Ok(Self {
            username,
            email,
            password,
        })
    }
}

/// Identity extracted from a verified access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub subject: String,
}

impl From<auth::Claims> for AuthenticatedIdentity {
    fn from(claims: auth::Claims) -> Self {
        Self {
            subject: claims.sub,
        }
    }
}

/// Access token handed to the caller after a successful login
#[derive(Clone)]
pub struct AccessToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

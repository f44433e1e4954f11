use std::fmt;

use auth::JwtError;
use thiserror::Error;

/// Credential field named by validation and conflict errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    Username,
    Email,
    Password,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::Username => f.write_str("username"),
            CredentialField::Email => f.write_str("email"),
            CredentialField::Password => f.write_str("password"),
        }
    }
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Username contains invalid characters (only letters and digits allowed)")]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email address is required")]
    Missing,

    #[error("Invalid email format: expected local@domain.tld")]
    InvalidFormat,
}

/// Error for password policy violations.
///
/// Never carries the rejected password itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    #[error("Password too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Password too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error("Password contains characters outside the allowed set (letters, digits, $!@_%^&*())")]
    InvalidCharacters,
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Credential format errors (automatically converted via #[from])
    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid password: {0}")]
    InvalidPassword(#[from] PasswordPolicyError),

    // Domain-level errors
    #[error("{0} already exists")]
    Conflict(CredentialField),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token: {0}")]
    Token(#[from] JwtError),

    // Infrastructure errors
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountError {
    /// Field a validation or conflict error refers to.
    pub fn field(&self) -> Option<CredentialField> {
        match self {
            AccountError::InvalidUsername(_) => Some(CredentialField::Username),
            AccountError::InvalidEmail(_) => Some(CredentialField::Email),
            AccountError::InvalidPassword(_) => Some(CredentialField::Password),
            AccountError::Conflict(field) => Some(*field),
            _ => None,
        }
    }
}

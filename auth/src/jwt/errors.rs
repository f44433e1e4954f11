use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are split into exactly three kinds so callers can
/// tell a stale token apart from a forged or garbled one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,
}

//! `access_token` cookie helpers.
//!
//! The cookie is always `HttpOnly; Secure; Path=/`. Clearing uses a negative
//! `Max-Age`, which user agents treat as immediate expiry.

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// `Set-Cookie` value handing `token` to the client for `max_age_seconds`.
pub fn access_token_cookie(
    token: &str,
    max_age_seconds: i64,
) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format!(
        "{}={}; HttpOnly; Secure; Max-Age={}; Path=/",
        ACCESS_TOKEN_COOKIE, token, max_age_seconds
    ))
}

/// `Set-Cookie` value instructing the client to drop its token.
pub fn clear_access_token_cookie() -> HeaderValue {
    HeaderValue::from_static("access_token=; HttpOnly; Secure; Max-Age=-1; Path=/")
}

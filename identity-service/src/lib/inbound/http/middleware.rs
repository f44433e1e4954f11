use auth::JwtError;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum_extra::extract::CookieJar;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;

use super::handlers::ApiError;
use super::router::AppState;
use super::session;
use crate::account::errors::AccountError;
use crate::account::ports::AccountServicePort;

/// Middleware that admits requests carrying a valid access token.
///
/// The token is read from `Authorization: Bearer` first, then from the
/// `access_token` cookie; an empty token in either place counts as absent.
/// On success the verified identity is stored in the request extensions as
/// [`AuthenticatedIdentity`](crate::account::models::AuthenticatedIdentity).
/// A present but invalid token is rejected with 401 and the cookie is cleared.
pub async fn require_access_token<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = bearer
        .map(|TypedHeader(authorization)| authorization.token().to_string())
        .filter(|token| !token.is_empty())
        .or_else(|| {
            jar.get(session::ACCESS_TOKEN_COOKIE)
                .map(|cookie| cookie.value().to_string())
                .filter(|token| !token.is_empty())
        })
        .ok_or_else(|| {
            tracing::debug!(uri = %req.uri(), "Request without access token");
            ApiError::Unauthorized("Missing access token".to_string()).into_response()
        })?;

    let identity = state.account_service.authenticate(&token).map_err(|e| {
        tracing::warn!(error = %e, uri = %req.uri(), "Access token rejected");
        let message = match e {
            AccountError::Token(JwtError::Expired) => "Token expired",
            _ => "Invalid token",
        };
        (
            [(header::SET_COOKIE, session::clear_access_token_cookie())],
            ApiError::Unauthorized(message.to_string()),
        )
            .into_response()
    })?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

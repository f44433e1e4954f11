use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::account::models::AuthenticatedIdentity;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session;

/// Clear the caller's `access_token` cookie.
///
/// Issued tokens stay valid until they expire.
pub async fn logout<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Extension(identity): Extension<AuthenticatedIdentity>,
) -> ([(HeaderName, HeaderValue); 1], ApiSuccess<LogoutResponseData>) {
    state.account_service.logout(&identity);

    (
        [(header::SET_COOKIE, session::clear_access_token_cookie())],
        ApiSuccess::new(
            StatusCode::OK,
            LogoutResponseData {
                message: "Successfully logged out".to_string(),
            },
        ),
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutResponseData {
    pub message: String,
}

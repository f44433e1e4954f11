use axum::extract::State;
use axum::http::header;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::LoginCredentials;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;
use crate::inbound::http::session;

/// Exchange credentials for an access token.
///
/// The token is returned in the body and also set as the `access_token`
/// cookie, expiring together with the token.
pub async fn login<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<LoginRequest>,
) -> Result<([(HeaderName, HeaderValue); 1], ApiSuccess<LoginResponseData>), ApiError> {
    let access_token = state.account_service.login(body.into()).await?;

    let max_age = state.authenticator.token_ttl().num_seconds();
    let cookie = session::access_token_cookie(&access_token.token, max_age)
        .map_err(|e| ApiError::InternalServerError(format!("Invalid cookie value: {}", e)))?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        ApiSuccess::new(
            StatusCode::OK,
            LoginResponseData {
                token: access_token.token,
                expires_at: access_token.expires_at,
            },
        ),
    ))
}

/// HTTP request body for login (raw JSON)
#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl From<LoginRequest> for LoginCredentials {
    fn from(body: LoginRequest) -> Self {
        LoginCredentials {
            username: body.username,
            password: body.password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

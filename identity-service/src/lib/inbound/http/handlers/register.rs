use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::models::Registration;
use crate::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Register a new account. The caller is not logged in afterwards.
pub async fn register<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Json(body): Json<RegisterRequest>,
) -> Result<ApiSuccess<()>, ApiError> {
    state
        .account_service
        .register(body.into())
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::ACCEPTED, ()))
}

/// HTTP request body for registration (raw JSON)
#[derive(Deserialize)]
pub struct RegisterRequest {
    username: String,
    #[serde(default)]
    email: Option<String>,
    password: String,
}

impl From<RegisterRequest> for Registration {
    fn from(body: RegisterRequest) -> Self {
        Registration {
            username: body.username,
            email: body.email,
            password: body.password,
        }
    }
}

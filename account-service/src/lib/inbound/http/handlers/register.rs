use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::account::validation::RegistrationInput;
use crate::inbound::http::router::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequestBody>,
) -> Result<ApiSuccess, ApiError> {
    state
        .account_service
        .register(body.into_input())
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, "Register successfully."))
}

/// HTTP request body for registration (raw JSON).
///
/// Every field is optional so missing ones become per-field validation
/// errors; unknown fields are ignored by deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    username: Option<String>,
    email: Option<String>,
    #[serde(rename = "type")]
    role: Option<String>,
    password: Option<String>,
}

impl RegisterRequestBody {
    fn into_input(self) -> RegistrationInput {
        RegistrationInput {
            username: self.username,
            email: self.email,
            role: self.role,
            password: self.password,
        }
    }
}

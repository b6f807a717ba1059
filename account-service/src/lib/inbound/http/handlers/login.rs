use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use crate::account::ports::AccountServicePort;
use crate::account::validation::LoginInput;
use crate::inbound::http::router::AppState;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess, ApiError> {
    state
        .account_service
        .login(body.into_input())
        .await
        .map_err(ApiError::from)
        .map(|_| ApiSuccess::new(StatusCode::OK, "Login successfully."))
}

/// HTTP request body for login (raw JSON).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: Option<String>,
    password: Option<String>,
}

impl LoginRequestBody {
    fn into_input(self) -> LoginInput {
        LoginInput {
            username: self.username,
            password: self.password,
        }
    }
}

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Serialize;

use crate::account::errors::AccountError;
use crate::account::errors::FieldError;

pub mod login;
pub mod register;

#[derive(Debug, Clone)]
pub struct ApiSuccess(StatusCode, Json<ApiSuccessBody>);

impl ApiSuccess {
    pub fn new(status: StatusCode, message: &str) -> Self {
        ApiSuccess(
            status,
            Json(ApiSuccessBody {
                code: status.as_u16(),
                message: message.to_string(),
            }),
        )
    }
}

impl IntoResponse for ApiSuccess {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Successful operation response body: `{code, message}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiSuccessBody {
    code: u16,
    message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    BadRequest(Vec<FieldError>),
    Conflict,
    Unauthorized,
    NotFound(String),
    InternalServerError(String),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::InternalServerError(e.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(field_errors) => ApiError::BadRequest(field_errors),
            AccountError::UsernameTaken(_) => ApiError::Conflict,
            AccountError::InvalidCredentials => ApiError::Unauthorized,
            AccountError::Password(_) | AccountError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(field_errors) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(400, Some("Bad Request"), "Request body invalid!")
                    .with_field_errors(field_errors),
            ),
            // A duplicate username reports code 409 in the body but ships
            // under an HTTP 400 status; clients key off the body code.
            ApiError::Conflict => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody::new(409, Some("Bad Request"), "Username already registered!"),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody::new(401, Some("Unauthorized"), "Invalid username or password!"),
            ),
            ApiError::NotFound(path) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody::new(404, None, &format!("Not found - {}", path)),
            ),
            ApiError::InternalServerError(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody::new(500, None, &message),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Error response body: `{code, title?, message, fieldErrors?}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorBody {
    code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'static str>,
    message: String,
    #[serde(rename = "fieldErrors", skip_serializing_if = "Option::is_none")]
    field_errors: Option<Vec<FieldError>>,
}

impl ApiErrorBody {
    fn new(code: u16, title: Option<&'static str>, message: &str) -> Self {
        Self {
            code,
            title,
            message: message.to_string(),
            field_errors: None,
        }
    }

    fn with_field_errors(mut self, field_errors: Vec<FieldError>) -> Self {
        self.field_errors = Some(field_errors);
        self
    }
}

use std::str::FromStr;

use crate::account::errors::FieldError;
use crate::account::models::EmailAddress;
use crate::account::models::LoginCommand;
use crate::account::models::Password;
use crate::account::models::RegisterCommand;
use crate::account::models::Role;
use crate::account::models::Username;

/// Raw registration input as received on the wire.
///
/// Fields are optional so that missing ones surface as per-field "required"
/// errors instead of a deserialization failure. Unknown fields are dropped
/// before this struct is built.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Raw login input as received on the wire.
#[derive(Debug, Clone, Default)]
pub struct LoginInput {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Validate a registration request.
///
/// All violated rules across all fields are reported together, one
/// `FieldError` per rule, never just the first.
///
/// # Arguments
/// * `input` - Raw registration input
///
/// # Returns
/// Command with validated value objects
///
/// # Errors
/// Non-empty list of field errors
pub fn validate_registration(input: RegistrationInput) -> Result<RegisterCommand, Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = validate_field(&mut errors, "username", input.username, Username::new);
    let email = validate_field(&mut errors, "email", input.email, EmailAddress::new);
    let role = validate_field(&mut errors, "type", input.role, |raw| Role::from_str(&raw));
    let password = validate_field(&mut errors, "password", input.password, Password::new);

    match (username, email, role, password) {
        (Some(username), Some(email), Some(role), Some(password)) => Ok(RegisterCommand {
            username,
            email,
            role,
            password,
        }),
        _ => Err(errors),
    }
}

/// Validate a login request.
///
/// Applies the registration username and password rules, not a bare presence
/// check. Callers that must not leak which rule failed collapse the error
/// list themselves.
///
/// # Arguments
/// * `input` - Raw login input
///
/// # Returns
/// Command with validated value objects
///
/// # Errors
/// Non-empty list of field errors
pub fn validate_login(input: LoginInput) -> Result<LoginCommand, Vec<FieldError>> {
    let mut errors = Vec::new();

    let username = validate_field(&mut errors, "username", input.username, Username::new);
    let password = validate_field(&mut errors, "password", input.password, Password::new);

    match (username, password) {
        (Some(username), Some(password)) => Ok(LoginCommand { username, password }),
        _ => Err(errors),
    }
}

/// Run one field through its value-object constructor, recording the failure.
fn validate_field<T, E: std::fmt::Display>(
    errors: &mut Vec<FieldError>,
    field: &str,
    raw: Option<String>,
    parse: impl FnOnce(String) -> Result<T, E>,
) -> Option<T> {
    match raw {
        None => {
            errors.push(FieldError::required(field));
            None
        }
        Some(raw) => match parse(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                errors.push(FieldError::new(field, e.to_string()));
                None
            }
        },
    }
}

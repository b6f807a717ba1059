use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::EmailError;
use crate::account::errors::PasswordRuleError;
use crate::account::errors::RoleError;
use crate::account::errors::UsernameError;

/// Username value type
///
/// Ensures username length is within [3, 24].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 24;

    /// Create a new valid username.
    ///
    /// # Arguments
    /// * `username` - Raw username string
    ///
    /// # Returns
    /// Validated Username value object
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 24 characters
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let length = username.len();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(username))
        }
    }

    /// Get username as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Arguments
    /// * `email` - Raw email string
    ///
    /// # Returns
    /// Validated EmailAddress value object
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Account role.
///
/// Parsed case-sensitively from the wire value, so "Admin" is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Get the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(RoleError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Plaintext password value type
///
/// Ensures length is within [5, 24] and that the password contains at least
/// one lowercase letter, one uppercase letter, and one character that is
/// neither letter nor digit. The three content conditions and the length
/// bound form a single rule with a single error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 5;
    const MAX_LENGTH: usize = 24;

    /// Create a new policy-conforming password.
    ///
    /// # Arguments
    /// * `password` - Raw plaintext password
    ///
    /// # Returns
    /// Validated Password value object
    ///
    /// # Errors
    /// * `PolicyNotMet` - Length or character-class requirement violated
    pub fn new(password: String) -> Result<Self, PasswordRuleError> {
        let length = password.len();
        let has_lowercase = password.chars().any(|c| c.is_lowercase());
        let has_uppercase = password.chars().any(|c| c.is_uppercase());
        let has_special = password.chars().any(|c| !c.is_alphanumeric());

        if length < Self::MIN_LENGTH
            || length > Self::MAX_LENGTH
            || !has_lowercase
            || !has_uppercase
            || !has_special
        {
            Err(PasswordRuleError::PolicyNotMet)
        } else {
            Ok(Self(password))
        }
    }

    /// Get password as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Stored credentials for one username.
///
/// Created on successful registration and never mutated afterwards. The
/// `cost` field records the hasher work factor used at registration time; the
/// real per-record salt is embedded in `password_hash` itself.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub email: EmailAddress,
    pub role: Role,
    pub password_hash: String,
    pub cost: u32,
    pub created_at: DateTime<Utc>,
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub role: Role,
    pub password: Password,
}

/// Command to authenticate an existing account with domain types
#[derive(Debug)]
pub struct LoginCommand {
    pub username: Username,
    pub password: Password,
}

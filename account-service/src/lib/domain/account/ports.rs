use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::CredentialRecord;
use crate::account::models::Username;
use crate::account::validation::LoginInput;
use crate::account::validation::RegistrationInput;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `input` - Raw registration input (username, email, role, password)
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `Validation` - One or more fields violated a rule
    /// * `UsernameTaken` - Username is already registered
    /// * `Password` - Hashing operation failed
    async fn register(&self, input: RegistrationInput) -> Result<(), AccountError>;

    /// Authenticate an existing account.
    ///
    /// # Arguments
    /// * `input` - Raw login input (username, password)
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `InvalidCredentials` - Invalid input, unknown username, or password
    ///   mismatch; the three cases are deliberately indistinguishable
    /// * `Password` - Verification operation failed
    async fn login(&self, input: LoginInput) -> Result<(), AccountError>;
}

/// Storage operations for credential records.
///
/// One record per username; records are never mutated after insertion.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve the credential record for a username.
    ///
    /// Pure lookup, no side effects.
    ///
    /// # Arguments
    /// * `username` - Username to look up
    ///
    /// # Returns
    /// Optional credential record (None if not registered)
    ///
    /// # Errors
    /// * `Unknown` - Storage operation failed
    async fn find(&self, username: &Username) -> Result<Option<CredentialRecord>, AccountError>;

    /// Insert a credential record if the username is free.
    ///
    /// The existence check and the insert are a single atomic step, so two
    /// concurrent registrations of the same username cannot both succeed.
    ///
    /// # Arguments
    /// * `username` - Username to register
    /// * `record` - Credential record to store
    ///
    /// # Returns
    /// Unit on success
    ///
    /// # Errors
    /// * `UsernameTaken` - A record already exists for this username
    /// * `Unknown` - Storage operation failed
    async fn insert(&self, username: Username, record: CredentialRecord)
        -> Result<(), AccountError>;
}

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::errors::AccountError;
use crate::account::models::CredentialRecord;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;
use crate::account::validation::validate_login;
use crate::account::validation::validate_registration;
use crate::account::validation::LoginInput;
use crate::account::validation::RegistrationInput;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
/// Owns the credential store for the process lifetime; nothing is persisted.
pub struct AccountService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    password_hasher: Arc<auth::PasswordHasher>,
}

impl<CS> AccountService<CS>
where
    CS: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential storage implementation
    /// * `hashing_cost` - Work factor for password hashing
    ///
    /// # Returns
    /// Configured account service instance
    pub fn new(store: Arc<CS>, hashing_cost: u32) -> Self {
        Self {
            store,
            password_hasher: Arc::new(auth::PasswordHasher::new(hashing_cost)),
        }
    }

    /// Hash a password on the blocking pool.
    ///
    /// Key derivation is the one slow operation in the service and must not
    /// stall unrelated requests on the async dispatch path.
    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AccountError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(AccountError::from)
    }

    /// Verify a password against a stored hash on the blocking pool.
    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AccountError> {
        let hasher = Arc::clone(&self.password_hasher);
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AccountError::Unknown(format!("Verification task failed: {}", e)))?
            .map_err(AccountError::from)
    }
}

#[async_trait]
impl<CS> AccountServicePort for AccountService<CS>
where
    CS: CredentialStore,
{
    async fn register(&self, input: RegistrationInput) -> Result<(), AccountError> {
        let command = validate_registration(input).map_err(AccountError::Validation)?;

        // Cheap pre-check so a taken username skips the hashing work. The
        // store's insert re-checks atomically, which also covers the race
        // between two concurrent registrations of the same username.
        if self.store.find(&command.username).await?.is_some() {
            return Err(AccountError::UsernameTaken(command.username.to_string()));
        }

        let RegisterCommand {
            username,
            email,
            role,
            password,
        } = command;

        let password_hash = self.hash_password(password.as_str().to_string()).await?;

        let record = CredentialRecord {
            email,
            role,
            password_hash,
            cost: self.password_hasher.cost(),
            created_at: Utc::now(),
        };

        self.store.insert(username.clone(), record).await?;

        tracing::info!(username = %username, "Account registered");

        Ok(())
    }

    async fn login(&self, input: LoginInput) -> Result<(), AccountError> {
        // Validation failures are reported exactly like a credential
        // mismatch, so responses leak nothing about which field was wrong.
        let command = match validate_login(input) {
            Ok(command) => command,
            Err(errors) => {
                tracing::debug!(error_count = errors.len(), "Login input failed validation");
                return Err(AccountError::InvalidCredentials);
            }
        };

        let record = self
            .store
            .find(&command.username)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let matches = self
            .verify_password(command.password.as_str().to_string(), record.password_hash)
            .await?;

        if !matches {
            return Err(AccountError::InvalidCredentials);
        }

        tracing::info!(username = %command.username, "Account authenticated");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::account::models::EmailAddress;
    use crate::account::models::Role;
    use crate::account::models::Username;

    // Define mocks in the test module using mockall
    mock! {
        pub TestCredentialStore {}

        #[async_trait]
        impl CredentialStore for TestCredentialStore {
            async fn find(&self, username: &Username) -> Result<Option<CredentialRecord>, AccountError>;
            async fn insert(&self, username: Username, record: CredentialRecord) -> Result<(), AccountError>;
        }
    }

    fn registration_input() -> RegistrationInput {
        RegistrationInput {
            username: Some("nicola".to_string()),
            email: Some("nicola@example.com".to_string()),
            role: Some("user".to_string()),
            password: Some("Pass_word1".to_string()),
        }
    }

    fn stored_record(password: &str) -> CredentialRecord {
        CredentialRecord {
            email: EmailAddress::new("nicola@example.com".to_string()).unwrap(),
            role: Role::User,
            password_hash: auth::PasswordHasher::new(1).hash(password).unwrap(),
            cost: 1,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find()
            .withf(|username| username.as_str() == "nicola")
            .times(1)
            .returning(|_| Ok(None));

        store
            .expect_insert()
            .withf(|username, record| {
                username.as_str() == "nicola"
                    && record.email.as_str() == "nicola@example.com"
                    && record.role == Role::User
                    && record.password_hash.starts_with("$argon2")
                    && record.cost == 1
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let service = AccountService::new(Arc::new(store), 1);

        let result = service.register(registration_input()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_register_invalid_input_touches_no_store() {
        let mut store = MockTestCredentialStore::new();
        store.expect_find().times(0);
        store.expect_insert().times(0);

        let service = AccountService::new(Arc::new(store), 1);

        let input = RegistrationInput {
            username: Some("ab".to_string()),
            password: Some("abc12345".to_string()),
            ..registration_input()
        };

        let result = service.register(input).await;
        match result.expect_err("Registration should fail") {
            AccountError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["username", "password"]);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_username() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find()
            .times(1)
            .returning(|_| Ok(Some(stored_record("Pass_word1"))));

        store.expect_insert().times(0);

        let service = AccountService::new(Arc::new(store), 1);

        let result = service.register(registration_input()).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::UsernameTaken(_)
        ));
    }

    #[tokio::test]
    async fn test_register_loses_insert_race() {
        let mut store = MockTestCredentialStore::new();

        store.expect_find().times(1).returning(|_| Ok(None));

        // A concurrent registration wins between the pre-check and the insert
        store
            .expect_insert()
            .times(1)
            .returning(|username, _| Err(AccountError::UsernameTaken(username.to_string())));

        let service = AccountService::new(Arc::new(store), 1);

        let result = service.register(registration_input()).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::UsernameTaken(_)
        ));
    }

    #[tokio::test]
    async fn test_login_success() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find()
            .withf(|username| username.as_str() == "nicola")
            .times(1)
            .returning(|_| Ok(Some(stored_record("Pass_word1"))));

        let service = AccountService::new(Arc::new(store), 1);

        let input = LoginInput {
            username: Some("nicola".to_string()),
            password: Some("Pass_word1".to_string()),
        };

        let result = service.login(input).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let mut store = MockTestCredentialStore::new();

        store
            .expect_find()
            .times(1)
            .returning(|_| Ok(Some(stored_record("Pass_word1"))));

        let service = AccountService::new(Arc::new(store), 1);

        let input = LoginInput {
            username: Some("nicola".to_string()),
            password: Some("Wrong_pass1".to_string()),
        };

        let result = service.login(input).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_unknown_username() {
        let mut store = MockTestCredentialStore::new();

        store.expect_find().times(1).returning(|_| Ok(None));

        let service = AccountService::new(Arc::new(store), 1);

        let input = LoginInput {
            username: Some("nobody".to_string()),
            password: Some("Pass_word1".to_string()),
        };

        let result = service.login(input).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }

    #[tokio::test]
    async fn test_login_invalid_input_is_unauthorized() {
        let mut store = MockTestCredentialStore::new();
        // Validation fails before the store is consulted
        store.expect_find().times(0);

        let service = AccountService::new(Arc::new(store), 1);

        let input = LoginInput {
            username: Some("nicola".to_string()),
            password: Some("abc".to_string()),
        };

        let result = service.login(input).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::InvalidCredentials
        ));
    }
}

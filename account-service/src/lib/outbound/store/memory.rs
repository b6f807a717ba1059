use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::models::CredentialRecord;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

/// In-memory credential store.
///
/// Process-lifetime storage with no persistence: the map starts empty and is
/// torn down with the owning service. Injected explicitly rather than living
/// as module state, so each test gets its own isolated instance.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<HashMap<String, CredentialRecord>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find(&self, username: &Username) -> Result<Option<CredentialRecord>, AccountError> {
        Ok(self.records.read().await.get(username.as_str()).cloned())
    }

    async fn insert(
        &self,
        username: Username,
        record: CredentialRecord,
    ) -> Result<(), AccountError> {
        // The write guard spans the occupancy check and the insert, making
        // the pair atomic under concurrent registrations.
        match self
            .records
            .write()
            .await
            .entry(username.as_str().to_string())
        {
            Entry::Occupied(_) => Err(AccountError::UsernameTaken(username.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;

    use super::*;
    use crate::account::models::EmailAddress;
    use crate::account::models::Role;

    fn record() -> CredentialRecord {
        CredentialRecord {
            email: EmailAddress::new("nicola@example.com".to_string()).unwrap(),
            role: Role::User,
            password_hash: "$argon2id$test_hash".to_string(),
            cost: 2,
            created_at: Utc::now(),
        }
    }

    fn username(s: &str) -> Username {
        Username::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = InMemoryCredentialStore::new();
        assert!(store.is_empty().await);

        store
            .insert(username("nicola"), record())
            .await
            .expect("Insert failed");

        let found = store
            .find(&username("nicola"))
            .await
            .expect("Find failed")
            .expect("Record missing");

        assert_eq!(found.email.as_str(), "nicola@example.com");
        assert_eq!(found.role, Role::User);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_find_unknown_username() {
        let store = InMemoryCredentialStore::new();

        let found = store.find(&username("nobody")).await.expect("Find failed");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_keeps_first_record() {
        let store = InMemoryCredentialStore::new();

        store
            .insert(username("nicola"), record())
            .await
            .expect("Insert failed");

        let mut second = record();
        second.email = EmailAddress::new("other@example.com".to_string()).unwrap();

        let result = store.insert(username("nicola"), second).await;
        assert!(matches!(
            result.unwrap_err(),
            AccountError::UsernameTaken(_)
        ));

        let found = store
            .find(&username("nicola"))
            .await
            .expect("Find failed")
            .expect("Record missing");
        assert_eq!(found.email.as_str(), "nicola@example.com");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_inserts_admit_exactly_one() {
        let store = Arc::new(InMemoryCredentialStore::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                tokio::spawn(async move { store.insert(username("nicola"), record()).await })
            })
            .collect();

        let mut successes = 0;
        for task in tasks {
            if task.await.expect("Task panicked").is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }
}

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::AccountError;
use crate::account::errors::CredentialField;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::User;
use crate::domain::account::models::Username;
use crate::domain::account::ports::UserRepository;

/// Process-local user store.
///
/// Used when no database is configured and by the integration tests. Records
/// are lost on restart.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Users>,
}

#[derive(Default)]
struct Users {
    by_username: HashMap<String, User>,
    // email -> username
    by_email: HashMap<String, String>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, AccountError> {
        let users = self.users.read().await;
        Ok(users.by_username.get(username.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, AccountError> {
        let users = self.users.read().await;
        Ok(users
            .by_email
            .get(email.as_str())
            .and_then(|username| users.by_username.get(username))
            .cloned())
    }

    async fn insert(&self, user: User) -> Result<(), AccountError> {
        let mut users = self.users.write().await;

        if users.by_username.contains_key(user.username.as_str()) {
            return Err(AccountError::Conflict(CredentialField::Username));
        }
        if let Some(email) = &user.email {
            if users.by_email.contains_key(email.as_str()) {
                return Err(AccountError::Conflict(CredentialField::Email));
            }
            users
                .by_email
                .insert(email.as_str().to_string(), user.username.as_str().to_string());
        }

        users
            .by_username
            .insert(user.username.as_str().to_string(), user);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::account::models::UserId;

    fn user(username: &str, email: Option<&str>) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: email.map(|e| EmailAddress::new(e.to_string()).unwrap()),
            password_hash: "$argon2id$test_hash".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repository = InMemoryUserRepository::new();
        let alice = user("alice", Some("a@b.com"));
        let alice_id = alice.id;

        repository.insert(alice).await.unwrap();

        let by_name = repository
            .find_by_username(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap()
            .expect("user by username");
        assert_eq!(by_name.id, alice_id);

        let by_email = repository
            .find_by_email(&EmailAddress::new("a@b.com".to_string()).unwrap())
            .await
            .unwrap()
            .expect("user by email");
        assert_eq!(by_email.id, alice_id);
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repository = InMemoryUserRepository::new();

        let found = repository
            .find_by_username(&Username::new("nobody".to_string()).unwrap())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_username_does_not_overwrite() {
        let repository = InMemoryUserRepository::new();
        let original = user("alice", Some("a@b.com"));
        let original_id = original.id;
        repository.insert(original).await.unwrap();

        let err = repository
            .insert(user("alice", Some("other@b.com")))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AccountError::Conflict(CredentialField::Username)
        ));

        let stored = repository
            .find_by_username(&Username::new("alice".to_string()).unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.id, original_id);
        assert!(repository
            .find_by_email(&EmailAddress::new("other@b.com".to_string()).unwrap())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_email() {
        let repository = InMemoryUserRepository::new();
        repository
            .insert(user("alice", Some("a@b.com")))
            .await
            .unwrap();

        let err = repository
            .insert(user("bob", Some("a@b.com")))
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Conflict(CredentialField::Email)));
    }

    #[tokio::test]
    async fn test_users_without_email_do_not_conflict() {
        let repository = InMemoryUserRepository::new();
        repository.insert(user("alice", None)).await.unwrap();
        repository.insert(user("bob", None)).await.unwrap();
    }
}

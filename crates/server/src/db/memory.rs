//! In-memory user store for tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use ecothread_core::{Email, UserId};

use super::{RepositoryError, UserStore};
use crate::models::user::{NewUser, ProfileUpdate, User};

#[derive(Default)]
struct Inner {
    next_id: i32,
    users: HashMap<UserId, (User, String)>,
}

/// User store that keeps everything in a map behind one lock.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.users.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|(u, _)| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(inner.next_id),
            email: user.email,
            name: user.name,
            first_name: user.first_name,
            last_name: user.last_name,
            username: String::new(),
            phone: user.phone,
            dob: user.dob,
            style_preferences: Vec::new(),
            avatar: user.avatar,
            current_level: 1,
            created_at: now,
            updated_at: now,
        };
        inner
            .users
            .insert(created.id, (created.clone(), user.password_hash));

        Ok(created)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|(u, _)| &u.email == email)
            .cloned())
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .get(&id)
            .map(|(u, _)| u.clone()))
    }

    async fn update_profile(
        &self,
        id: UserId,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|(user, _)| {
            update.apply_to(user);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn increment_level(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let mut inner = self.inner.write().await;
        Ok(inner.users.get_mut(&id).map(|(user, _)| {
            user.current_level = user.current_level.saturating_add(1);
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::user::RegistrationProfile;

    fn new_user(email: &str) -> NewUser {
        NewUser::from_registration(
            Email::parse(email).unwrap(),
            "$argon2id$stub".to_string(),
            RegistrationProfile::default(),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_ids_and_defaults() {
        let store = MemoryUserStore::new();
        let a = store.create(new_user("a@example.com")).await.unwrap();
        let b = store.create(new_user("b@example.com")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.current_level, 1);
        assert!(a.username.is_empty());
        assert!(a.style_preferences.is_empty());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();
        let err = store.create(new_user("a@example.com")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_registration_creates_one_user() {
        let store = MemoryUserStore::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.create(new_user("race@example.com")).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_update_and_increment() {
        let store = MemoryUserStore::new();
        let user = store.create(new_user("a@example.com")).await.unwrap();

        let update = ProfileUpdate {
            username: Some("looper".to_string()),
            ..Default::default()
        };
        let updated = store.update_profile(user.id, &update).await.unwrap().unwrap();
        assert_eq!(updated.username, "looper");
        assert!(updated.updated_at >= user.updated_at);

        let leveled = store.increment_level(user.id).await.unwrap().unwrap();
        assert_eq!(leveled.current_level, 2);

        assert!(store.update_profile(UserId::new(999), &update).await.unwrap().is_none());
        assert!(store.increment_level(UserId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_credentials_by_email() {
        let store = MemoryUserStore::new();
        store.create(new_user("a@example.com")).await.unwrap();

        let (user, hash) = store
            .find_credentials(&Email::parse("a@example.com").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.email.as_str(), "a@example.com");
        assert_eq!(hash, "$argon2id$stub");

        let missing = store
            .find_credentials(&Email::parse("zz@example.com").unwrap())
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}

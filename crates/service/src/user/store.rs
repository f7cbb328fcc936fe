use async_trait::async_trait;
use models::User;

use crate::errors::StoreError;
use crate::storage::InMemoryStore;

/// Trait abstraction for user storage.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `AlreadyExists` if a user with the same id is stored.
    async fn save(&self, user: User) -> Result<(), StoreError>;
    async fn find(&self, id: &str) -> Result<User, StoreError>;
    async fn find_all(&self) -> Result<Vec<User>, StoreError>;
}

/// Process-lifetime user store keyed by `User::id`.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    data: InMemoryStore<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: User) -> Result<(), StoreError> {
        self.data.insert_new(user.id.clone(), user).await
    }

    async fn find(&self, id: &str) -> Result<User, StoreError> {
        self.data.get(id).await
    }

    async fn find_all(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.data.list().await)
    }
}

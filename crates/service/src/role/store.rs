use async_trait::async_trait;
use models::{Role, RoleName};

use crate::errors::StoreError;
use crate::storage::InMemoryStore;

/// Trait abstraction for role storage. A role is keyed by its name, so at
/// most one role per name can be stored.
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn save(&self, role: Role) -> Result<(), StoreError>;
    async fn find(&self, name: RoleName) -> Result<Role, StoreError>;
    async fn find_all(&self) -> Result<Vec<Role>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryRoleStore {
    data: InMemoryStore<RoleName, Role>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RoleStore for InMemoryRoleStore {
    async fn save(&self, role: Role) -> Result<(), StoreError> {
        self.data.insert_new(role.name, role).await
    }

    async fn find(&self, name: RoleName) -> Result<Role, StoreError> {
        self.data.get(&name).await
    }

    async fn find_all(&self) -> Result<Vec<Role>, StoreError> {
        Ok(self.data.list().await)
    }
}

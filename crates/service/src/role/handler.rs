use std::sync::Arc;

use async_trait::async_trait;
use models::messages::{
    AddRoleRequest, AddRoleResponse, FindRoleRequest, FindRoleResponse, FindRolesRequest,
    FindRolesResponse,
};
use models::RoleName;
use tracing::{error, info, instrument, warn};

use super::store::RoleStore;
use crate::api::RoleService;
use crate::errors::StoreError;
use crate::status::Status;

/// Request handler for the role service.
pub struct RoleHandler<S: RoleStore> {
    store: Arc<S>,
}

impl<S: RoleStore> RoleHandler<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RoleStore> RoleService for RoleHandler<S> {
    #[instrument(skip(self, req), fields(role = %req.role.name))]
    async fn add_role(&self, req: AddRoleRequest) -> Result<AddRoleResponse, Status> {
        let role = req.role;
        let name = role.name;
        info!(permissions = ?role.permissions, "received a create-role request");

        match self.store.save(role).await {
            Ok(()) => {
                info!("saved role");
                Ok(AddRoleResponse { name })
            }
            Err(e @ StoreError::AlreadyExists) => {
                warn!("cannot save role since it already exists");
                Err(Status::already_exists(format!("cannot save role to store: {e}")))
            }
            Err(e) => {
                error!(error = %e, "cannot save role");
                Err(Status::internal(format!("cannot save role to store: {e}")))
            }
        }
    }

    #[instrument(skip(self, req), fields(role = %req.name))]
    async fn find_role(&self, req: FindRoleRequest) -> Result<FindRoleResponse, Status> {
        let name: RoleName = req.name.parse().map_err(|e| {
            warn!(error = %e, "rejected find-role request");
            Status::invalid_argument(format!("{e}"))
        })?;

        match self.store.find(name).await {
            Ok(role) => {
                info!("found role");
                Ok(FindRoleResponse { role })
            }
            Err(StoreError::NotFound) => {
                warn!("role is not found");
                Err(Status::not_found(format!("role {name} is not found")))
            }
            Err(e) => {
                error!(error = %e, "cannot find role");
                Err(Status::internal(format!("cannot find role: {e}")))
            }
        }
    }

    #[instrument(skip(self, _req))]
    async fn find_roles(&self, _req: FindRolesRequest) -> Result<FindRolesResponse, Status> {
        let roles = self.store.find_all().await.map_err(|e| {
            error!(error = %e, "cannot find roles");
            Status::internal(format!("cannot find roles: {e}"))
        })?;

        if roles.is_empty() {
            warn!("no roles found");
            return Err(Status::not_found("no roles found"));
        }

        info!(count = roles.len(), "listed roles");
        Ok(FindRolesResponse { roles })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::role::store::InMemoryRoleStore;
    use crate::status::Code;
    use models::{Permission, Role};

    fn handler() -> RoleHandler<InMemoryRoleStore> {
        RoleHandler::new(Arc::new(InMemoryRoleStore::new()))
    }

    fn add(role: Role) -> AddRoleRequest {
        AddRoleRequest { role }
    }

    struct BrokenStore;

    #[async_trait]
    impl RoleStore for BrokenStore {
        async fn save(&self, _role: Role) -> Result<(), StoreError> {
            Err(StoreError::Internal("lock lost".into()))
        }
        async fn find(&self, _name: RoleName) -> Result<Role, StoreError> {
            Err(StoreError::Internal("lock lost".into()))
        }
        async fn find_all(&self) -> Result<Vec<Role>, StoreError> {
            Err(StoreError::Internal("lock lost".into()))
        }
    }

    #[tokio::test]
    async fn add_echoes_name_and_find_returns_role() -> Result<(), anyhow::Error> {
        let h = handler();
        let owner = Role::new(RoleName::Owner, [Permission::Read, Permission::Readwrite]);
        assert_eq!(h.add_role(add(owner.clone())).await?.name, RoleName::Owner);

        let found = h.find_role(FindRoleRequest { name: "OWNER".into() }).await?.role;
        assert_eq!(found, owner);
        assert_eq!(h.find_roles(FindRolesRequest {}).await?.roles, vec![owner]);
        Ok(())
    }

    #[tokio::test]
    async fn second_role_with_same_name_conflicts() -> Result<(), anyhow::Error> {
        let h = handler();
        h.add_role(add(Role::new(RoleName::Owner, [Permission::Read, Permission::Readwrite])))
            .await?;

        let err = h
            .add_role(add(Role::new(RoleName::Owner, [Permission::Read])))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::AlreadyExists);

        let kept = h.find_role(FindRoleRequest { name: "OWNER".into() }).await?.role;
        assert_eq!(kept.permissions, vec![Permission::Read, Permission::Readwrite]);
        Ok(())
    }

    #[tokio::test]
    async fn lookup_outcomes() {
        let h = handler();
        let missing = h.find_role(FindRoleRequest { name: "ADMIN".into() }).await.unwrap_err();
        assert_eq!(missing.code(), Code::NotFound);

        let bogus = h.find_role(FindRoleRequest { name: "GUEST".into() }).await.unwrap_err();
        assert_eq!(bogus.code(), Code::InvalidArgument);

        let empty = h.find_roles(FindRolesRequest {}).await.unwrap_err();
        assert_eq!(empty.code(), Code::NotFound);
        assert_eq!(empty.message(), "no roles found");
    }

    #[tokio::test]
    async fn store_failures_surface_as_internal() {
        let h = RoleHandler::new(Arc::new(BrokenStore));
        let save = h
            .add_role(add(Role::new(RoleName::Customer, [Permission::Read])))
            .await
            .unwrap_err();
        let find = h.find_role(FindRoleRequest { name: "CUSTOMER".into() }).await.unwrap_err();
        let list = h.find_roles(FindRolesRequest {}).await.unwrap_err();
        assert_eq!(save.code(), Code::Internal);
        assert_eq!(find.code(), Code::Internal);
        assert_eq!(list.code(), Code::Internal);
    }
}

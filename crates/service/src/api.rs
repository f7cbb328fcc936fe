use async_trait::async_trait;
use models::messages::{
    AddRoleRequest, AddRoleResponse, AddUserRequest, AddUserResponse, FindRoleRequest,
    FindRoleResponse, FindRolesRequest, FindRolesResponse, FindUserRequest, FindUserResponse,
    FindUsersRequest, FindUsersResponse,
};

use crate::status::Status;

/// User service surface. Implemented by the in-process handler and by the
/// remote RPC client, so transports can be wired to either.
#[async_trait]
pub trait UserService: Send + Sync {
    async fn add_user(&self, req: AddUserRequest) -> Result<AddUserResponse, Status>;
    async fn find_user(&self, req: FindUserRequest) -> Result<FindUserResponse, Status>;
    async fn find_users(&self, req: FindUsersRequest) -> Result<FindUsersResponse, Status>;
}

/// Role service surface.
#[async_trait]
pub trait RoleService: Send + Sync {
    async fn add_role(&self, req: AddRoleRequest) -> Result<AddRoleResponse, Status>;
    async fn find_role(&self, req: FindRoleRequest) -> Result<FindRoleResponse, Status>;
    async fn find_roles(&self, req: FindRolesRequest) -> Result<FindRolesResponse, Status>;
}

/// RPC method paths, shared by the RPC router and the RPC client.
pub mod methods {
    pub const ADD_USER: &str = "/user.UserService/AddUser";
    pub const FIND_USER: &str = "/user.UserService/FindUser";
    pub const FIND_USERS: &str = "/user.UserService/FindUsers";
    pub const ADD_ROLE: &str = "/role.RoleService/AddRole";
    pub const FIND_ROLE: &str = "/role.RoleService/FindRole";
    pub const FIND_ROLES: &str = "/role.RoleService/FindRoles";
}

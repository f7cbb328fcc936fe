//! Service layer for the user and role collections.
//! - `storage` holds the generic lock-guarded keyed map.
//! - `user` / `role` each pair a store with the handler that fronts it.
//! - `api` defines the service traits shared by handlers and remote clients.
//! - `status` is the protocol-level outcome every handler returns on failure.

pub mod api;
pub mod errors;
pub mod role;
pub mod status;
pub mod storage;
pub mod user;

pub use api::{RoleService, UserService};
pub use errors::StoreError;
pub use status::{Code, Status};

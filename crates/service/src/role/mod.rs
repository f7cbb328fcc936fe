//! Role subsystem: keyed by the role name.

pub mod handler;
pub mod store;

pub use handler::RoleHandler;
pub use store::{InMemoryRoleStore, RoleStore};

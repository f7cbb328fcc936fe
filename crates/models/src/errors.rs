use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown role name: {0}")]
    UnknownRoleName(String),
    #[error("unknown permission: {0}")]
    UnknownPermission(String),
}

use thiserror::Error;

/// Plain outcome kinds returned by stores. Stores never log or wrap these;
/// handlers translate them into a [`crate::status::Status`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("resource already exists")]
    AlreadyExists,
    #[error("resource not found")]
    NotFound,
    #[error("store failure: {0}")]
    Internal(String),
}

//! User subsystem: keyed by the user identifier.

pub mod handler;
pub mod store;

pub use handler::UserHandler;
pub use store::{InMemoryUserStore, UserStore};

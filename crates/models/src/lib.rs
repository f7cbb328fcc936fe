//! Domain records and request/response messages shared by the service layer,
//! the server transports and the RPC client.
//! - `user` / `role` hold the stored entities.
//! - `messages` holds the per-method request and response envelopes.

pub mod errors;
pub mod messages;
pub mod role;
pub mod user;

pub use role::{Permission, Role, RoleName};
pub use user::User;

//! Storage abstractions for service layer
//!
//! Contains the reusable in-memory keyed map that both the user and the role
//! stores are built on.

pub mod memory_store;

pub use memory_store::InMemoryStore;

//! Collaborator interfaces and an in-memory implementation.

pub mod adapter;
pub mod memory;

pub use adapter::{RelationshipStore, TitleLookup};
pub use memory::InMemStore;

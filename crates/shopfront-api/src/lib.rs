//! Shared API types for the shopfront client.
//!
//! This crate holds the plain data shapes exchanged with the backend
//! and the types that cross the service boundary:
//! - `models` - entity models, drafts, and partial updates
//! - `error` - the failure taxonomy published to consumers
//! - `events` - store notifications emitted after each operation

pub mod error;
pub mod events;
pub mod models;

pub use error::ApiError;
pub use events::StoreEvent;
pub use models::{
    Category, CategoryDraft, CategoryUpdate, Product, ProductDraft, ProductUpdate, Resource,
};

/// Server-assigned numeric identifier shared by all entity types.
pub type ResourceId = i64;

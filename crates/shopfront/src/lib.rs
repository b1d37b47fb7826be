//! Client-side CRUD state layer for the shopfront catalog.
//!
//! One `ResourceService` per entity type wraps a remote backend and
//! owns the locally cached collection:
//! - `backend` - the `ResourceBackend` trait the HTTP layer implements
//! - `store` - reactive state container (items, loading flag, error)
//! - `service` - the CRUD operations that funnel every cache mutation
//! - `testing` - in-memory fake backend for tests
//!
//! Consumers never see the mutable collection; they observe read-only
//! watch projections and a broadcast stream of operation outcomes.

pub mod backend;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use backend::ResourceBackend;
pub use service::{CategoryService, ProductService, ResourceService};
pub use store::ResourceStore;

//! REST backend for the shopfront services.
//!
//! - `client` - shared HTTP client with error classification
//! - `backend` - `RestBackend`, the `ResourceBackend` implementation
//!   speaking the backend's CRUD contract

pub mod backend;
pub mod client;

pub use backend::RestBackend;
pub use client::RestClient;

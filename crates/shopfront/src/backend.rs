use async_trait::async_trait;
use shopfront_api::{ApiError, Resource, ResourceId};

/// Remote CRUD operations for one entity type.
///
/// Implemented by the REST layer against the real backend and by the
/// in-memory fake in tests. Every method maps to exactly one request;
/// retries, queueing, and caching are not this trait's concern.
#[async_trait]
pub trait ResourceBackend<R: Resource>: Send + Sync {
    /// Read the whole collection.
    async fn fetch_all(&self) -> Result<Vec<R>, ApiError>;

    /// Create an entity from a draft; the returned entity carries the
    /// server-assigned `id` and `created_at`.
    async fn create(&self, draft: &R::Draft) -> Result<R, ApiError>;

    /// Apply a partial update; returns the server's updated entity.
    async fn update(&self, id: ResourceId, update: &R::Update) -> Result<R, ApiError>;

    /// Delete by id. Success implies removal.
    async fn delete(&self, id: ResourceId) -> Result<(), ApiError>;
}
